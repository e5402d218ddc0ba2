//! # Page Surface
//!
//! The thin adapter between storefront logic and a real page.
//!
//! ```text
//!   ┌──────────────────────┐        ┌──────────────────────────────────┐
//!   │ StorefrontView       │        │ PageSurface                      │
//!   │ DrawerController     │ ─────► │   data-cart-content  (HTML)      │
//!   │ Notifier             │        │   data-cart-count    (badge)     │
//!   │ LanguageSwitcher     │        │   data-variant-quantity          │
//!   └──────────────────────┘        │   data-cart-overlay / -drawer    │
//!                                   │   body scroll lock               │
//!                                   │   toasts, <html lang dir>        │
//!                                   │   data-i18n texts, toggle label  │
//!                                   └──────────────────────────────────┘
//! ```
//!
//! Everything above the trait is testable without a DOM. [`MemoryPage`] is
//! the in-memory page used by the binary and the tests.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, PoisonError};

use beautican_core::{CountBadge, Locale, Node, TextDirection, VariantBadge, VariantId};

use crate::notify::{NotificationId, NotificationKind, NotificationPhase};

/// Page operations the storefront needs. Implementations must be cheap;
/// they are called synchronously from store callbacks and timer tasks.
pub trait PageSurface: Send + Sync {
    // Cart drawer content and badges
    fn set_cart_content(&self, content: &Node);
    fn set_count_badge(&self, badge: CountBadge);
    fn variant_badge_ids(&self) -> Vec<VariantId>;
    fn set_variant_badge(&self, badge: VariantBadge);
    fn set_control_loading(&self, control: &str, loading: bool);

    // Drawer chrome
    fn set_overlay_visible(&self, visible: bool);
    fn set_panel_open(&self, open: bool);
    fn set_scroll_locked(&self, locked: bool);

    // Notifications
    fn insert_notification(&self, id: NotificationId, message: &str, kind: NotificationKind);
    fn set_notification_phase(&self, id: NotificationId, phase: NotificationPhase);
    fn remove_notification(&self, id: NotificationId);

    // Locale
    fn set_document_locale(&self, locale: Locale, direction: TextDirection);
    fn i18n_keys(&self) -> Vec<String>;
    fn set_localized_text(&self, key: &str, text: &str);
    fn set_toggle_label(&self, label: &str);
}

/// A notification currently in the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastState {
    pub id: NotificationId,
    pub message: String,
    pub kind: NotificationKind,
    pub phase: NotificationPhase,
}

/// Observable state of a [`MemoryPage`].
#[derive(Debug, Clone, Default)]
pub struct PageState {
    pub cart_content: Option<Node>,
    pub count_badge: Option<CountBadge>,
    pub variant_badges: BTreeMap<VariantId, VariantBadge>,
    pub loading_controls: BTreeSet<String>,
    pub overlay_visible: bool,
    pub panel_open: bool,
    pub scroll_locked: bool,
    pub notifications: Vec<ToastState>,
    pub locale: Option<(Locale, TextDirection)>,
    pub texts: BTreeMap<String, String>,
    pub toggle_label: Option<String>,
}

impl PageState {
    /// Serialized drawer content, empty if nothing was rendered yet.
    pub fn cart_html(&self) -> String {
        self.cart_content.as_ref().map(Node::to_html).unwrap_or_default()
    }
}

/// In-memory page.
#[derive(Debug, Default)]
pub struct MemoryPage {
    variant_ids: Vec<VariantId>,
    state: Mutex<PageState>,
}

impl MemoryPage {
    /// A page showing badges for `variant_ids` and static texts under
    /// `i18n_keys`.
    pub fn new(variant_ids: Vec<VariantId>, i18n_keys: &[&str]) -> Self {
        let state = PageState {
            texts: i18n_keys
                .iter()
                .map(|k| (k.to_string(), k.to_string()))
                .collect(),
            ..Default::default()
        };
        MemoryPage {
            variant_ids,
            state: Mutex::new(state),
        }
    }

    pub fn state(&self) -> PageState {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, PageState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl PageSurface for MemoryPage {
    fn set_cart_content(&self, content: &Node) {
        self.lock().cart_content = Some(content.clone());
    }

    fn set_count_badge(&self, badge: CountBadge) {
        self.lock().count_badge = Some(badge);
    }

    fn variant_badge_ids(&self) -> Vec<VariantId> {
        self.variant_ids.clone()
    }

    fn set_variant_badge(&self, badge: VariantBadge) {
        self.lock().variant_badges.insert(badge.variant_id, badge);
    }

    fn set_control_loading(&self, control: &str, loading: bool) {
        let mut state = self.lock();
        if loading {
            state.loading_controls.insert(control.to_string());
        } else {
            state.loading_controls.remove(control);
        }
    }

    fn set_overlay_visible(&self, visible: bool) {
        self.lock().overlay_visible = visible;
    }

    fn set_panel_open(&self, open: bool) {
        self.lock().panel_open = open;
    }

    fn set_scroll_locked(&self, locked: bool) {
        self.lock().scroll_locked = locked;
    }

    fn insert_notification(&self, id: NotificationId, message: &str, kind: NotificationKind) {
        self.lock().notifications.push(ToastState {
            id,
            message: message.to_string(),
            kind,
            phase: NotificationPhase::Entering,
        });
    }

    fn set_notification_phase(&self, id: NotificationId, phase: NotificationPhase) {
        if let Some(toast) = self.lock().notifications.iter_mut().find(|t| t.id == id) {
            toast.phase = phase;
        }
    }

    fn remove_notification(&self, id: NotificationId) {
        self.lock().notifications.retain(|t| t.id != id);
    }

    fn set_document_locale(&self, locale: Locale, direction: TextDirection) {
        self.lock().locale = Some((locale, direction));
    }

    fn i18n_keys(&self) -> Vec<String> {
        self.lock().texts.keys().cloned().collect()
    }

    fn set_localized_text(&self, key: &str, text: &str) {
        self.lock().texts.insert(key.to_string(), text.to_string());
    }

    fn set_toggle_label(&self, label: &str) {
        self.lock().toggle_label = Some(label.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loading_controls_set_and_clear() {
        let page = MemoryPage::default();
        page.set_control_loading("btn-1", true);
        page.set_control_loading("btn-2", true);
        page.set_control_loading("btn-1", false);
        let loading: Vec<_> = page.state().loading_controls.into_iter().collect();
        assert_eq!(loading, vec!["btn-2".to_string()]);
    }

    #[test]
    fn test_notification_bookkeeping() {
        let page = MemoryPage::default();
        page.insert_notification(1, "a", NotificationKind::Success);
        page.insert_notification(2, "b", NotificationKind::Error);
        page.set_notification_phase(2, NotificationPhase::Visible);
        page.remove_notification(1);
        // Unknown ids are ignored
        page.set_notification_phase(7, NotificationPhase::Leaving);

        let state = page.state();
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].phase, NotificationPhase::Visible);
    }

    #[test]
    fn test_static_texts_start_as_keys() {
        let page = MemoryPage::new(vec![], &["cart.total"]);
        assert_eq!(page.i18n_keys(), vec!["cart.total".to_string()]);
        assert_eq!(page.state().texts["cart.total"], "cart.total");
        assert_eq!(page.state().cart_html(), "");
    }
}
