//! # Storefront
//!
//! Wires the store, drawer, notifier and locale switcher to one page and
//! routes [`UiIntent`]s to them.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Storefront                                                             │
//! │    ├── CartStore ───────────────events──────────┐                      │
//! │    │     └── Arc<dyn CartGateway>                ▼                      │
//! │    ├── Arc<StorefrontView> (CartEventSink) ── render_cart ──┐          │
//! │    │     ├── Notifier                                       │          │
//! │    │     └── Arc<DrawerController> ◄──────────┐             ▼          │
//! │    ├── Arc<DrawerController> ─────────────────┘      Arc<dyn PageSurface>
//! │    └── Arc<LanguageSwitcher>                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use tracing::{debug, info, warn};

use beautican_core::{
    render_cart, variant_badges, CartSnapshot, ControlId, ElementAttributes, RenderContext, UiIntent,
    VariantId,
};

use crate::config::StorefrontConfig;
use crate::drawer::DrawerController;
use crate::error::StorefrontResult;
use crate::gateway::CartGateway;
use crate::locale::{LanguageSwitcher, LocalePreferences};
use crate::notify::{NotificationTiming, Notifier};
use crate::store::{CartEventSink, CartStore, MutationOutcome, Notice};
use crate::surface::PageSurface;

// =============================================================================
// View (store event sink)
// =============================================================================

/// Projects store events onto the page.
pub struct StorefrontView {
    surface: Arc<dyn PageSurface>,
    drawer: Arc<DrawerController>,
    locale: Arc<LanguageSwitcher>,
    notifier: Notifier,
    currency_suffix: String,
    checkout_url: String,
}

impl StorefrontView {
    /// Renders the drawer content and every badge for `snapshot`.
    pub fn render(&self, snapshot: Option<&CartSnapshot>, last_added: Option<VariantId>) {
        let ctx = RenderContext {
            localizer: self.locale.translations().localizer(self.locale.current()),
            last_added,
            currency_suffix: &self.currency_suffix,
            checkout_url: &self.checkout_url,
        };
        let view = render_cart(snapshot, &ctx);

        self.surface.set_cart_content(&view.content);
        self.surface.set_count_badge(view.count_badge);
        for badge in variant_badges(snapshot, &self.surface.variant_badge_ids()) {
            self.surface.set_variant_badge(badge);
        }
    }
}

impl CartEventSink for StorefrontView {
    fn cart_updated(&self, snapshot: &CartSnapshot, last_added: Option<VariantId>) {
        self.render(Some(snapshot), last_added);
    }

    fn control_loading(&self, control: &ControlId, loading: bool) {
        self.surface.set_control_loading(control.as_str(), loading);
    }

    fn open_drawer(&self) {
        self.drawer.open();
    }

    fn notify(&self, notice: Notice) {
        let message = self.locale.translations().t(self.locale.current(), notice.key());
        self.notifier.notify(&message, notice.kind());
    }
}

// =============================================================================
// Storefront
// =============================================================================

/// One page session of the storefront cart.
pub struct Storefront {
    store: CartStore,
    view: Arc<StorefrontView>,
    drawer: Arc<DrawerController>,
    locale: Arc<LanguageSwitcher>,
}

impl Storefront {
    /// Builds the storefront for one page.
    pub fn new(
        config: &StorefrontConfig,
        gateway: Arc<dyn CartGateway>,
        surface: Arc<dyn PageSurface>,
        prefs: Arc<dyn LocalePreferences>,
    ) -> StorefrontResult<Self> {
        let translations = Arc::new(config.translations()?);
        let locale = Arc::new(LanguageSwitcher::new(
            prefs,
            config.storefront.locale_key.clone(),
            config.storefront.default_locale,
            translations,
            surface.clone(),
        ));
        let drawer = Arc::new(DrawerController::new(surface.clone()));
        let view = Arc::new(StorefrontView {
            surface: surface.clone(),
            drawer: drawer.clone(),
            locale: locale.clone(),
            notifier: Notifier::new(surface, NotificationTiming::from(&config.notifications)),
            currency_suffix: config.storefront.currency_suffix.clone(),
            checkout_url: config.storefront.checkout_url.clone(),
        });
        let store = CartStore::with_sink(gateway, view.clone());

        Ok(Storefront {
            store,
            view,
            drawer,
            locale,
        })
    }

    /// Applies the stored locale, renders the empty drawer and loads the cart.
    pub async fn start(&self) -> MutationOutcome {
        let locale = self.locale.init();
        info!(locale = %locale, "storefront starting");
        self.view.render(None, None);
        self.store.load().await
    }

    pub fn store(&self) -> &CartStore {
        &self.store
    }

    pub fn drawer(&self) -> &DrawerController {
        &self.drawer
    }

    pub fn locale(&self) -> &LanguageSwitcher {
        &self.locale
    }

    /// Handles a click on an element, if it has a bound role.
    pub async fn click(&self, element: &impl ElementAttributes) -> Option<MutationOutcome> {
        let intent = UiIntent::from_element(element)?;
        Some(self.dispatch(intent).await)
    }

    /// Routes an intent to its handler.
    ///
    /// Drawer and locale intents always report `Applied`.
    pub async fn dispatch(&self, intent: UiIntent) -> MutationOutcome {
        debug!(?intent, "dispatch");
        match intent {
            UiIntent::AddToCart {
                variant_id,
                quantity,
                control,
            } => self.store.add(variant_id, quantity, control).await,
            UiIntent::Increase { line_key } => self.store.increase(&line_key).await,
            UiIntent::Decrease { line_key } => self.store.decrease(&line_key).await,
            UiIntent::Remove { line_key } => self.store.remove(&line_key).await,
            UiIntent::ToggleDrawer => {
                if !self.drawer.toggle().to.is_open() {
                    self.store.clear_last_added();
                }
                MutationOutcome::Applied
            }
            UiIntent::CloseDrawer => {
                self.drawer.close();
                self.store.clear_last_added();
                MutationOutcome::Applied
            }
            UiIntent::ToggleLocale => {
                if let Err(e) = self.locale.toggle() {
                    warn!(error = %e, "locale applied but not saved");
                }
                self.view
                    .render(self.store.snapshot().as_ref(), self.store.last_added());
                MutationOutcome::Applied
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{GatewayOp, MemoryCartGateway};
    use crate::locale::MemoryLocalePreferences;
    use crate::notify::NotificationKind;
    use crate::store::SkipReason;
    use crate::surface::MemoryPage;
    use beautican_core::intent::{ATTR_ADD_TO_CART, ATTR_CONTROL_ID, ATTR_VARIANT_ID};
    use beautican_core::{DrawerState, Locale, Node};
    use std::collections::BTreeMap;

    fn vid(id: u64) -> VariantId {
        VariantId::new(id).unwrap()
    }

    struct Harness {
        storefront: Storefront,
        page: Arc<MemoryPage>,
        gateway: Arc<MemoryCartGateway>,
        prefs: Arc<MemoryLocalePreferences>,
    }

    fn harness() -> Harness {
        let page = Arc::new(MemoryPage::new(vec![vid(501), vid(502)], &["cart.total"]));
        let gateway = Arc::new(MemoryCartGateway::demo());
        let prefs = Arc::new(MemoryLocalePreferences::default());
        let storefront = Storefront::new(
            &StorefrontConfig::default(),
            gateway.clone(),
            page.clone(),
            prefs.clone(),
        )
        .unwrap();
        Harness {
            storefront,
            page,
            gateway,
            prefs,
        }
    }

    fn add_button(variant: &str) -> BTreeMap<String, String> {
        [
            (ATTR_ADD_TO_CART, ""),
            (ATTR_VARIANT_ID, variant),
            (ATTR_CONTROL_ID, "hero-add"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn rendered(page: &MemoryPage) -> Node {
        page.state().cart_content.unwrap()
    }

    #[tokio::test]
    async fn test_start_renders_empty_cart() {
        let h = harness();
        assert_eq!(h.storefront.start().await, MutationOutcome::Applied);

        let state = h.page.state();
        assert!(state.cart_html().contains("Your cart is empty"));
        assert!(!state.cart_html().contains("data-cart-footer"));
        assert_eq!(state.count_badge.map(|b| b.visible), Some(false));
        assert_eq!(state.locale.map(|(l, _)| l), Some(Locale::En));
    }

    #[tokio::test]
    async fn test_add_click_opens_drawer_and_highlights() {
        let h = harness();
        h.storefront.start().await;

        let outcome = h.storefront.click(&add_button("501")).await;
        assert_eq!(outcome, Some(MutationOutcome::Applied));

        assert_eq!(h.storefront.drawer().state(), DrawerState::Open);
        assert_eq!(h.storefront.store().last_added(), Some(vid(501)));

        let state = h.page.state();
        assert!(state.panel_open && state.scroll_locked);
        assert!(state.loading_controls.is_empty());
        assert_eq!(state.count_badge.map(|b| b.count), Some(1));
        assert_eq!(state.variant_badges[&vid(501)].quantity, 1);
        assert!(!state.variant_badges[&vid(502)].visible);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].message, "Added to cart");
        assert_eq!(state.notifications[0].kind, NotificationKind::Success);

        let rows = rendered(&h.page);
        let rows = rows.find_all("data-line-row");
        assert_eq!(rows.len(), 1);
        assert!(rows[0].has_class(beautican_core::render::HIGHLIGHT_CLASS));
    }

    #[tokio::test]
    async fn test_close_drawer_clears_marker() {
        let h = harness();
        h.storefront.start().await;
        h.storefront.click(&add_button("501")).await;

        h.storefront.dispatch(UiIntent::CloseDrawer).await;
        assert_eq!(h.storefront.store().last_added(), None);
        assert!(!h.page.state().overlay_visible);

        h.storefront.dispatch(UiIntent::ToggleDrawer).await;
        assert!(h.storefront.drawer().state().is_open());
    }

    #[tokio::test]
    async fn test_add_failure_shows_error_and_keeps_drawer_closed() {
        let h = harness();
        h.storefront.start().await;
        h.gateway.fail_next(GatewayOp::AddLine, 500);

        let outcome = h.storefront.click(&add_button("501")).await;
        assert_eq!(outcome, Some(MutationOutcome::Failed));

        let state = h.page.state();
        assert!(!state.panel_open);
        assert!(state.loading_controls.is_empty());
        assert_eq!(state.notifications[0].kind, NotificationKind::Error);
        assert_eq!(state.notifications[0].message, "Error adding to cart");
        assert!(!h.storefront.store().is_busy());
    }

    #[tokio::test]
    async fn test_rendered_controls_drive_quantity_changes() {
        let h = harness();
        h.storefront.start().await;
        h.storefront.click(&add_button("502")).await;

        let content = rendered(&h.page);
        let increase = content
            .find_all(beautican_core::intent::ATTR_CART_INCREASE)
            .into_iter()
            .next()
            .cloned()
            .unwrap();
        assert_eq!(
            h.storefront.click(&increase).await,
            Some(MutationOutcome::Applied)
        );
        assert_eq!(h.page.state().count_badge.map(|b| b.count), Some(2));

        let content = rendered(&h.page);
        let remove = content
            .find_all(beautican_core::intent::ATTR_CART_REMOVE)
            .into_iter()
            .next()
            .cloned()
            .unwrap();
        h.storefront.click(&remove).await;
        assert!(h.gateway.current().is_empty());
        assert!(h.page.state().cart_html().contains("Your cart is empty"));
    }

    #[tokio::test]
    async fn test_invalid_add_is_skipped() {
        let h = harness();
        h.storefront.start().await;
        let outcome = h.storefront.click(&add_button("0")).await;
        assert_eq!(outcome, Some(MutationOutcome::Skipped(SkipReason::Invalid)));
        assert!(h.page.state().notifications.is_empty());
    }

    #[tokio::test]
    async fn test_toggle_locale_rerenders_cart() {
        let h = harness();
        h.storefront.start().await;
        h.storefront.click(&add_button("501")).await;

        h.storefront.dispatch(UiIntent::ToggleLocale).await;

        assert_eq!(h.storefront.locale().current(), Locale::Ar);
        assert_eq!(h.prefs.load("beautican-lang").unwrap().as_deref(), Some("ar"));
        let state = h.page.state();
        assert_eq!(state.texts["cart.total"], "المجموع");
        assert!(state.cart_html().contains("المجموع"));
    }

    #[tokio::test]
    async fn test_unbound_click_is_ignored() {
        let h = harness();
        let link: BTreeMap<String, String> = [("href".to_string(), "#top".to_string())].into();
        assert_eq!(h.storefront.click(&link).await, None);
    }
}
