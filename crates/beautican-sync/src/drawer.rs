//! Applies [`DrawerState`] transitions to the page.

use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

use beautican_core::{DrawerState, DrawerTransition};

use crate::surface::PageSurface;

/// Owns the drawer state and its visible side effects.
///
/// Effects are applied on every call, not only on a state change, so
/// repeated calls always converge to the same page.
pub struct DrawerController {
    state: Mutex<DrawerState>,
    surface: Arc<dyn PageSurface>,
}

impl DrawerController {
    pub fn new(surface: Arc<dyn PageSurface>) -> Self {
        DrawerController {
            state: Mutex::new(DrawerState::default()),
            surface,
        }
    }

    pub fn state(&self) -> DrawerState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn open(&self) -> DrawerTransition {
        self.apply(DrawerState::open)
    }

    pub fn close(&self) -> DrawerTransition {
        self.apply(DrawerState::close)
    }

    pub fn toggle(&self) -> DrawerTransition {
        self.apply(DrawerState::toggle)
    }

    fn apply(&self, op: fn(&mut DrawerState) -> DrawerTransition) -> DrawerTransition {
        let transition = {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            op(&mut *state)
        };

        let open = transition.to.is_open();
        self.surface.set_overlay_visible(open);
        self.surface.set_panel_open(open);
        self.surface.set_scroll_locked(open);

        if transition.changed() {
            debug!(from = ?transition.from, to = ?transition.to, "drawer");
        }
        transition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemoryPage;

    #[test]
    fn test_open_and_close_apply_effects() {
        let page = Arc::new(MemoryPage::default());
        let drawer = DrawerController::new(page.clone());

        drawer.open();
        let state = page.state();
        assert!(state.overlay_visible && state.panel_open && state.scroll_locked);

        drawer.close();
        let state = page.state();
        assert!(!state.overlay_visible && !state.panel_open && !state.scroll_locked);
        assert_eq!(drawer.state(), DrawerState::Closed);
    }

    #[test]
    fn test_repeated_open_is_idempotent() {
        let page = Arc::new(MemoryPage::default());
        let drawer = DrawerController::new(page.clone());

        assert!(drawer.open().changed());
        assert!(!drawer.open().changed());
        assert!(drawer.state().is_open());
        assert!(page.state().panel_open);
    }

    #[test]
    fn test_close_reapplies_effects_even_when_closed() {
        let page = Arc::new(MemoryPage::default());
        page.set_scroll_locked(true);
        let drawer = DrawerController::new(page.clone());

        assert!(!drawer.close().changed());
        assert!(!page.state().scroll_locked);
    }

    #[test]
    fn test_toggle() {
        let page = Arc::new(MemoryPage::default());
        let drawer = DrawerController::new(page.clone());
        assert_eq!(drawer.toggle().to, DrawerState::Open);
        assert_eq!(drawer.toggle().to, DrawerState::Closed);
        assert!(!page.state().overlay_visible);
    }
}
