//! # Drawer State Machine
//!
//! ```text
//!              open() / toggle()
//!   ┌────────┐ ─────────────────► ┌──────┐
//!   │ Closed │                    │ Open │
//!   └────────┘ ◄───────────────── └──────┘
//!              close() / toggle()
//!
//!   open() on Open and close() on Closed keep the state (idempotent)
//! ```
//!
//! Side effects (overlay, panel class, scroll lock) are applied by the
//! controller in `beautican-sync`; this type only decides the next state.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Open/closed state of the slide-out cart drawer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum DrawerState {
    #[default]
    Closed,
    Open,
}

/// Result of applying a drawer operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawerTransition {
    pub from: DrawerState,
    pub to: DrawerState,
}

impl DrawerTransition {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

impl DrawerState {
    pub fn is_open(&self) -> bool {
        matches!(self, DrawerState::Open)
    }

    pub fn open(&mut self) -> DrawerTransition {
        self.go(DrawerState::Open)
    }

    pub fn close(&mut self) -> DrawerTransition {
        self.go(DrawerState::Closed)
    }

    pub fn toggle(&mut self) -> DrawerTransition {
        match *self {
            DrawerState::Open => self.close(),
            DrawerState::Closed => self.open(),
        }
    }

    fn go(&mut self, to: DrawerState) -> DrawerTransition {
        let from = *self;
        *self = to;
        DrawerTransition { from, to }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state_is_closed() {
        assert_eq!(DrawerState::default(), DrawerState::Closed);
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut state = DrawerState::Closed;
        assert!(state.open().changed());
        let again = state.open();
        assert!(!again.changed());
        assert_eq!(state, DrawerState::Open);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut state = DrawerState::Open;
        assert!(state.close().changed());
        assert!(!state.close().changed());
        assert_eq!(state, DrawerState::Closed);
    }

    #[test]
    fn test_toggle_negates() {
        let mut state = DrawerState::Closed;
        assert_eq!(state.toggle().to, DrawerState::Open);
        assert_eq!(state.toggle().to, DrawerState::Closed);
        assert!(!state.is_open());
    }
}
