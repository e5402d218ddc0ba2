//! # beautican-sync: Cart Synchronization for the Beautican Storefront
//!
//! Keeps the page's cart in step with the remote cart backend and projects
//! it onto the page.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Storefront Cart Layer                            │
//! │                                                                         │
//! │  click ──► UiIntent ──► Storefront::dispatch                            │
//! │                              │                                          │
//! │         ┌────────────────────┼─────────────────────┐                    │
//! │         ▼                    ▼                     ▼                    │
//! │  ┌──────────────┐   ┌──────────────────┐   ┌──────────────────┐        │
//! │  │  CartStore   │   │ DrawerController │   │ LanguageSwitcher │        │
//! │  │              │   │                  │   │                  │        │
//! │  │ busy guard   │   │ overlay, panel,  │   │ lang/dir, texts, │        │
//! │  │ snapshot     │   │ scroll lock      │   │ preference store │        │
//! │  │ last added   │   └──────────────────┘   └──────────────────┘        │
//! │  └──────┬───────┘                                                       │
//! │         │ CartGateway (HTTP or in-memory)                               │
//! │         │                                                               │
//! │         └── events ──► StorefrontView ──► render_cart ──► PageSurface   │
//! │                                       ──► Notifier (timed toasts)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`gateway`] - Backend contract and the in-memory backend
//! - [`http`] - `reqwest` implementation of the backend contract
//! - [`store`] - Cart state store and its event sink
//! - [`drawer`] - Drawer side effects
//! - [`notify`] - Timed notifications
//! - [`locale`] - Locale switching and preference storage
//! - [`surface`] - Page adapter trait and the in-memory page
//! - [`storefront`] - Intent dispatcher wiring it all together
//! - [`config`] - Configuration (file, environment, defaults)
//! - [`error`] - Error types

pub mod config;
pub mod drawer;
pub mod error;
pub mod gateway;
pub mod http;
pub mod locale;
pub mod notify;
pub mod store;
pub mod storefront;
pub mod surface;

// Re-exports for convenience
pub use config::StorefrontConfig;
pub use drawer::DrawerController;
pub use error::{StorefrontError, StorefrontResult, TransportError};
pub use gateway::{CartGateway, MemoryCartGateway};
pub use http::HttpCartGateway;
pub use locale::{FileLocalePreferences, LanguageSwitcher, LocalePreferences, MemoryLocalePreferences};
pub use notify::{NotificationKind, NotificationPhase, NotificationTiming, Notifier};
pub use store::{CartEventSink, CartStore, MutationOutcome, NoOpSink, Notice, SkipReason};
pub use storefront::{Storefront, StorefrontView};
pub use surface::{MemoryPage, PageSurface};
