//! # beautican-core: Pure Cart Logic for the Beautican Storefront
//!
//! This crate holds everything about the storefront cart that can be
//! computed without touching the network, a timer, or a real page.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Beautican Storefront Layers                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Page (markup with data-* roles)                 │   │
//! │  │   click ──► UiIntent::from_element ──► Storefront::dispatch     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             beautican-sync (store, gateway, notifier)           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ beautican-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │  types   │ │  money   │ │  render  │ │ drawer / intent  │  │   │
//! │  │   │ Snapshot │ │  Money   │ │ CartView │ │   i18n / view    │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO TIMERS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart snapshot, line items, identifiers
//! - [`money`] - Integer minor-unit money and its display format
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks for cart intents
//! - [`i18n`] - Locales and the dotted-key translation catalog
//! - [`view`] - Declarative node tree with HTML serialization
//! - [`render`] - Snapshot to view projection
//! - [`drawer`] - Open/closed state machine of the cart drawer
//! - [`intent`] - Typed UI intents parsed from element attributes
//!
//! ## Example Usage
//!
//! ```rust
//! use beautican_core::money::Money;
//!
//! let total = Money::from_cents(12345);
//! assert_eq!(total.format_amount(), "123.45");
//! assert_eq!(total.with_suffix("SAR"), "123.45 SAR");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod drawer;
pub mod error;
pub mod i18n;
pub mod intent;
pub mod money;
pub mod render;
pub mod types;
pub mod validation;
pub mod view;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use drawer::{DrawerState, DrawerTransition};
pub use error::{CoreError, ValidationError};
pub use i18n::{Locale, TextDirection, Translations};
pub use intent::{ElementAttributes, UiIntent};
pub use money::Money;
pub use render::{render_cart, variant_badges, CartView, CountBadge, RenderContext, VariantBadge};
pub use types::*;
pub use view::Node;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Currency suffix appended to every formatted price.
pub const DEFAULT_CURRENCY_SUFFIX: &str = "SAR";

/// Where the footer checkout link points.
pub const DEFAULT_CHECKOUT_URL: &str = "/checkout";
