//! # UI Intents
//!
//! Typed commands extracted from page clicks at the boundary.
//!
//! ## Attribute Contract
//! ```text
//! ┌──────────────────────────────────┬──────────────────────────────────────┐
//! │ Clicked element carries          │ Intent                               │
//! ├──────────────────────────────────┼──────────────────────────────────────┤
//! │ data-cart-toggle                 │ ToggleDrawer                         │
//! │ data-cart-close                  │ CloseDrawer                          │
//! │ class="sheet-overlay"            │ CloseDrawer                          │
//! │ data-add-to-cart                 │ AddToCart                            │
//! │   data-variant-id="501"          │   variant_id                         │
//! │   data-quantity="2" (opt, =1)    │   quantity                           │
//! │   data-control-id="btn-1" (opt)  │   control (for the loading state)    │
//! │ data-cart-increase + line key    │ Increase                             │
//! │ data-cart-decrease + line key    │ Decrease                             │
//! │ data-cart-remove   + line key    │ Remove                               │
//! │ data-language-toggle             │ ToggleLocale                         │
//! └──────────────────────────────────┴──────────────────────────────────────┘
//! ```
//!
//! Roles are checked in the order above; the first match wins. Nothing
//! else on the page is bound.

use std::collections::BTreeMap;

use crate::types::{ControlId, LineKey, VariantId};
use crate::validation::{validate_add_quantity, validate_line_key, validate_variant_id};
use crate::view::Element;

pub const ATTR_CART_TOGGLE: &str = "data-cart-toggle";
pub const ATTR_CART_CLOSE: &str = "data-cart-close";
pub const ATTR_ADD_TO_CART: &str = "data-add-to-cart";
pub const ATTR_VARIANT_ID: &str = "data-variant-id";
pub const ATTR_QUANTITY: &str = "data-quantity";
pub const ATTR_CONTROL_ID: &str = "data-control-id";
pub const ATTR_CART_INCREASE: &str = "data-cart-increase";
pub const ATTR_CART_DECREASE: &str = "data-cart-decrease";
pub const ATTR_CART_REMOVE: &str = "data-cart-remove";
pub const ATTR_LINE_KEY: &str = "data-line-key";
pub const ATTR_LANGUAGE_TOGGLE: &str = "data-language-toggle";
pub const OVERLAY_CLASS: &str = "sheet-overlay";

/// Read access to the attributes of a clicked element.
pub trait ElementAttributes {
    fn attr(&self, name: &str) -> Option<&str>;

    fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }
}

impl ElementAttributes for Element {
    fn attr(&self, name: &str) -> Option<&str> {
        self.get_attr(name)
    }
}

impl ElementAttributes for BTreeMap<String, String> {
    fn attr(&self, name: &str) -> Option<&str> {
        self.get(name).map(String::as_str)
    }
}

/// A user intent the storefront knows how to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiIntent {
    /// Add units of a variant. `variant_id` is `None` when the control had
    /// no usable id; the store rejects that with a logged validation error.
    /// An unreadable quantity is carried as 0 and rejected the same way.
    AddToCart {
        variant_id: Option<VariantId>,
        quantity: u32,
        control: Option<ControlId>,
    },
    Increase { line_key: LineKey },
    Decrease { line_key: LineKey },
    Remove { line_key: LineKey },
    ToggleDrawer,
    CloseDrawer,
    ToggleLocale,
}

impl UiIntent {
    /// Extracts the intent of a clicked element, if it has a bound role.
    ///
    /// Quantity and remove controls without a line key are ignored.
    pub fn from_element(el: &impl ElementAttributes) -> Option<UiIntent> {
        if el.has_attr(ATTR_CART_TOGGLE) {
            return Some(UiIntent::ToggleDrawer);
        }
        if el.has_attr(ATTR_CART_CLOSE) || el.has_class(OVERLAY_CLASS) {
            return Some(UiIntent::CloseDrawer);
        }
        if el.has_attr(ATTR_ADD_TO_CART) {
            return Some(UiIntent::AddToCart {
                variant_id: validate_variant_id(el.attr(ATTR_VARIANT_ID)).ok(),
                quantity: validate_add_quantity(el.attr(ATTR_QUANTITY)).unwrap_or(0),
                control: el.attr(ATTR_CONTROL_ID).map(ControlId::new),
            });
        }

        let line_key = || validate_line_key(el.attr(ATTR_LINE_KEY)).ok();
        if el.has_attr(ATTR_CART_INCREASE) {
            return line_key().map(|line_key| UiIntent::Increase { line_key });
        }
        if el.has_attr(ATTR_CART_DECREASE) {
            return line_key().map(|line_key| UiIntent::Decrease { line_key });
        }
        if el.has_attr(ATTR_CART_REMOVE) {
            return line_key().map(|line_key| UiIntent::Remove { line_key });
        }

        if el.has_attr(ATTR_LANGUAGE_TOGGLE) {
            return Some(UiIntent::ToggleLocale);
        }

        None
    }
}
