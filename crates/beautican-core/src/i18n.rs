//! # Localization
//!
//! Locales and the dotted-key translation catalog.
//!
//! The catalog mirrors the theme's translation object: one JSON tree per
//! locale, addressed with dotted keys such as `cart.empty`.
//!
//! ```text
//! {
//!   "en": { "cart": { "empty": "Your cart is empty" }, "langToggle": "العربية" },
//!   "ar": { "cart": { "empty": "سلة التسوق فارغة" },   "langToggle": "English" }
//! }
//!
//! t(En, "cart.empty")   → "Your cart is empty"
//! t(En, "cart.missing") → "cart.missing"   (falls back to the key)
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;

// =============================================================================
// Locale
// =============================================================================

/// Supported storefront locales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Locale {
    #[default]
    En,
    Ar,
}

/// Writing direction of a locale, applied to the document root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextDirection {
    Ltr,
    Rtl,
}

impl TextDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextDirection::Ltr => "ltr",
            TextDirection::Rtl => "rtl",
        }
    }
}

impl Locale {
    /// Two-letter code, as persisted and as set on `<html lang>`.
    pub fn code(&self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
        }
    }

    pub fn direction(&self) -> TextDirection {
        match self {
            Locale::En => TextDirection::Ltr,
            Locale::Ar => TextDirection::Rtl,
        }
    }

    /// The other locale.
    pub fn toggled(&self) -> Locale {
        match self {
            Locale::En => Locale::Ar,
            Locale::Ar => Locale::En,
        }
    }

    pub fn all() -> [Locale; 2] {
        [Locale::En, Locale::Ar]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Locale::En),
            "ar" => Ok(Locale::Ar),
            _ => Err(ValidationError::NotAllowed {
                field: "locale".to_string(),
                allowed: Locale::all().iter().map(|l| l.code().to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Translation Catalog
// =============================================================================

/// Translation keys used by the cart layer.
pub mod keys {
    pub const CART_EMPTY: &str = "cart.empty";
    pub const CART_TOTAL: &str = "cart.total";
    pub const CART_CHECKOUT: &str = "cart.checkout";
    pub const CART_ADDED: &str = "cart.addedToCart";
    pub const CART_ADD_ERROR: &str = "cart.addError";
    pub const CART_UPDATE_ERROR: &str = "cart.updateError";
    pub const LANG_TOGGLE: &str = "langToggle";
}

/// Per-locale JSON trees looked up by dotted key.
#[derive(Debug, Clone, Default)]
pub struct Translations {
    trees: HashMap<Locale, Value>,
}

impl Translations {
    /// Catalog with the strings the cart layer needs out of the box.
    pub fn builtin() -> Self {
        let mut trees = HashMap::new();
        trees.insert(
            Locale::En,
            json!({
                "cart": {
                    "empty": "Your cart is empty",
                    "total": "Total",
                    "checkout": "Checkout",
                    "addedToCart": "Added to cart",
                    "addError": "Error adding to cart",
                    "updateError": "Could not update your cart"
                },
                "langToggle": "العربية"
            }),
        );
        trees.insert(
            Locale::Ar,
            json!({
                "cart": {
                    "empty": "سلة التسوق فارغة",
                    "total": "المجموع",
                    "checkout": "إتمام الشراء",
                    "addedToCart": "تمت الإضافة إلى السلة",
                    "addError": "حدث خطأ أثناء الإضافة إلى السلة",
                    "updateError": "تعذر تحديث السلة"
                },
                "langToggle": "English"
            }),
        );
        Translations { trees }
    }

    /// Parses a catalog of the form `{"en": {...}, "ar": {...}}`.
    ///
    /// Unknown locale codes at the top level are ignored.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let raw: HashMap<String, Value> = serde_json::from_str(json)?;
        let trees = raw
            .into_iter()
            .filter_map(|(code, tree)| code.parse::<Locale>().ok().map(|l| (l, tree)))
            .collect();
        Ok(Translations { trees })
    }

    /// Overlays `other` on top of `self`, key by key.
    pub fn merged_with(mut self, other: Translations) -> Self {
        for (locale, tree) in other.trees {
            let base = self.trees.entry(locale).or_insert(Value::Null);
            merge_values(base, tree);
        }
        self
    }

    /// Looks up a dotted key. Only string leaves count as hits.
    pub fn lookup(&self, locale: Locale, key: &str) -> Option<&str> {
        let mut node = self.trees.get(&locale)?;
        for part in key.split('.') {
            node = node.get(part)?;
        }
        node.as_str()
    }

    /// Looks up a dotted key, falling back to the key itself.
    pub fn t(&self, locale: Locale, key: &str) -> String {
        self.lookup(locale, key).unwrap_or(key).to_string()
    }

    /// Binds the catalog to a locale.
    pub fn localizer(&self, locale: Locale) -> Localizer<'_> {
        Localizer {
            catalog: self,
            locale,
        }
    }
}

fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (k, v) in overlay {
                merge_values(base.entry(k).or_insert(Value::Null), v);
            }
        }
        (base, overlay) => *base = overlay,
    }
}

/// A catalog bound to the active locale.
#[derive(Debug, Clone, Copy)]
pub struct Localizer<'a> {
    catalog: &'a Translations,
    locale: Locale,
}

impl<'a> Localizer<'a> {
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn t(&self, key: &str) -> String {
        self.catalog.t(self.locale, key)
    }
}
