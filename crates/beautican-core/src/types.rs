//! # Domain Types
//!
//! The cart as the backend last confirmed it.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────┐      │
//! │  │    CartSnapshot      │ 1    * │         LineItem             │      │
//! │  │  ──────────────────  │───────►│  ──────────────────────────  │      │
//! │  │  items (ordered)     │        │  key        (LineKey)        │      │
//! │  │  item_count          │        │  variant_id (VariantId)      │      │
//! │  │  total_price (Money) │        │  quantity   (>= 1)           │      │
//! │  └──────────────────────┘        │  line_price (Money)          │      │
//! │                                  │  titles, image               │      │
//! │                                  └──────────────────────────────┘      │
//! │                                                                         │
//! │  STRUCTURE (checked by CartSnapshot::validate)                         │
//! │  • no line with quantity 0, no duplicate keys                          │
//! │                                                                         │
//! │  TOTALS (compared by CartSnapshot::check_totals, reported figures win) │
//! │  • item_count  == Σ quantity                                           │
//! │  • total_price == Σ line_price, unless a cart-level discount applies   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! - `LineKey` identifies a line. It survives quantity changes but not a
//!   remove followed by a re-add.
//! - `VariantId` identifies what was bought. It is not unique across lines
//!   when the backend does not group identical variants.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

/// Identifier of a purchasable product variant.
///
/// Always non-zero: a zero or missing id on an add-to-cart control is a
/// validation failure, never a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct VariantId(u64);

impl VariantId {
    /// Wraps a raw id. Returns `None` for zero.
    pub const fn new(id: u64) -> Option<Self> {
        if id == 0 {
            None
        } else {
            Some(VariantId(id))
        }
    }

    /// Returns the raw numeric id.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for VariantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for VariantId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ValidationError::Required {
                field: "variant_id".to_string(),
            });
        }
        let raw: u64 = s.parse().map_err(|_| ValidationError::InvalidFormat {
            field: "variant_id".to_string(),
            reason: format!("'{}' is not a positive integer", s),
        })?;
        VariantId::new(raw).ok_or_else(|| ValidationError::Required {
            field: "variant_id".to_string(),
        })
    }
}

/// Opaque identifier of one cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineKey(String);

impl LineKey {
    pub fn new(key: impl Into<String>) -> Self {
        LineKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for LineKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LineKey {
    fn from(key: &str) -> Self {
        LineKey(key.to_string())
    }
}

/// Reference to the page control that triggered an add, so it can be put
/// into (and taken out of) its loading state.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ControlId(String);

impl ControlId {
    pub fn new(id: impl Into<String>) -> Self {
        ControlId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// One variant's entry in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct LineItem {
    /// Line identifier used by the change endpoint.
    pub key: LineKey,

    /// Variant this line holds.
    pub variant_id: VariantId,

    /// Units on this line (>= 1 while the line exists).
    pub quantity: u32,

    /// Final price of the whole line, after line-level discounts.
    pub line_price: Money,

    /// Product title.
    pub product_title: String,

    /// Variant title (size, shade, ...). May be empty.
    pub variant_title: String,

    /// Full display title, used as the image alt text.
    pub title: String,

    /// Product image URL.
    pub image_url: Option<String>,
}

// =============================================================================
// Cart Snapshot
// =============================================================================

/// The full authoritative cart state as last confirmed by the backend.
///
/// Replaced wholesale after every successful request; never patched in place.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartSnapshot {
    /// Lines in backend order.
    pub items: Vec<LineItem>,

    /// Total units across all lines.
    pub item_count: u32,

    /// Sum of all line prices.
    pub total_price: Money,
}

impl CartSnapshot {
    /// An empty cart.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a snapshot whose totals are derived from its lines.
    pub fn from_items(items: Vec<LineItem>) -> Self {
        let item_count = items.iter().map(|i| i.quantity).sum();
        let total_price = items.iter().map(|i| i.line_price).sum();
        CartSnapshot {
            items,
            item_count,
            total_price,
        }
    }

    /// Checks the structure of the line list.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyLine`] if a line has quantity 0
    /// - [`CoreError::DuplicateLineKey`] if two lines share a key
    pub fn validate(&self) -> CoreResult<()> {
        let mut seen = HashSet::with_capacity(self.items.len());
        for item in &self.items {
            if item.quantity == 0 {
                return Err(CoreError::EmptyLine {
                    key: item.key.to_string(),
                });
            }
            if !seen.insert(&item.key) {
                return Err(CoreError::DuplicateLineKey {
                    key: item.key.to_string(),
                });
            }
        }

        Ok(())
    }

    /// Compares the reported totals with the sums over the lines.
    ///
    /// A backend applying cart-level discounts reports a `total_price`
    /// below the line sum, so a mismatch here is informational: the
    /// reported figures stay authoritative.
    ///
    /// ## Errors
    /// - [`CoreError::ItemCountMismatch`] / [`CoreError::TotalPriceMismatch`]
    pub fn check_totals(&self) -> CoreResult<()> {
        let computed: u32 = self.items.iter().map(|i| i.quantity).sum();
        if computed != self.item_count {
            return Err(CoreError::ItemCountMismatch {
                reported: self.item_count,
                computed,
            });
        }

        let computed: Money = self.items.iter().map(|i| i.line_price).sum();
        if computed != self.total_price {
            return Err(CoreError::TotalPriceMismatch {
                reported: self.total_price.cents(),
                computed: computed.cents(),
            });
        }

        Ok(())
    }

    /// Returns true when the cart holds no units.
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }

    /// Finds a line by key.
    pub fn line(&self, key: &LineKey) -> Option<&LineItem> {
        self.items.iter().find(|i| &i.key == key)
    }

    /// Units of a variant across all of its lines.
    pub fn quantity_of(&self, variant_id: VariantId) -> u32 {
        self.items
            .iter()
            .filter(|i| i.variant_id == variant_id)
            .map(|i| i.quantity)
            .sum()
    }

    /// Returns true if any line holds the variant.
    pub fn contains_variant(&self, variant_id: VariantId) -> bool {
        self.items.iter().any(|i| i.variant_id == variant_id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn line(key: &str, variant: u64, quantity: u32, line_price: i64) -> LineItem {
        LineItem {
            key: LineKey::new(key),
            variant_id: VariantId::new(variant).unwrap(),
            quantity,
            line_price: Money::from_cents(line_price),
            product_title: format!("Product {}", variant),
            variant_title: "50 ml".to_string(),
            title: format!("Product {} - 50 ml", variant),
            image_url: Some(format!("https://cdn.example.com/{}.jpg", variant)),
        }
    }

    #[test]
    fn test_variant_id_parsing() {
        assert_eq!("501".parse::<VariantId>().unwrap().get(), 501);
        assert_eq!(" 42 ".parse::<VariantId>().unwrap().get(), 42);
        assert!(matches!(
            "".parse::<VariantId>(),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            "0".parse::<VariantId>(),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            "abc".parse::<VariantId>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
        assert!("-3".parse::<VariantId>().is_err());
    }

    #[test]
    fn test_from_items_derives_totals() {
        let snapshot = CartSnapshot::from_items(vec![
            line("a:1", 501, 2, 9000),
            line("b:1", 502, 1, 3345),
        ]);
        assert_eq!(snapshot.item_count, 3);
        assert_eq!(snapshot.total_price, Money::from_cents(12345));
        assert!(snapshot.validate().is_ok());
    }

    #[test]
    fn test_check_totals_reports_count_mismatch() {
        let mut snapshot = CartSnapshot::from_items(vec![line("a:1", 501, 2, 9000)]);
        snapshot.item_count = 3;
        assert!(snapshot.validate().is_ok());
        assert!(matches!(
            snapshot.check_totals(),
            Err(CoreError::ItemCountMismatch {
                reported: 3,
                computed: 2
            })
        ));
    }

    #[test]
    fn test_discounted_total_passes_validation() {
        let mut snapshot = CartSnapshot::from_items(vec![line("a:1", 501, 2, 9000)]);
        snapshot.total_price = Money::from_cents(8000);
        assert!(snapshot.validate().is_ok());
        assert!(matches!(
            snapshot.check_totals(),
            Err(CoreError::TotalPriceMismatch { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_and_duplicate_lines() {
        let snapshot = CartSnapshot::from_items(vec![line("a:1", 501, 0, 0)]);
        assert!(matches!(snapshot.validate(), Err(CoreError::EmptyLine { .. })));

        let snapshot =
            CartSnapshot::from_items(vec![line("a:1", 501, 1, 100), line("a:1", 502, 1, 100)]);
        assert!(matches!(
            snapshot.validate(),
            Err(CoreError::DuplicateLineKey { .. })
        ));
    }

    #[test]
    fn test_lookup_helpers() {
        let snapshot = CartSnapshot::from_items(vec![
            line("a:1", 501, 2, 9000),
            line("a:2", 501, 1, 4500),
            line("b:1", 502, 1, 3345),
        ]);
        assert_eq!(snapshot.line(&"b:1".into()).unwrap().quantity, 1);
        assert!(snapshot.line(&"zzz".into()).is_none());
        assert_eq!(snapshot.quantity_of(VariantId::new(501).unwrap()), 3);
        assert_eq!(snapshot.quantity_of(VariantId::new(999).unwrap()), 0);
        assert!(!snapshot.is_empty());
        assert!(CartSnapshot::empty().is_empty());
    }
}
