//! # Money Module
//!
//! Provides the `Money` type for prices received from the cart backend.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Backend sends:  "total_price": 12345      (minor units, halalas)      │
//! │                                                                         │
//! │  Naive display:  12345 / 100 = 123.45      ✅ this time                 │
//! │                  1005 / 100  = 10.049999…  ❌ rounding surprises        │
//! │                                                                         │
//! │  OUR SOLUTION: keep the integer, split it into major/minor parts       │
//! │    12345 → "123" + "." + "45"                                          │
//! │    Never divide, never round, always two decimals                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use beautican_core::money::Money;
//!
//! let line = Money::from_cents(4500);
//! let total = line + Money::from_cents(7845);
//! assert_eq!(total.format_amount(), "123.45");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts can make a line negative on some backends
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serializes as a bare integer**: matches `total_price` on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    ///
    /// ## Example
    /// ```rust
    /// use beautican_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion (truncated toward zero).
    ///
    /// ## Example
    /// ```rust
    /// use beautican_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).major(), 10);
    /// assert_eq!(Money::from_cents(-550).major(), -5);
    /// ```
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn minor(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use beautican_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Formats the amount as `major.minor` with exactly two decimals.
    ///
    /// ## Example
    /// ```rust
    /// use beautican_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(12345).format_amount(), "123.45");
    /// assert_eq!(Money::from_cents(500).format_amount(), "5.00");
    /// assert_eq!(Money::from_cents(7).format_amount(), "0.07");
    /// assert_eq!(Money::from_cents(-550).format_amount(), "-5.50");
    /// ```
    pub fn format_amount(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        format!("{}{}.{:02}", sign, self.major().abs(), self.minor())
    }

    /// Formats the amount followed by a space and the currency suffix.
    ///
    /// ## Example
    /// ```rust
    /// use beautican_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(12345).with_suffix("SAR"), "123.45 SAR");
    /// ```
    pub fn with_suffix(&self, suffix: &str) -> String {
        format!("{} {}", self.format_amount(), suffix)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows the bare two-decimal amount, no currency.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_amount())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

/// Summing line prices is how snapshot totals are checked.
impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
