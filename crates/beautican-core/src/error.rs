//! # Error Types
//!
//! Domain-specific error types for beautican-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  beautican-core errors (this file)                                     │
//! │  ├── CoreError        - Cart invariant violations                      │
//! │  └── ValidationError  - Bad input from page markup                     │
//! │                                                                         │
//! │  beautican-sync errors (separate crate)                                │
//! │  ├── TransportError   - Backend request failures                       │
//! │  └── StorefrontError  - Config, preferences, transport                 │
//! │                                                                         │
//! │  Flow: ValidationError → logged at the store, request never sent       │
//! │        TransportError  → logged + generic notification                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart invariant violations.
///
/// Raised when a snapshot received from the backend does not satisfy the
/// invariants the renderer relies on. Such a snapshot never becomes
/// authoritative.
#[derive(Debug, Error)]
pub enum CoreError {
    /// `item_count` does not equal the sum of line quantities.
    #[error("Cart item_count is {reported} but lines sum to {computed}")]
    ItemCountMismatch { reported: u32, computed: u32 },

    /// `total_price` does not equal the sum of line prices.
    #[error("Cart total_price is {reported} but lines sum to {computed}")]
    TotalPriceMismatch { reported: i64, computed: i64 },

    /// A line with quantity 0 was present; such lines must be removed.
    #[error("Line {key} has quantity 0")]
    EmptyLine { key: String },

    /// Two lines share the same key.
    #[error("Duplicate line key {key}")]
    DuplicateLineKey { key: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These come from attribute values on page controls (variant ids,
/// quantities, line keys) and from locale codes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Invalid format (e.g., non-numeric variant id).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;
