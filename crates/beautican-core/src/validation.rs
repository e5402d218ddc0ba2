//! # Validation Module
//!
//! Checks on values read from page markup before they reach the store.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Markup (data-* attributes)                                   │
//! │  └── Whatever the theme author typed                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── variant id present, numeric, non-zero                             │
//! │  ├── add quantity a positive integer (default 1)                       │
//! │  └── line key present                                                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Backend                                                      │
//! │  └── inventory, variant availability (422 on failure)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use beautican_core::validation::{validate_add_quantity, validate_variant_id};
//!
//! assert_eq!(validate_variant_id(Some("501")).unwrap().get(), 501);
//! assert_eq!(validate_add_quantity(None).unwrap(), 1);
//! assert!(validate_variant_id(None).is_err());
//! ```

use crate::error::ValidationError;
use crate::types::{LineKey, VariantId};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates the variant id of an add-to-cart control.
///
/// ## Rules
/// - Must be present and non-empty
/// - Must be a positive integer
pub fn validate_variant_id(raw: Option<&str>) -> ValidationResult<VariantId> {
    match raw {
        Some(raw) => raw.parse(),
        None => Err(ValidationError::Required {
            field: "variant_id".to_string(),
        }),
    }
}

/// Validates the quantity of an add-to-cart control.
///
/// ## Rules
/// - Missing or blank means 1
/// - Otherwise a positive integer; stock limits are the backend's to enforce
pub fn validate_add_quantity(raw: Option<&str>) -> ValidationResult<u32> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(1),
        Some(raw) => raw,
    };

    let quantity: i64 = raw.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "quantity".to_string(),
        reason: format!("'{}' is not an integer", raw),
    })?;

    u32::try_from(quantity)
        .map_err(|_| out_of_range())
        .and_then(check_add_quantity)
}

/// Validates an add quantity that is already numeric.
pub fn check_add_quantity(quantity: u32) -> ValidationResult<u32> {
    if quantity == 0 {
        return Err(out_of_range());
    }
    Ok(quantity)
}

fn out_of_range() -> ValidationError {
    ValidationError::OutOfRange {
        field: "quantity".to_string(),
        min: 1,
        max: u32::MAX as i64,
    }
}

/// Validates the line key carried by quantity and remove controls.
pub fn validate_line_key(raw: Option<&str>) -> ValidationResult<LineKey> {
    match raw.map(str::trim) {
        Some(key) if !key.is_empty() => Ok(LineKey::new(key)),
        _ => Err(ValidationError::Required {
            field: "line_key".to_string(),
        }),
    }
}
