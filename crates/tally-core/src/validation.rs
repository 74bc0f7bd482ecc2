//! # Validation Module
//!
//! Parsing and validation of raw checkout input.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Where Input Is Checked                             │
//! │                                                                         │
//! │  Raw policy row ("A", "4", "7.00")                                     │
//! │  ├── parse_product_code  → ProductCode                                 │
//! │  ├── parse_bundle_size   → u32 (> 0)                                   │
//! │  └── parse_price         → Money (>= 0, ≤ 2 decimals)                  │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  PricePolicy::build wraps any failure in MalformedPolicyEntry { row }  │
//! │                                                                         │
//! │  Raw purchase ("ABCDABAA")                                             │
//! │  └── parse_purchase      → Vec<ProductCode>, all-or-nothing            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::validation::{parse_bundle_size, parse_price};
//!
//! assert_eq!(parse_bundle_size("4").unwrap(), 4);
//! assert_eq!(parse_price("1.25").unwrap().cents(), 125);
//! assert!(parse_bundle_size("0").is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::ProductCode;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Policy Row Fields
// =============================================================================

/// Parses a product code column.
pub fn parse_product_code(raw: &str) -> ValidationResult<ProductCode> {
    raw.parse()
}

/// Parses a bundle size column.
///
/// ## Rules
/// - Must not be empty
/// - Digits only (no sign, no decimals)
/// - Must be positive (> 0) and fit in a `u32`
pub fn parse_bundle_size(raw: &str) -> ValidationResult<u32> {
    let field = || "bundle size".to_string();
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(ValidationError::Required { field: field() });
    }

    if raw.starts_with('-') {
        return Err(ValidationError::MustBePositive { field: field() });
    }

    if !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: field(),
            reason: "not a whole number".to_string(),
        });
    }

    let size: u32 = raw
        .parse()
        .map_err(|_| ValidationError::Overflow { field: field() })?;

    if size == 0 {
        return Err(ValidationError::MustBePositive { field: field() });
    }

    Ok(size)
}

/// Parses a price column into exact cents.
///
/// See [`Money`]'s `FromStr` for the accepted format.
pub fn parse_price(raw: &str) -> ValidationResult<Money> {
    raw.parse()
}

// =============================================================================
// Purchases
// =============================================================================

/// Parses a purchase string such as `"ABCDABAA"` into product codes.
///
/// Leading/trailing whitespace is ignored. Any other character that is not
/// an uppercase letter fails the whole string, so a caller never scans half
/// of a bad input.
pub fn parse_purchase(purchase: &str) -> ValidationResult<Vec<ProductCode>> {
    purchase
        .trim()
        .chars()
        .enumerate()
        .map(|(position, letter)| {
            ProductCode::try_from(letter).map_err(|_| ValidationError::InvalidFormat {
                field: "purchase".to_string(),
                reason: format!("{letter:?} at position {position} is not a product code"),
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
