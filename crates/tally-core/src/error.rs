//! # Error Types
//!
//! Domain-specific error types for tally-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tally-core errors (this file)                                         │
//! │  ├── CoreError        - Policy build and pricing failures              │
//! │  └── ValidationError  - Field-level input failures                     │
//! │                                                                         │
//! │  checkout harness errors (separate crate)                              │
//! │  └── ConfigError      - Bad environment / CLI configuration            │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError::MalformedPolicyEntry → caller      │
//! │        CoreError::UnknownProduct → ScanOutcome::Rejected (in engine)   │
//! │        CoreError::PriceOverflow  → ScanOutcome::Rejected (in engine)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (row, product, field)
//! 3. Errors are enum variants, never String
//! 4. Errors are `Clone + PartialEq` so scan outcomes can carry them

use thiserror::Error;

use crate::types::ProductCode;

// =============================================================================
// Core Error
// =============================================================================

/// Core pricing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A price policy row could not be parsed.
    ///
    /// ## When This Occurs
    /// - Bundle size is not a positive integer (`"0"`, `"four"`)
    /// - Price is not a non-negative decimal (`""`, `"-1"`, `"1.999"`)
    /// - Product code is not a single uppercase letter
    ///
    /// The whole build fails; no partial policy is returned.
    #[error("Malformed policy entry at row {row}: {source}")]
    MalformedPolicyEntry {
        row: usize,
        #[source]
        source: ValidationError,
    },

    /// A tallied product has no entry in the current policy.
    ///
    /// ## User Workflow
    /// ```text
    /// scan('E')
    ///      │
    ///      ▼
    /// recompute → policy.lookup('E') = None
    ///      │
    ///      ▼
    /// UnknownProduct('E') → increment rolled back
    ///      │
    ///      ▼
    /// ScanOutcome::Rejected, total unchanged
    /// ```
    #[error("No price policy for product {0}")]
    UnknownProduct(ProductCode),

    /// A product's price, or the total it feeds, does not fit in `Money`.
    ///
    /// Treated like [`CoreError::UnknownProduct`] by the engine: the scan
    /// that caused it is rolled back.
    #[error("Price of product {0} overflows the checkout total")]
    PriceOverflow(ProductCode),

    /// A product has no size-1 rule (strict policy check only).
    #[error("Product {0} does not have a unit price")]
    MissingUnitPrice(ProductCode),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised while parsing raw policy rows and scanned characters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (non-numeric, too many decimals, lowercase code).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Numeric value does not fit the target type.
    #[error("{field} is too large")]
    Overflow { field: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
