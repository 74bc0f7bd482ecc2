//! # tally-core: Pure Checkout Pricing for Tally POS
//!
//! This crate prices a checkout session: product codes are scanned one at
//! a time and the total is recomputed against a bulk-discount policy using
//! a greedy largest-bundle-first decomposition.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tally POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              apps/checkout (harness binary)                     │   │
//! │  │    env config ──► build policy ──► scan string ──► receipt      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ tally-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  policy   │  │  pricing  │  │  engine   │  │   money   │  │   │
//! │  │   │ RuleSet   │  │ decompose │  │ scan      │  │  Money    │  │   │
//! │  │   │ build     │  │ Quote     │  │ Tally     │  │  (cents)  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • NO CONSOLE OUTPUT        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`policy`] - Price policy: per-product bundle rules
//! - [`pricing`] - Greedy decomposition and full-tally quotes
//! - [`engine`] - The scan-by-scan checkout session
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`types`] - Product codes, tally, scan history
//! - [`validation`] - Parsing of raw policy rows and purchases
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: pricing is deterministic - same tally + policy = same quote
//! 2. **No I/O**: the core emits `tracing` events and nothing else
//! 3. **Integer Money**: all prices are cents (i64), parsed straight from decimal strings
//! 4. **Explicit Errors**: build errors are returned, scan errors become outcomes
//!
//! ## Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//! use tally_core::{PricePolicy, PricingEngine, ScanOutcome};
//!
//! let policy = Arc::new(PricePolicy::build([
//!     ("A", "1", "2"), ("A", "4", "7"),
//!     ("C", "1", "1.25"), ("C", "6", "6"),
//! ]).unwrap());
//!
//! let mut engine = PricingEngine::new(policy);
//! engine.scan_all("CCCCCCC").unwrap();
//! assert_eq!(engine.total().to_string(), "7.25");
//!
//! // Unknown products are rejected, not priced.
//! let outcome = engine.scan("Z".parse().unwrap());
//! assert!(matches!(outcome, ScanOutcome::Rejected { .. }));
//! assert_eq!(engine.total().to_string(), "7.25");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod engine;
pub mod error;
pub mod money;
pub mod policy;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use tally_core::Money` instead of
// `use tally_core::money::Money`

pub use engine::{PricingEngine, ScanOutcome};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use policy::{BundleRule, PricePolicy, PriceRow, RuleSet, SAMPLE_PRICING};
pub use pricing::{LineQuote, Quote, UnpricedRemainder};
pub use types::*;
