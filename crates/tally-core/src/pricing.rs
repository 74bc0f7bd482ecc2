//! # Bundle Pricing
//!
//! The greedy largest-bundle-first decomposition and the full-tally quote.
//!
//! ## Greedy Decomposition
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  7 × C against C ─► { 6: 6.00, 1: 1.25 }                                │
//! │                                                                         │
//! │  remaining = 7                                                          │
//! │  size 6: 7 / 6 = 1 bundle  → 6.00   remaining = 7 % 6 = 1               │
//! │  size 1: 1 / 1 = 1 bundle  → 1.25   remaining = 0                       │
//! │                                                                         │
//! │  price = 7.25                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Greedy is optimal when larger bundles never cost more per unit than the
//! smaller ones they replace. Policies that break that get the greedy
//! answer anyway; it is the defined pricing rule.
//!
//! ## Unpriced Remainders
//! A product without a size-1 rule can be left with units no bundle
//! covers (5 × X against X ─► { 4: 7.00 } leaves 1). Those units add
//! nothing to the price and are reported as [`UnpricedRemainder`] so a
//! caller can tell an under-priced quote from a complete one.
//!
//! ## Overflow
//! Bundle counts times prices and the sum of lines are checked. A tally
//! whose price leaves `i64` cents fails with [`CoreError::PriceOverflow`]
//! instead of wrapping.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::policy::{PricePolicy, RuleSet};
use crate::types::{ProductCode, Tally};

// =============================================================================
// Decomposition
// =============================================================================

/// How many bundles of one size were used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleUse {
    pub size: u32,
    pub count: u32,
    /// Price of one bundle of this size.
    pub bundle_price: Money,
}

impl BundleUse {
    /// `count × bundle_price`, `None` on overflow.
    #[inline]
    pub fn subtotal(&self) -> Option<Money> {
        self.bundle_price.checked_times(self.count)
    }
}

/// Result of pricing one product's unit count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decomposition {
    /// Bundles used, largest size first. Sizes with zero bundles are omitted.
    pub bundles: Vec<BundleUse>,
    pub price: Money,
    /// Units no rule could absorb (only possible without a size-1 rule).
    pub unpriced_units: u32,
}

/// Prices `units` greedily against `rules`, largest bundle first.
///
/// Returns `None` when the price does not fit in [`Money`].
///
/// ## Example
/// ```rust
/// use tally_core::policy::PricePolicy;
/// use tally_core::pricing::decompose;
/// use tally_core::ProductCode;
///
/// let policy = PricePolicy::sample();
/// let a = policy.lookup(ProductCode::try_from('A').unwrap()).unwrap();
///
/// // 5 × A = one 4-bundle (7.00) + one single (2.00)
/// let priced = decompose(5, a).unwrap();
/// assert_eq!(priced.price.to_string(), "9.00");
/// assert_eq!(priced.unpriced_units, 0);
/// ```
pub fn decompose(units: u32, rules: &RuleSet) -> Option<Decomposition> {
    let mut remaining = units;
    let mut price = Money::zero();
    let mut bundles = Vec::new();

    for rule in rules.descending() {
        if remaining == 0 {
            break;
        }
        // size ≥ 1 is a BundleRule invariant
        let count = remaining / rule.size();
        remaining %= rule.size();
        if count > 0 {
            let used = BundleUse {
                size: rule.size(),
                count,
                bundle_price: rule.price(),
            };
            price = price.checked_add(used.subtotal()?)?;
            bundles.push(used);
        }
    }

    Some(Decomposition {
        bundles,
        price,
        unpriced_units: remaining,
    })
}

// =============================================================================
// Quote
// =============================================================================

/// Units of a product left without a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnpricedRemainder {
    pub product: ProductCode,
    pub units: u32,
}

/// One product's share of a quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineQuote {
    pub product: ProductCode,
    pub units: u32,
    pub bundles: Vec<BundleUse>,
    pub price: Money,
    pub unpriced_units: u32,
}

/// A full recompute of a tally against a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub total: Money,
    /// One line per tallied product, in product-code order.
    pub lines: Vec<LineQuote>,
}

impl Quote {
    /// Remainders that contributed nothing to the total.
    pub fn unpriced(&self) -> Vec<UnpricedRemainder> {
        self.lines
            .iter()
            .filter(|line| line.unpriced_units > 0)
            .map(|line| UnpricedRemainder {
                product: line.product,
                units: line.unpriced_units,
            })
            .collect()
    }

    /// True when every tallied unit was covered by some bundle.
    pub fn is_fully_priced(&self) -> bool {
        self.lines.iter().all(|line| line.unpriced_units == 0)
    }

    pub fn line(&self, product: ProductCode) -> Option<&LineQuote> {
        self.lines.iter().find(|line| line.product == product)
    }
}

/// Prices a whole tally from scratch.
///
/// ## Errors
/// - [`CoreError::UnknownProduct`] for the first tallied product (in code
///   order) the policy does not know
/// - [`CoreError::PriceOverflow`] for the first product whose line price,
///   or whose addition to the running total, leaves `Money`
///
/// Nothing is partially returned.
pub fn quote(tally: &Tally, policy: &PricePolicy) -> CoreResult<Quote> {
    let lines = tally
        .iter()
        .map(|(product, units)| -> CoreResult<LineQuote> {
            let rules = policy
                .lookup(product)
                .ok_or(CoreError::UnknownProduct(product))?;
            let priced = decompose(units, rules).ok_or(CoreError::PriceOverflow(product))?;
            Ok(LineQuote {
                product,
                units,
                bundles: priced.bundles,
                price: priced.price,
                unpriced_units: priced.unpriced_units,
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let total = lines.iter().try_fold(Money::zero(), |total, line| {
        total
            .checked_add(line.price)
            .ok_or(CoreError::PriceOverflow(line.product))
    })?;
    Ok(Quote { total, lines })
}

// =============================================================================
// Unit Tests
// =============================================================================
