//! # Price Policy
//!
//! Per-product bundle pricing rules.
//!
//! ## Shape
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Raw rows                          PricePolicy                          │
//! │  ────────                          ───────────                          │
//! │  ("A", "1", "2")     ──┐           A ─► { 4: 7.00, 1: 2.00 }            │
//! │  ("A", "4", "7")     ──┤  build    B ─► { 1: 12.00 }                    │
//! │  ("B", "1", "12")    ──┼────────►  C ─► { 6: 6.00, 1: 1.25 }            │
//! │  ("C", "1", "1.25")  ──┤           D ─► { 1: 0.15 }                     │
//! │  ("C", "6", "6")     ──┤                                                │
//! │  ("D", "1", "0.15")  ──┘           rule sets iterate largest-first      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A policy is immutable once built. Engines hold it behind an `Arc`, so one
//! policy can back any number of checkout sessions on any number of threads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::ProductCode;
use crate::validation::{parse_bundle_size, parse_price, parse_product_code};

// =============================================================================
// Sample Policy
// =============================================================================

/// The demo/test policy:
/// A → {1: 2.00, 4: 7.00}, B → {1: 12.00}, C → {1: 1.25, 6: 6.00}, D → {1: 0.15}.
pub const SAMPLE_PRICING: &[(ProductCode, BundleRule)] = &[
    (ProductCode('A'), BundleRule::priced(1, 200)),
    (ProductCode('A'), BundleRule::priced(4, 700)),
    (ProductCode('B'), BundleRule::priced(1, 1200)),
    (ProductCode('C'), BundleRule::priced(1, 125)),
    (ProductCode('C'), BundleRule::priced(6, 600)),
    (ProductCode('D'), BundleRule::priced(1, 15)),
];

// =============================================================================
// Raw Rows
// =============================================================================

/// One unparsed policy row: `(product, bundle size, price)`.
///
/// Deserializes from either an object or a three-element array, so
/// `[["A","1","2"],["A","4","7"]]` is a valid JSON policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRow {
    pub product: String,
    pub bundle_size: String,
    pub price: String,
}

impl PriceRow {
    pub fn new(
        product: impl Into<String>,
        bundle_size: impl Into<String>,
        price: impl Into<String>,
    ) -> Self {
        PriceRow {
            product: product.into(),
            bundle_size: bundle_size.into(),
            price: price.into(),
        }
    }

    fn to_rule(&self) -> Result<(ProductCode, BundleRule), ValidationError> {
        let product = parse_product_code(&self.product)?;
        let size = parse_bundle_size(&self.bundle_size)?;
        let price = parse_price(&self.price)?;
        Ok((product, BundleRule::new(size, price)?))
    }
}

impl From<(&str, &str, &str)> for PriceRow {
    fn from((product, bundle_size, price): (&str, &str, &str)) -> Self {
        PriceRow::new(product, bundle_size, price)
    }
}

impl From<&(&str, &str, &str)> for PriceRow {
    fn from(row: &(&str, &str, &str)) -> Self {
        PriceRow::from(*row)
    }
}

impl From<&PriceRow> for PriceRow {
    fn from(row: &PriceRow) -> Self {
        row.clone()
    }
}

// =============================================================================
// Bundle Rules
// =============================================================================

/// "`size` units of this product cost `price` together."
///
/// ## Invariants
/// - `size` ≥ 1
/// - `price` ≥ 0
///
/// Every constructor checks both, deserialization included, so a rule
/// can never divide a tally by zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "UncheckedBundleRule")]
pub struct BundleRule {
    size: u32,
    price: Money,
}

/// Wire shape of a [`BundleRule`] before its invariants are checked.
#[derive(Deserialize)]
struct UncheckedBundleRule {
    size: u32,
    price: Money,
}

impl BundleRule {
    /// ## Errors
    /// - [`ValidationError::MustBePositive`] for a zero size
    /// - [`ValidationError::MustNotBeNegative`] for a negative price
    pub fn new(size: u32, price: Money) -> Result<Self, ValidationError> {
        if size == 0 {
            return Err(ValidationError::MustBePositive {
                field: "bundle size".to_string(),
            });
        }
        if price.is_negative() {
            return Err(ValidationError::MustNotBeNegative {
                field: "price".to_string(),
            });
        }
        Ok(BundleRule { size, price })
    }

    /// Literal rule for in-crate constants. `size` must be non-zero.
    const fn priced(size: u32, cents: i64) -> Self {
        BundleRule {
            size,
            price: Money::from_cents(cents),
        }
    }

    #[inline]
    pub fn size(&self) -> u32 {
        self.size
    }

    #[inline]
    pub fn price(&self) -> Money {
        self.price
    }
}

impl TryFrom<UncheckedBundleRule> for BundleRule {
    type Error = ValidationError;

    fn try_from(raw: UncheckedBundleRule) -> Result<Self, Self::Error> {
        BundleRule::new(raw.size, raw.price)
    }
}

/// All bundle rules of one product, keyed by size.
///
/// Sizes are unique; [`RuleSet::descending`] yields them largest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    by_size: BTreeMap<u32, Money>,
}

impl RuleSet {
    /// Inserts a rule, replacing any earlier price for the same size.
    fn insert(&mut self, rule: BundleRule) {
        self.by_size.insert(rule.size, rule.price);
    }

    /// Rules in strictly descending bundle size.
    pub fn descending(&self) -> impl Iterator<Item = BundleRule> + '_ {
        self.by_size
            .iter()
            .rev()
            .map(|(&size, &price)| BundleRule { size, price })
    }

    /// The size-1 price, if any.
    pub fn unit_price(&self) -> Option<Money> {
        self.by_size.get(&1).copied()
    }

    pub fn has_unit_price(&self) -> bool {
        self.unit_price().is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.by_size.len()
    }
}

// =============================================================================
// Price Policy
// =============================================================================

/// Product code → bundle rules. Immutable after construction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PricePolicy {
    products: BTreeMap<ProductCode, RuleSet>,
}

impl PricePolicy {
    /// Builds a policy from raw `(product, bundle size, price)` rows.
    ///
    /// ## Rules
    /// - Every row must parse, or the whole build fails with
    ///   [`CoreError::MalformedPolicyEntry`] naming the zero-based row
    /// - A repeated `(product, size)` pair keeps the later row's price
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::policy::PricePolicy;
    /// use tally_core::ProductCode;
    ///
    /// let policy = PricePolicy::build([("A", "1", "2"), ("A", "4", "7")]).unwrap();
    /// let a = ProductCode::try_from('A').unwrap();
    /// let sizes: Vec<u32> = policy.lookup(a).unwrap().descending().map(|r| r.size()).collect();
    /// assert_eq!(sizes, vec![4, 1]);
    ///
    /// assert!(PricePolicy::build([("B", "1", "twelve")]).is_err());
    /// ```
    pub fn build<I>(rows: I) -> CoreResult<Self>
    where
        I: IntoIterator,
        I::Item: Into<PriceRow>,
    {
        let parsed = rows
            .into_iter()
            .enumerate()
            .map(|(row, raw)| {
                let raw: PriceRow = raw.into();
                raw.to_rule()
                    .map_err(|source| CoreError::MalformedPolicyEntry { row, source })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        let policy = PricePolicy::from_rules(parsed);
        debug!(
            products = policy.len(),
            rules = policy.rule_count(),
            "Price policy built"
        );
        Ok(policy)
    }

    /// Builds a policy from already-typed rules (last write wins).
    ///
    /// Infallible: a [`BundleRule`] cannot hold a zero size or a negative price.
    pub fn from_rules<I>(rules: I) -> Self
    where
        I: IntoIterator<Item = (ProductCode, BundleRule)>,
    {
        let mut products: BTreeMap<ProductCode, RuleSet> = BTreeMap::new();
        for (product, rule) in rules {
            products.entry(product).or_default().insert(rule);
        }
        PricePolicy { products }
    }

    /// The policy described by [`SAMPLE_PRICING`].
    pub fn sample() -> Self {
        PricePolicy::from_rules(SAMPLE_PRICING.iter().copied())
    }

    /// The product's rules, or `None` if the policy does not know it.
    pub fn lookup(&self, product: ProductCode) -> Option<&RuleSet> {
        self.products.get(&product)
    }

    pub fn contains(&self, product: ProductCode) -> bool {
        self.products.contains_key(&product)
    }

    /// Known products in code order.
    pub fn products(&self) -> impl Iterator<Item = (ProductCode, &RuleSet)> + '_ {
        self.products.iter().map(|(&code, rules)| (code, rules))
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Number of bundle rules across all products.
    pub fn rule_count(&self) -> usize {
        self.products.values().map(RuleSet::len).sum()
    }

    /// Products whose rules lack a size-1 entry.
    pub fn products_missing_unit_price(&self) -> Vec<ProductCode> {
        self.products
            .iter()
            .filter(|(_, rules)| !rules.has_unit_price())
            .map(|(&code, _)| code)
            .collect()
    }

    /// Strict check: every product must have a unit price.
    ///
    /// Returns the first offending product in code order.
    pub fn ensure_unit_prices(&self) -> CoreResult<()> {
        match self.products_missing_unit_price().first() {
            Some(&product) => Err(CoreError::MissingUnitPrice(product)),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn code(letter: char) -> ProductCode {
        ProductCode::try_from(letter).unwrap()
    }

    fn sizes(policy: &PricePolicy, letter: char) -> Vec<u32> {
        policy
            .lookup(code(letter))
            .unwrap()
            .descending()
            .map(|rule| rule.size())
            .collect()
    }

    #[test]
    fn test_build_sample_rows() {
        let policy = PricePolicy::build([
            ("A", "1", "2"),
            ("A", "4", "7"),
            ("B", "1", "12"),
            ("C", "1", "1.25"),
            ("C", "6", "6"),
            ("D", "1", "0.15"),
        ])
        .unwrap();

        assert_eq!(policy, PricePolicy::sample());
        assert_eq!(policy.len(), 4);
        assert_eq!(policy.rule_count(), 6);
    }

    #[test]
    fn test_rules_iterate_descending() {
        let policy = PricePolicy::build([
            ("A", "1", "2"),
            ("A", "12", "20"),
            ("A", "4", "7"),
            ("A", "7", "12"),
        ])
        .unwrap();
        assert_eq!(sizes(&policy, 'A'), vec![12, 7, 4, 1]);
    }

    #[test]
    fn test_duplicate_size_last_write_wins() {
        let policy = PricePolicy::build([("B", "1", "12"), ("B", "1", "11.50")]).unwrap();
        let rules = policy.lookup(code('B')).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.unit_price(), Some(Money::from_cents(1150)));
    }

    #[test]
    fn test_malformed_row_fails_whole_build() {
        let err = PricePolicy::build([
            ("A", "1", "2"),
            ("B", "1", "12"),
            ("E", "1", ""),
        ])
        .unwrap_err();

        assert_eq!(
            err,
            CoreError::MalformedPolicyEntry {
                row: 2,
                source: ValidationError::Required {
                    field: "price".to_string()
                },
            }
        );
    }

    #[test]
    fn test_malformed_bundle_size_and_code() {
        let err = PricePolicy::build([("A", "x", "2")]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedPolicyEntry {
                row: 0,
                source: ValidationError::InvalidFormat { .. }
            }
        ));

        let err = PricePolicy::build([("A", "1", "2"), ("ab", "1", "2")]).unwrap_err();
        assert!(matches!(err, CoreError::MalformedPolicyEntry { row: 1, .. }));
    }

    #[test]
    fn test_lookup_unknown_product() {
        let policy = PricePolicy::sample();
        assert!(policy.lookup(code('E')).is_none());
        assert!(!policy.contains(code('Z')));
        assert!(policy.contains(code('D')));
    }

    #[test]
    fn test_unit_price_checks() {
        assert!(PricePolicy::sample().ensure_unit_prices().is_ok());

        let policy = PricePolicy::build([("A", "4", "7"), ("B", "1", "1"), ("C", "6", "6")]).unwrap();
        assert_eq!(
            policy.products_missing_unit_price(),
            vec![code('A'), code('C')]
        );
        assert_eq!(
            policy.ensure_unit_prices(),
            Err(CoreError::MissingUnitPrice(code('A')))
        );
    }

    #[test]
    fn test_rows_deserialize_from_arrays() {
        let rows: Vec<PriceRow> =
            serde_json::from_str(r#"[["A","1","2"],{"product":"B","bundle_size":"1","price":"12"}]"#)
                .unwrap();
        let policy = PricePolicy::build(&rows).unwrap();
        assert_eq!(policy.len(), 2);
    }

    #[test]
    fn test_bundle_rule_rejects_zero_size_and_negative_price() {
        assert_eq!(
            BundleRule::new(0, Money::from_cents(100)),
            Err(ValidationError::MustBePositive {
                field: "bundle size".to_string()
            })
        );
        assert_eq!(
            BundleRule::new(1, Money::from_cents(-5)),
            Err(ValidationError::MustNotBeNegative {
                field: "price".to_string()
            })
        );

        let rule = BundleRule::new(4, Money::from_cents(700)).unwrap();
        assert_eq!((rule.size(), rule.price()), (4, Money::from_cents(700)));
    }

    #[test]
    fn test_bundle_rule_deserialize_validates() {
        let rule: BundleRule = serde_json::from_str(r#"{"size":6,"price":600}"#).unwrap();
        assert_eq!(rule, BundleRule::new(6, Money::from_cents(600)).unwrap());

        assert!(serde_json::from_str::<BundleRule>(r#"{"size":0,"price":100}"#).is_err());
        assert!(serde_json::from_str::<BundleRule>(r#"{"size":1,"price":-5}"#).is_err());
        assert!(serde_json::from_str::<BundleRule>(r#"{"size":0,"price":-5}"#).is_err());
    }

    #[test]
    fn test_from_rules_matches_build() {
        let rules = [
            (code('A'), BundleRule::new(1, Money::from_cents(200)).unwrap()),
            (code('A'), BundleRule::new(4, Money::from_cents(700)).unwrap()),
        ];
        let built = PricePolicy::build([("A", "1", "2"), ("A", "4", "7")]).unwrap();
        assert_eq!(PricePolicy::from_rules(rules), built);
        assert_eq!(sizes(&built, 'A'), vec![4, 1]);
    }

    #[test]
    fn test_zero_bundle_size_row_rejected() {
        let err = PricePolicy::build([("A", "0", "1")]).unwrap_err();
        assert!(matches!(
            err,
            CoreError::MalformedPolicyEntry {
                row: 0,
                source: ValidationError::MustBePositive { .. }
            }
        ));
    }

    #[test]
    fn test_policy_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PricePolicy>();
    }
}
