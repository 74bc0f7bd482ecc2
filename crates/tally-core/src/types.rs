//! # Domain Types
//!
//! Core domain types shared by the policy and the engine.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   ProductCode   │   │      Tally      │   │    ScanEvent    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  'A'..='Z'      │   │  code → units   │   │  sequence       │       │
//! │  │  lookup key     │   │  (units ≥ 1)    │   │  product        │       │
//! │  │                 │   │                 │   │  status         │       │
//! │  │                 │   │                 │   │  scanned_at     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

// =============================================================================
// Product Code
// =============================================================================

/// A product line identifier: exactly one uppercase ASCII letter.
///
/// ## Example
/// ```rust
/// use tally_core::ProductCode;
///
/// let code = ProductCode::try_from('A').unwrap();
/// assert_eq!(code.as_char(), 'A');
/// assert!(ProductCode::try_from('a').is_err());
/// assert!("AB".parse::<ProductCode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub struct ProductCode(pub(crate) char);

impl ProductCode {
    /// Returns the underlying letter.
    #[inline]
    pub const fn as_char(&self) -> char {
        self.0
    }
}

impl TryFrom<char> for ProductCode {
    type Error = ValidationError;

    fn try_from(letter: char) -> Result<Self, Self::Error> {
        if letter.is_ascii_uppercase() {
            Ok(ProductCode(letter))
        } else {
            Err(ValidationError::InvalidFormat {
                field: "product code".to_string(),
                reason: format!("{letter:?} is not an uppercase letter"),
            })
        }
    }
}

impl From<ProductCode> for char {
    fn from(code: ProductCode) -> Self {
        code.0
    }
}

impl FromStr for ProductCode {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(ValidationError::Required {
                field: "product code".to_string(),
            }),
            (Some(letter), None) => ProductCode::try_from(letter),
            (Some(_), Some(_)) => Err(ValidationError::InvalidFormat {
                field: "product code".to_string(),
                reason: format!("{raw:?} is longer than one letter"),
            }),
        }
    }
}

impl fmt::Display for ProductCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Purchase Tally
// =============================================================================

/// Units scanned so far, per product.
///
/// ## Invariants
/// - Every stored count is ≥ 1 (a product with zero units is absent)
/// - Only the engine mutates it: +1 on scan, −1 when that scan is rolled back
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Tally {
    counts: BTreeMap<ProductCode, u32>,
}

impl Tally {
    pub fn new() -> Self {
        Tally::default()
    }

    /// Units of `product` (0 if never scanned).
    pub fn get(&self, product: ProductCode) -> u32 {
        self.counts.get(&product).copied().unwrap_or(0)
    }

    /// `(product, units)` pairs in product-code order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductCode, u32)> + '_ {
        self.counts.iter().map(|(&code, &units)| (code, units))
    }

    /// Number of distinct products.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Units across all products.
    pub fn total_units(&self) -> u64 {
        self.counts.values().map(|&units| u64::from(units)).sum()
    }

    /// Adds one unit and returns the new count.
    pub(crate) fn increment(&mut self, product: ProductCode) -> u32 {
        let units = self.counts.entry(product).or_insert(0);
        *units += 1;
        *units
    }

    /// Undoes one [`Tally::increment`].
    pub(crate) fn rollback(&mut self, product: ProductCode) {
        if let Some(units) = self.counts.get_mut(&product) {
            *units -= 1;
            if *units == 0 {
                self.counts.remove(&product);
            }
        }
    }
}

impl FromIterator<ProductCode> for Tally {
    fn from_iter<I: IntoIterator<Item = ProductCode>>(iter: I) -> Self {
        let mut tally = Tally::new();
        for product in iter {
            tally.increment(product);
        }
        tally
    }
}

// =============================================================================
// Scan History
// =============================================================================

/// Whether a scan made it into the tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanStatus {
    /// Counted in the tally and priced.
    Accepted,
    /// Rolled back because some tallied product had no policy entry.
    Rejected,
}

/// One entry of the append-only scan history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    /// Zero-based position in the session.
    pub sequence: usize,
    pub product: ProductCode,
    pub status: ScanStatus,
    pub scanned_at: DateTime<Utc>,
}

impl ScanEvent {
    #[inline]
    pub fn is_accepted(&self) -> bool {
        self.status == ScanStatus::Accepted
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_code_accepts_uppercase() {
        for letter in 'A'..='Z' {
            assert_eq!(ProductCode::try_from(letter).unwrap().as_char(), letter);
        }
    }

    #[test]
    fn test_product_code_rejects_other_chars() {
        for letter in ['a', 'z', '1', ' ', '-', 'É'] {
            assert!(ProductCode::try_from(letter).is_err(), "{letter:?}");
        }
    }

    #[test]
    fn test_product_code_from_str() {
        assert_eq!("C".parse::<ProductCode>().unwrap().as_char(), 'C');
        assert_eq!(" D ".parse::<ProductCode>().unwrap().as_char(), 'D');
        assert!(matches!(
            "".parse::<ProductCode>(),
            Err(ValidationError::Required { .. })
        ));
        assert!(matches!(
            "AB".parse::<ProductCode>(),
            Err(ValidationError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_tally_increment_and_rollback() {
        let a = ProductCode::try_from('A').unwrap();
        let b = ProductCode::try_from('B').unwrap();

        let mut tally = Tally::new();
        assert_eq!(tally.increment(a), 1);
        assert_eq!(tally.increment(a), 2);
        assert_eq!(tally.increment(b), 1);
        assert_eq!(tally.total_units(), 3);

        tally.rollback(b);
        assert_eq!(tally.get(b), 0);
        assert_eq!(tally.len(), 1);

        // Rolling back an absent product is a no-op.
        tally.rollback(b);
        assert_eq!(tally.len(), 1);
    }

    #[test]
    fn test_tally_from_codes() {
        let tally: Tally = crate::validation::parse_purchase("ABCDABAA")
            .unwrap()
            .into_iter()
            .collect();
        let counts: Vec<(char, u32)> = tally.iter().map(|(c, n)| (c.as_char(), n)).collect();
        assert_eq!(counts, vec![('A', 4), ('B', 2), ('C', 1), ('D', 1)]);
        assert_eq!(
            serde_json::to_string(&tally).unwrap(),
            r#"{"A":4,"B":2,"C":1,"D":1}"#
        );
    }

    #[test]
    fn test_product_code_serde_validates() {
        let code: ProductCode = serde_json::from_str("\"B\"").unwrap();
        assert_eq!(code.to_string(), "B");
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"B\"");
        assert!(serde_json::from_str::<ProductCode>("\"b\"").is_err());
    }
}
