//! # Money Module
//!
//! Provides the `Money` type used for bundle prices and checkout totals.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing 0.15 a hundred times in f32 does not give 15.00.               │
//! │  A checkout total is a long chain of additions, so drift adds up.       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    "1.25" is parsed straight into 125 cents, never through a float.     │
//! │    Every bundle price and total is an exact i64.                        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tally_core::money::Money;
//!
//! let bundle: Money = "7.00".parse().unwrap();
//! let unit = Money::from_cents(200);
//!
//! assert_eq!(bundle.checked_add(unit).map(|m| m.cents()), Some(900));
//! assert_eq!(unit.checked_times(3).map(|m| m.to_string()), Some("6.00".to_string()));
//! ```
//!
//! ## Overflow
//! Arithmetic is checked only. A price that parses can still be large
//! enough that bundles × price, or the sum of lines, leaves `i64`; those
//! operations return `None` and the pricing layer reports the product.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Number of fractional digits a price may carry.
pub const MINOR_DIGITS: usize = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: room for very large tallies; parsing rejects negatives
/// - **Single field tuple struct**: Zero-cost abstraction over i64
/// - **Copy**: totals are plain values, recomputed and returned, never shared
///
/// ## Where Money is Used
/// ```text
/// PriceRow.price ("1.25") ──► BundleRule.price ──► bundles × price
///                                                        │
///                                                        ▼
///                                   LineQuote.price ──► Quote.total
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let price = Money::from_cents(125); // 1.25
    /// assert_eq!(price.cents(), 125);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit portion.
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

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Adds two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies a bundle price by a bundle count, `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use tally_core::money::Money;
    ///
    /// let six_pack = Money::from_cents(600);
    /// assert_eq!(six_pack.checked_times(2), Some(Money::from_cents(1200)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_times(2), None);
    /// ```
    #[inline]
    pub const fn checked_times(self, count: u32) -> Option<Money> {
        match self.0.checked_mul(count as i64) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums amounts, `None` as soon as the running total overflows.
    pub fn checked_sum<I>(amounts: I) -> Option<Money>
    where
        I: IntoIterator<Item = Money>,
    {
        amounts
            .into_iter()
            .try_fold(Money::zero(), |total, amount| total.checked_add(amount))
    }
}

// =============================================================================
// Parsing
// =============================================================================

/// Parses a non-negative decimal with at most two fractional digits.
///
/// ## Accepted
/// `"2"`, `"12"`, `"1.25"`, `"0.15"`, `"6.0"`, `" 7.00 "`
///
/// ## Rejected
/// ```text
/// ""        → Required
/// "-1"      → MustNotBeNegative
/// "abc"     → InvalidFormat (not a decimal number)
/// "1."      → InvalidFormat (not a decimal number)
/// "1.255"   → InvalidFormat (more than 2 decimal places)
/// ```
impl FromStr for Money {
    type Err = ValidationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let field = || "price".to_string();
        let not_decimal = || ValidationError::InvalidFormat {
            field: field(),
            reason: "not a decimal number".to_string(),
        };

        let raw = raw.trim();
        if raw.is_empty() {
            return Err(ValidationError::Required { field: field() });
        }
        if raw.starts_with('-') {
            return Err(ValidationError::MustNotBeNegative { field: field() });
        }

        let (whole, fraction) = match raw.split_once('.') {
            Some((whole, fraction)) => {
                if fraction.is_empty() {
                    return Err(not_decimal());
                }
                (whole, fraction)
            }
            None => (raw, ""),
        };

        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty() || !is_digits(whole) || !is_digits(fraction) {
            return Err(not_decimal());
        }
        if fraction.len() > MINOR_DIGITS {
            return Err(ValidationError::InvalidFormat {
                field: field(),
                reason: format!("more than {MINOR_DIGITS} decimal places"),
            });
        }

        let overflow = || ValidationError::Overflow { field: field() };
        let major: i64 = whole.parse().map_err(|_| overflow())?;
        let minor: i64 = match fraction.len() {
            0 => 0,
            1 => fraction.parse::<i64>().map_err(|_| not_decimal())? * 10,
            _ => fraction.parse().map_err(|_| not_decimal())?,
        };

        major
            .checked_mul(100)
            .and_then(|cents| cents.checked_add(minor))
            .map(Money::from_cents)
            .ok_or_else(overflow)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal rendering (`"32.40"`). Currency symbols and locale
/// formatting are left to whoever displays the value.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.minor())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
