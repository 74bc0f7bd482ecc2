//! # Pricing Engine
//!
//! One checkout session: scans come in, the tally grows, the total is
//! recomputed from scratch after every scan.
//!
//! ## Scan Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         scan(product)                                   │
//! │                                                                         │
//! │  1. history.push(event)            ← always, even if rejected later     │
//! │  2. tally[product] += 1                                                 │
//! │  3. quote(tally, policy)                                                │
//! │       │                                                                 │
//! │       ├── Ok(quote)  ─► total = quote.total                             │
//! │       │                 ScanOutcome::Accepted { total, unpriced }       │
//! │       │                                                                 │
//! │       └── Err(UnknownProduct   ─► tally[product] -= 1 (rollback)         │
//! │              | PriceOverflow)                                           │
//! │                                  event.status = Rejected                │
//! │                                  total unchanged                        │
//! │                                  ScanOutcome::Rejected { .. }           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Policy Swaps
//! [`PricingEngine::set_policy`] keeps the tally and history and marks the
//! total stale. The next successful recompute prices the *whole* tally under
//! the new policy. If the new policy no longer knows a product that is
//! already tallied, every later scan is rejected until the policy is fixed.
//!
//! ## Thread Safety
//! An engine is single-owner state (`Send`, mutated through `&mut self`).
//! The policy is behind an `Arc` and can be shared by engines on other
//! threads. Sharing one engine between threads needs an outer
//! `Arc<Mutex<PricingEngine>>`.

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::policy::PricePolicy;
use crate::pricing::{self, Quote, UnpricedRemainder};
use crate::types::{ProductCode, ScanEvent, ScanStatus, Tally};
use crate::validation::parse_purchase;

// =============================================================================
// Scan Outcome
// =============================================================================

/// What happened to one scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Counted and priced. `unpriced` lists units no bundle covered
    /// (products without a size-1 rule); empty for a complete total.
    Accepted {
        total: Money,
        unpriced: Vec<UnpricedRemainder>,
    },
    /// Rolled back. `error` names the product the policy did not know
    /// (or whose price overflowed), which may be a product tallied
    /// earlier rather than this one.
    Rejected {
        product: ProductCode,
        error: CoreError,
    },
}

impl ScanOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ScanOutcome::Accepted { .. })
    }

    /// The new total, for accepted scans.
    pub fn total(&self) -> Option<Money> {
        match self {
            ScanOutcome::Accepted { total, .. } => Some(*total),
            ScanOutcome::Rejected { .. } => None,
        }
    }
}

// =============================================================================
// Pricing Engine
// =============================================================================

/// A checkout session priced against a shared [`PricePolicy`].
///
/// ## Example
/// ```rust
/// use std::sync::Arc;
/// use tally_core::{PricePolicy, PricingEngine};
///
/// let mut engine = PricingEngine::new(Arc::new(PricePolicy::sample()));
/// engine.scan_all("ABCDABAA").unwrap();
/// assert_eq!(engine.total().to_string(), "32.40");
/// ```
#[derive(Debug)]
pub struct PricingEngine {
    session_id: Uuid,
    opened_at: DateTime<Utc>,
    policy: Arc<PricePolicy>,
    tally: Tally,
    history: Vec<ScanEvent>,
    total: Money,
    stale: bool,
}

impl PricingEngine {
    /// Opens a session with an empty tally and a zero total.
    pub fn new(policy: Arc<PricePolicy>) -> Self {
        let session_id = Uuid::new_v4();
        debug!(session_id = %session_id, products = policy.len(), "Checkout session opened");

        PricingEngine {
            session_id,
            opened_at: Utc::now(),
            policy,
            tally: Tally::new(),
            history: Vec::new(),
            total: Money::zero(),
            stale: false,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn policy(&self) -> &Arc<PricePolicy> {
        &self.policy
    }

    /// Swaps the policy. Tally and history are kept; the total is stale
    /// until the next successful scan or [`PricingEngine::recompute_total`].
    pub fn set_policy(&mut self, policy: Arc<PricePolicy>) {
        debug!(
            session_id = %self.session_id,
            products = policy.len(),
            "Price policy replaced"
        );
        self.policy = policy;
        self.stale = true;
    }

    /// Scans one unit of `product`.
    ///
    /// Never fails: an unpriceable scan comes back as
    /// [`ScanOutcome::Rejected`] with tally and total untouched.
    pub fn scan(&mut self, product: ProductCode) -> ScanOutcome {
        let sequence = self.history.len();
        self.history.push(ScanEvent {
            sequence,
            product,
            status: ScanStatus::Accepted,
            scanned_at: Utc::now(),
        });
        let units = self.tally.increment(product);

        match self.recompute_total() {
            Ok(quote) => {
                let unpriced = quote.unpriced();
                for remainder in &unpriced {
                    warn!(
                        session_id = %self.session_id,
                        product = %remainder.product,
                        units = remainder.units,
                        "Units left without a price"
                    );
                }
                debug!(
                    session_id = %self.session_id,
                    product = %product,
                    units,
                    total = %quote.total,
                    "Scan accepted"
                );
                ScanOutcome::Accepted {
                    total: quote.total,
                    unpriced,
                }
            }
            Err(error) => {
                self.tally.rollback(product);
                if let Some(event) = self.history.last_mut() {
                    event.status = ScanStatus::Rejected;
                }
                warn!(
                    session_id = %self.session_id,
                    product = %product,
                    error = %error,
                    "Scan rejected"
                );
                ScanOutcome::Rejected { product, error }
            }
        }
    }

    /// Scans every letter of `purchase` in order.
    ///
    /// The whole string is validated first; a non-letter fails the call
    /// before anything is scanned.
    pub fn scan_all(&mut self, purchase: &str) -> CoreResult<Vec<ScanOutcome>> {
        let products = parse_purchase(purchase)?;
        Ok(products
            .into_iter()
            .map(|product| self.scan(product))
            .collect())
    }

    /// Prices the current tally from scratch under the current policy.
    ///
    /// On success the stored total is replaced and no longer stale. On
    /// failure the stored total keeps its last good value.
    pub fn recompute_total(&mut self) -> CoreResult<Quote> {
        let quote = pricing::quote(&self.tally, &self.policy)?;
        self.total = quote.total;
        self.stale = false;
        Ok(quote)
    }

    /// Last successfully computed total.
    pub fn total(&self) -> Money {
        self.total
    }

    /// True after [`PricingEngine::set_policy`] until the next recompute.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// Every scan so far, accepted or rejected, in scan order.
    pub fn history(&self) -> &[ScanEvent] {
        &self.history
    }

    /// The raw scanned sequence, rejected scans included.
    pub fn purchase_string(&self) -> String {
        self.history
            .iter()
            .map(|event| event.product.as_char())
            .collect()
    }

    pub fn rejected_count(&self) -> usize {
        self.history.iter().filter(|event| !event.is_accepted()).count()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
