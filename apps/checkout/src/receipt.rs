//! Receipt rendering for a finished checkout session.
//!
//! ## Text Layout
//! ```text
//! Session   2f1c…
//! Purchase  ABCDABAA
//! ----------------------------------------
//! A     4 units   1 x 4 @ 7.00        7.00
//! B     2 units   2 x 1 @ 12.00      24.00
//! C     1 units   1 x 1 @ 1.25        1.25
//! D     1 units   1 x 1 @ 0.15        0.15
//! ----------------------------------------
//! Total                              32.40
//! ```

use serde::Serialize;
use std::fmt;

use tally_core::{CoreResult, LineQuote, Money, PricingEngine, ProductCode, ScanOutcome, UnpricedRemainder};

const RULE: &str = "----------------------------------------";

/// A scan the engine refused, flattened for output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedScan {
    /// Zero-based position in the scanned purchase.
    pub position: usize,
    pub product: ProductCode,
    pub reason: String,
}

/// Everything printed at the end of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Receipt {
    pub session_id: String,
    pub purchase: String,
    pub total: Money,
    pub lines: Vec<LineQuote>,
    pub unpriced: Vec<UnpricedRemainder>,
    pub rejected: Vec<RejectedScan>,
}

impl Receipt {
    /// Builds a receipt from a session and the outcomes of its scans.
    ///
    /// Recomputes the quote so the lines always match the final tally.
    pub fn from_session(engine: &mut PricingEngine, outcomes: &[ScanOutcome]) -> CoreResult<Self> {
        let quote = engine.recompute_total()?;

        let rejected = outcomes
            .iter()
            .enumerate()
            .filter_map(|(position, outcome)| match outcome {
                ScanOutcome::Rejected { product, error } => Some(RejectedScan {
                    position,
                    product: *product,
                    reason: error.to_string(),
                }),
                ScanOutcome::Accepted { .. } => None,
            })
            .collect();

        Ok(Receipt {
            session_id: engine.session_id().to_string(),
            purchase: engine.purchase_string(),
            total: quote.total,
            unpriced: quote.unpriced(),
            lines: quote.lines,
            rejected,
        })
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Session   {}", self.session_id)?;
        writeln!(f, "Purchase  {}", self.purchase)?;
        writeln!(f, "{RULE}")?;

        for line in &self.lines {
            let bundles = line
                .bundles
                .iter()
                .map(|used| format!("{} x {} @ {}", used.count, used.size, used.bundle_price))
                .collect::<Vec<_>>()
                .join(", ");
            writeln!(
                f,
                "{:<5} {:>2} units   {:<18} {:>6}",
                line.product,
                line.units,
                bundles,
                line.price.to_string()
            )?;
        }

        writeln!(f, "{RULE}")?;
        writeln!(f, "{:<33} {:>6}", "Total", self.total.to_string())?;

        for remainder in &self.unpriced {
            writeln!(
                f,
                "Unpriced  {} x {} (no unit price)",
                remainder.units, remainder.product
            )?;
        }
        if !self.rejected.is_empty() {
            writeln!(f, "Rejected  {} scan(s)", self.rejected.len())?;
            for scan in &self.rejected {
                writeln!(f, "  #{:<4} {}  {}", scan.position, scan.product, scan.reason)?;
            }
        }
        Ok(())
    }
}
