//! # Tally Checkout
//!
//! Command-line harness for the checkout pricing engine.
//!
//! ## Usage
//! ```bash
//! # Price a purchase string against the sample policy
//! cargo run -p tally-checkout -- ABCDABAA
//!
//! # Random 200-letter purchase over A..F (E and F are unknown products)
//! cargo run -p tally-checkout -- --random
//!
//! # Custom policy, JSON receipt
//! TALLY_POLICY='[["A","1","2"],["A","3","5"]]' cargo run -p tally-checkout -- --json AAAA
//! ```
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  env ──► CheckoutConfig ──► PricePolicy ──► PricingEngine ──► Receipt   │
//! │                                   ▲                                     │
//! │  argv ──► purchase / --random ────┘                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod generator;
mod receipt;

use std::env;
use std::sync::Arc;

use tally_core::PricingEngine;
use tracing::{info, Level};
use tracing_subscriber::EnvFilter;

use crate::config::CheckoutConfig;
use crate::generator::generate_purchase;
use crate::receipt::Receipt;

/// Parsed command line.
#[derive(Debug, Default, PartialEq, Eq)]
struct CliArgs {
    random: bool,
    json: bool,
    help: bool,
    purchase: Option<String>,
}

fn parse_args<I>(args: I) -> CliArgs
where
    I: IntoIterator<Item = String>,
{
    let mut cli = CliArgs::default();
    for arg in args {
        match arg.as_str() {
            "--random" | "-r" => cli.random = true,
            "--json" | "-j" => cli.json = true,
            "--help" | "-h" => cli.help = true,
            _ => cli.purchase = Some(arg),
        }
    }
    cli
}

fn print_usage() {
    println!("Tally Checkout");
    println!();
    println!("Usage: tally-checkout [OPTIONS] [PURCHASE]");
    println!();
    println!("Options:");
    println!("  -r, --random       Scan a generated purchase instead of PURCHASE");
    println!("  -j, --json         Print the receipt as JSON");
    println!("  -h, --help         Show this help message");
    println!();
    println!("Environment:");
    println!("  TALLY_POLICY               JSON array of [product, size, price] rows");
    println!("  TALLY_STRICT_UNIT_PRICING  Reject policies without unit prices (default: false)");
    println!("  TALLY_RANDOM_LENGTH        Letters in a --random purchase (default: 200)");
    println!("  TALLY_RANDOM_ALPHABET      Letters from 'A' to draw from (default: 6)");
    println!("  RUST_LOG                   Log filter (default: info,tally_core=debug)");
}

/// Initializes the tracing subscriber.
///
/// Default: `info` plus `debug` for the tally crates, overridable through `RUST_LOG`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tally_core=debug,tally_checkout=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_max_level(Level::TRACE)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = parse_args(env::args().skip(1));
    if cli.help {
        print_usage();
        return Ok(());
    }

    init_tracing();

    // Load configuration
    let config = CheckoutConfig::load()?;
    let policy = Arc::new(config.build_policy()?);
    info!(
        products = policy.len(),
        rules = policy.rule_count(),
        strict = config.strict_unit_pricing,
        "Price policy loaded"
    );

    // Pick the purchase
    let purchase = if cli.random {
        generate_purchase(
            &mut rand::thread_rng(),
            config.random_alphabet,
            config.random_length,
        )
    } else {
        match cli.purchase {
            Some(purchase) => purchase,
            None => {
                print_usage();
                return Err("no purchase given (pass PURCHASE or --random)".into());
            }
        }
    };

    // Scan
    let mut engine = PricingEngine::new(policy);
    let outcomes = engine.scan_all(&purchase)?;
    info!(
        session_id = %engine.session_id(),
        scans = outcomes.len(),
        rejected = engine.rejected_count(),
        total = %engine.total(),
        "Purchase scanned"
    );

    // Print
    let receipt = Receipt::from_session(&mut engine, &outcomes)?;
    if cli.json {
        println!("{}", receipt.to_json()?);
    } else {
        print!("{receipt}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> CliArgs {
        parse_args(raw.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_positional_purchase() {
        let cli = args(&["ABCD"]);
        assert_eq!(cli.purchase.as_deref(), Some("ABCD"));
        assert!(!cli.random);
        assert!(!cli.json);
    }

    #[test]
    fn test_parse_flags() {
        let cli = args(&["--json", "-r"]);
        assert!(cli.json);
        assert!(cli.random);
        assert_eq!(cli.purchase, None);
        assert!(args(&["-h"]).help);
    }

    #[test]
    fn test_no_args() {
        assert_eq!(args(&[]), CliArgs::default());
    }
}
