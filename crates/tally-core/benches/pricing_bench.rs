//! Benchmark for checkout pricing.
//!
//! Measures the cost of a full scan session (one recompute per scan) and of
//! a single quote against an already built tally.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::sync::Arc;
use tally_core::pricing::{decompose, quote};
use tally_core::validation::parse_purchase;
use tally_core::{PricePolicy, PricingEngine, ProductCode, Tally};

const PURCHASES: [(&str, &str); 4] = [
    ("mixed", "ABCDABAA"),
    ("six_pack_plus_one", "CCCCCCC"),
    ("one_of_each", "ABCD"),
    (
        "long",
        "ABDCDCBACBACBDBCBCBBBBACBDBCBACBCBBBCBABBCDBABCBABDCBADBCBBABDCBABCADBCBADBABBABBAAAAAABBCABCABCABCABCABCBABCBCBCBDBDBDDDDDDDDDDDDD",
    ),
];

// =============================================================================
// 1. Scan Sessions
// =============================================================================

fn benchmark_scan_session(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("scan_session");
    let policy = Arc::new(PricePolicy::sample());

    for (name, purchase) in PURCHASES {
        group.bench_with_input(BenchmarkId::from_parameter(name), &purchase, |bencher, purchase| {
            bencher.iter(|| {
                let mut engine = PricingEngine::new(Arc::clone(&policy));
                let outcomes = engine.scan_all(black_box(purchase));
                black_box((outcomes, engine.total()))
            });
        });
    }

    group.finish();
}

// =============================================================================
// 2. Single Quote
// =============================================================================

fn benchmark_quote(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("quote");
    let policy = PricePolicy::sample();

    for (name, purchase) in PURCHASES {
        let tally: Tally = match parse_purchase(purchase) {
            Ok(codes) => codes.into_iter().collect(),
            Err(error) => panic!("benchmark purchase {name} is invalid: {error}"),
        };
        group.bench_with_input(BenchmarkId::from_parameter(name), &tally, |bencher, tally| {
            bencher.iter(|| black_box(quote(black_box(tally), &policy)));
        });
    }

    group.finish();
}

// =============================================================================
// 3. Decomposition
// =============================================================================

fn benchmark_decompose(criterion: &mut Criterion) {
    let mut group = criterion.benchmark_group("decompose");
    let policy = PricePolicy::sample();
    let Some(rules) = ProductCode::try_from('C')
        .ok()
        .and_then(|code| policy.lookup(code))
    else {
        panic!("sample policy has no rules for C");
    };

    for units in [1_u32, 7, 1_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(units), &units, |bencher, &units| {
            bencher.iter(|| black_box(decompose(black_box(units), rules)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_scan_session,
    benchmark_quote,
    benchmark_decompose
);
criterion_main!(benches);
