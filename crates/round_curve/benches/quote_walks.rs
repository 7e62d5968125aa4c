//! Benchmarks for round-walking quote performance

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use round_curve::prelude::*;

fn bench_single_round_quotes(c: &mut Criterion) {
    let params = CurveParams::default();
    let engine = ConversionEngine::new(&params, Amount::from(4_200_000_000_000u64))
        .expect("reference params are valid");
    let stable = Amount::from(1_000_000u64);
    let tokens = Amount::from(1_000_000_000u64);

    c.bench_function("mint_tokens_for_exact_stable_single_round", |b| {
        b.iter(|| engine.mint_tokens_for_exact_stable(black_box(&stable)))
    });

    c.bench_function("burn_exact_tokens_for_stable_single_round", |b| {
        b.iter(|| engine.burn_exact_tokens_for_stable(black_box(&tokens)))
    });
}

fn bench_multi_round_walks(c: &mut Criterion) {
    // one token of volume per round, so each stable unit crosses rounds fast
    let params = CurveParams {
        round_volume: Amount::from(10_000_000u64),
        ..Default::default()
    };
    let mut group = c.benchmark_group("multi_round_walks");

    for gross in [1_000u64, 100_000, 1_000_000] {
        let engine = ConversionEngine::new(&params, Amount::zero()).expect("valid params");
        let gross = Amount::from(gross);
        group.bench_with_input(BenchmarkId::new("mint_for_stable", &gross), &gross, |b, g| {
            b.iter(|| engine.quote_mint_tokens_for_exact_stable(black_box(g)))
        });
    }

    let supply = Amount::from(10_000_000u64 * 1_000);
    let engine = ConversionEngine::new(&params, supply.clone()).expect("valid params");
    group.bench_function("burn_whole_supply", |b| {
        b.iter(|| engine.quote_burn_exact_tokens_for_stable(black_box(&supply)))
    });
    group.finish();
}

fn bench_round_state(c: &mut Criterion) {
    let params = CurveParams::default();
    let oracle = RoundOracle::new(&params, Amount::from(123_456_789_012_345u64))
        .expect("valid params");

    c.bench_function("current_round_state", |b| b.iter(|| oracle.current_state()));
}

criterion_group!(
    benches,
    bench_single_round_quotes,
    bench_multi_round_walks,
    bench_round_state
);
criterion_main!(benches);
