//! Reconciliation Benchmarks
//!
//! One reconcile pass over registries of increasing size.

use coinbridge::client::MarketConfig;
use coinbridge::market::TickerReconciler;
use coinbridge::types::{QueueSymbol, RawQuote, Snapshot, Tickers};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn market(size: usize) -> (Tickers, Snapshot) {
    let symbols: Vec<QueueSymbol> = (0..size)
        .map(|i| {
            let quote = if i % 3 == 0 { "BTC" } else { "USDT" };
            let base = format!("C{i}");
            QueueSymbol::new(format!("{base}-{quote}"), base, quote)
        })
        .collect();

    let mut tickers = Tickers::new("bench").with_rates(dec!(1300), dec!(90000000));
    tickers.rebuild(&symbols);

    let mut snapshot = Snapshot::new();
    for (i, qs) in symbols.iter().enumerate() {
        let last = Decimal::from(i as u64 + 1);
        snapshot.insert(&qs.symbol, RawQuote::new(last, last, last, last * dec!(1000)));
    }
    (tickers, snapshot)
}

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    let reconciler = TickerReconciler::new(MarketConfig::default(), ["USDT"]);

    for size in [100usize, 1_000, 5_000] {
        let (tickers, snapshot) = market(size);
        group.bench_with_input(BenchmarkId::new("pass", size), &snapshot, |b, snapshot| {
            b.iter_batched(
                || tickers.clone(),
                |mut tickers| black_box(reconciler.reconcile(&mut tickers, snapshot, 1_700_000_000_000)),
                criterion::BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_rebuild(c: &mut Criterion) {
    let (tickers, _) = market(1_000);
    let symbols: Vec<QueueSymbol> = tickers
        .tickers
        .iter()
        .map(|t| QueueSymbol::new(t.symbol.clone(), t.base_name.clone(), t.quote_name.clone()))
        .collect();

    c.bench_function("tickers_rebuild_1000", |b| {
        b.iter_batched(
            || tickers.clone(),
            |mut tickers| {
                tickers.rebuild(&symbols);
                black_box(tickers.generation)
            },
            criterion::BatchSize::SmallInput,
        )
    });
}

criterion_group!(benches, bench_reconcile, bench_rebuild);
criterion_main!(benches);
