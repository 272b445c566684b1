//! Pipeline benchmarks: normalization, parsing, delta detection and append.
//!
//! Run with: `cargo bench --package trowel-bench`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use trowel_bench::{compact_date, existing_keys, raw_history, records};
use trowel_lib::{
    DateInput, DateNormalizer, DateStrategy, InstrumentCatalog, NumeralCleaner, RecordParser,
    ScrapeStamp, Sink, SqliteSink, find_new,
};

fn normalize_benchmark(c: &mut Criterion) {
    let dates: Vec<String> = (0..1_000).map(compact_date).collect();
    let normalizer = DateNormalizer::new("Y/m/d");
    let cleaner = NumeralCleaner::new();

    let mut group = c.benchmark_group("normalize");
    group.throughput(Throughput::Elements(dates.len() as u64));

    group.bench_function("jalali_dates", |b| {
        b.iter(|| {
            for date in &dates {
                black_box(normalizer.normalize(Some(DateInput::Text(date))));
            }
        });
    });

    group.bench_function("board_dates", |b| {
        b.iter(|| {
            for date in &dates {
                black_box(DateStrategy::BOARD.apply(Some(DateInput::Text(date))).ok());
            }
        });
    });

    group.bench_function("numerals", |b| {
        b.iter(|| black_box(cleaner.clean(Some("۱۲۳,۴۵۶,۷۸۹ ریال"))));
    });

    group.finish();
}

fn parse_benchmark(c: &mut Criterion) {
    let catalog = InstrumentCatalog::builtin();
    let parser = RecordParser::new(&catalog);
    let id = catalog.ids()[0];
    let stamp = ScrapeStamp::now();

    let mut group = c.benchmark_group("parse");
    for days in [1_000, 10_000] {
        let items = raw_history(days);
        group.throughput(Throughput::Elements(days as u64));
        group.bench_with_input(BenchmarkId::from_parameter(days), &items, |b, items| {
            b.iter(|| black_box(parser.parse_all(items, stamp, id).count()));
        });
    }
    group.finish();
}

fn delta_benchmark(c: &mut Criterion) {
    let catalog = InstrumentCatalog::builtin();
    let fresh = records(&catalog, 300);

    let mut group = c.benchmark_group("find_new");
    group.throughput(Throughput::Elements(fresh.len() as u64));
    for share in [0.0, 0.5, 0.99] {
        let existing = existing_keys(&fresh, share);
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{:.0}%", share * 100.0)),
            &existing,
            |b, existing| {
                b.iter_batched(
                    || fresh.clone(),
                    |fresh| black_box(find_new(fresh, existing)),
                    criterion::BatchSize::LargeInput,
                );
            },
        );
    }
    group.finish();
}

fn append_benchmark(c: &mut Criterion) {
    let catalog = InstrumentCatalog::builtin();
    let rows = records(&catalog, 100);

    let mut group = c.benchmark_group("sqlite_append");
    group.sample_size(10);
    group.throughput(Throughput::Elements(rows.len() as u64));
    group.bench_function("fresh_table", |b| {
        b.iter_batched(
            || {
                let dir = tempfile::tempdir().unwrap();
                let sink = SqliteSink::open(dir.path().join("bench.sqlite3")).unwrap();
                (dir, sink)
            },
            |(_dir, mut sink)| black_box(sink.append_rows("IceAssets", &rows).unwrap()),
            criterion::BatchSize::PerIteration,
        );
    });
    group.finish();
}

criterion_group!(
    benches,
    normalize_benchmark,
    parse_benchmark,
    delta_benchmark,
    append_benchmark
);
criterion_main!(benches);
