//! Group → filter benchmarks for convergence tables
//!
//! Measures the in-memory part of the convergence pipeline (grouping by
//! method × learning rate, then the stability filter) on synthetic tables,
//! plus CSV parsing of the same tables.
//!
//! Run with: cargo bench --bench series_pipeline

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use optviz::group::SeriesGrouper;
use optviz::parse::read_convergence;
use optviz::pipeline::CONVERGENCE_KEYS;
use optviz::record::ResultRecord;
use optviz::stability::StabilityFilter;

const METHODS: [&str; 4] = ["GD", "Momentum", "Nesterov", "Adam"];
const RATES: [f64; 3] = [0.1, 0.01, 0.001];

/// `iterations` rows per (method, lr); every fourth run diverges halfway.
#[allow(clippy::cast_precision_loss)]
fn synthetic_records(iterations: u64) -> Vec<ResultRecord> {
    let mut records = Vec::new();
    for (m, method) in METHODS.iter().enumerate() {
        for (r, &lr) in RATES.iter().enumerate() {
            let diverges = (m + r) % 4 == 0;
            for iter in 0..iterations {
                let value = if diverges && iter > iterations / 2 {
                    1e12
                } else {
                    100.0 / (iter as f64 + 1.0)
                };
                records.push(ResultRecord::new(*method, lr, iter, value));
            }
        }
    }
    records
}

fn to_csv(records: &[ResultRecord]) -> String {
    let mut out = String::from("method,lr,iter,fval\n");
    for r in records {
        out.push_str(&format!(
            "{},{},{},{}\n",
            r.method(),
            r.learning_rate(),
            r.iteration(),
            r.value()
        ));
    }
    out
}

fn bench_group_and_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("group_and_filter");
    let grouper = SeriesGrouper::new(&CONVERGENCE_KEYS);
    let filter = StabilityFilter::default();

    for iterations in [100u64, 10_000] {
        let records = synthetic_records(iterations);
        group.bench_with_input(
            BenchmarkId::new("convergence", records.len()),
            &records,
            |b, records| {
                b.iter(|| {
                    let grouped = grouper.group(black_box(records));
                    filter.apply_all(grouped.values(), |key| grouper.label(key, 0))
                });
            },
        );
    }

    group.finish();
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_convergence");

    let csv = to_csv(&synthetic_records(1_000));
    group.bench_with_input(BenchmarkId::new("csv", csv.len()), &csv, |b, csv| {
        b.iter(|| read_convergence(black_box(csv.as_bytes()), "bench").unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_group_and_filter, bench_parse);
criterion_main!(benches);
