use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use chrono::{Days, NaiveDate};
use stockpile_allocation::{Batch, OrderLine, allocate};

/// Candidate set where only the last-ranked batch carries enough stock.
fn candidates(count: u64) -> Vec<Batch> {
    let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    (0..count)
        .map(|i| {
            let eta = base.checked_add_days(Days::new(count - i));
            let quantity = if i == 0 { 1_000 } else { 1 };
            Batch::new(format!("batch-{i}"), "LAMP", quantity, eta)
        })
        .collect()
}

fn bench_allocate(c: &mut Criterion) {
    let mut group = c.benchmark_group("allocate");
    let line = OrderLine::new("order-1", "LAMP", 10).unwrap();

    for count in [10u64, 100, 1_000] {
        group.throughput(Throughput::Elements(count));
        group.bench_with_input(BenchmarkId::from_parameter(count), &count, |b, &count| {
            b.iter_batched(
                || candidates(count),
                |mut batches| black_box(allocate(black_box(&line), &mut batches)),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

criterion_group!(benches, bench_allocate);
criterion_main!(benches);
