//! End-to-end `get_orders` benchmarks against SQLite.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use orderdesk_bench::fixtures::Scale;
use orderdesk_bench::harness::TestContext;
use orderdesk_proto::{FilterDescriptor, FilterModel, OrdersRequest, SortDescriptor};

fn bench_page_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_orders/page");

    let ctx = TestContext::with_scale(Scale::Medium);
    let service = ctx.service();

    for size in [20, 100, 500] {
        group.bench_with_input(BenchmarkId::new("size", size), &size, |b, &size| {
            let request = OrdersRequest::new().with_page(0, size);
            b.iter(|| {
                black_box(service.execute(&request).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_filtered(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_orders/filter");

    let ctx = TestContext::with_scale(Scale::Medium);
    let service = ctx.service();

    group.bench_function("location_equals", |b| {
        let request = OrdersRequest::new().with_filter(
            FilterModel::new().with("location", FilterDescriptor::text("equals", "Store North")),
        );
        b.iter(|| {
            black_box(service.execute(&request).unwrap());
        });
    });

    group.bench_function("date_range_sorted", |b| {
        let request = OrdersRequest::new()
            .with_filter(
                FilterModel::new()
                    .with("po_date", FilterDescriptor::date_range("2024-03-01", "2024-06-30")),
            )
            .with_sort(SortDescriptor::asc("location"))
            .with_sort(SortDescriptor::desc("po_date"));
        b.iter(|| {
            black_box(service.execute(&request).unwrap());
        });
    });

    group.bench_function("invoiced_post_filter", |b| {
        let request = OrdersRequest::new().with_filter(
            FilterModel::new().with("is_invoiced", FilterDescriptor::text("notBlank", "")),
        );
        b.iter(|| {
            black_box(service.execute(&request).unwrap());
        });
    });

    group.finish();
}

criterion_group!(benches, bench_page_size, bench_filtered);

criterion_main!(benches);
