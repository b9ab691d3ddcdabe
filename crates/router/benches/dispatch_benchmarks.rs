use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;

use billflow_core::{ProductId, ProductInfo, PurchaseRecord, PurchaseToken};
use billflow_events::BillingEvent;
use billflow_router::{ProductNotice, PurchaseEventRouter};

fn catalog_event(size: usize) -> BillingEvent {
    let products = (0..size)
        .map(|i| ProductInfo::new(ProductId::new(format!("product_{i}")), "$0.99"))
        .collect();
    BillingEvent::CatalogFetched { products }
}

fn completion_event(size: usize) -> BillingEvent {
    let purchases = (0..size)
        .map(|i| {
            PurchaseRecord::new(
                ProductId::new(format!("product_{i}")),
                PurchaseToken::new(format!("token_{i}")),
                None,
                1,
                Utc::now(),
            )
        })
        .collect();
    BillingEvent::PurchasesCompleted { purchases }
}

fn router_with_handlers(count: usize) -> (PurchaseEventRouter, Arc<AtomicUsize>) {
    let mut router = PurchaseEventRouter::new();
    let hits = Arc::new(AtomicUsize::new(0));
    for i in 0..count {
        let hits = hits.clone();
        router.register(format!("product_{i}").as_str(), move |_: ProductNotice<'_>| {
            hits.fetch_add(1, Ordering::Relaxed);
        });
    }
    (router, hits)
}

fn bench_catalog_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("catalog_dispatch");

    for size in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("all_handled", size), &size, |b, &size| {
            let (mut router, _hits) = router_with_handlers(size);
            b.iter(|| {
                router.dispatch(black_box(catalog_event(size)));
                router.reset();
            });
        });

        group.bench_with_input(BenchmarkId::new("none_handled", size), &size, |b, &size| {
            let mut router = PurchaseEventRouter::new();
            b.iter(|| {
                router.dispatch(black_box(catalog_event(size)));
                router.reset();
            });
        });
    }

    group.finish();
}

fn bench_completion_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("completion_dispatch");

    for size in [10usize, 100, 1_000] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_with_input(BenchmarkId::new("all_handled", size), &size, |b, &size| {
            let (mut router, _hits) = router_with_handlers(size);
            b.iter(|| {
                router.dispatch(black_box(completion_event(size)));
                router.reset();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_catalog_dispatch, bench_completion_dispatch);
criterion_main!(benches);
