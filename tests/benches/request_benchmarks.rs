//! # Request Manager Benchmarks
//!
//! | Path | Operation |
//! |------|-----------|
//! | create + fulfill | insert, claim and slot write without awaiting |
//! | round trip | create, concurrent fulfill, await on a runtime |
//! | contended fulfill | resolvers on several threads against one table |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use request_manager::{Payload, RequestManager};
use std::time::Duration;

fn bench_create_and_fulfill(c: &mut Criterion) {
    let mut group = c.benchmark_group("request-manager");
    let manager = RequestManager::new();
    let payload = Payload::binary(vec![0u8; 64]);

    group.bench_function("create_fulfill", |b| {
        b.iter(|| {
            let handle = manager.create(Duration::from_secs(5));
            black_box(manager.fulfill(handle.id(), payload.clone()));
        })
    });

    group.bench_function("create_drop", |b| {
        b.iter(|| {
            let handle = manager.create(Duration::from_secs(5));
            black_box(handle.id());
        })
    });

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(4)
        .enable_all()
        .build()
        .unwrap();

    let mut group = c.benchmark_group("request-manager-round-trip");
    group.measurement_time(Duration::from_secs(10));

    for batch in [1usize, 100, 1_000] {
        group.throughput(Throughput::Elements(batch as u64));
        group.bench_with_input(BenchmarkId::new("await_reply", batch), &batch, |b, &batch| {
            b.to_async(&runtime).iter(|| async move {
                let manager = RequestManager::new();
                let handles: Vec<_> = (0..batch)
                    .map(|_| manager.create(Duration::from_secs(5)))
                    .collect();

                let resolver = manager.clone();
                let ids: Vec<_> = handles.iter().map(|h| h.id()).collect();
                tokio::spawn(async move {
                    for id in ids.into_iter().rev() {
                        resolver.fulfill(id, Payload::empty());
                    }
                });

                for handle in handles {
                    black_box(handle.await_reply().await.is_ok());
                }
            })
        });
    }

    group.finish();
}

fn bench_contended_fulfill(c: &mut Criterion) {
    let mut group = c.benchmark_group("request-manager-contention");

    for threads in [2usize, 4, 8] {
        group.bench_with_input(BenchmarkId::new("fulfill", threads), &threads, |b, &threads| {
            b.iter(|| {
                let manager = RequestManager::new();
                let handles: Vec<_> = (0..1_000)
                    .map(|_| manager.create(Duration::from_secs(5)))
                    .collect();
                let ids: Vec<_> = handles.iter().map(|h| h.id()).collect();

                std::thread::scope(|scope| {
                    for chunk in ids.chunks(ids.len() / threads) {
                        let manager = manager.clone();
                        scope.spawn(move || {
                            for id in chunk {
                                black_box(manager.fulfill(*id, Payload::empty()));
                            }
                        });
                    }
                });
                drop(handles);
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_create_and_fulfill,
    bench_round_trip,
    bench_contended_fulfill
);
criterion_main!(benches);
