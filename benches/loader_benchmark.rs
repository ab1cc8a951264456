use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use onceload::{BoxError, LoaderCache};
use tokio::runtime::Runtime;

/// Benchmark 1: Hot cache (all hits, pure fast-path performance)
fn bench_hot_cache(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("hot_cache");

    let cache: LoaderCache<String> = LoaderCache::new();
    let keys: Vec<String> = (0..1_000).map(|i| format!("bundle:{}", i)).collect();

    // Pre-populate cache
    rt.block_on(async {
        for key in &keys {
            let payload = key.clone();
            let _ = cache
                .load(key, move || {
                    let payload = payload.clone();
                    async move { Ok::<String, BoxError>(payload) }
                })
                .await;
        }
    });

    group.throughput(Throughput::Elements(keys.len() as u64));
    group.bench_function("resolved_hits", |b| {
        b.to_async(&rt).iter(|| async {
            for key in &keys {
                let _ = black_box(cache.get_loaded(key).await);
            }
        });
    });

    group.bench_function("resolved_hits_via_load", |b| {
        b.to_async(&rt).iter(|| async {
            for key in &keys {
                let _ = black_box(
                    cache
                        .load(key, || async { Ok::<String, BoxError>("cold".to_string()) })
                        .await,
                );
            }
        });
    });

    group.finish();
}

/// Benchmark 2: Cold fan-out (many concurrent callers, one key)
fn bench_cold_fanout(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let mut group = c.benchmark_group("cold_fanout");
    group.sample_size(20);

    group.bench_function("fanout_32", |b| {
        b.to_async(&rt).iter(|| async {
            let cache: LoaderCache<String> = LoaderCache::new();

            let tasks: Vec<_> = (0..32)
                .map(|_| {
                    let cache = cache.clone();
                    tokio::spawn(async move {
                        cache
                            .load("bundle", || async {
                                Ok::<String, BoxError>("payload".to_string())
                            })
                            .await
                    })
                })
                .collect();

            for task in tasks {
                let _ = black_box(task.await);
            }
        });
    });

    group.finish();
}

fn run_benchmarks(c: &mut Criterion) {
    bench_hot_cache(c);
    bench_cold_fanout(c);
}

criterion_group!(benches, run_benchmarks);
criterion_main!(benches);
