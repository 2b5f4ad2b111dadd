use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use newscache::{Cache, CacheEngine, EvictionPolicy, SharedCache};

const POLICIES: [EvictionPolicy; 2] = [EvictionPolicy::Lru, EvictionPolicy::Lfu];

fn bench_hot_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("hot_get");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for policy in POLICIES {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            let mut engine = CacheEngine::try_new(policy, 1000).unwrap();
            for i in 0..100u64 {
                engine.put(i, vec![b'x'; 1024]);
            }

            let mut counter = 0u64;
            b.iter(|| {
                black_box(engine.get(&(counter % 100)));
                counter += 1;
            });
        });
    }

    group.finish();
}

fn bench_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("churn");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for policy in POLICIES {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            // Small cache, wide key space: most puts evict
            let mut engine = CacheEngine::try_new(policy, 64).unwrap();

            let mut counter = 0u64;
            b.iter(|| {
                engine.put(counter % 4096, counter);
                black_box(engine.get(&((counter / 2) % 4096)));
                counter += 1;
            });
        });
    }

    group.finish();
}

fn bench_shared_mixed_50_50(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared_mixed");
    group.sample_size(50);
    group.throughput(Throughput::Elements(1));

    for policy in POLICIES {
        group.bench_with_input(BenchmarkId::from_parameter(policy), &policy, |b, &policy| {
            let cache = SharedCache::try_new(policy, 1000).unwrap();
            for i in 0..100u64 {
                cache.put(i, i);
            }

            let mut counter = 0u64;
            b.iter(|| {
                if counter % 2 == 0 {
                    black_box(cache.get(&(counter % 100)));
                } else {
                    cache.put(counter % 2000, counter);
                }
                counter += 1;
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_hot_get, bench_churn, bench_shared_mixed_50_50);
criterion_main!(benches);
