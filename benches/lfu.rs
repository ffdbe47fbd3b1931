use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use freqcache::ds::FrequencyBuckets;
use freqcache::policy::lfu::LfuCache;
use freqcache::traits::{CoreCache, LfuCacheTrait};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Overwrite-heavy workload: every insert lands on a resident key, so the
// whole run stays on the promote-and-replace path with no evictions.
fn bench_overwrite_resident_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_policy");
    group.throughput(Throughput::Elements(2048));
    group.bench_function("overwrite_resident", |b| {
        b.iter_batched(
            || {
                let mut cache = LfuCache::new(512);
                for i in 0..512u64 {
                    cache.insert(i, Arc::new(i));
                }
                cache
            },
            |mut cache| {
                for i in 0..2048u64 {
                    cache.insert(std::hint::black_box(i % 512), Arc::new(i));
                }
                cache
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_get_hotset(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_policy");
    group.throughput(Throughput::Elements(4096));
    group.bench_function("get_hotset", |b| {
        b.iter_batched(
            || {
                let mut cache = LfuCache::new(4096);
                for i in 0..4096u64 {
                    cache.insert(i, Arc::new(i));
                }
                cache
            },
            |mut cache| {
                for i in 0..4096u64 {
                    let _ = std::hint::black_box(cache.get(&std::hint::black_box(i)));
                }
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_eviction_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_policy");
    group.throughput(Throughput::Elements(4096));
    group.bench_function("evict_churn", |b| {
        b.iter_batched(
            || {
                let mut cache = LfuCache::new(512);
                for i in 0..512u64 {
                    cache.insert(i, Arc::new(i));
                }
                cache
            },
            |mut cache| {
                // Every insert past the first 512 evicts.
                for i in 512..4608u64 {
                    cache.insert(std::hint::black_box(i), Arc::new(i));
                }
                cache
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

// Skewed workload: ~90% of accesses hit 10% of keys, mimicking the hit-rate
// driver the policy is tuned for.
fn bench_skewed_mixed_ops(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_policy");
    let ops = 8192u64;
    group.throughput(Throughput::Elements(ops));
    group.bench_function("skewed_mixed", |b| {
        b.iter_batched(
            || StdRng::seed_from_u64(7),
            |mut rng| {
                let mut cache: LfuCache<u64, u64> = LfuCache::new(256);
                for _ in 0..ops {
                    let key = if rng.gen_bool(0.9) {
                        rng.gen_range(0..64u64)
                    } else {
                        rng.gen_range(64..4096u64)
                    };
                    if cache.get(&key).is_none() {
                        cache.insert(key, Arc::new(key));
                    }
                }
                cache
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_tracker_touch(c: &mut Criterion) {
    let mut group = c.benchmark_group("freq_buckets");
    group.throughput(Throughput::Elements(4096));
    group.bench_function("touch", |b| {
        b.iter_batched(
            || {
                let mut freq = FrequencyBuckets::with_capacity(4096);
                for i in 0..4096u64 {
                    freq.insert(i);
                }
                freq
            },
            |mut freq| {
                for i in 0..4096u64 {
                    let _ = std::hint::black_box(freq.touch(&std::hint::black_box(i)));
                }
                freq
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

fn bench_pop_lfu_drain(c: &mut Criterion) {
    let mut group = c.benchmark_group("lfu_policy");
    group.throughput(Throughput::Elements(1024));
    group.bench_function("pop_lfu_drain", |b| {
        b.iter_batched(
            || {
                let mut cache = LfuCache::new(1024);
                for i in 0..1024u64 {
                    cache.insert(i, Arc::new(i));
                    for _ in 0..(i % 4) {
                        cache.get(&i);
                    }
                }
                cache
            },
            |mut cache| {
                while let Some(entry) = cache.pop_lfu() {
                    std::hint::black_box(entry);
                }
                cache
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_overwrite_resident_keys,
    bench_get_hotset,
    bench_eviction_churn,
    bench_skewed_mixed_ops,
    bench_tracker_touch,
    bench_pop_lfu_drain,
);
criterion_main!(benches);
