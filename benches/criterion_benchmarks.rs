use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use slot_lru::config::SlotLruConfig;
use slot_lru::SlotLruCache;
use std::num::NonZeroUsize;
use std::time::Duration;

// Helper to create caches with the init pattern
fn make_slot_lru<V>(cap: usize) -> SlotLruCache<usize, V> {
    SlotLruCache::init(SlotLruConfig::new(cap), None).unwrap()
}

fn make_slot_lru_ttl<V>(cap: usize) -> SlotLruCache<usize, V> {
    let config = SlotLruConfig::new(cap).with_ttl(Duration::from_secs(3600));
    SlotLruCache::init(config, None).unwrap()
}

fn make_reference_lru<V>(cap: usize) -> lru::LruCache<usize, V> {
    lru::LruCache::new(NonZeroUsize::new(cap).unwrap())
}

pub fn criterion_benchmark(c: &mut Criterion) {
    const CACHE_SIZE: usize = 1000;
    let mut group = c.benchmark_group("Cache Operations");

    // slot-lru benchmarks
    {
        let mut cache = make_slot_lru(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.set(i, i);
        }

        group.bench_function("SLOT-LRU get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        group.bench_function("SLOT-LRU get miss", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i + CACHE_SIZE)));
                }
            });
        });

        group.bench_function("SLOT-LRU peek hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.peek(&(i % CACHE_SIZE)));
                }
            });
        });

        let mut next = CACHE_SIZE;
        group.bench_function("SLOT-LRU put evict", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.put(next, next));
                    next += 1;
                }
            });
        });
    }

    // slot-lru with TTL reads the clock on every write and lookup
    {
        let mut cache = make_slot_lru_ttl(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.set(i, i);
        }

        group.bench_function("SLOT-LRU+TTL get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        let mut next = CACHE_SIZE;
        group.bench_function("SLOT-LRU+TTL put evict", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.put(next, next));
                    next += 1;
                }
            });
        });
    }

    // Reference: the lru crate's pointer-linked list
    {
        let mut cache = make_reference_lru(CACHE_SIZE);
        for i in 0..CACHE_SIZE {
            cache.put(i, i);
        }

        group.bench_function("lru crate get hit", |b| {
            b.iter(|| {
                for i in 0..100 {
                    black_box(cache.get(&(i % CACHE_SIZE)));
                }
            });
        });

        let mut next = CACHE_SIZE;
        group.bench_function("lru crate put evict", |b| {
            b.iter(|| {
                for _ in 0..100 {
                    black_box(cache.push(next, next));
                    next += 1;
                }
            });
        });
    }

    group.finish();

    // Mixed get/set workload across the three index widths
    let mut group = c.benchmark_group("Index Width");
    for cap in [200usize, 20_000, 200_000] {
        let mut cache = make_slot_lru(cap);
        for i in 0..cap {
            cache.set(i, i);
        }
        let mut seed = 0x2545_f491_4f6c_dd1d_u64;
        group.bench_with_input(BenchmarkId::new("mixed", cap), &cap, |b, &cap| {
            b.iter(|| {
                for _ in 0..100 {
                    seed ^= seed << 13;
                    seed ^= seed >> 7;
                    seed ^= seed << 17;
                    let key = (seed as usize) % (cap * 2);
                    if cache.get(&key).is_none() {
                        cache.set(key, key);
                    }
                }
            });
        });
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
