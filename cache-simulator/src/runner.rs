//! Simulation runner
//!
//! Streams a trace once and replays every request against each selected
//! cache in lockstep. Each request is a lookup; a miss is followed by an
//! insert, the usual read-through pattern.
//!
//! `SlotLruCache` reads time from a `ManualClock` that follows the trace
//! timestamps, so TTL expiry is reproducible and independent of how fast the
//! simulation itself runs.

use std::collections::{HashMap, HashSet};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use slot_lru::clock::ManualClock;
use slot_lru::config::SlotLruConfig;
use slot_lru::lru::DefaultHashBuilder;
use slot_lru::SlotLruCache;

use crate::input::LogReader;
use crate::models::{AlgorithmStats, CacheAlgorithm, Request, SimulationConfig, SimulationResult};

type TraceCache = SlotLruCache<String, u32, DefaultHashBuilder, Arc<ManualClock>>;

/// Wrapper enum for the replayed cache implementations
enum CacheWrapper {
    SlotLru(TraceCache),
    ReferenceLru(lru::LruCache<String, u32>),
}

impl CacheWrapper {
    fn new(
        algorithm: CacheAlgorithm,
        config: &SimulationConfig,
        clock: &Arc<ManualClock>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(match algorithm {
            CacheAlgorithm::SlotLru => {
                let mut cache_config = SlotLruConfig::new(config.capacity);
                cache_config.ttl = config.ttl;
                CacheWrapper::SlotLru(SlotLruCache::init_with_clock(
                    cache_config,
                    None,
                    Arc::clone(clock),
                )?)
            }
            CacheAlgorithm::ReferenceLru => {
                let capacity =
                    NonZeroUsize::new(config.capacity).ok_or("capacity must be positive")?;
                CacheWrapper::ReferenceLru(lru::LruCache::new(capacity))
            }
        })
    }

    /// Look the key up, inserting it on a miss. Returns `true` on a hit.
    #[inline]
    fn access(&mut self, key: &str, stats: &mut AlgorithmStats) -> bool {
        match self {
            CacheWrapper::SlotLru(cache) => {
                if cache.get(key).is_some() {
                    return true;
                }
                cache.set(key.to_owned(), 1);
                false
            }
            CacheWrapper::ReferenceLru(cache) => {
                if cache.get(key).is_some() {
                    return true;
                }
                if let Some((evicted, _)) = cache.push(key.to_owned(), 1) {
                    if evicted != key {
                        stats.evictions += 1;
                    }
                }
                false
            }
        }
    }

    /// Copy counters the cache tracks itself into `stats`
    fn finish(&self, stats: &mut AlgorithmStats) {
        if let CacheWrapper::SlotLru(cache) = self {
            let counters = cache.counters();
            stats.evictions = counters.evictions;
            stats.expirations = counters.expirations;
        }
    }
}

/// Runs simulations
pub struct SimulationRunner {
    config: SimulationConfig,
}

impl SimulationRunner {
    /// Create a runner for the given configuration
    pub fn new(config: SimulationConfig) -> Self {
        Self { config }
    }

    /// Replay the configured trace
    pub fn run(&self) -> Result<SimulationResult, Box<dyn std::error::Error>> {
        let reader = LogReader::new(&self.config.input);
        self.run_requests(reader.stream_requests()?)
    }

    /// Replay an arbitrary request stream
    pub fn run_requests<I, E>(
        &self,
        requests: I,
    ) -> Result<SimulationResult, Box<dyn std::error::Error>>
    where
        I: IntoIterator<Item = Result<Request, E>>,
        E: std::error::Error + 'static,
    {
        let start = Instant::now();
        let clock = Arc::new(ManualClock::new());

        let mut caches = Vec::with_capacity(self.config.algorithms.len());
        for &algorithm in &self.config.algorithms {
            let cache = CacheWrapper::new(algorithm, &self.config, &clock)?;
            caches.push((algorithm, cache, AlgorithmStats::new()));
        }

        let mut unique_keys = HashSet::new();
        let mut total_requests = 0u64;
        let mut first_timestamp = None;

        for request in requests {
            let request = request?;
            let origin = *first_timestamp.get_or_insert(request.timestamp_ms);
            clock.set(Duration::from_millis(
                request.timestamp_ms.saturating_sub(origin),
            ));

            for (_, cache, stats) in caches.iter_mut() {
                let began = Instant::now();
                let hit = cache.access(&request.key, stats);
                stats.elapsed += began.elapsed();
                if hit {
                    stats.hits += 1;
                } else {
                    stats.misses += 1;
                }
            }

            total_requests += 1;
            unique_keys.insert(request.key);
        }

        let mut algorithm_stats = HashMap::new();
        for (algorithm, cache, mut stats) in caches {
            cache.finish(&mut stats);
            algorithm_stats.insert(algorithm, stats);
        }

        Ok(SimulationResult {
            duration: start.elapsed(),
            total_requests,
            unique_objects: unique_keys.len(),
            capacity: self.config.capacity,
            ttl: self.config.ttl,
            algorithm_stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;
    use std::path::PathBuf;

    fn config(capacity: usize, ttl: Option<Duration>) -> SimulationConfig {
        SimulationConfig {
            input: PathBuf::new(),
            capacity,
            ttl,
            algorithms: CacheAlgorithm::all(),
        }
    }

    fn trace(keys: &[(u64, &str)]) -> Vec<Result<Request, Infallible>> {
        keys.iter().map(|&(ts, key)| Ok(Request::new(ts, key))).collect()
    }

    #[test]
    fn test_slot_lru_matches_reference_without_ttl() {
        let mut requests = Vec::new();
        let mut seed = 17u64;
        for ts in 0..20_000u64 {
            seed = seed.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            let key = if seed >> 62 == 0 { (seed >> 33) % 5_000 } else { (seed >> 33) % 300 };
            requests.push(Ok::<_, Infallible>(Request::new(ts, format!("key_{key}"))));
        }

        let result = SimulationRunner::new(config(256, None))
            .run_requests(requests)
            .unwrap();

        let slot = &result.algorithm_stats[&CacheAlgorithm::SlotLru];
        let reference = &result.algorithm_stats[&CacheAlgorithm::ReferenceLru];
        assert_eq!(slot.hits, reference.hits);
        assert_eq!(slot.misses, reference.misses);
        assert_eq!(slot.evictions, reference.evictions);
        assert_eq!(slot.expirations, 0);
        assert_eq!(result.total_requests, 20_000);
    }

    #[test]
    fn test_ttl_follows_trace_time() {
        let requests = trace(&[(1_000, "a"), (1_050, "a"), (1_200, "a"), (1_250, "a")]);
        let result = SimulationRunner::new(config(4, Some(Duration::from_millis(100))))
            .run_requests(requests)
            .unwrap();

        // Miss, hit, expired miss, hit.
        let slot = &result.algorithm_stats[&CacheAlgorithm::SlotLru];
        assert_eq!((slot.hits, slot.misses, slot.expirations), (2, 2, 1));

        let reference = &result.algorithm_stats[&CacheAlgorithm::ReferenceLru];
        assert_eq!((reference.hits, reference.misses), (3, 1));
        assert_eq!(result.unique_objects, 1);
    }

    #[test]
    fn test_zero_capacity_is_reported() {
        let result = SimulationRunner::new(config(0, None)).run_requests(trace(&[(0, "a")]));
        assert!(result.is_err());
    }
}
