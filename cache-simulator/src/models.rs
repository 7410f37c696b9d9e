// Data models for cache simulation

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// A single request in a trace: one row of `timestamp_ms,key`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
    /// Milliseconds since the start of the trace
    pub timestamp_ms: u64,
    /// Cache key
    pub key: String,
}

impl Request {
    /// Create a new request
    pub fn new(timestamp_ms: u64, key: impl Into<String>) -> Self {
        Self {
            timestamp_ms,
            key: key.into(),
        }
    }
}

/// Cache implementations that can be replayed against a trace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CacheAlgorithm {
    /// `slot_lru::SlotLruCache`, with TTL when one is configured
    SlotLru,
    /// The `lru` crate, as a strict-LRU reference without expiry
    ReferenceLru,
}

impl CacheAlgorithm {
    /// Get all supported algorithms
    pub fn all() -> Vec<CacheAlgorithm> {
        vec![CacheAlgorithm::SlotLru, CacheAlgorithm::ReferenceLru]
    }

    /// Get the algorithm name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheAlgorithm::SlotLru => "SLOT-LRU",
            CacheAlgorithm::ReferenceLru => "lru-crate",
        }
    }

    /// Parse a command-line name
    pub fn from_name(name: &str) -> Option<CacheAlgorithm> {
        match name.to_lowercase().as_str() {
            "slot-lru" | "slot_lru" | "slot" => Some(CacheAlgorithm::SlotLru),
            "lru" | "lru-crate" | "reference" => Some(CacheAlgorithm::ReferenceLru),
            _ => None,
        }
    }
}

impl fmt::Display for CacheAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration for a simulation run
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    /// Trace file, or a directory of `.csv` trace files replayed in name order
    pub input: PathBuf,
    /// Cache capacity in entries
    pub capacity: usize,
    /// Entry time-to-live; `None` disables expiry
    pub ttl: Option<Duration>,
    /// Algorithms to replay
    pub algorithms: Vec<CacheAlgorithm>,
}

/// Per-algorithm counters collected during a replay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlgorithmStats {
    /// Lookups that found the key
    pub hits: u64,
    /// Lookups that did not
    pub misses: u64,
    /// Entries pushed out by capacity
    pub evictions: u64,
    /// Entries purged by TTL
    pub expirations: u64,
    /// Time spent inside cache calls
    pub elapsed: Duration,
}

impl AlgorithmStats {
    /// Create empty stats
    pub fn new() -> Self {
        Self::default()
    }

    /// Total lookups
    pub fn requests(&self) -> u64 {
        self.hits + self.misses
    }

    /// Hit rate as a percentage
    pub fn hit_rate(&self) -> f64 {
        let total = self.requests();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    /// Average nanoseconds per request
    pub fn nanos_per_request(&self) -> f64 {
        let total = self.requests();
        if total == 0 {
            0.0
        } else {
            self.elapsed.as_nanos() as f64 / total as f64
        }
    }
}

/// Outcome of a simulation run
#[derive(Debug, Clone)]
pub struct SimulationResult {
    /// Wall time of the whole run
    pub duration: Duration,
    /// Requests replayed
    pub total_requests: u64,
    /// Distinct keys seen
    pub unique_objects: usize,
    /// Capacity every cache was built with
    pub capacity: usize,
    /// TTL applied to `SlotLru`
    pub ttl: Option<Duration>,
    /// Counters per algorithm
    pub algorithm_stats: HashMap<CacheAlgorithm, AlgorithmStats>,
}

/// One row of the CSV results export
#[derive(Debug, Serialize)]
pub struct CsvResultRow {
    pub algorithm: String,
    pub capacity: usize,
    pub ttl_ms: u64,
    pub requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub evictions: u64,
    pub expirations: u64,
    pub nanos_per_request: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_names_round_trip() {
        for algo in CacheAlgorithm::all() {
            let parsed = CacheAlgorithm::from_name(&algo.as_str().to_lowercase());
            assert_eq!(parsed, Some(algo));
        }
        assert_eq!(CacheAlgorithm::from_name("lfu"), None);
    }

    #[test]
    fn test_stats_rates() {
        let stats = AlgorithmStats {
            hits: 3,
            misses: 1,
            elapsed: Duration::from_nanos(400),
            ..AlgorithmStats::new()
        };
        assert_eq!(stats.requests(), 4);
        assert_eq!(stats.hit_rate(), 75.0);
        assert_eq!(stats.nanos_per_request(), 100.0);
        assert_eq!(AlgorithmStats::new().hit_rate(), 0.0);
    }
}
