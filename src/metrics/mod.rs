//! Cache Metrics
//!
//! Counters describing what a cache has been doing, reported through the
//! [`CacheMetrics`] trait as a `BTreeMap` so that keys always come out in the
//! same order. That keeps test assertions and simulator CSV columns stable.
//!
//! The counters are plain integers updated on the operation's own path; they
//! add no synchronisation of their own.

extern crate alloc;

use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

pub mod lru;

pub use lru::SlotLruMetrics;

/// Event counters common to every cache.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CoreCacheMetrics {
    /// Lookups (`get`, `get_mut`, `peek`) made against the cache.
    pub requests: u64,

    /// Lookups that found a live entry.
    pub cache_hits: u64,

    /// Writes that created a new entry.
    pub insertions: u64,

    /// Writes that replaced the value of an existing entry.
    pub updates: u64,

    /// Entries pushed out to make room for a new key.
    pub evictions: u64,

    /// Entries purged because their TTL had elapsed when they were touched.
    pub expirations: u64,

    /// Entries deleted through an explicit `remove`.
    pub removals: u64,
}

impl CoreCacheMetrics {
    /// Creates a zeroed set of counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a lookup that found its key.
    #[inline]
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.cache_hits += 1;
    }

    /// Records a lookup that found nothing (including expired entries).
    #[inline]
    pub fn record_miss(&mut self) {
        self.requests += 1;
    }

    /// Records a new entry.
    #[inline]
    pub fn record_insertion(&mut self) {
        self.insertions += 1;
    }

    /// Records an overwrite of an existing entry.
    #[inline]
    pub fn record_update(&mut self) {
        self.updates += 1;
    }

    /// Records an LRU eviction.
    #[inline]
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Records a lazy TTL purge.
    #[inline]
    pub fn record_expiration(&mut self) {
        self.expirations += 1;
    }

    /// Records an explicit removal.
    #[inline]
    pub fn record_removal(&mut self) {
        self.removals += 1;
    }

    /// Lookups that missed.
    #[inline]
    pub fn cache_misses(&self) -> u64 {
        self.requests - self.cache_hits
    }

    /// Fraction of lookups that hit, between 0.0 and 1.0.
    pub fn hit_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_hits as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// Fraction of lookups that missed, between 0.0 and 1.0.
    pub fn miss_rate(&self) -> f64 {
        if self.requests > 0 {
            self.cache_misses() as f64 / self.requests as f64
        } else {
            0.0
        }
    }

    /// All counters and rates keyed by name.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = BTreeMap::new();

        metrics.insert("requests".to_string(), self.requests as f64);
        metrics.insert("cache_hits".to_string(), self.cache_hits as f64);
        metrics.insert("cache_misses".to_string(), self.cache_misses() as f64);
        metrics.insert("insertions".to_string(), self.insertions as f64);
        metrics.insert("updates".to_string(), self.updates as f64);
        metrics.insert("evictions".to_string(), self.evictions as f64);
        metrics.insert("expirations".to_string(), self.expirations as f64);
        metrics.insert("removals".to_string(), self.removals as f64);

        metrics.insert("hit_rate".to_string(), self.hit_rate());
        metrics.insert("miss_rate".to_string(), self.miss_rate());

        if self.requests > 0 {
            metrics.insert(
                "eviction_rate".to_string(),
                self.evictions as f64 / self.requests as f64,
            );
        }

        metrics
    }
}

/// Uniform metrics reporting for caches.
pub trait CacheMetrics {
    /// All metrics as name/value pairs in alphabetical order.
    fn metrics(&self) -> BTreeMap<String, f64>;

    /// Short identifier of the cache algorithm, e.g. `"SLOT-LRU"`.
    fn algorithm_name(&self) -> &'static str;
}
