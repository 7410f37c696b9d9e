//! Slot LRU Metrics
//!
//! Metrics reported by [`SlotLruCache`](crate::SlotLruCache): the core event
//! counters plus the fixed shape of the slot arena.

extern crate alloc;

use super::{CacheMetrics, CoreCacheMetrics};
use crate::slot::IndexWidth;
use alloc::collections::BTreeMap;
use alloc::string::{String, ToString};

/// Metrics for a [`SlotLruCache`](crate::SlotLruCache).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotLruMetrics {
    /// Core event counters.
    pub core: CoreCacheMetrics,
    /// Number of slots in the arena.
    pub capacity: u64,
    /// Width of a slot number in the link arrays.
    pub index_width: IndexWidth,
}

impl SlotLruMetrics {
    /// Creates zeroed metrics for an arena of `capacity` slots.
    pub fn new(capacity: u64, index_width: IndexWidth) -> Self {
        Self {
            core: CoreCacheMetrics::new(),
            capacity,
            index_width,
        }
    }

    /// Core counters plus `capacity` and `index_width_bits`.
    pub fn to_btreemap(&self) -> BTreeMap<String, f64> {
        let mut metrics = self.core.to_btreemap();
        metrics.insert("capacity".to_string(), self.capacity as f64);
        metrics.insert(
            "index_width_bits".to_string(),
            f64::from(self.index_width.bits()),
        );
        metrics
    }
}

impl CacheMetrics for SlotLruMetrics {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.to_btreemap()
    }

    fn algorithm_name(&self) -> &'static str {
        "SLOT-LRU"
    }
}
