//! Cache Configuration
//!
//! [`SlotLruConfig`] carries everything needed to build a
//! [`SlotLruCache`](crate::SlotLruCache). Fields are public so a config can be
//! written as a struct literal; the builder helpers are shorthand for the
//! common cases.
//!
//! # Sizing
//!
//! `capacity` is a hard entry count. All per-slot arrays are allocated up
//! front for the full capacity and never grow, so the cost of an idle cache
//! is roughly:
//!
//! ```text
//! capacity × (size_of::<K>() + size_of::<Option<V>>()   // entry arrays
//!             + 3 × slot width                          // links + free-list
//!             + 8 if TTL is enabled)                    // deadlines
//! + key index (hash map with `capacity` buckets)
//! ```
//!
//! The slot width is 1, 2 or 4 bytes depending on capacity; see
//! [`IndexWidth`](crate::IndexWidth).
//!
//! # Examples
//!
//! ```
//! use slot_lru::config::SlotLruConfig;
//! use slot_lru::SlotLruCache;
//! use std::time::Duration;
//!
//! // Plain LRU, no expiry
//! let config = SlotLruConfig {
//!     capacity: 10_000,
//!     ttl: None,
//! };
//! let cache: SlotLruCache<String, Vec<u8>> = SlotLruCache::init(config, None).unwrap();
//!
//! // Entries expire 30 seconds after their last write
//! let config = SlotLruConfig::new(500).with_ttl(Duration::from_secs(30));
//! let cache: SlotLruCache<String, u64> = SlotLruCache::init(config, None).unwrap();
//! assert_eq!(cache.ttl(), Some(Duration::from_secs(30)));
//! ```

use core::fmt;
use core::time::Duration;

/// Configuration for a [`SlotLruCache`](crate::SlotLruCache).
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SlotLruConfig {
    /// Maximum number of entries. Must be in `1..=2^32`; anything else is
    /// rejected when the cache is built.
    pub capacity: usize,
    /// Lifetime of an entry, counted from its most recent write.
    /// `None` or a zero duration disables expiry entirely.
    pub ttl: Option<Duration>,
}

impl SlotLruConfig {
    /// Configuration for a cache of `capacity` entries without expiry.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ttl: None,
        }
    }

    /// Sets the per-entry time to live.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Sets the per-entry time to live in milliseconds.
    #[must_use]
    pub fn with_ttl_millis(self, millis: u64) -> Self {
        self.with_ttl(Duration::from_millis(millis))
    }

    /// The TTL that will actually be applied: zero counts as disabled.
    #[inline]
    pub fn effective_ttl(&self) -> Option<Duration> {
        self.ttl.filter(|ttl| !ttl.is_zero())
    }
}

impl fmt::Debug for SlotLruConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SlotLruConfig")
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .finish()
    }
}
