//! Externally Synchronised Cache
//!
//! [`SlotLruCache`] is single-threaded: `get`, `peek` and `has` all rewrite
//! recency links or purge expired entries, and a splay interleaved with an
//! eviction on another thread can corrupt the list (for example by pushing the
//! same slot onto the free-list twice). Sharing one instance therefore needs
//! every operation to run under a lock.
//!
//! [`SyncSlotLruCache`] is that lock, packaged: one `parking_lot::Mutex`
//! around one cache, with a `&self` API so it can sit behind an `Arc`.
//!
//! ## Why one lock instead of segments?
//!
//! Hash-sharding the key space across several independently locked caches
//! scales better, but each shard then evicts its own least recently used
//! entry, so the cache as a whole is no longer strict LRU. This wrapper keeps
//! the single global recency order.
//!
//! ## Why Mutex instead of RwLock?
//!
//! No operation is read-only: `get` splays, and `peek`/`has` may purge. A
//! read lock would never be enough.
//!
//! # Example
//!
//! ```rust
//! use slot_lru::concurrent::SyncSlotLruCache;
//! use std::sync::Arc;
//! use std::thread;
//!
//! let cache = Arc::new(SyncSlotLruCache::new(1000).unwrap());
//!
//! let handles: Vec<_> = (0..4)
//!     .map(|t| {
//!         let cache = Arc::clone(&cache);
//!         thread::spawn(move || {
//!             for i in 0..100 {
//!                 let key = format!("key_{t}_{i}");
//!                 cache.set(key.clone(), i);
//!                 assert_eq!(cache.get(&key), Some(i));
//!             }
//!         })
//!     })
//!     .collect();
//!
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//! assert_eq!(cache.len(), 400);
//! ```

extern crate alloc;

use crate::clock::{Clock, DefaultClock};
use crate::config::SlotLruConfig;
use crate::error::CapacityError;
use crate::lru::{DefaultHashBuilder, SlotLruCache};
use crate::metrics::{CacheMetrics, CoreCacheMetrics};
use alloc::collections::BTreeMap;
use alloc::string::String;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::num::NonZeroUsize;
use core::time::Duration;
use parking_lot::Mutex;

/// A [`SlotLruCache`] behind a single mutex, shareable across threads.
///
/// Values are returned by clone so the lock is never held past a call; use
/// [`get_with`](Self::get_with) to read in place instead.
pub struct SyncSlotLruCache<K, V, S = DefaultHashBuilder, C = DefaultClock> {
    inner: Mutex<SlotLruCache<K, V, S, C>>,
}

impl<K: Hash + Eq, V> SyncSlotLruCache<K, V> {
    /// Creates a shared cache of `capacity` entries without expiry.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero or larger than 2^32.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        SlotLruCache::new(capacity).map(Self::from_cache)
    }

    /// Creates a shared cache whose entries expire `ttl` after their last write.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero or larger than 2^32.
    pub fn with_ttl(capacity: usize, ttl: Duration) -> Result<Self, CapacityError> {
        SlotLruCache::with_ttl(capacity, ttl).map(Self::from_cache)
    }

    /// Creates a shared cache from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the configured capacity is invalid.
    pub fn init(
        config: SlotLruConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, CapacityError> {
        SlotLruCache::init(config, hasher).map(Self::from_cache)
    }
}

impl<K, V, S, C> SyncSlotLruCache<K, V, S, C> {
    /// Wraps an existing cache.
    pub fn from_cache(cache: SlotLruCache<K, V, S, C>) -> Self {
        Self {
            inner: Mutex::new(cache),
        }
    }

    /// Unwraps the inner cache.
    pub fn into_inner(self) -> SlotLruCache<K, V, S, C> {
        self.inner.into_inner()
    }
}

impl<K, V, S, C> SyncSlotLruCache<K, V, S, C>
where
    K: Hash + Eq,
    S: BuildHasher,
    C: Clock,
{
    /// Maximum number of entries.
    pub fn cap(&self) -> NonZeroUsize {
        self.inner.lock().cap()
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// Returns `true` if no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    /// Returns a clone of the value for `key`, marking it most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.inner.lock().get(key).cloned()
    }

    /// Applies `f` to the value for `key` while holding the lock, marking the
    /// entry most recently used.
    ///
    /// ```rust
    /// use slot_lru::concurrent::SyncSlotLruCache;
    ///
    /// let cache = SyncSlotLruCache::new(8).unwrap();
    /// cache.set("greeting", String::from("hello"));
    /// assert_eq!(cache.get_with(&"greeting", |s| s.len()), Some(5));
    /// ```
    pub fn get_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&V) -> R,
    {
        self.inner.lock().get(key).map(f)
    }

    /// Applies `f` to a mutable reference to the value for `key`.
    pub fn get_mut_with<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        F: FnOnce(&mut V) -> R,
    {
        self.inner.lock().get_mut(key).map(f)
    }

    /// Returns a clone of the value for `key` without changing its recency.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
        V: Clone,
    {
        self.inner.lock().peek(key).cloned()
    }

    /// Returns `true` if `key` maps to a live entry, purging it if expired.
    pub fn has<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().has(key)
    }

    /// Removes `key` and returns its value.
    pub fn remove<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.inner.lock().remove(key)
    }

    /// Forgets every entry.
    pub fn clear(&self) {
        self.inner.lock().clear();
    }

    /// Snapshot of the event counters.
    pub fn counters(&self) -> CoreCacheMetrics {
        self.inner.lock().counters().clone()
    }

    /// Runs `f` with exclusive access to the inner cache, for sequences of
    /// operations that must not interleave with other threads.
    ///
    /// ```rust
    /// use slot_lru::concurrent::SyncSlotLruCache;
    ///
    /// let cache = SyncSlotLruCache::new(8).unwrap();
    /// cache.with_lock(|c| {
    ///     if !c.has(&"counter") {
    ///         c.set("counter", 0);
    ///     }
    /// });
    /// assert_eq!(cache.get(&"counter"), Some(0));
    /// ```
    pub fn with_lock<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut SlotLruCache<K, V, S, C>) -> R,
    {
        f(&mut self.inner.lock())
    }
}

impl<K, V, S, C> SyncSlotLruCache<K, V, S, C>
where
    K: Hash + Eq + Clone,
    S: BuildHasher,
    C: Clock,
{
    /// Inserts or updates `key`. Returns `self` so calls can be chained.
    pub fn set(&self, key: K, value: V) -> &Self {
        let _ = self.inner.lock().put(key, value);
        self
    }

    /// Inserts or updates `key`, returning the replaced or evicted entry.
    pub fn put(&self, key: K, value: V) -> Option<(K, V)> {
        self.inner.lock().put(key, value)
    }
}

impl<K, V, S, C> CacheMetrics for SyncSlotLruCache<K, V, S, C>
where
    K: Hash + Eq,
    S: BuildHasher,
    C: Clock,
{
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.inner.lock().metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        "SLOT-LRU"
    }
}

impl<K, V, S, C> core::fmt::Debug for SyncSlotLruCache<K, V, S, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.inner.try_lock() {
            Some(cache) => f
                .debug_struct("SyncSlotLruCache")
                .field("inner", &*cache)
                .finish(),
            None => f
                .debug_struct("SyncSlotLruCache")
                .field("inner", &"<locked>")
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::clock::ManualClock;
    use alloc::sync::Arc;
    use std::format;
    use std::thread;
    use std::vec::Vec;

    #[test]
    fn test_basic_operations() {
        let cache = SyncSlotLruCache::new(3).unwrap();
        cache.set("a", 1).set("b", 2).set("c", 3);
        assert_eq!(cache.get(&"a"), Some(1));
        cache.set("d", 4);
        assert!(!cache.has(&"b"));
        assert_eq!(cache.peek(&"c"), Some(3));
        assert_eq!(cache.remove(&"c"), Some(3));
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.cap().get(), 3);
    }

    #[test]
    fn test_get_mut_with() {
        let cache = SyncSlotLruCache::new(2).unwrap();
        cache.set("hits", 0u64);
        for _ in 0..5 {
            cache.get_mut_with(&"hits", |v| *v += 1);
        }
        assert_eq!(cache.get(&"hits"), Some(5));
    }

    #[test]
    fn test_ttl_through_wrapper() {
        let clock = Arc::new(ManualClock::new());
        let config = SlotLruConfig::new(4).with_ttl_millis(10);
        let inner = SlotLruCache::init_with_clock(config, None, Arc::clone(&clock)).unwrap();
        let cache = SyncSlotLruCache::from_cache(inner);
        cache.set("a", 1);
        clock.advance(Duration::from_millis(10));
        assert!(!cache.has(&"a"));
        assert_eq!(cache.counters().expirations, 1);
    }

    #[test]
    fn test_threads_keep_cache_consistent() {
        let cache = Arc::new(SyncSlotLruCache::new(64).unwrap());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let cache = Arc::clone(&cache);
                thread::spawn(move || {
                    for i in 0..1000 {
                        let key = format!("key_{}", (i * 7 + t) % 200);
                        match i % 5 {
                            0 | 1 => {
                                cache.set(key, i);
                            }
                            2 => {
                                let _ = cache.get(&key);
                            }
                            3 => {
                                let _ = cache.has(&key);
                            }
                            _ => {
                                let _ = cache.remove(&key);
                            }
                        }
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert!(cache.len() <= 64);
        let live = cache.with_lock(|c| c.iter().count());
        assert_eq!(live, cache.len());
    }

    #[test]
    fn test_debug_and_metrics() {
        let cache: SyncSlotLruCache<&str, i32> = SyncSlotLruCache::new(2).unwrap();
        cache.set("x", 1);
        assert!(format!("{cache:?}").contains("SyncSlotLruCache"));
        assert_eq!(cache.metrics().get("insertions"), Some(&1.0));
        assert_eq!(cache.algorithm_name(), "SLOT-LRU");
    }
}
