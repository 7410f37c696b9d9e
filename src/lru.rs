//! Slot-Arena LRU Cache Implementation
//!
//! This module provides [`SlotLruCache`], a fixed-capacity least recently used
//! cache whose recency list lives entirely in integer arrays. Every operation
//! is O(1) and, once constructed, the cache never reallocates its storage.
//!
//! # Layout
//!
//! ```text
//!   key index (HashMap<K, slot>)
//!        │
//!        ▼
//!  slot:   0      1      2      3      4
//!  keys  [ "a" ][ "b" ][ "c" ][ "x" ][     ]      entry arrays, indexed by slot
//!  vals  [  1  ][  2  ][  3  ][ --- ][     ]
//!  ttl   [ t0  ][ t1  ][ t2  ][     ][     ]      only when TTL is enabled
//!
//!  up    [  2  ][  0  ][  ·  ][     ][     ]      neighbour toward top
//!  down  [  1  ][  ·  ][  0  ][     ][     ]      neighbour toward bottom
//!  free  [  3  ]                                  reclaimed slots (stack)
//!
//!  top = 2 ("c")  ──▶  0 ("a")  ──▶  1 ("b") = bottom
//! ```
//!
//! Slot numbers are stored as `u8`, `u16` or `u32` depending on capacity; see
//! [`IndexWidth`].
//!
//! # Algorithm
//!
//! - **Hit** (`get`): the slot is spliced out of its position and relinked as
//!   `top`. No other entry moves.
//! - **Insert below capacity**: a slot is taken from the free-list if one is
//!   available, otherwise the next never-used slot, and linked as `top`.
//! - **Insert at capacity**: the `bottom` slot is the victim. Its key leaves the
//!   index and the new key and value are written straight into that slot,
//!   which is then moved to `top`. The free-list is not involved.
//! - **Remove**: the slot is unlinked and pushed onto the free-list.
//!
//! Because entries are only reordered when accessed, keys that are never read
//! again are evicted in the order they were inserted.
//!
//! # Expiry
//!
//! With a TTL configured, each write stamps the slot with `now + ttl`. The
//! deadline is checked lazily whenever a key is looked up through `get`,
//! `get_mut`, `peek` or `has`; an expired entry is purged on the spot and
//! reported as missing. `remove` does not check deadlines. Entries nobody looks at keep their slot until
//! they are evicted. This means [`SlotLruCache::has`] is not idempotent across
//! a deadline: the call that observes expiry also deletes the entry.
//!
//! # Performance Characteristics
//!
//! - Get / Peek / Put / Remove: O(1)
//! - Clear: O(1) for the recency list, plus clearing the key index
//! - Memory: allocated once for the full capacity; see
//!   [`config`](crate::config) for a sizing formula.
//!
//! # Thread Safety
//!
//! This implementation is not thread-safe. Every operation, including `get`,
//! rewrites the recency links, so concurrent callers must serialise access
//! with a `Mutex` or use
//! [`SyncSlotLruCache`](crate::concurrent::SyncSlotLruCache) (requires the
//! `concurrent` feature).

extern crate alloc;

use crate::clock::{duration_nanos, Clock, DefaultClock};
use crate::config::SlotLruConfig;
use crate::error::CapacityError;
use crate::list::{Order, Slots};
use crate::metrics::{CacheMetrics, CoreCacheMetrics, SlotLruMetrics};
use crate::slot::IndexWidth;
use alloc::boxed::Box;
use alloc::collections::BTreeMap;
use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;
use core::borrow::Borrow;
use core::hash::{BuildHasher, Hash};
use core::mem;
use core::num::NonZeroUsize;
use core::time::Duration;
use tracing::{debug, trace};

/// Hasher used for the key index when none is supplied.
#[cfg(feature = "hashbrown")]
pub use hashbrown::DefaultHashBuilder;
#[cfg(feature = "hashbrown")]
use hashbrown::HashMap;

/// Hasher used for the key index when none is supplied.
#[cfg(not(feature = "hashbrown"))]
pub use std::collections::hash_map::RandomState as DefaultHashBuilder;
#[cfg(not(feature = "hashbrown"))]
use std::collections::HashMap;

/// Slot numbers in the key index. Capacities are capped at 2^32, so the
/// largest slot always fits.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn index_slot(slot: usize) -> u32 {
    slot as u32
}

/// A fixed-capacity LRU cache built on integer slot arrays, with optional
/// lazy per-entry expiry.
///
/// # Examples
///
/// ```
/// use slot_lru::SlotLruCache;
///
/// let mut cache = SlotLruCache::new(3).unwrap();
/// cache.set("a", 1).set("b", 2).set("c", 3);
///
/// // Reading "a" makes it the most recently used entry...
/// assert_eq!(cache.get(&"a"), Some(&1));
///
/// // ...so the next insert evicts "b" instead.
/// cache.set("d", 4);
/// assert!(!cache.has(&"b"));
/// assert!(cache.has(&"a"));
/// assert!(cache.has(&"c"));
/// assert_eq!(cache.len(), 3);
/// ```
pub struct SlotLruCache<K, V, S = DefaultHashBuilder, C = DefaultClock> {
    order: Order,
    keys: Vec<K>,
    values: Vec<Option<V>>,
    deadlines: Option<Box<[u64]>>,
    ttl: Option<Duration>,
    index: HashMap<K, u32, S>,
    clock: C,
    metrics: SlotLruMetrics,
}

impl<K: Hash + Eq, V> SlotLruCache<K, V> {
    /// Creates a cache holding at most `capacity` entries, without expiry.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero or larger than 2^32.
    pub fn new(capacity: usize) -> Result<Self, CapacityError> {
        Self::init(SlotLruConfig::new(capacity), None)
    }

    /// Creates a cache whose entries expire `ttl` after their last write.
    ///
    /// A zero `ttl` disables expiry.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if `capacity` is zero or larger than 2^32.
    pub fn with_ttl(capacity: usize, ttl: Duration) -> Result<Self, CapacityError> {
        Self::init(SlotLruConfig::new(capacity).with_ttl(ttl), None)
    }

    /// Creates a cache from a configuration, with an optional hasher.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the configured capacity is zero or larger
    /// than 2^32. Nothing is allocated in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use slot_lru::config::SlotLruConfig;
    /// use slot_lru::SlotLruCache;
    ///
    /// let config = SlotLruConfig::new(2).with_ttl_millis(500);
    /// let mut cache: SlotLruCache<String, u32> = SlotLruCache::init(config, None).unwrap();
    /// cache.set("k".to_string(), 1);
    /// assert_eq!(cache.peek("k"), Some(&1));
    /// ```
    pub fn init(
        config: SlotLruConfig,
        hasher: Option<DefaultHashBuilder>,
    ) -> Result<Self, CapacityError> {
        Self::with_hasher_and_clock(config, hasher.unwrap_or_default(), DefaultClock::default())
    }
}

impl<K: Hash + Eq, V, C: Clock> SlotLruCache<K, V, DefaultHashBuilder, C> {
    /// Creates a cache from a configuration that reads time from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the configured capacity is invalid.
    pub fn init_with_clock(
        config: SlotLruConfig,
        hasher: Option<DefaultHashBuilder>,
        clock: C,
    ) -> Result<Self, CapacityError> {
        Self::with_hasher_and_clock(config, hasher.unwrap_or_default(), clock)
    }
}

impl<K: Hash + Eq, V, S: BuildHasher, C: Clock> SlotLruCache<K, V, S, C> {
    /// Creates a cache with an explicit hasher and clock.
    ///
    /// Capacity is validated before anything is allocated.
    ///
    /// # Errors
    ///
    /// Returns [`CapacityError`] if the configured capacity is invalid.
    pub fn with_hasher_and_clock(
        config: SlotLruConfig,
        hash_builder: S,
        clock: C,
    ) -> Result<Self, CapacityError> {
        let width = IndexWidth::for_capacity(config.capacity)?;
        let cap = NonZeroUsize::new(config.capacity).ok_or(CapacityError::Zero)?;
        let ttl = config.effective_ttl();

        debug!(
            capacity = cap.get(),
            index_width = %width,
            ttl = ?ttl,
            "creating slot lru cache"
        );

        Ok(SlotLruCache {
            order: Order::new(cap, width),
            keys: Vec::with_capacity(cap.get()),
            values: Vec::with_capacity(cap.get()),
            deadlines: ttl.map(|_| vec![0u64; cap.get()].into_boxed_slice()),
            ttl,
            // Twice the capacity keeps eviction churn rehashing in place.
            index: HashMap::with_capacity_and_hasher(
                cap.get().saturating_mul(2),
                hash_builder,
            ),
            clock,
            metrics: SlotLruMetrics::new(cap.get() as u64, width),
        })
    }

    /// Maximum number of entries.
    #[inline]
    pub fn cap(&self) -> NonZeroUsize {
        self.order.cap()
    }

    /// Number of entries currently occupying a slot, including expired
    /// entries that have not been looked at since their deadline passed.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if no slot is occupied.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.len() == 0
    }

    /// Per-entry time to live, if expiry is enabled.
    #[inline]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Width of the slot numbers used by the recency list.
    #[inline]
    pub fn index_width(&self) -> IndexWidth {
        self.order.width()
    }

    /// Bytes held by the recency links and free-list.
    #[inline]
    pub fn index_bytes(&self) -> usize {
        self.order.index_bytes()
    }

    /// Event counters since construction.
    #[inline]
    pub fn counters(&self) -> &CoreCacheMetrics {
        &self.metrics.core
    }

    #[inline]
    fn slot_of<Q>(&self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.get(key).map(|&slot| slot as usize)
    }

    #[inline]
    fn is_expired(&self, slot: usize) -> bool {
        match &self.deadlines {
            Some(deadlines) => deadlines[slot] <= self.clock.now_nanos(),
            None => false,
        }
    }

    /// Starts a fresh TTL period for `slot`.
    #[inline]
    fn stamp(&mut self, slot: usize) {
        if let (Some(deadlines), Some(ttl)) = (self.deadlines.as_mut(), self.ttl) {
            deadlines[slot] = self.clock.now_nanos().saturating_add(duration_nanos(ttl));
        }
    }

    /// Resolves `key` to a live slot, purging it first if it has expired.
    fn live_slot<Q>(&mut self, key: &Q) -> Option<usize>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.slot_of(key)?;
        if self.is_expired(slot) {
            self.unlink(key, slot);
            self.metrics.core.record_expiration();
            trace!(slot, "purged expired entry");
            return None;
        }
        Some(slot)
    }

    /// Drops `key` from the index and returns `slot` to the free-list.
    fn unlink<Q>(&mut self, key: &Q, slot: usize) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.index.remove(key);
        self.order.detach(slot);
        self.values[slot].take()
    }

    /// Looks up `key`, marking it as most recently used.
    ///
    /// Returns `None` if the key is absent or its TTL has elapsed; in the
    /// latter case the entry is removed.
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.live_slot(key) {
            Some(slot) => {
                self.order.splay(slot);
                self.metrics.core.record_hit();
                self.values[slot].as_ref()
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    /// Like [`get`](Self::get), but returns a mutable reference.
    ///
    /// Mutating the value in place does not restart its TTL.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.live_slot(key) {
            Some(slot) => {
                self.order.splay(slot);
                self.metrics.core.record_hit();
                self.values[slot].as_mut()
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    /// Looks up `key` without changing its recency.
    ///
    /// Expired entries are still purged, which is why this takes `&mut self`.
    pub fn peek<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        match self.live_slot(key) {
            Some(slot) => {
                self.metrics.core.record_hit();
                self.values[slot].as_ref()
            }
            None => {
                self.metrics.core.record_miss();
                None
            }
        }
    }

    /// Returns `true` if `key` maps to a live entry.
    ///
    /// Recency is unchanged, but an expired entry is purged by the call that
    /// notices it, so two calls straddling the deadline answer differently.
    pub fn has<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        self.live_slot(key).is_some()
    }

    /// Removes `key` and returns its value.
    ///
    /// Absent keys are a no-op. Expiry is not checked: an entry still in the
    /// index is removed and returned even if its TTL has elapsed.
    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Hash + Eq,
    {
        let slot = self.slot_of(key)?;
        self.metrics.core.record_removal();
        self.unlink(key, slot)
    }

    /// Forgets every entry.
    ///
    /// The recency list, free-list and key index are reset; the entry arrays
    /// are left as they are and their stale contents are dropped as slots get
    /// overwritten by later inserts.
    pub fn clear(&mut self) {
        debug!(len = self.order.len(), "clearing slot lru cache");
        self.order.clear();
        self.index.clear();
    }

    /// Iterates over live entries from most to least recently used.
    ///
    /// Entries whose TTL has elapsed are skipped but not purged, and recency
    /// is not affected.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: self.order.iter(),
            keys: &self.keys,
            values: &self.values,
            deadlines: self.deadlines.as_deref(),
            now: self
                .deadlines
                .as_ref()
                .map_or(0, |_| self.clock.now_nanos()),
        }
    }
}

impl<K: Hash + Eq + Clone, V, S: BuildHasher, C: Clock> SlotLruCache<K, V, S, C> {
    /// Inserts or updates `key`, making it the most recently used entry.
    ///
    /// Returns `self` so calls can be chained.
    pub fn set(&mut self, key: K, value: V) -> &mut Self {
        let _ = self.put(key, value);
        self
    }

    /// Inserts or updates `key`, making it the most recently used entry.
    ///
    /// Returns the displaced entry, if any:
    ///
    /// - `Some((key, old_value))` if the key already existed,
    /// - `Some((evicted_key, evicted_value))` if the cache was full,
    /// - `None` if the entry took a free slot.
    ///
    /// Writing an existing key restarts its TTL.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(slot) = self.slot_of(&key) {
            self.stamp(slot);
            self.order.splay(slot);
            self.metrics.core.record_update();
            return self.values[slot].replace(value).map(|old| (key, old));
        }

        let evicted = match self.order.bottom().filter(|_| self.order.is_full()) {
            Some(victim) => {
                let old_key = mem::replace(&mut self.keys[victim], key.clone());
                self.index.remove(&old_key);
                let old_value = self.values[victim].replace(value);
                self.order.splay(victim);
                self.index.insert(key, index_slot(victim));
                self.stamp(victim);
                self.metrics.core.record_eviction();
                trace!(slot = victim, "evicted least recently used entry");
                old_value.map(|old| (old_key, old))
            }
            None => {
                let slot = self.order.insert();
                if slot == self.keys.len() {
                    self.keys.push(key.clone());
                    self.values.push(Some(value));
                } else {
                    self.keys[slot] = key.clone();
                    self.values[slot] = Some(value);
                }
                self.index.insert(key, index_slot(slot));
                self.stamp(slot);
                None
            }
        };

        self.metrics.core.record_insertion();
        evicted
    }
}

impl<K, V, S, C> core::fmt::Debug for SlotLruCache<K, V, S, C> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlotLruCache")
            .field("capacity", &self.order.cap())
            .field("len", &self.order.len())
            .field("index_width", &self.order.width())
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl<K: Hash + Eq, V, S: BuildHasher, C: Clock> CacheMetrics for SlotLruCache<K, V, S, C> {
    fn metrics(&self) -> BTreeMap<String, f64> {
        self.metrics.metrics()
    }

    fn algorithm_name(&self) -> &'static str {
        self.metrics.algorithm_name()
    }
}

/// Iterator over a cache's live entries, most recently used first.
pub struct Iter<'a, K, V> {
    slots: Slots<'a>,
    keys: &'a [K],
    values: &'a [Option<V>],
    deadlines: Option<&'a [u64]>,
    now: u64,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let slot = self.slots.next()?;
            if self.deadlines.is_some_and(|d| d[slot] <= self.now) {
                continue;
            }
            if let Some(value) = self.values[slot].as_ref() {
                return Some((&self.keys[slot], value));
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.slots.size_hint().1)
    }
}

impl<K, V> core::fmt::Debug for Iter<'_, K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter").finish_non_exhaustive()
    }
}
