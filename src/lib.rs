#![doc = include_str!("../README.md")]
//!
//! ---
//!
//! # Code Reference
//!
//! ## Quick Reference
//!
//! | Type | Description |
//! |------|-------------|
//! | [`SlotLruCache`] | Fixed-capacity LRU cache with optional TTL, single-threaded |
//! | [`SyncSlotLruCache`] | The same cache behind one mutex (`concurrent` feature) |
//! | [`SlotLruConfig`] | Capacity and TTL used by `init` constructors |
//! | [`clock::ManualClock`] | Deterministic time source for tests and trace replay |
//!
//! ## Performance Characteristics
//!
//! | Operation | Cost | Allocates |
//! |-----------|------|-----------|
//! | `get` / `get_mut` / `peek` / `has` | O(1) | never |
//! | `set` / `put` | O(1) | never |
//! | `remove` | O(1) | never |
//! | `clear` | O(1) plus clearing the key index | never |
//! | construction | O(capacity) | once, everything |
//!
//! The recency links cost three slot numbers per entry. A slot number is a
//! `u8` up to 256 entries, a `u16` up to 65 536 and a `u32` up to 2^32:
//!
//! | Capacity | Index width | Link bytes per entry |
//! |----------|-------------|----------------------|
//! | 1 ..= 256 | `u8` | 3 |
//! | 257 ..= 65 536 | `u16` | 6 |
//! | 65 537 ..= 2^32 | `u32` | 12 |
//!
//! ## Code Examples
//!
//! ### Plain LRU
//!
//! ```rust
//! use slot_lru::SlotLruCache;
//!
//! let mut cache = SlotLruCache::new(3).unwrap();
//! cache.set("a", 1).set("b", 2).set("c", 3);
//!
//! // Touch "a"; "b" becomes least recently used.
//! assert_eq!(cache.get(&"a"), Some(&1));
//!
//! cache.set("d", 4);
//! assert!(!cache.has(&"b"));
//! assert_eq!(cache.len(), 3);
//! ```
//!
//! ### Time-To-Live
//!
//! ```rust
//! use slot_lru::clock::ManualClock;
//! use slot_lru::config::SlotLruConfig;
//! use slot_lru::SlotLruCache;
//! use std::time::Duration;
//!
//! let clock = ManualClock::new();
//! let config = SlotLruConfig::new(16).with_ttl(Duration::from_millis(100));
//! let mut cache = SlotLruCache::init_with_clock(config, None, &clock).unwrap();
//!
//! cache.set("token", "abc");
//! clock.advance(Duration::from_millis(100));
//!
//! // Expired entries are purged the first time they are looked at.
//! assert_eq!(cache.get(&"token"), None);
//! assert!(cache.is_empty());
//! ```
//!
//! ### Invalid Capacity
//!
//! ```rust
//! use slot_lru::{CapacityError, SlotLruCache};
//!
//! let err = SlotLruCache::<u64, u64>::new(0).unwrap_err();
//! assert_eq!(err, CapacityError::Zero);
//! ```
//!
//! ## Modules
//!
//! - [`lru`]: the cache itself
//! - [`config`]: construction parameters
//! - [`clock`]: time sources for expiry
//! - [`slot`]: index widths and capacity limits
//! - [`metrics`]: event counters and the [`metrics::CacheMetrics`] trait
//! - [`error`]: construction errors
//! - `concurrent`: the mutex wrapper, behind the `concurrent` feature

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[cfg(test)]
extern crate scoped_threadpool;

/// Slot numbers and the capacity ranges that select their width.
pub mod slot;

/// Intrusive recency list over preallocated slot arrays.
///
/// Internal infrastructure: links are stored as slot numbers in three flat
/// arrays, so keeping them consistent is the cache's job, not the caller's.
pub(crate) mod list;

/// Time sources used to stamp and check entry deadlines.
pub mod clock;

/// Cache configuration.
pub mod config;

/// Error returned when a cache cannot be constructed.
pub mod error;

/// Fixed-capacity least recently used cache with optional time-to-live.
pub mod lru;

/// Cache metrics system.
///
/// Event counters for hits, misses, insertions, evictions and expirations,
/// reported through a common trait.
pub mod metrics;

/// Thread-safe wrapper around [`SlotLruCache`].
///
/// Available when the `concurrent` feature is enabled.
#[cfg(feature = "concurrent")]
pub mod concurrent;

pub use config::SlotLruConfig;
pub use error::CapacityError;
pub use lru::SlotLruCache;
pub use slot::{IndexWidth, MAX_CAPACITY};

#[cfg(feature = "concurrent")]
pub use concurrent::SyncSlotLruCache;
