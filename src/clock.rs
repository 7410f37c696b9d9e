//! Time Sources for Entry Expiry
//!
//! TTL deadlines are stored as nanoseconds on a [`Clock`]'s own monotonic
//! timeline. The cache only reads the clock when an entry with a deadline is
//! written or touched; there is no background timer.
//!
//! - [`MonotonicClock`] (requires `std`): wall time measured from an
//!   [`Instant`](std::time::Instant) taken when the clock is created.
//! - [`ManualClock`]: time only moves when told to. Used for deterministic
//!   tests and trace replay, and as the default in `no_std` builds where no
//!   system clock exists.

extern crate alloc;

use alloc::sync::Arc;
use core::sync::atomic::{AtomicU64, Ordering};
use core::time::Duration;

/// A monotonic time source.
pub trait Clock {
    /// Nanoseconds since this clock's origin. Must never decrease.
    fn now_nanos(&self) -> u64;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_nanos(&self) -> u64 {
        (**self).now_nanos()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    #[inline]
    fn now_nanos(&self) -> u64 {
        (**self).now_nanos()
    }
}

/// Converts a duration to whole nanoseconds, saturating at `u64::MAX`.
#[inline]
pub(crate) fn duration_nanos(duration: Duration) -> u64 {
    u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX)
}

/// System monotonic clock.
#[cfg(feature = "std")]
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: std::time::Instant,
}

#[cfg(feature = "std")]
impl MonotonicClock {
    /// Creates a clock whose origin is the current instant.
    pub fn new() -> Self {
        Self {
            origin: std::time::Instant::now(),
        }
    }
}

#[cfg(feature = "std")]
impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl Clock for MonotonicClock {
    #[inline]
    fn now_nanos(&self) -> u64 {
        duration_nanos(self.origin.elapsed())
    }
}

/// A clock that only advances when told to.
///
/// Share it with a cache through a reference or an [`Arc`] to drive expiry
/// from the outside.
///
/// # Examples
///
/// ```
/// use slot_lru::clock::ManualClock;
/// use slot_lru::config::SlotLruConfig;
/// use slot_lru::SlotLruCache;
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// let clock = Arc::new(ManualClock::new());
/// let config = SlotLruConfig::new(4).with_ttl(Duration::from_secs(1));
/// let mut cache: SlotLruCache<&str, i32, _, _> =
///     SlotLruCache::init_with_clock(config, None, Arc::clone(&clock)).unwrap();
///
/// cache.set("session", 7);
/// clock.advance(Duration::from_millis(999));
/// assert_eq!(cache.get(&"session"), Some(&7));
/// clock.advance(Duration::from_millis(1));
/// assert_eq!(cache.get(&"session"), None);
/// ```
#[derive(Debug, Default)]
pub struct ManualClock {
    nanos: AtomicU64,
}

impl ManualClock {
    /// Creates a clock reading zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves time forward by `step`.
    pub fn advance(&self, step: Duration) {
        let step = duration_nanos(step);
        let _ = self
            .nanos
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |now| {
                Some(now.saturating_add(step))
            });
    }

    /// Jumps to `at` past the origin. Earlier readings are ignored so the
    /// clock stays monotonic.
    pub fn set(&self, at: Duration) {
        self.nanos.fetch_max(duration_nanos(at), Ordering::AcqRel);
    }
}

impl Clock for ManualClock {
    #[inline]
    fn now_nanos(&self) -> u64 {
        self.nanos.load(Ordering::Acquire)
    }
}

/// Clock used when none is supplied.
#[cfg(feature = "std")]
pub type DefaultClock = MonotonicClock;

/// Clock used when none is supplied.
#[cfg(not(feature = "std"))]
pub type DefaultClock = ManualClock;
