//! Construction Errors
//!
//! Building a cache is the only fallible step in this crate. Once a
//! [`SlotLruCache`](crate::SlotLruCache) exists, every runtime operation is
//! total: misses and expired entries are reported as `None`, never as errors.

use thiserror::Error;

/// Error returned when a cache is constructed with an unusable capacity.
///
/// # Examples
///
/// ```
/// use slot_lru::{CapacityError, SlotLruCache};
///
/// let err = SlotLruCache::<String, i32>::new(0).unwrap_err();
/// assert_eq!(err, CapacityError::Zero);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CapacityError {
    /// A capacity of zero slots was requested.
    #[error("cache capacity must be a positive integer")]
    Zero,

    /// The requested capacity cannot be addressed with 32-bit slot indices.
    #[error("cache capacity {requested} exceeds the maximum of {max} addressable slots")]
    TooLarge {
        /// Capacity that was asked for.
        requested: u64,
        /// Largest supported capacity.
        max: u64,
    },
}
