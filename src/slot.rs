//! Slot Index Widths
//!
//! Every entry in a [`SlotLruCache`](crate::SlotLruCache) lives at a fixed
//! *slot*: an integer in `0..capacity` shared by the key, value and deadline
//! arrays. The recency list and free-list store slot numbers, so for caches
//! of many small values those link arrays dominate the footprint.
//!
//! The width of a slot number is picked once, at construction, as the
//! narrowest unsigned integer able to address `capacity - 1`:
//!
//! | Capacity              | Width  | Link bytes per slot |
//! |-----------------------|--------|---------------------|
//! | `1..=256`             | `u8`   | 3                   |
//! | `257..=65_536`        | `u16`  | 6                   |
//! | `65_537..=2^32`       | `u32`  | 12                  |
//!
//! Anything above `2^32` slots is rejected with
//! [`CapacityError::TooLarge`].

use crate::error::CapacityError;
use core::fmt;

/// Largest capacity a cache can be built with: every slot must be
/// addressable by a `u32`.
pub const MAX_CAPACITY: u64 = 1 << 32;

/// Integer width used for slot numbers in the link and free-list arrays.
///
/// # Examples
///
/// ```
/// use slot_lru::IndexWidth;
///
/// assert_eq!(IndexWidth::for_capacity(256).unwrap(), IndexWidth::U8);
/// assert_eq!(IndexWidth::for_capacity(257).unwrap(), IndexWidth::U16);
/// assert_eq!(IndexWidth::for_capacity(65_537).unwrap(), IndexWidth::U32);
/// assert!(IndexWidth::for_capacity(0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IndexWidth {
    /// 8-bit slots, up to 256 entries.
    U8,
    /// 16-bit slots, up to 65,536 entries.
    U16,
    /// 32-bit slots, up to 4,294,967,296 entries.
    U32,
}

impl IndexWidth {
    /// Selects the narrowest width able to address `capacity` slots.
    pub fn for_capacity(capacity: usize) -> Result<Self, CapacityError> {
        let requested = capacity as u64;
        if requested == 0 {
            return Err(CapacityError::Zero);
        }
        if requested <= IndexWidth::U8.max_capacity() {
            Ok(IndexWidth::U8)
        } else if requested <= IndexWidth::U16.max_capacity() {
            Ok(IndexWidth::U16)
        } else if requested <= IndexWidth::U32.max_capacity() {
            Ok(IndexWidth::U32)
        } else {
            Err(CapacityError::TooLarge {
                requested,
                max: MAX_CAPACITY,
            })
        }
    }

    /// Number of bits in one slot number.
    #[inline]
    pub fn bits(self) -> u32 {
        match self {
            IndexWidth::U8 => u8::BITS,
            IndexWidth::U16 => u16::BITS,
            IndexWidth::U32 => u32::BITS,
        }
    }

    /// Largest capacity addressable with this width.
    #[inline]
    pub fn max_capacity(self) -> u64 {
        1u64 << self.bits()
    }
}

impl fmt::Display for IndexWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "u{}", self.bits())
    }
}

/// Unsigned integer type usable as a slot number.
///
/// Conversions are only ever performed on slots below the list's capacity,
/// which [`IndexWidth::for_capacity`] guarantees fit the chosen type.
pub(crate) trait SlotIndex: Copy + Default + Eq + fmt::Debug {
    /// Narrows an in-range slot number.
    fn from_slot(slot: usize) -> Self;

    /// Widens back to `usize`.
    fn slot(self) -> usize;
}

macro_rules! impl_slot_index {
    ($($t:ty),*) => {
        $(
            impl SlotIndex for $t {
                #[inline(always)]
                #[allow(clippy::cast_possible_truncation)]
                fn from_slot(slot: usize) -> Self {
                    debug_assert!(slot <= <$t>::MAX as usize);
                    slot as $t
                }

                #[inline(always)]
                fn slot(self) -> usize {
                    self as usize
                }
            }
        )*
    };
}

impl_slot_index!(u8, u16, u32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_boundaries() {
        assert_eq!(IndexWidth::for_capacity(1), Ok(IndexWidth::U8));
        assert_eq!(IndexWidth::for_capacity(256), Ok(IndexWidth::U8));
        assert_eq!(IndexWidth::for_capacity(257), Ok(IndexWidth::U16));
        assert_eq!(IndexWidth::for_capacity(65_536), Ok(IndexWidth::U16));
        assert_eq!(IndexWidth::for_capacity(65_537), Ok(IndexWidth::U32));
    }

    #[test]
    fn test_zero_capacity_rejected() {
        assert_eq!(IndexWidth::for_capacity(0), Err(CapacityError::Zero));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_capacity_beyond_u32_rejected() {
        assert_eq!(
            IndexWidth::for_capacity(1 << 32),
            Ok(IndexWidth::U32),
            "2^32 slots are still addressable"
        );
        assert_eq!(
            IndexWidth::for_capacity((1 << 32) + 1),
            Err(CapacityError::TooLarge {
                requested: (1 << 32) + 1,
                max: MAX_CAPACITY,
            })
        );
    }

    #[test]
    fn test_slot_index_round_trip_at_limits() {
        assert_eq!(<u8 as SlotIndex>::from_slot(255).slot(), 255);
        assert_eq!(<u16 as SlotIndex>::from_slot(65_535).slot(), 65_535);
        assert_eq!(<u32 as SlotIndex>::from_slot(70_000).slot(), 70_000);
    }

    #[test]
    fn test_width_bits_and_display() {
        assert_eq!(IndexWidth::U8.bits(), 8);
        assert_eq!(IndexWidth::U16.bits(), 16);
        assert_eq!(IndexWidth::U32.bits(), 32);
        assert_eq!(IndexWidth::U32.max_capacity(), MAX_CAPACITY);
        extern crate alloc;
        use alloc::format;
        assert_eq!(format!("{}", IndexWidth::U16), "u16");
    }
}
