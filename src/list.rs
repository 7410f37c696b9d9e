extern crate alloc;

use crate::slot::{IndexWidth, SlotIndex};
use alloc::boxed::Box;
use alloc::vec;
use core::mem;
use core::num::NonZeroUsize;

/// A doubly linked recency list threaded through fixed-size slot arrays.
///
/// Slots are plain integers in `0..cap`. For every live slot, `up[slot]` holds
/// its neighbour toward `top` (more recently used) and `down[slot]` its
/// neighbour toward `bottom` (less recently used). The link of the `top` slot
/// in the `up` direction, and of the `bottom` slot in the `down` direction,
/// are never read; ends are recognised by comparing against the cursors, so
/// every value of `I` is a usable slot and no sentinel is reserved.
///
/// Slots released by [`detach`](OrderList::detach) go onto a free-list stack
/// and are handed out again before any never-used slot. Because a slot is
/// always either live or on the free-list, the next never-used slot is simply
/// `len` whenever the free-list is empty.
///
/// All operations are O(1); nothing is ever shifted or reallocated after
/// construction.
pub(crate) struct OrderList<I> {
    cap: NonZeroUsize,
    len: usize,
    top: I,
    bottom: I,
    up: Box<[I]>,
    down: Box<[I]>,
    free: Box<[I]>,
    free_len: usize,
}

impl<I: SlotIndex> OrderList<I> {
    pub(crate) fn new(cap: NonZeroUsize) -> Self {
        OrderList {
            cap,
            len: 0,
            top: I::default(),
            bottom: I::default(),
            up: vec![I::default(); cap.get()].into_boxed_slice(),
            down: vec![I::default(); cap.get()].into_boxed_slice(),
            free: vec![I::default(); cap.get()].into_boxed_slice(),
            free_len: 0,
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        self.cap
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        self.len == self.cap.get()
    }

    #[cfg(test)]
    pub(crate) fn free_len(&self) -> usize {
        self.free_len
    }

    /// Most recently used slot.
    #[inline]
    pub(crate) fn top(&self) -> Option<usize> {
        (self.len > 0).then(|| self.top.slot())
    }

    /// Least recently used slot: the next eviction victim.
    #[inline]
    pub(crate) fn bottom(&self) -> Option<usize> {
        (self.len > 0).then(|| self.bottom.slot())
    }

    /// Neighbour of a live slot toward `bottom`, if it is not `bottom` itself.
    #[inline]
    pub(crate) fn below(&self, slot: usize) -> Option<usize> {
        (slot != self.bottom.slot()).then(|| self.down[slot].slot())
    }

    /// Allocates a slot and links it in as the new `top`.
    ///
    /// Reclaimed slots are reused before the arena is extended. The caller
    /// must ensure the list is not full.
    pub(crate) fn insert(&mut self) -> usize {
        debug_assert!(!self.is_full(), "insert into a full order list");
        let slot = if self.free_len > 0 {
            self.free_len -= 1;
            self.free[self.free_len].slot()
        } else {
            self.len
        };

        let idx = I::from_slot(slot);
        if self.len == 0 {
            self.bottom = idx;
        } else {
            self.down[slot] = self.top;
            self.up[self.top.slot()] = idx;
        }
        self.top = idx;
        self.len += 1;
        slot
    }

    /// Moves a live slot to `top` without touching any other entry.
    pub(crate) fn splay(&mut self, slot: usize) {
        let idx = I::from_slot(slot);
        if idx == self.top {
            return;
        }

        // Not top, so there are at least two entries and `up[slot]` is live.
        let above = self.up[slot];
        if idx == self.bottom {
            self.bottom = above;
        } else {
            let below = self.down[slot];
            self.up[below.slot()] = above;
            self.down[above.slot()] = below;
        }

        self.down[slot] = self.top;
        self.up[self.top.slot()] = idx;
        self.top = idx;
    }

    /// Unlinks a live slot and pushes it onto the free-list.
    pub(crate) fn detach(&mut self, slot: usize) {
        debug_assert!(self.len > 0, "detach from an empty order list");
        let idx = I::from_slot(slot);
        if self.len == 1 {
            self.top = I::default();
            self.bottom = I::default();
        } else if idx == self.top {
            self.top = self.down[slot];
        } else if idx == self.bottom {
            self.bottom = self.up[slot];
        } else {
            let above = self.up[slot];
            let below = self.down[slot];
            self.down[above.slot()] = below;
            self.up[below.slot()] = above;
        }

        self.len -= 1;
        self.free[self.free_len] = idx;
        self.free_len += 1;
    }

    /// Forgets every entry. The arrays keep their stale contents and are
    /// overwritten as slots are handed out again from zero.
    pub(crate) fn clear(&mut self) {
        self.top = I::default();
        self.bottom = I::default();
        self.len = 0;
        self.free_len = 0;
    }

    /// Bytes held by the link and free-list arrays.
    pub(crate) fn index_bytes(&self) -> usize {
        3 * self.cap.get() * mem::size_of::<I>()
    }
}

/// Dispatches an expression over whichever width an [`Order`] was built with.
macro_rules! with_list {
    ($order:expr, $list:ident => $body:expr) => {
        match $order {
            Order::U8($list) => $body,
            Order::U16($list) => $body,
            Order::U32($list) => $body,
        }
    };
}

/// An [`OrderList`] using the narrowest slot width for its capacity.
pub(crate) enum Order {
    U8(OrderList<u8>),
    U16(OrderList<u16>),
    U32(OrderList<u32>),
}

impl Order {
    pub(crate) fn new(cap: NonZeroUsize, width: IndexWidth) -> Self {
        match width {
            IndexWidth::U8 => Order::U8(OrderList::new(cap)),
            IndexWidth::U16 => Order::U16(OrderList::new(cap)),
            IndexWidth::U32 => Order::U32(OrderList::new(cap)),
        }
    }

    #[inline]
    pub(crate) fn width(&self) -> IndexWidth {
        match self {
            Order::U8(_) => IndexWidth::U8,
            Order::U16(_) => IndexWidth::U16,
            Order::U32(_) => IndexWidth::U32,
        }
    }

    #[inline]
    pub(crate) fn cap(&self) -> NonZeroUsize {
        with_list!(self, l => l.cap())
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        with_list!(self, l => l.len())
    }

    #[inline]
    pub(crate) fn is_full(&self) -> bool {
        with_list!(self, l => l.is_full())
    }

    #[cfg(test)]
    pub(crate) fn free_len(&self) -> usize {
        with_list!(self, l => l.free_len())
    }

    #[inline]
    pub(crate) fn top(&self) -> Option<usize> {
        with_list!(self, l => l.top())
    }

    #[inline]
    pub(crate) fn bottom(&self) -> Option<usize> {
        with_list!(self, l => l.bottom())
    }

    #[inline]
    pub(crate) fn below(&self, slot: usize) -> Option<usize> {
        with_list!(self, l => l.below(slot))
    }

    #[inline]
    pub(crate) fn insert(&mut self) -> usize {
        with_list!(self, l => l.insert())
    }

    #[inline]
    pub(crate) fn splay(&mut self, slot: usize) {
        with_list!(self, l => l.splay(slot))
    }

    #[inline]
    pub(crate) fn detach(&mut self, slot: usize) {
        with_list!(self, l => l.detach(slot))
    }

    #[inline]
    pub(crate) fn clear(&mut self) {
        with_list!(self, l => l.clear())
    }

    #[inline]
    pub(crate) fn index_bytes(&self) -> usize {
        with_list!(self, l => l.index_bytes())
    }

    /// Live slots from most to least recently used.
    pub(crate) fn iter(&self) -> Slots<'_> {
        Slots {
            order: self,
            next: self.top(),
            remaining: self.len(),
        }
    }
}

/// Iterator over live slots, `top` first.
pub(crate) struct Slots<'a> {
    order: &'a Order,
    next: Option<usize>,
    remaining: usize,
}

impl Iterator for Slots<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let slot = self.next?;
        self.remaining -= 1;
        self.next = if self.remaining == 0 {
            None
        } else {
            self.order.below(slot)
        };
        Some(slot)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use std::vec::Vec;

    fn order(cap: usize) -> Order {
        let cap = NonZeroUsize::new(cap).unwrap();
        Order::new(cap, IndexWidth::for_capacity(cap.get()).unwrap())
    }

    fn slots(order: &Order) -> Vec<usize> {
        order.iter().collect()
    }

    #[test]
    fn test_insert_links_new_slots_at_top() {
        let mut list = order(4);
        assert_eq!(list.top(), None);
        assert_eq!(list.bottom(), None);
        assert_eq!(list.insert(), 0);
        assert_eq!(list.insert(), 1);
        assert_eq!(list.insert(), 2);
        assert_eq!(slots(&list), [2, 1, 0]);
        assert_eq!(list.top(), Some(2));
        assert_eq!(list.bottom(), Some(0));
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_splay_middle_top_and_bottom() {
        let mut list = order(4);
        for _ in 0..4 {
            list.insert();
        }
        assert_eq!(slots(&list), [3, 2, 1, 0]);

        list.splay(3);
        assert_eq!(slots(&list), [3, 2, 1, 0]);

        list.splay(1);
        assert_eq!(slots(&list), [1, 3, 2, 0]);

        list.splay(0);
        assert_eq!(slots(&list), [0, 1, 3, 2]);
        assert_eq!(list.bottom(), Some(2));
        assert_eq!(list.top(), Some(0));
    }

    #[test]
    fn test_detach_each_position() {
        let mut list = order(5);
        for _ in 0..5 {
            list.insert();
        }

        list.detach(2);
        assert_eq!(slots(&list), [4, 3, 1, 0]);
        list.detach(4);
        assert_eq!(slots(&list), [3, 1, 0]);
        list.detach(0);
        assert_eq!(slots(&list), [3, 1]);
        assert_eq!(list.free_len(), 3);
        list.detach(3);
        list.detach(1);
        assert_eq!(list.len(), 0);
        assert_eq!(list.top(), None);
        assert_eq!(list.bottom(), None);
        assert_eq!(list.free_len(), 5);
    }

    #[test]
    fn test_free_list_reused_before_fresh_slots() {
        let mut list = order(4);
        list.insert();
        list.insert();
        list.insert();
        list.detach(1);
        list.detach(0);

        // LIFO reuse of reclaimed slots, then the first never-used slot.
        assert_eq!(list.insert(), 0);
        assert_eq!(list.insert(), 1);
        assert_eq!(list.insert(), 3);
        assert!(list.is_full());
        assert_eq!(slots(&list), [3, 1, 0, 2]);
    }

    #[test]
    fn test_clear_restarts_from_slot_zero() {
        let mut list = order(3);
        list.insert();
        list.insert();
        list.detach(0);
        list.clear();
        assert_eq!(list.len(), 0);
        assert_eq!(list.free_len(), 0);
        assert_eq!(list.insert(), 0);
        assert_eq!(slots(&list), [0]);
    }

    #[test]
    fn test_single_slot_list() {
        let mut list = order(1);
        let slot = list.insert();
        assert!(list.is_full());
        list.splay(slot);
        assert_eq!(list.top(), list.bottom());
        list.detach(slot);
        assert_eq!(list.insert(), 0);
    }

    #[test]
    fn test_full_u8_range_is_addressable() {
        let mut list = order(256);
        assert_eq!(list.width(), IndexWidth::U8);
        for expected in 0..256 {
            assert_eq!(list.insert(), expected);
        }
        assert_eq!(list.top(), Some(255));
        assert_eq!(list.bottom(), Some(0));
        list.splay(0);
        assert_eq!(list.top(), Some(0));
        assert_eq!(list.bottom(), Some(1));
        assert_eq!(list.iter().count(), 256);
    }

    #[test]
    fn test_width_and_index_bytes() {
        assert_eq!(order(200).width(), IndexWidth::U8);
        assert_eq!(order(200).index_bytes(), 600);
        assert_eq!(order(300).width(), IndexWidth::U16);
        assert_eq!(order(300).index_bytes(), 1800);
        assert_eq!(order(70_000).width(), IndexWidth::U32);
        assert_eq!(order(70_000).index_bytes(), 840_000);
    }
}
