//! Fixed-capacity storage region shared by the producer and all readers.

use crate::scatter::Segment;
use std::cell::UnsafeCell;

/// Owned byte region addressed by storage index.
///
/// The store itself performs no synchronization. Exclusive access to each
/// segment is established by the cursor table: the producer only touches
/// bytes ahead of the write offset and behind `min_read + capacity`, while
/// readers only touch bytes between their read offset and the write offset.
/// Those ranges never overlap.
pub(crate) struct RingStore {
    cells: Box<[UnsafeCell<u8>]>,
}

// SAFETY: concurrent access is limited to disjoint segments, handed out under
// the ring lock (see the type-level docs). The lock also orders the
// producer's writes before any reader observes the matching commit.
unsafe impl Sync for RingStore {}

impl RingStore {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            cells: (0..capacity).map(|_| UnsafeCell::new(0)).collect(),
        }
    }

    #[inline]
    pub(crate) fn capacity(&self) -> usize {
        self.cells.len()
    }

    #[inline(always)]
    fn base(&self) -> *mut u8 {
        UnsafeCell::raw_get(self.cells.as_ptr())
    }

    /// # Safety
    /// No other live reference may cover any byte of `seg` for the duration
    /// of the returned borrow.
    #[inline]
    #[allow(clippy::mut_from_ref)]
    pub(crate) unsafe fn segment_mut(&self, seg: Segment) -> &mut [u8] {
        debug_assert!(seg.end() <= self.capacity());
        // SAFETY: in bounds (asserted above); exclusivity is the caller's contract.
        unsafe { std::slice::from_raw_parts_mut(self.base().add(seg.start), seg.len) }
    }

    /// # Safety
    /// No mutable reference may cover any byte of `seg` for the duration of
    /// the returned borrow.
    #[inline]
    pub(crate) unsafe fn segment(&self, seg: Segment) -> &[u8] {
        debug_assert!(seg.end() <= self.capacity());
        // SAFETY: in bounds (asserted above); no writer overlaps per the caller's contract.
        unsafe { std::slice::from_raw_parts(self.base().add(seg.start), seg.len) }
    }
}
