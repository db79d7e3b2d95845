//! # Heap Allocator
//!
//! Word-rounding bump allocator over the heap region. Every request is
//! rounded up to the next word multiple, so every block starts word-aligned
//! and the cursor only ever moves forward. There is no deallocation, no
//! reuse and no compaction.
//!
//! The allocator keeps no per-block metadata. The caller receives a raw
//! view into the region and is responsible for how it is used; the block is
//! not zero-initialized.

use core::mem;
use core::ptr::NonNull;

use spin::Once;

use crate::region::{Region, HEAP_BASE, HEAP_CAPACITY};
use crate::{MemoryResult, RegionError, WORD_SIZE};

/// Round `size` up to the next multiple of the word size.
///
/// Exact multiples are returned unchanged. `None` on arithmetic overflow,
/// which the allocator reports as exhaustion.
#[inline]
const fn round_to_word(size: usize) -> Option<usize> {
    match size.checked_add(WORD_SIZE - 1) {
        Some(v) => Some(v & !(WORD_SIZE - 1)),
        None => None,
    }
}

/// Bump allocator for the heap region.
///
/// Owns the region and the cursor; construct one per region and thread it
/// by `&mut` to whatever needs to allocate. The cursor is monotonically
/// non-decreasing for the lifetime of the process.
#[derive(Debug)]
pub struct HeapAllocator<'a> {
    region: Region<'a>,
    used: usize,
}

impl<'a> HeapAllocator<'a> {
    /// Create an allocator owning `region` with an empty cursor.
    pub fn new(region: Region<'a>) -> Self {
        HeapAllocator { region, used: 0 }
    }

    /// Allocate `size` bytes, rounded up to the next word boundary.
    ///
    /// Returns the start of the reserved block. A zero-size request
    /// reserves nothing and returns the current cursor position.
    pub fn alloc(&mut self, size: usize) -> MemoryResult<NonNull<u8>> {
        let rounded = round_to_word(size).ok_or(RegionError::CapacityExhausted)?;
        let new_used = self
            .used
            .checked_add(rounded)
            .ok_or(RegionError::CapacityExhausted)?;

        if new_used > self.region.capacity() {
            log::error!(
                "heap exhausted: used={} request={} capacity={}",
                self.used,
                size,
                self.region.capacity()
            );
            return Err(RegionError::CapacityExhausted);
        }

        // Block start is the cursor before this reservation.
        let block = unsafe { self.region.at(self.used) };
        self.used = new_used;
        Ok(block)
    }

    /// Allocate space for `len` values of `T`.
    ///
    /// `T` must not need more than word alignment; every heap block starts
    /// on a word boundary and nothing stronger is guaranteed.
    pub fn alloc_array<T>(&mut self, len: usize) -> MemoryResult<NonNull<T>> {
        debug_assert!(mem::align_of::<T>() <= WORD_SIZE);
        let size = mem::size_of::<T>()
            .checked_mul(len)
            .ok_or(RegionError::CapacityExhausted)?;
        Ok(self.alloc(size)?.cast())
    }

    /// Bytes committed so far (always a word multiple)
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bytes still available
    #[inline]
    pub fn remaining(&self) -> usize {
        self.region.capacity() - self.used
    }

    /// Region capacity in bytes
    #[inline]
    pub fn capacity(&self) -> usize {
        self.region.capacity()
    }
}

// ============================================================================
// Fixed-Region Claim
// ============================================================================

static HEAP_CLAIM: Once<()> = Once::new();

/// Claim the fixed heap region and return its allocator.
///
/// The region may be materialized at most once per process; a second claim
/// returns [`RegionError::AlreadyClaimed`]. This keeps the cursor in exactly
/// one place without hiding it in global state.
///
/// # Safety
///
/// The process must be running on the target memory map, with
/// `[HEAP_BASE, HEAP_BASE + HEAP_CAPACITY)` backed by RAM that nothing else
/// touches.
pub unsafe fn claim_heap() -> MemoryResult<HeapAllocator<'static>> {
    let mut first = false;
    HEAP_CLAIM.call_once(|| first = true);
    if !first {
        return Err(RegionError::AlreadyClaimed);
    }

    log::debug!("heap region claimed: base={HEAP_BASE:#x} capacity={HEAP_CAPACITY}");
    let region = unsafe { Region::from_raw_parts(HEAP_BASE as *mut u8, HEAP_CAPACITY) };
    Ok(HeapAllocator::new(region))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to_word() {
        assert_eq!(round_to_word(0), Some(0));
        assert_eq!(round_to_word(1), Some(4));
        assert_eq!(round_to_word(3), Some(4));
        assert_eq!(round_to_word(4), Some(4));
        assert_eq!(round_to_word(5), Some(8));
        assert_eq!(round_to_word(usize::MAX), None);
    }

    #[test]
    fn test_blocks_are_word_spaced() {
        let mut buf = [0u8; 32];
        let mut heap = HeapAllocator::new(Region::from_slice(&mut buf));

        // 3 rounds up to 4, so the second block lands exactly 4 bytes in.
        let a = heap.alloc(3).unwrap().as_ptr() as usize;
        let b = heap.alloc(1).unwrap().as_ptr() as usize;
        assert_eq!(b - a, 4);
        assert_eq!(heap.used(), 8);
    }

    #[test]
    fn test_blocks_stay_in_region_and_disjoint() {
        let mut buf = [0u8; 64];
        let base = buf.as_ptr() as usize;
        let mut heap = HeapAllocator::new(Region::from_slice(&mut buf));

        let sizes = [5usize, 1, 12, 8, 3];
        let mut prev_end = base;
        for &size in &sizes {
            let p = heap.alloc(size).unwrap().as_ptr() as usize;
            // Starts where the previous rounded block ended, never earlier.
            assert_eq!(p, prev_end);
            assert!(p + size <= base + 64);
            prev_end = p + round_to_word(size).unwrap();
        }
    }

    #[test]
    fn test_exact_fill_then_exhaustion() {
        let mut buf = [0u8; 16];
        let mut heap = HeapAllocator::new(Region::from_slice(&mut buf));

        assert!(heap.alloc(8).is_ok());
        assert!(heap.alloc(8).is_ok());
        assert_eq!(heap.remaining(), 0);

        // One more byte must fail and leave the cursor untouched.
        assert_eq!(heap.alloc(1), Err(RegionError::CapacityExhausted));
        assert_eq!(heap.used(), 16);
    }

    #[test]
    fn test_zero_size_reserves_nothing() {
        let mut buf = [0u8; 16];
        let mut heap = HeapAllocator::new(Region::from_slice(&mut buf));

        let a = heap.alloc(0).unwrap().as_ptr() as usize;
        let b = heap.alloc(4).unwrap().as_ptr() as usize;
        assert_eq!(a, b);
        assert_eq!(heap.used(), 4);
    }

    #[test]
    fn test_fixed_claim_is_single_shot() {
        // Claiming builds the allocator without touching the region, so
        // this is exercisable off-target; only writes need the real map.
        let first = unsafe { claim_heap() };
        assert!(first.is_ok());
        let second = unsafe { claim_heap() };
        assert_eq!(second.err(), Some(RegionError::AlreadyClaimed));
    }

    #[test]
    fn test_alloc_array_counts_bytes() {
        let mut buf = [0u8; 64];
        let base = buf.as_ptr() as usize;
        let mut heap = HeapAllocator::new(Region::from_slice(&mut buf));

        let _pad: NonNull<u8> = heap.alloc(1).unwrap();
        let table: NonNull<u32> = heap.alloc_array(10).unwrap();
        assert_eq!(heap.used(), 44);
        // Word-typed blocks start at word offsets even after a byte request.
        assert_eq!((table.as_ptr() as usize - base) % WORD_SIZE, 0);
    }
}
