//! # Pad Allocator
//!
//! Bump allocator over the pad region. Unlike the heap it does not round
//! requests up: sub-word writes are packed back to back so the output
//! stream stays dense, and alignment bytes are inserted only when a
//! word-sized value would otherwise start mid-word.
//!
//! The packing state is the alignment residue: how many bytes of the
//! current word have been consumed. Invariant: `residue < WORD_SIZE` after
//! every operation, reset to zero exactly when a word boundary is reached
//! or crossed.

use core::ptr::NonNull;

use spin::Once;

use rvbench_memory::region::{Region, PAD_BASE, PAD_CAPACITY};
use rvbench_memory::{MemoryResult, RegionError, WORD_SIZE};

/// Bump allocator for the pad region.
///
/// Single-writer, cursor-only state like the heap allocator, plus the
/// alignment residue that drives sub-word packing.
#[derive(Debug)]
pub struct PadAllocator<'a> {
    region: Region<'a>,
    used: usize,
    residue: usize,
}

impl<'a> PadAllocator<'a> {
    /// Create an allocator owning `region` with an empty cursor.
    pub fn new(region: Region<'a>) -> Self {
        PadAllocator {
            region,
            used: 0,
            residue: 0,
        }
    }

    /// Allocate `size` bytes from the pad.
    ///
    /// A request of at least one word is first aligned to the next word
    /// boundary if byte writes left the cursor mid-word; sub-word requests
    /// are packed with no padding at all.
    pub fn alloc(&mut self, size: usize) -> MemoryResult<NonNull<u8>> {
        let fill = if size >= WORD_SIZE && self.residue != 0 {
            WORD_SIZE - self.residue
        } else {
            0
        };
        let new_used = self
            .used
            .checked_add(fill)
            .and_then(|v| v.checked_add(size))
            .ok_or(RegionError::CapacityExhausted)?;

        if new_used > self.region.capacity() {
            log::error!(
                "pad exhausted: used={} request={} capacity={}",
                self.used,
                size,
                self.region.capacity()
            );
            return Err(RegionError::CapacityExhausted);
        }

        // The allocation sits at the end of the new cursor, after any
        // alignment fill.
        let block = unsafe { self.region.at(new_used - size) };
        self.used = new_used;
        self.residue = if size < WORD_SIZE && self.residue + size < WORD_SIZE {
            self.residue + size
        } else {
            0
        };
        Ok(block)
    }

    /// Bytes committed so far, alignment fill included
    #[inline]
    pub fn used(&self) -> usize {
        self.used
    }

    /// Bytes consumed within the current word unit
    #[inline]
    pub fn residue(&self) -> usize {
        self.residue
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

static PAD_CLAIM: Once<()> = Once::new();

/// Claim the fixed pad region and return its allocator.
///
/// At most one claim per process; a second returns
/// [`RegionError::AlreadyClaimed`].
///
/// # Safety
///
/// The process must be running on the target memory map, with
/// `[PAD_BASE, PAD_BASE + PAD_CAPACITY)` backed by RAM reserved for result
/// output.
pub unsafe fn claim_pad() -> MemoryResult<PadAllocator<'static>> {
    let mut first = false;
    PAD_CLAIM.call_once(|| first = true);
    if !first {
        return Err(RegionError::AlreadyClaimed);
    }

    log::debug!("pad region claimed: base={PAD_BASE:#x} capacity={PAD_CAPACITY}");
    let region = unsafe { Region::from_raw_parts(PAD_BASE as *mut u8, PAD_CAPACITY) };
    Ok(PadAllocator::new(region))
}
