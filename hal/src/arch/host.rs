//! # Host Fallback
//!
//! Synthetic counters for off-target builds. Snapshots advance by a fixed
//! step per read, so intervals are nonzero and strictly increasing the way
//! benchmark code expects; the breakpoint trap becomes a panic the test
//! harness can observe.

use core::sync::atomic::{AtomicU32, Ordering};

/// Counter advance per snapshot read
const COUNTER_STEP: u32 = 100;

static CYCLES: AtomicU32 = AtomicU32::new(0);
static INSTRET: AtomicU32 = AtomicU32::new(0);

/// Read the synthetic cycle counter
#[inline]
pub fn read_cycle() -> u32 {
    CYCLES.fetch_add(COUNTER_STEP, Ordering::Relaxed)
}

/// Read the synthetic retired-instruction counter
#[inline]
pub fn read_instret() -> u32 {
    INSTRET.fetch_add(COUNTER_STEP, Ordering::Relaxed)
}

/// Breakpoint stand-in; panics instead of halting the machine.
pub fn breakpoint() -> ! {
    panic!("breakpoint trap");
}
