//! # rvbench Benchmarks
//!
//! The benchmark programs that exercise the runtime support layer. Each one
//! allocates its working set from the heap, brackets its main work with
//! counter snapshots, and records every result through the pad encoder; the
//! packed pad stream is the only observable output of a run.
//!
//! The benchmarks are library code. Wiring them to a boot path and linker
//! script is a platform concern that lives outside this workspace.

#![no_std]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod dhrystone;
pub mod fibonacci;

use rvbench_iopad::EmitError;
use rvbench_memory::RegionError;

/// Result type for benchmark runs
pub type BenchResult<T> = Result<T, BenchError>;

/// Benchmark error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BenchError {
    /// Heap or pad region failure
    Memory(RegionError),
    /// Result encoding failure
    Emit(EmitError),
}

impl From<RegionError> for BenchError {
    fn from(err: RegionError) -> Self {
        BenchError::Memory(err)
    }
}

impl From<EmitError> for BenchError {
    fn from(err: EmitError) -> Self {
        BenchError::Emit(err)
    }
}

/// Unwrap a benchmark outcome or halt the processor.
///
/// The runtime has no recoverable failures: an error here means the static
/// region sizing is wrong, and the run ends on a breakpoint trap. Pad
/// output written before the failure stays in place for inspection.
pub fn finish_or_trap<T>(result: BenchResult<T>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            log::error!("benchmark aborted: {:?}", err);
            rvbench_hal::breakpoint()
        }
    }
}
