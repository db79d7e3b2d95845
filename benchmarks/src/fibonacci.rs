//! # Fibonacci Benchmark
//!
//! The toolchain smoke test: a small program touching every part of the
//! runtime layer once. It copies a string through the heap, computes a
//! Fibonacci table in heap memory, and records counters, text and table
//! through the pad encoder.

use core::ptr::NonNull;

use rvbench_iopad::{PadWriter, Value};
use rvbench_memory::HeapAllocator;

use crate::BenchResult;

/// Number of Fibonacci values computed and recorded
pub const FIBO_LEN: usize = 10;

const MESSAGE: &str = "Fibonacci";

/// Compute the first `len` Fibonacci values into a heap-allocated table.
pub fn fibonacci(heap: &mut HeapAllocator<'_>, len: usize) -> BenchResult<NonNull<u32>> {
    let table = heap.alloc_array::<u32>(len)?;
    let t = table.as_ptr();
    unsafe {
        for i in 0..len {
            let value = match i {
                0 => 0,
                1 => 1,
                _ => t.add(i - 1).read().wrapping_add(t.add(i - 2).read()),
            };
            t.add(i).write(value);
        }
    }
    Ok(table)
}

/// Byte-wise comparison of a terminated heap string against `expected`.
///
/// Returns zero on a match, the difference of the first differing bytes
/// otherwise.
unsafe fn compare_terminated(copy: NonNull<u8>, expected: &str) -> i32 {
    let p = copy.as_ptr();
    for (i, &b) in expected.as_bytes().iter().enumerate() {
        let c = unsafe { p.add(i).read() };
        if c != b {
            return c as i32 - b as i32;
        }
    }
    unsafe { p.add(expected.len()).read() as i32 }
}

/// Run the benchmark, recording all results through `writer`.
///
/// Output sequence: start counter snapshots (`%d%d`), the message text
/// (`%s`), the string-comparison check word (`%d`, all-ones on a match),
/// the `FIBO_LEN` table values (`%d` each), elapsed cycles and instructions
/// (`%d%d`).
pub fn run(heap: &mut HeapAllocator<'_>, writer: &mut PadWriter<'_>) -> BenchResult<()> {
    log::debug!("fibonacci: {} values", FIBO_LEN);

    let start_time = rvbench_hal::cycles();
    let start_insn = rvbench_hal::instret();
    writer.emit("%d%d", &[Value::Word(start_time), Value::Word(start_insn)])?;

    writer.emit("%s", &[Value::Text(MESSAGE)])?;

    // Copy the message into a fresh heap block, then compare it back.
    let copy = heap.alloc(MESSAGE.len() + 1)?;
    let check = unsafe {
        core::ptr::copy_nonoverlapping(MESSAGE.as_ptr(), copy.as_ptr(), MESSAGE.len());
        copy.as_ptr().add(MESSAGE.len()).write(0);
        compare_terminated(copy, MESSAGE)
    };
    writer.emit("%d", &[Value::Word(!(check as u32))])?;

    let table = fibonacci(heap, FIBO_LEN)?;
    for i in 0..FIBO_LEN {
        let value = unsafe { table.as_ptr().add(i).read() };
        writer.emit("%d", &[Value::Word(value)])?;
    }

    let user_time = rvbench_hal::cycles().wrapping_sub(start_time);
    let user_insn = rvbench_hal::instret().wrapping_sub(start_insn);
    writer.emit("%d%d", &[Value::Word(user_time), Value::Word(user_insn)])?;

    #[cfg(feature = "verbose")]
    log::info!("fibonacci complete: pad bytes used = {}", writer.used());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rvbench_iopad::{PadAllocator, PadReader};
    use rvbench_memory::Region;

    const EXPECTED: [u32; FIBO_LEN] = [0, 1, 1, 2, 3, 5, 8, 13, 21, 34];

    #[test]
    fn test_table_values() {
        let mut buf = [0u8; 64];
        let mut heap = HeapAllocator::new(Region::from_slice(&mut buf));

        let table = fibonacci(&mut heap, FIBO_LEN).unwrap();
        for (i, &want) in EXPECTED.iter().enumerate() {
            assert_eq!(unsafe { table.as_ptr().add(i).read() }, want);
        }
    }

    #[test]
    fn test_run_stream_replays() {
        let mut heap_buf = [0u8; 256];
        let mut pad_buf = [0u8; 128];
        let mut heap = HeapAllocator::new(Region::from_slice(&mut heap_buf));
        let mut writer = PadWriter::new(PadAllocator::new(Region::from_slice(&mut pad_buf)));

        run(&mut heap, &mut writer).unwrap();
        let used = writer.used();
        drop(writer);

        let mut reader = PadReader::new(&pad_buf);
        let _start_time = reader.take_word().unwrap();
        let _start_insn = reader.take_word().unwrap();
        assert_eq!(reader.take_text(MESSAGE.len()).unwrap(), MESSAGE.as_bytes());
        // The heap copy matched, so the check word is all ones.
        assert_eq!(reader.take_word().unwrap(), u32::MAX);
        for &want in &EXPECTED {
            assert_eq!(reader.take_word().unwrap(), want);
        }
        let user_time = reader.take_word().unwrap();
        let user_insn = reader.take_word().unwrap();
        assert_eq!(reader.position(), used);

        // Host counters advance per snapshot, so elapsed values are
        // nonzero.
        assert!(user_time > 0);
        assert!(user_insn > 0);
    }

    #[test]
    fn test_run_reports_heap_exhaustion() {
        // Too small for the message copy and the table.
        let mut heap_buf = [0u8; 16];
        let mut pad_buf = [0u8; 128];
        let mut heap = HeapAllocator::new(Region::from_slice(&mut heap_buf));
        let mut writer = PadWriter::new(PadAllocator::new(Region::from_slice(&mut pad_buf)));

        let err = run(&mut heap, &mut writer).unwrap_err();
        assert_eq!(
            err,
            crate::BenchError::Memory(rvbench_memory::RegionError::CapacityExhausted)
        );
    }
}
