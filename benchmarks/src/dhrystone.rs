//! # Dhrystone Benchmark
//!
//! The classic synthetic integer benchmark. The port keeps the published
//! procedure semantics intact so the verification values stay comparable:
//! the record pair comes from the heap allocator, the global program state
//! lives in one heap-allocated block instead of mutable statics, and every
//! result goes out through the pad encoder.

use core::mem;

use rvbench_iopad::{PadWriter, Value};
use rvbench_memory::HeapAllocator;

use crate::BenchResult;

/// Number of main-loop iterations
pub const NUMBER_OF_RUNS: u32 = 500;

/// Link value marking "no record"
const NIL: u32 = u32::MAX;

const STR_SOME: &str = "DHRYSTONE PROGRAM, SOME STRING";
const STR_FIRST: &str = "DHRYSTONE PROGRAM, 1'ST STRING";
const STR_SECOND: &str = "DHRYSTONE PROGRAM, 2'ND STRING";
const STR_THIRD: &str = "DHRYSTONE PROGRAM, 3'RD STRING";

/// The five-valued enumeration of the original program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
enum Enumeration {
    Ident1 = 0,
    Ident2 = 1,
    Ident3 = 2,
    Ident4 = 3,
    Ident5 = 4,
}

use Enumeration::{Ident1, Ident2, Ident3, Ident4, Ident5};

/// 30-character string plus terminator slot
#[derive(Debug, Clone, Copy)]
struct Str30([u8; 31]);

impl Str30 {
    fn new(s: &str) -> Self {
        let mut buf = [0u8; 31];
        buf[..s.len()].copy_from_slice(s.as_bytes());
        Str30(buf)
    }

    fn as_str(&self) -> &str {
        let len = self.0.iter().position(|&b| b == 0).unwrap_or(self.0.len());
        core::str::from_utf8(&self.0[..len]).unwrap_or("")
    }

    /// Lexicographic comparison of the terminated contents
    fn compare(&self, other: &Str30) -> i32 {
        for i in 0..self.0.len() {
            let (a, b) = (self.0[i], other.0[i]);
            if a != b {
                return a as i32 - b as i32;
            }
            if a == 0 {
                break;
            }
        }
        0
    }
}

/// The discriminated record, allocated twice from the heap.
///
/// Only the first variant arm of the original record is ever live, so its
/// fields sit directly in the struct. Records link to each other by index
/// into the heap-allocated pair, keeping the struct word-aligned on every
/// build target.
#[derive(Debug, Clone, Copy)]
struct Record {
    ptr_comp: u32,
    discr: Enumeration,
    enum_comp: Enumeration,
    int_comp: i32,
    string_comp: Str30,
}

impl Record {
    fn empty() -> Self {
        Record {
            ptr_comp: NIL,
            discr: Ident1,
            enum_comp: Ident1,
            int_comp: 0,
            string_comp: Str30::new(""),
        }
    }
}

/// The original's file-scope globals, gathered into one heap-allocated
/// block and threaded through the procedures explicitly.
struct DhryState {
    int_glob: i32,
    bool_glob: bool,
    ch_1_glob: u8,
    ch_2_glob: u8,
    arr_1_glob: [i32; 50],
    arr_2_glob: [[i32; 50]; 50],
    ptr_glob: u32,
    next_ptr_glob: u32,
}

/// Address a record link resolves to, as the harness sees it.
///
/// The original emitted the raw pointer cast to a word; the value is
/// implementation-dependent either way.
fn record_address(records: &[Record], idx: u32) -> u32 {
    if idx == NIL {
        return 0;
    }
    (records.as_ptr() as usize).wrapping_add(idx as usize * mem::size_of::<Record>()) as u32
}

// ============================================================================
// Procedures
// ============================================================================

fn proc_1(state: &mut DhryState, records: &mut [Record], ptr_val_par: u32) {
    let cur = ptr_val_par as usize;
    let next = records[cur].ptr_comp as usize;

    records[next] = records[state.ptr_glob as usize];
    records[cur].int_comp = 5;
    records[next].int_comp = records[cur].int_comp;
    records[next].ptr_comp = records[cur].ptr_comp;
    let mut link = records[next].ptr_comp;
    proc_3(state, records, &mut link);
    records[next].ptr_comp = link;

    if records[next].discr == Ident1 {
        records[next].int_comp = 6;
        let mut enum_ref = records[next].enum_comp;
        proc_6(state, records[cur].enum_comp, &mut enum_ref);
        records[next].enum_comp = enum_ref;
        records[next].ptr_comp = records[state.ptr_glob as usize].ptr_comp;
        let mut int_ref = records[next].int_comp;
        proc_7(records[next].int_comp, 10, &mut int_ref);
        records[next].int_comp = int_ref;
    } else {
        records[cur] = records[next];
    }
}

fn proc_2(state: &mut DhryState, int_par_ref: &mut i32) {
    let mut int_loc = *int_par_ref + 10;
    let mut enum_loc = Ident2;
    loop {
        if state.ch_1_glob == b'A' {
            int_loc -= 1;
            *int_par_ref = int_loc - state.int_glob;
            enum_loc = Ident1;
        }
        if enum_loc == Ident1 {
            break;
        }
    }
}

fn proc_3(state: &mut DhryState, records: &mut [Record], ptr_ref_par: &mut u32) {
    if state.ptr_glob != NIL {
        *ptr_ref_par = records[state.ptr_glob as usize].ptr_comp;
    }
    let pg = state.ptr_glob as usize;
    let mut int_ref = records[pg].int_comp;
    proc_7(10, state.int_glob, &mut int_ref);
    records[pg].int_comp = int_ref;
}

fn proc_4(state: &mut DhryState) {
    let bool_loc = state.ch_1_glob == b'A';
    state.bool_glob = bool_loc | state.bool_glob;
    state.ch_2_glob = b'B';
}

fn proc_5(state: &mut DhryState) {
    state.ch_1_glob = b'A';
    state.bool_glob = false;
}

fn proc_6(state: &mut DhryState, enum_val_par: Enumeration, enum_ref_par: &mut Enumeration) {
    *enum_ref_par = enum_val_par;
    if !func_3(enum_val_par) {
        *enum_ref_par = Ident4;
    }
    match enum_val_par {
        Ident1 => *enum_ref_par = Ident1,
        Ident2 => {
            *enum_ref_par = if state.int_glob > 100 { Ident1 } else { Ident4 };
        }
        Ident3 => *enum_ref_par = Ident2,
        Ident4 => {}
        Ident5 => *enum_ref_par = Ident3,
    }
}

fn proc_7(int_1_par_val: i32, int_2_par_val: i32, int_par_ref: &mut i32) {
    let int_loc = int_1_par_val + 2;
    *int_par_ref = int_2_par_val + int_loc;
}

fn proc_8(state: &mut DhryState, int_1_par_val: i32, int_2_par_val: i32) {
    let int_loc = (int_1_par_val + 5) as usize;
    state.arr_1_glob[int_loc] = int_2_par_val;
    state.arr_1_glob[int_loc + 1] = state.arr_1_glob[int_loc];
    state.arr_1_glob[int_loc + 30] = int_loc as i32;
    for int_index in int_loc..=int_loc + 1 {
        state.arr_2_glob[int_loc][int_index] = int_loc as i32;
    }
    state.arr_2_glob[int_loc][int_loc - 1] += 1;
    state.arr_2_glob[int_loc + 20][int_loc] = state.arr_1_glob[int_loc];
    state.int_glob = 5;
}

fn func_1(state: &mut DhryState, ch_1_par_val: u8, ch_2_par_val: u8) -> Enumeration {
    let ch_1_loc = ch_1_par_val;
    let ch_2_loc = ch_1_loc;
    if ch_2_loc != ch_2_par_val {
        Ident1
    } else {
        state.ch_1_glob = ch_1_loc;
        Ident2
    }
}

fn func_2(state: &mut DhryState, str_1_par_ref: &Str30, str_2_par_ref: &Str30) -> bool {
    let mut int_loc: usize = 2;
    let mut ch_loc: u8 = 0;
    while int_loc <= 2 {
        if func_1(state, str_1_par_ref.0[int_loc], str_2_par_ref.0[int_loc + 1]) == Ident1 {
            ch_loc = b'A';
            int_loc += 1;
        }
    }
    if (b'W'..b'Z').contains(&ch_loc) {
        int_loc = 7;
    }
    if ch_loc == b'R' {
        true
    } else if str_1_par_ref.compare(str_2_par_ref) > 0 {
        int_loc += 7;
        state.int_glob = int_loc as i32;
        true
    } else {
        false
    }
}

fn func_3(enum_par_val: Enumeration) -> bool {
    enum_par_val == Ident3
}

// ============================================================================
// Main Program
// ============================================================================

/// Run the benchmark, recording all results through `writer`.
///
/// Output sequence: the run count (`%d`), elapsed cycles and instructions
/// (`%d` each), then the verification values of the original in its exact
/// order (`%d`/`%c`/`%s` per value).
pub fn run(heap: &mut HeapAllocator<'_>, writer: &mut PadWriter<'_>) -> BenchResult<()> {
    log::debug!("dhrystone: {} runs", NUMBER_OF_RUNS);

    let state_ptr = heap.alloc_array::<DhryState>(1)?;
    // All-zero bytes are a valid initial state; the arrays are too large
    // to build on the stack first.
    unsafe { core::ptr::write_bytes(state_ptr.as_ptr(), 0, 1) };
    let state = unsafe { &mut *state_ptr.as_ptr() };

    let records_ptr = heap.alloc_array::<Record>(2)?;
    unsafe {
        records_ptr.as_ptr().write(Record::empty());
        records_ptr.as_ptr().add(1).write(Record::empty());
    }
    let records = unsafe { core::slice::from_raw_parts_mut(records_ptr.as_ptr(), 2) };

    state.ptr_glob = 0;
    state.next_ptr_glob = 1;
    records[0] = Record {
        ptr_comp: state.next_ptr_glob,
        discr: Ident1,
        enum_comp: Ident3,
        int_comp: 40,
        string_comp: Str30::new(STR_SOME),
    };
    let str_1_loc = Str30::new(STR_FIRST);
    let mut str_2_loc = Str30::new("");

    // Was missing in the published program; without it the cell read in
    // the verification pass is undefined.
    state.arr_2_glob[8][7] = 10;

    writer.emit("%d", &[Value::Word(NUMBER_OF_RUNS)])?;

    let begin_time = rvbench_hal::cycles();
    let begin_inst = rvbench_hal::instret();

    let mut int_1_loc: i32 = 0;
    let mut int_2_loc: i32 = 0;
    let mut int_3_loc: i32 = 0;
    let mut enum_loc = Ident2;

    for run_index in 1..=(NUMBER_OF_RUNS as i32) {
        proc_5(state);
        proc_4(state);
        int_1_loc = 2;
        int_2_loc = 3;
        str_2_loc = Str30::new(STR_SECOND);
        enum_loc = Ident2;
        state.bool_glob = !func_2(state, &str_1_loc, &str_2_loc);
        while int_1_loc < int_2_loc {
            int_3_loc = 5 * int_1_loc - int_2_loc;
            proc_7(int_1_loc, int_2_loc, &mut int_3_loc);
            int_1_loc += 1;
        }
        proc_8(state, int_1_loc, int_3_loc);
        proc_1(state, records, state.ptr_glob);
        let mut ch_index = b'A';
        while ch_index <= state.ch_2_glob {
            if enum_loc == func_1(state, ch_index, b'C') {
                proc_6(state, Ident1, &mut enum_loc);
                str_2_loc = Str30::new(STR_THIRD);
                int_2_loc = run_index;
                state.int_glob = run_index;
            }
            ch_index += 1;
        }
        int_2_loc *= int_1_loc;
        int_1_loc = int_2_loc / int_3_loc;
        int_2_loc = 7 * (int_2_loc - int_3_loc) - int_1_loc;
        proc_2(state, &mut int_1_loc);
    }

    let user_time = rvbench_hal::cycles().wrapping_sub(begin_time);
    let user_inst = rvbench_hal::instret().wrapping_sub(begin_inst);
    writer.emit("%d", &[Value::Word(user_time)])?;
    writer.emit("%d", &[Value::Word(user_inst)])?;

    // Verification values, in the original's emission order.
    let pg = state.ptr_glob as usize;
    let npg = state.next_ptr_glob as usize;
    writer.emit("%d", &[Value::Word(state.int_glob as u32)])?;
    writer.emit("%d", &[Value::Word(state.bool_glob as u32)])?;
    writer.emit("%c", &[Value::Char(state.ch_1_glob)])?;
    writer.emit("%c", &[Value::Char(state.ch_2_glob)])?;
    writer.emit("%d", &[Value::Word(state.arr_1_glob[8] as u32)])?;
    writer.emit("%d", &[Value::Word(state.arr_2_glob[8][7] as u32)])?;
    writer.emit("%d", &[Value::Word(record_address(records, records[pg].ptr_comp))])?;
    writer.emit("%d", &[Value::Word(records[pg].discr as u32)])?;
    writer.emit("%d", &[Value::Word(records[pg].enum_comp as u32)])?;
    writer.emit("%d", &[Value::Word(records[pg].int_comp as u32)])?;
    writer.emit("%s", &[Value::Text(records[pg].string_comp.as_str())])?;
    writer.emit("%d", &[Value::Word(record_address(records, records[npg].ptr_comp))])?;
    writer.emit("%d", &[Value::Word(records[npg].discr as u32)])?;
    writer.emit("%d", &[Value::Word(records[npg].enum_comp as u32)])?;
    writer.emit("%d", &[Value::Word(records[npg].int_comp as u32)])?;
    writer.emit("%s", &[Value::Text(records[npg].string_comp.as_str())])?;
    writer.emit("%d", &[Value::Word(int_1_loc as u32)])?;
    writer.emit("%d", &[Value::Word(int_2_loc as u32)])?;
    writer.emit("%d", &[Value::Word(int_3_loc as u32)])?;
    writer.emit("%d", &[Value::Word(enum_loc as u32)])?;
    writer.emit("%s", &[Value::Text(str_1_loc.as_str())])?;
    writer.emit("%s", &[Value::Text(str_2_loc.as_str())])?;

    #[cfg(feature = "verbose")]
    log::info!("dhrystone complete: pad bytes used = {}", writer.used());

    Ok(())
}
