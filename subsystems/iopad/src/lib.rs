//! # rvbench I/O Pad
//!
//! The pad is the sole channel through which benchmark results become
//! observable: a small fixed region that the benchmark fills with a packed
//! byte stream, and that an external harness reads back from memory after
//! the run halts.
//!
//! Three layers compose the crate:
//!
//! - [`alloc`]: bump allocator that packs sub-word writes tightly, padding
//!   only when a word-sized value needs alignment.
//! - [`emit`]: formatted encoder ([`PadWriter`]) turning directive strings
//!   and typed argument values into the packed stream.
//! - [`decode`]: harness-side reader ([`PadReader`]) that reconstructs the
//!   values by replaying the directive sequence that produced them.
//!
//! The stream carries no headers, tags or length prefixes. Producer and
//! consumer stay in lockstep only because both follow the same directive
//! sequence; that is why the encoder validates directives strictly instead
//! of skipping what it does not recognize.

#![no_std]
#![warn(missing_docs)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod alloc;
pub mod decode;
pub mod emit;

pub use alloc::PadAllocator;
pub use decode::{DecodeError, PadReader};
pub use emit::{EmitError, PadWriter, Value};
