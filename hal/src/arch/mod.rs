//! # Architecture Dispatch
//!
//! One module per supported architecture; `imp` aliases the one compiled
//! for the current target.

#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub mod riscv;
#[cfg(any(target_arch = "riscv32", target_arch = "riscv64"))]
pub(crate) use riscv as imp;

#[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
pub mod host;
#[cfg(not(any(target_arch = "riscv32", target_arch = "riscv64")))]
pub(crate) use host as imp;
