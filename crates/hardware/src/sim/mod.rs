//! Simulation utilities, program loading, and system calls.
//!
//! Provides the ELF loader that builds guest memory and the initial stack, the
//! Linux system-call layer ECALL retires through, and the `Simulator` runner.

pub mod loader;
pub mod simulator;
pub mod syscall;

pub use self::simulator::{RunOutcome, Simulator};
