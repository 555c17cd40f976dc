//! RV32 Tomasulo simulator library.
//!
//! This crate implements a cycle-level RV32IMA user-mode simulator built around
//! a dynamically scheduled core:
//! 1. **Core:** Tomasulo out-of-order engine with register renaming, reservation stations,
//!    a reorder buffer, a common data bus, and memory disambiguation.
//! 2. **Units:** ALU, multiply/divide, atomic and load/store helpers, and branch predictors.
//! 3. **ISA:** Decoding for RV32I/M/A; floating-point encodings are recognised and suppressed.
//! 4. **Memory:** A flat image/stack/TLS address space.
//! 5. **Simulation:** ELF loader, Linux system calls, configuration, and statistics.

/// Common types and constants (registers, errors, sizes, latencies).
pub mod common;
/// Simulator configuration (defaults, enums, hierarchical config structures).
pub mod config;
/// Out-of-order core and execution units.
pub mod core;
/// Instruction set (decode, instruction model, ABI, RV32I/M/A/F encodings).
pub mod isa;
/// ELF loader, system calls, and the simulation runner.
pub mod sim;
/// Guest memory model and traits.
pub mod soc;
/// Simulation statistics collection and reporting.
pub mod stats;

/// Error type shared by every fallible operation.
pub use crate::common::{Result, SimError};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// The out-of-order core.
pub use crate::core::Tomasulo;
/// Top-level runner; construct with `Simulator::from_elf`.
pub use crate::sim::Simulator;
