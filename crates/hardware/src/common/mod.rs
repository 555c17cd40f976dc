//! Common types shared across the simulator.
//!
//! This module collects the building blocks every other layer depends on. It includes:
//! 1. **Constants:** Word size, memory layout, and functional-unit latencies.
//! 2. **Error Handling:** The fatal `SimError` taxonomy and the crate `Result` alias.
//! 3. **Register Management:** The architectural integer register file and program counter.

/// Simulator-wide constants.
pub mod constants;

/// Error types.
pub mod error;

/// Architectural register file.
pub mod reg;

pub use error::{Result, SimError};
pub use reg::RegisterFile;
