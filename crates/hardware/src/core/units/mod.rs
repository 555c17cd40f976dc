//! Execution units and functional components.
//!
//! This module contains the functional units the out-of-order engine schedules
//! onto: the integer ALU, the multiply/divide unit, the load/store helpers, and
//! the branch direction predictors.

/// Arithmetic Logic Unit for integer operations.
pub mod alu;

/// Branch prediction unit.
pub mod bru;

/// Load/Store Unit helpers (access widths, AMO arithmetic).
pub mod lsu;

/// Multiply/Divide Unit (M extension).
pub mod mdu;
