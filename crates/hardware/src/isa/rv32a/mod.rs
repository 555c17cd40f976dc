//! RV32A atomic extension encodings.
//!
//! Only word-width AMOs (`funct3 == WIDTH_W`) exist on RV32.

/// funct5 values selecting the atomic operation.
pub mod funct5;

/// funct3 value of every word-width AMO.
pub const WIDTH_W: u32 = 0b010;
