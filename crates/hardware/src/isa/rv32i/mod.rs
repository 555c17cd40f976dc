//! RV32I base integer instruction set encodings.

/// funct3 values for loads, stores, branches, and integer arithmetic.
pub mod funct3;
/// funct7 values distinguishing ADD/SUB, SRL/SRA, and the M extension.
pub mod funct7;
/// Major opcodes.
pub mod opcodes;
