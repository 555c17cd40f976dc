//! Instruction Set Architecture (ISA) Definitions.
//!
//! Contains opcodes, function codes, the decoded instruction model, and the
//! decoder, organized by RISC-V extension.
//!
//! # Extensions
//!
//! * `rv32i`: Base Integer Instruction Set (32-bit).
//! * `rv32m`: Standard Extension for Integer Multiplication and Division.
//! * `rv32a`: Standard Extension for Atomic Instructions (word AMOs).
//! * `rv32f`: Floating-point opcodes, recognised only to be suppressed.

/// Application Binary Interface (ABI) register name mappings.
pub mod abi;

/// Instruction decoding logic for all RV32 instruction formats.
pub mod decode;

/// Decoded instruction model and bit extraction utilities.
pub mod instruction;

/// Atomic memory operations extension (AMO instructions).
pub mod rv32a;

/// Floating-point opcodes and CSR numbers.
pub mod rv32f;

/// Base integer instruction set.
pub mod rv32i;

/// Integer multiply/divide extension (MUL, DIV, REM instructions).
pub mod rv32m;

pub use decode::decode;
pub use instruction::{Function, Instruction, Opcode};
