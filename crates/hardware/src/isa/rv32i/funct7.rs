//! RISC-V Base Integer (I) Function Codes (funct7).

/// Default encoding (ADD, SRL, and the logical ops).
pub const DEFAULT: u32 = 0b0000000;

/// Alternate encoding (SUB, SRA, SRAI).
pub const SUB_SRA: u32 = 0b0100000;

/// Integer multiply/divide (M extension) on `OP_REG`.
pub const M_EXTENSION: u32 = 0b0000001;
