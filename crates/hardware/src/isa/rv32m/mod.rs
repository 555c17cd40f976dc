//! RV32M multiply/divide extension encodings.
//!
//! M instructions share `OP_REG` and are selected by `funct7 == M_EXTENSION`.

/// funct3 values selecting the multiply or divide operation.
pub mod funct3;
