//! Floating-point opcodes and CSRs.
//!
//! The core does not execute floating point. These encodings are recognised only
//! so fetch can suppress them to no-ops, and so the FP CSRs touched by libc
//! start-up code decode as no-ops rather than illegal instructions.

/// Floating-point load (FLW, FLD).
pub const OP_LOAD_FP: u32 = 0b0000111;
/// Floating-point store (FSW, FSD).
pub const OP_STORE_FP: u32 = 0b0100111;
/// Fused multiply-add.
pub const OP_FMADD: u32 = 0b1000011;
/// Fused multiply-subtract.
pub const OP_FMSUB: u32 = 0b1000111;
/// Negated fused multiply-subtract.
pub const OP_FNMSUB: u32 = 0b1001011;
/// Negated fused multiply-add.
pub const OP_FNMADD: u32 = 0b1001111;
/// Floating-point arithmetic and conversions.
pub const OP_FP: u32 = 0b1010011;

/// Accrued exception flags CSR.
pub const CSR_FFLAGS: u32 = 0x001;
/// Dynamic rounding mode CSR.
pub const CSR_FRM: u32 = 0x002;
/// Combined `frm` + `fflags` CSR.
pub const CSR_FCSR: u32 = 0x003;
