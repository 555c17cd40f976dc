//! Load/Store Unit (LSU) helpers.
//!
//! This module provides the pieces of the memory pipeline that do not depend
//! on engine state:
//! - [`atomic`]: Read-modify-write ALU for the A extension.
//! - [`Lsu::access`]: Width and signedness of each load, store, and AMO.

/// Atomic memory operation ALU (RISC-V A extension).
pub mod atomic;

use crate::isa::Function;
use crate::soc::traits::AccessWidth;

/// Load/Store Unit for memory operations.
#[derive(Clone, Copy, Debug, Default)]
pub struct Lsu;

impl Lsu {
    /// Width and sign extension of the memory access performed by `function`.
    ///
    /// Unknown functions default to an unsigned word.
    pub const fn access(function: Function) -> (AccessWidth, bool) {
        match function {
            Function::Lb => (AccessWidth::Byte, true),
            Function::Lbu | Function::Sb => (AccessWidth::Byte, false),
            Function::Lh => (AccessWidth::Half, true),
            Function::Lhu | Function::Sh => (AccessWidth::Half, false),
            _ => (AccessWidth::Word, false),
        }
    }

    /// Performs an atomic ALU operation. See [`atomic::atomic_alu`].
    #[inline]
    pub const fn atomic(function: Function, mem_val: u32, reg_val: u32) -> u32 {
        atomic::atomic_alu(function, mem_val, reg_val)
    }
}
