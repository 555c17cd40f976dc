//! Atomic memory operation ALU.
//!
//! Implements the read-modify-write arithmetic for A-extension AMOs. Given the
//! word read from memory and the register source value, computes the word to
//! write back.

use crate::isa::Function;

/// Computes the write-back value of an AMO.
///
/// # Arguments
///
/// * `function` - The atomic operation
/// * `mem_val`  - The current value read from memory
/// * `reg_val`  - The value from the source register (rs2)
///
/// # Returns
///
/// The value to write back. LR returns 0 (it never writes back) and SC is not
/// combined here; it stores `reg_val` directly.
pub const fn atomic_alu(function: Function, mem_val: u32, reg_val: u32) -> u32 {
    let a = mem_val as i32;
    let b = reg_val as i32;
    match function {
        Function::AmoswapW => reg_val,
        Function::AmoaddW => mem_val.wrapping_add(reg_val),
        Function::AmoxorW => mem_val ^ reg_val,
        Function::AmoandW => mem_val & reg_val,
        Function::AmoorW => mem_val | reg_val,
        Function::AmominW => (if a < b { a } else { b }) as u32,
        Function::AmomaxW => (if a > b { a } else { b }) as u32,
        Function::AmominuW => if mem_val < reg_val { mem_val } else { reg_val },
        Function::AmomaxuW => if mem_val > reg_val { mem_val } else { reg_val },
        _ => 0,
    }
}
