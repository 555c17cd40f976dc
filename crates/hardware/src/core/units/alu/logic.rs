//! ALU logical and comparison operations.
//!
//! Bitwise OR/AND/XOR, signed and unsigned set-less-than, and the six
//! conditional-branch predicates.

use crate::isa::Function;

/// Bitwise OR.
#[inline]
pub const fn or(a: u32, b: u32) -> u32 {
    a | b
}

/// Bitwise AND.
#[inline]
pub const fn and(a: u32, b: u32) -> u32 {
    a & b
}

/// Bitwise XOR.
#[inline]
pub const fn xor(a: u32, b: u32) -> u32 {
    a ^ b
}

/// Signed less-than: 1 if `a < b`, else 0.
#[inline]
pub const fn slt(a: u32, b: u32) -> u32 {
    ((a as i32) < (b as i32)) as u32
}

/// Unsigned less-than: 1 if `a < b`, else 0.
#[inline]
pub const fn sltu(a: u32, b: u32) -> u32 {
    (a < b) as u32
}

/// Evaluates a conditional branch.
///
/// # Returns
///
/// `true` if the branch is taken. Non-branch functions return `false`.
pub const fn branch_taken(function: Function, a: u32, b: u32) -> bool {
    match function {
        Function::Beq => a == b,
        Function::Bne => a != b,
        Function::Blt => (a as i32) < (b as i32),
        Function::Bge => (a as i32) >= (b as i32),
        Function::Bltu => a < b,
        Function::Bgeu => a >= b,
        _ => false,
    }
}
