//! ALU shift operations.
//!
//! Only the low five bits of the shift amount are used.

/// Mask applied to shift amounts.
const SHAMT_MASK: u32 = 0x1F;

/// Shift left logical.
#[inline]
pub const fn sll(a: u32, b: u32) -> u32 {
    a << (b & SHAMT_MASK)
}

/// Shift right logical.
#[inline]
pub const fn srl(a: u32, b: u32) -> u32 {
    a >> (b & SHAMT_MASK)
}

/// Shift right arithmetic.
#[inline]
pub const fn sra(a: u32, b: u32) -> u32 {
    ((a as i32) >> (b & SHAMT_MASK)) as u32
}
