//! ALU arithmetic operations.
//!
//! Two's-complement add and subtract; overflow wraps.

/// Wrapping addition.
#[inline]
pub const fn add(a: u32, b: u32) -> u32 {
    a.wrapping_add(b)
}

/// Wrapping subtraction.
#[inline]
pub const fn sub(a: u32, b: u32) -> u32 {
    a.wrapping_sub(b)
}
