//! Memory trait for guest data and instruction accesses.
//!
//! This module defines the `Memory` trait the execution engine, loader, and
//! system-call layer talk to. It provides:
//! 1. **Integer Access:** Byte, half, and word reads with sign or zero extension, and writes.
//! 2. **Float Access:** Raw single-precision reads.
//! 3. **Bulk Access:** Borrowed byte slices, used to hand guest buffers to host system calls.
//!
//! Every method reports an unmapped or out-of-range access as `SimError::MemoryFault`.

use crate::common::Result;

/// Width of a single memory access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AccessWidth {
    /// 8-bit access.
    Byte,
    /// 16-bit access.
    Half,
    /// 32-bit access.
    Word,
}

impl AccessWidth {
    /// Number of bytes covered by an access of this width.
    pub const fn bytes(self) -> u32 {
        match self {
            Self::Byte => 1,
            Self::Half => 2,
            Self::Word => 4,
        }
    }

    /// Truncates `value` to this width and extends it back to 32 bits.
    ///
    /// # Arguments
    ///
    /// * `value` - Value to narrow.
    /// * `signed` - Sign-extend when `true`, zero-extend otherwise.
    pub const fn extend(self, value: u32, signed: bool) -> u32 {
        match (self, signed) {
            (Self::Byte, true) => value as u8 as i8 as i32 as u32,
            (Self::Byte, false) => value as u8 as u32,
            (Self::Half, true) => value as u16 as i16 as i32 as u32,
            (Self::Half, false) => value as u16 as u32,
            (Self::Word, _) => value,
        }
    }
}

/// Guest memory as seen by the core.
pub trait Memory {
    /// Reads an integer of `width` bytes at `addr` (little-endian).
    ///
    /// # Arguments
    ///
    /// * `addr` - Guest address.
    /// * `width` - Access width.
    /// * `signed` - Sign-extend sub-word values when `true`.
    fn read_integer(&self, addr: u32, width: AccessWidth, signed: bool) -> Result<u32>;

    /// Reads a single-precision float at `addr`.
    fn read_float(&self, addr: u32) -> Result<f32> {
        Ok(f32::from_bits(self.read_integer(addr, AccessWidth::Word, false)?))
    }

    /// Writes the low `width` bytes of `value` at `addr` (little-endian).
    fn write(&mut self, addr: u32, width: AccessWidth, value: u32) -> Result<()>;

    /// Borrows `len` bytes starting at `addr`.
    ///
    /// The range must lie entirely inside one mapped region.
    fn slice(&self, addr: u32, len: u32) -> Result<&[u8]>;

    /// Mutably borrows `len` bytes starting at `addr`.
    ///
    /// The range must lie entirely inside one mapped region.
    fn slice_mut(&mut self, addr: u32, len: u32) -> Result<&mut [u8]>;
}
