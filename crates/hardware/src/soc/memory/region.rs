//! Contiguous guest memory region.
//!
//! A `Region` is a zero-initialised byte buffer mapped at a fixed guest base
//! address. Offsets are computed with wrapping arithmetic so a region may end
//! exactly at the top of the 32-bit address space (the stack does).

use std::fmt;

/// A zero-initialised byte buffer mapped at `base`.
pub struct Region {
    name: &'static str,
    base: u32,
    data: Vec<u8>,
}

impl Region {
    /// Creates a region of `len` zero bytes mapped at `base`.
    ///
    /// # Arguments
    ///
    /// * `name` - Short label used in logs (e.g. `"stack"`).
    /// * `base` - First guest address covered.
    /// * `len` - Size in bytes.
    pub fn new(name: &'static str, base: u32, len: u32) -> Self {
        Self {
            name,
            base,
            data: vec![0; len as usize],
        }
    }

    /// Label used in logs.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// First guest address covered by the region.
    pub const fn base(&self) -> u32 {
        self.base
    }

    /// Size of the region in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the region has no bytes.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the buffer offset of `[addr, addr + len)` if the whole range is covered.
    pub fn offset_of(&self, addr: u32, len: u32) -> Option<usize> {
        let offset = addr.wrapping_sub(self.base) as usize;
        (offset + len as usize <= self.data.len()).then_some(offset)
    }

    /// Borrows `len` bytes at buffer offset `offset`.
    pub fn bytes(&self, offset: usize, len: usize) -> &[u8] {
        &self.data[offset..offset + len]
    }

    /// Mutably borrows `len` bytes at buffer offset `offset`.
    pub fn bytes_mut(&mut self, offset: usize, len: usize) -> &mut [u8] {
        &mut self.data[offset..offset + len]
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Region")
            .field("name", &self.name)
            .field("base", &format_args!("{:#010x}", self.base))
            .field("len", &self.data.len())
            .finish()
    }
}
