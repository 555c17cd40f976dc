//! Flat guest memory.
//!
//! This module implements the user-mode memory model the loader builds. It provides:
//! 1. **Image:** The loaded program segments plus headroom for `.bss` and the heap.
//! 2. **Stack:** The top `stack_size` bytes of the address space; the stack grows down from 0.
//! 3. **TLS:** A small window at address zero for thread-local storage.
//!
//! Regions are searched in that order; any access that no single region covers
//! entirely is a `SimError::MemoryFault`.

/// Contiguous region backing store.
pub mod region;

use self::region::Region;
use crate::common::{Result, SimError};
use crate::config::MemoryConfig;
use crate::soc::traits::{AccessWidth, Memory};

/// Region-based flat memory.
#[derive(Debug)]
pub struct FlatMemory {
    regions: Vec<Region>,
}

impl FlatMemory {
    /// Creates the standard user-mode layout.
    ///
    /// # Arguments
    ///
    /// * `layout` - Stack, TLS, and headroom sizes.
    /// * `image_base` - Lowest address of the program image.
    /// * `image_len` - Bytes spanned by the loaded segments (headroom is added on top).
    pub fn new(layout: &MemoryConfig, image_base: u32, image_len: u32) -> Self {
        let image_len = image_len.saturating_add(layout.heap_headroom);
        let stack_base = 0u32.wrapping_sub(layout.stack_size);
        tracing::debug!(
            image = format_args!("{image_base:#010x}+{image_len:#x}"),
            stack = format_args!("{stack_base:#010x}+{:#x}", layout.stack_size),
            tls = format_args!("0x0+{:#x}", layout.tls_size),
            "memory layout"
        );
        Self {
            regions: vec![
                Region::new("image", image_base, image_len),
                Region::new("stack", stack_base, layout.stack_size),
                Region::new("tls", 0, layout.tls_size),
            ],
        }
    }

    /// Creates memory from an explicit list of regions, searched in order.
    pub const fn from_regions(regions: Vec<Region>) -> Self {
        Self { regions }
    }

    /// Mapped regions in search order.
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    /// Copies `data` into memory starting at `addr`.
    pub fn load(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        let len = u32::try_from(data.len()).map_err(|_| SimError::MemoryFault { addr })?;
        self.slice_mut(addr, len)?.copy_from_slice(data);
        Ok(())
    }

    fn locate(&self, addr: u32, len: u32) -> Result<(usize, usize)> {
        self.regions
            .iter()
            .enumerate()
            .find_map(|(idx, region)| region.offset_of(addr, len).map(|off| (idx, off)))
            .ok_or(SimError::MemoryFault { addr })
    }
}

impl Memory for FlatMemory {
    fn read_integer(&self, addr: u32, width: AccessWidth, signed: bool) -> Result<u32> {
        let bytes = self.slice(addr, width.bytes())?;
        let mut word = [0u8; 4];
        word[..bytes.len()].copy_from_slice(bytes);
        Ok(width.extend(u32::from_le_bytes(word), signed))
    }

    fn write(&mut self, addr: u32, width: AccessWidth, value: u32) -> Result<()> {
        let len = width.bytes();
        let bytes = value.to_le_bytes();
        self.slice_mut(addr, len)?.copy_from_slice(&bytes[..len as usize]);
        Ok(())
    }

    fn slice(&self, addr: u32, len: u32) -> Result<&[u8]> {
        let (idx, off) = self.locate(addr, len)?;
        Ok(self.regions[idx].bytes(off, len as usize))
    }

    fn slice_mut(&mut self, addr: u32, len: u32) -> Result<&mut [u8]> {
        let (idx, off) = self.locate(addr, len)?;
        Ok(self.regions[idx].bytes_mut(off, len as usize))
    }
}
