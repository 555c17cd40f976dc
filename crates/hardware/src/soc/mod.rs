//! System-on-Chip (SoC) Components.
//!
//! This module holds the guest memory model: the `Memory` trait the core
//! accesses memory through, and the flat region-based implementation backing it.

/// Flat guest memory built from image, stack, and TLS regions.
pub mod memory;

/// Memory trait definitions.
pub mod traits;

pub use memory::FlatMemory;
pub use traits::{AccessWidth, Memory};
