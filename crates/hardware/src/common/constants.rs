//! Global System Constants.
//!
//! This module defines constants used across the simulator. It includes:
//! 1. **Architecture Constants:** Word and instruction sizes, register count.
//! 2. **Memory Layout Constants:** Stack, TLS, and heap headroom sizes for the flat guest address space.
//! 3. **Timing Constants:** Functional-unit and cache latencies of the out-of-order engine.

/// Size of a machine word in bytes.
pub const WORD_SIZE: u32 = 4;

/// Size of an uncompressed RV32 instruction in bytes.
pub const INSTRUCTION_SIZE: u32 = 4;

/// Number of architectural integer registers.
pub const NUM_REGS: usize = 32;

/// Canonical no-op encoding (`addi x0, x0, 0`).
pub const NOP: u32 = 0x0000_0013;

/// Size of the guest stack region in bytes (8 MiB).
///
/// The stack occupies the top of the 32-bit address space and grows down from
/// address zero with wrapping arithmetic.
pub const STACK_SIZE: u32 = 8 * 1024 * 1024;

/// Size of the thread-local storage window at address zero.
pub const TLS_SIZE: u32 = 0xFFFF;

/// Extra bytes mapped past the highest loaded segment for `.bss` and heap growth (8 MiB).
pub const HEAP_HEADROOM: u32 = 8 * 1024 * 1024;

/// Cycles a multiply spends in the MULDIV unit before its result is available.
pub const MUL_LATENCY: u32 = 4;

/// Cycles a divide or remainder spends in the MULDIV unit.
pub const DIV_LATENCY: u32 = 8;

/// Cycles a load spends in the memory unit after disambiguation.
pub const CACHE_LATENCY: u32 = 10;

/// Page size reported to the guest through `AT_PAGESZ`.
///
/// Zero: the flat memory model has no paging.
pub const GUEST_PAGE_SIZE: u32 = 0;
