//! Architectural Register File.
//!
//! This module provides the `RegisterFile` struct holding the committed integer state
//! of the hart. It provides:
//! 1. **Storage:** The program counter and 32 general-purpose registers.
//! 2. **Hardwired Zero:** Reads of `x0` return 0 and writes to it are dropped.
//! 3. **Naming:** ABI names and a full snapshot for error reports.
//!
//! Only the commit unit writes here; speculative values live in the reorder buffer.

use super::constants::NUM_REGS;

/// ABI names of the integer registers, indexed by register number.
const ABI_NAMES: [&str; NUM_REGS] = [
    "zero", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// Committed architectural state: program counter plus integer registers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    /// Architectural program counter; fetch redirects here after a squash.
    pub pc: u32,
    gpr: [u32; NUM_REGS],
}

impl RegisterFile {
    /// Creates a register file with every register and the pc set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Register `x0` always returns 0.
    ///
    /// # Returns
    ///
    /// The 32-bit value stored in the register.
    #[inline]
    pub fn read(&self, idx: usize) -> u32 {
        if idx == 0 { 0 } else { self.gpr[idx & (NUM_REGS - 1)] }
    }

    /// Writes a general-purpose register.
    ///
    /// # Arguments
    ///
    /// * `idx` - Register index (0-31). Writes to `x0` are ignored.
    /// * `val` - The 32-bit value to write.
    #[inline]
    pub fn write(&mut self, idx: usize, val: u32) {
        if idx != 0 {
            self.gpr[idx & (NUM_REGS - 1)] = val;
        }
    }

    /// Returns a copy of all 32 registers (`x0` included, always zero).
    pub const fn snapshot(&self) -> [u32; NUM_REGS] {
        self.gpr
    }

    /// Returns the ABI name of register `idx` (e.g. `"a0"` for 10).
    pub fn abi_name(idx: usize) -> &'static str {
        ABI_NAMES[idx & (NUM_REGS - 1)]
    }
}
