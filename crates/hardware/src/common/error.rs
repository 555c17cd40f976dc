//! Simulator error definitions.
//!
//! This module defines every fatal condition the simulator can report. It provides:
//! 1. **Guest Faults:** Illegal encodings, unmapped accesses, divide faults, and unknown syscalls.
//! 2. **Engine Faults:** Stale reorder-buffer tags that indicate a bookkeeping bug.
//! 3. **Host Errors:** ELF parsing, I/O, and configuration errors wrapped from their sources.
//!
//! None of these are recoverable: they propagate with `?` up to the runner, which
//! reports them and stops. Hazards and stalls are never errors, and a guest `exit`
//! is a normal outcome rather than a `SimError`.

use thiserror::Error;

use crate::core::tomasulo::tag::RobTag;

/// Fatal simulator error.
#[derive(Debug, Error)]
pub enum SimError {
    /// The word at `pc` is not an instruction this core implements.
    #[error("illegal instruction {raw:#010x} at pc {pc:#010x}")]
    IllegalInstruction {
        /// Raw instruction encoding.
        raw: u32,
        /// Address the word was fetched from.
        pc: u32,
    },

    /// A guest access fell outside every mapped region.
    #[error("memory fault at address {addr:#010x}")]
    MemoryFault {
        /// Faulting guest address.
        addr: u32,
    },

    /// The guest invoked a system call the handler does not implement.
    #[error("unimplemented system call {0}")]
    UnimplementedSyscall(u32),

    /// Division by zero or `i32::MIN / -1` in DIV/DIVU/REM/REMU.
    ///
    /// The engine performs truncating host division with no RISC-V
    /// divide-by-zero convention; the inputs native division would trap on are
    /// reported here instead.
    #[error("divide fault in instruction at pc {pc:#010x}")]
    DivideFault {
        /// Address of the faulting divide instruction.
        pc: u32,
    },

    /// A reorder-buffer tag outlived its entry.
    #[error("stale reorder buffer tag {0}")]
    StaleTag(RobTag),

    /// The executable could not be parsed.
    #[error("ELF error: {0}")]
    Elf(#[from] object::read::Error),

    /// Host I/O failure (reading the executable or a config file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON configuration was malformed.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// The executable parsed but cannot run on this machine.
    #[error("invalid image: {0}")]
    InvalidImage(String),
}

/// Result alias used throughout the simulator.
pub type Result<T> = std::result::Result<T, SimError>;
