//! Reservation stations.
//!
//! A `Station` holds one issued instruction until its operands resolve and its
//! functional unit finishes it. The same record serves as a load-buffer entry:
//! there `a` is the effective address and `k` carries an AMO's source operand.

use super::tag::RobTag;
use crate::isa::{Instruction, Opcode};

/// A source operand: either a value or the tag of the instruction producing it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Value is available.
    Ready(u32),
    /// Waiting for the CDB message carrying this tag.
    Pending(RobTag),
}

impl Operand {
    /// The value, if resolved.
    #[inline]
    pub const fn value(self) -> Option<u32> {
        match self {
            Self::Ready(v) => Some(v),
            Self::Pending(_) => None,
        }
    }

    /// Returns `true` if the operand holds a value.
    #[inline]
    pub const fn is_ready(self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Replaces a pending reference to `tag` with `value`.
    #[inline]
    pub fn resolve(&mut self, tag: RobTag, value: u32) {
        if *self == Self::Pending(tag) {
            *self = Self::Ready(value);
        }
    }
}

/// Reservation-station pool an instruction is dispatched to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Pool {
    /// Integer, branch, jump, system, LUI/AUIPC, and fence.
    Alu,
    /// Multiply, divide, and remainder.
    MulDiv,
    /// Address generation for loads, stores, and atomics.
    Address,
}

impl Pool {
    /// Selects the pool for `inst`.
    pub const fn for_instruction(inst: &Instruction) -> Self {
        match inst.opcode {
            Opcode::Load | Opcode::Store | Opcode::Amo => Self::Address,
            _ if inst.function.is_multiply() || inst.function.is_divide() => Self::MulDiv,
            _ => Self::Alu,
        }
    }
}

/// A reservation-station (or load-buffer) entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Station {
    /// The instruction being executed.
    pub inst: Instruction,
    /// First operand (`Vj`/`Qj`).
    pub j: Operand,
    /// Second operand (`Vk`/`Qk`).
    pub k: Operand,
    /// ROB entry that receives the result.
    pub dest: RobTag,
    /// Immediate, or effective address once computed.
    pub a: u32,
    /// Cycles spent in the functional unit.
    pub progress: u32,
    /// Result once the unit finishes.
    pub result: u32,
}

impl Station {
    /// Creates a station for `inst` writing to `dest`.
    pub const fn new(inst: Instruction, j: Operand, k: Operand, dest: RobTag, a: u32) -> Self {
        Self {
            inst,
            j,
            k,
            dest,
            a,
            progress: 0,
            result: 0,
        }
    }

    /// Both operands hold values.
    #[inline]
    pub const fn operands_ready(&self) -> bool {
        self.j.is_ready() && self.k.is_ready()
    }

    /// Operand values, if both are resolved.
    #[inline]
    pub const fn operands(&self) -> Option<(u32, u32)> {
        match (self.j, self.k) {
            (Operand::Ready(a), Operand::Ready(b)) => Some((a, b)),
            _ => None,
        }
    }

    /// Applies a broadcast to both operands.
    #[inline]
    pub fn resolve(&mut self, tag: RobTag, value: u32) {
        self.j.resolve(tag, value);
        self.k.resolve(tag, value);
    }
}
