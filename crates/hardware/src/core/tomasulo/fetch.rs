//! Instruction Fetch (IF) and decode.
//!
//! Fetches one instruction per cycle into the unbounded instruction queue and
//! picks the next fetch address:
//! - Conditional branches ask the branch predictor.
//! - JAL is always taken.
//! - JALR waits until the queue has drained and its base register is resolved,
//!   then jumps to the exact target, so it never mispredicts.
//! - Floating-point instructions are replaced by `addi x0, x0, 0`.
//!
//! A fetch or decode fault is queued as a faulted instruction and fetch stops
//! until the next squash redirects it.

use super::{Fetched, Tomasulo};
use crate::common::Result;
use crate::core::units::bru::BranchPredictor;
use crate::isa::{Instruction, Opcode, decode};
use crate::soc::traits::AccessWidth;

/// Fetches and decodes the instruction at `fetch_pc`.
pub fn fetch_stage(core: &mut Tomasulo) {
    if core.fetch_blocked {
        return;
    }
    let pc = core.fetch_pc;
    let mut inst = match fetch_decode(core, pc) {
        Ok(inst) => inst,
        Err(fault) => {
            tracing::debug!(pc = format_args!("{pc:#010x}"), "fetch fault: {fault}");
            core.queue.push_back(Fetched {
                inst: Instruction::nop(pc),
                fault: Some(fault),
            });
            core.fetch_blocked = true;
            return;
        }
    };

    if inst.opcode == Opcode::Float {
        core.stats.fp_suppressed += 1;
        inst = Instruction::nop(pc);
    }

    let next = match inst.opcode {
        Opcode::Branch => {
            inst.predicted_taken = core.predictor.predict(pc);
            if inst.predicted_taken {
                inst.branch_target()
            } else {
                inst.fall_through()
            }
        }
        Opcode::Jal => {
            inst.predicted_taken = true;
            inst.branch_target()
        }
        Opcode::Jalr => {
            let Some(base) = jalr_base(core, inst.rs1) else {
                core.stats.fetch_stalls += 1;
                return;
            };
            inst.predicted_taken = true;
            base.wrapping_add(inst.imm) & !1
        }
        _ => inst.fall_through(),
    };

    inst.next_pc = next;
    core.queue.push_back(Fetched { inst, fault: None });
    core.fetch_pc = next;
}

fn fetch_decode(core: &Tomasulo, pc: u32) -> Result<Instruction> {
    let raw = core.memory.read_integer(pc, AccessWidth::Word, false)?;
    decode(raw, pc)
}

/// Value of a JALR base register, once every older instruction has issued and
/// its producer (if any) has completed.
fn jalr_base(core: &Tomasulo, rs1: usize) -> Option<u32> {
    if !core.queue.is_empty() {
        return None;
    }
    match core.status.producer(rs1) {
        None => Some(core.regs.read(rs1)),
        Some(tag) => core
            .rob
            .try_get(tag)
            .filter(|entry| entry.complete)
            .map(|entry| entry.value),
    }
}
