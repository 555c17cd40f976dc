//! Issue (dispatch) stage.
//!
//! Moves at most one instruction per cycle from the head of the instruction
//! queue into the machine: a reorder-buffer entry at the tail, a station in the
//! pool its function class selects, and, for a non-zero destination, ownership
//! of that register in the status table. Operands are renamed against the
//! status table before the destination is claimed, so `add x1, x1, x1` reads
//! the previous producer of `x1`.

use super::Tomasulo;
use super::rob::RobEntry;
use super::station::{Operand, Pool, Station};
use crate::common::constants::INSTRUCTION_SIZE;
use crate::isa::abi::REG_A0;
use crate::isa::{Function, Instruction, Opcode};

/// Issues the instruction at the head of the queue, if any.
pub fn issue_stage(core: &mut Tomasulo) {
    let interval = u64::from(core.config.issue_interval.max(1));
    if core.cycle % interval != 0 {
        if !core.queue.is_empty() {
            core.stats.issue_stalls += 1;
        }
        return;
    }
    let Some(fetched) = core.queue.pop_front() else {
        return;
    };
    let inst = fetched.inst;
    if let Some(fault) = fetched.fault {
        tracing::debug!(pc = format_args!("{:#x}", inst.pc), "issue faulted fetch: {fault}");
        let _ = core.rob.push(RobEntry::faulted(inst, fault));
        return;
    }

    let rd = if inst.function == Function::Ecall {
        REG_A0
    } else {
        inst.rd
    };
    let mut entry = RobEntry::new(inst, rd);
    if inst.opcode == Opcode::Store {
        entry.complete = true;
    }
    if inst.opcode == Opcode::Store || inst.function == Function::ScW {
        match core.read_operand(inst.rs2) {
            Operand::Ready(value) => {
                entry.mem_value = value;
                entry.value_ready = true;
            }
            Operand::Pending(tag) => entry.data_source = Some(tag),
        }
    }

    let (j, k, a) = operands(core, &inst);
    let tag = core.rob.push(entry);
    let station = Station::new(inst, j, k, tag, a);
    match Pool::for_instruction(&inst) {
        Pool::Alu => core.alu.push(station),
        Pool::MulDiv => core.muldiv.push(station),
        Pool::Address => core.address.push(station),
    }
    core.status.claim(rd, tag);

    tracing::trace!(%tag, pc = format_args!("{:#010x}", inst.pc), "issue {inst}");
}

/// Station operands `(j, k, a)` for `inst`.
fn operands(core: &Tomasulo, inst: &Instruction) -> (Operand, Operand, u32) {
    let ready = Operand::Ready;
    match inst.opcode {
        Opcode::Jal | Opcode::Jalr | Opcode::System => {
            (ready(inst.pc), ready(INSTRUCTION_SIZE), 0)
        }
        Opcode::Lui => (ready(inst.imm), ready(0), 0),
        Opcode::Auipc => (ready(inst.imm), ready(inst.pc), 0),
        Opcode::MiscMem | Opcode::Float => (ready(0), ready(0), 0),
        Opcode::Load | Opcode::Store => (core.read_operand(inst.rs1), ready(0), inst.imm),
        Opcode::Amo if inst.function == Function::ScW => {
            (core.read_operand(inst.rs1), ready(0), 0)
        }
        Opcode::Amo | Opcode::Op | Opcode::Branch => {
            (core.read_operand(inst.rs1), core.read_operand(inst.rs2), 0)
        }
        Opcode::OpImm => (core.read_operand(inst.rs1), ready(inst.imm), 0),
    }
}
