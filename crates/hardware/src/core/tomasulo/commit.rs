//! Commit Stage: retire instructions from the ROB head.
//!
//! The head retires once it is ready:
//! 1. **Stores and AMOs:** after the one-cycle memory write and, for AMOs and
//!    SC, once the register result has been broadcast.
//! 2. **ECALL:** once its return address is known. The system call runs and the
//!    machine is squashed so younger instructions re-read the updated registers.
//! 3. **Branches:** the predictor is trained; a wrong direction squashes and
//!    redirects fetch.
//! 4. **Everything else:** once complete; the result is written to `rd`.
//!
//! Successive heads keep retiring in the same cycle up to `retire_width`
//! (0 means no limit). A deferred fault at the head ends the run.

use super::rob::RobEntry;
use super::tag::RobTag;
use super::{TickReport, Tomasulo};
use crate::common::Result;
use crate::core::units::bru::BranchPredictor;
use crate::isa::{Function, Opcode};
use crate::sim::syscall::SyscallOutcome;

/// Retires ready instructions from the head of the reorder buffer.
pub fn commit_stage(core: &mut Tomasulo) -> Result<TickReport> {
    let mut report = TickReport::default();
    let width = match core.config.retire_width {
        0 => usize::MAX,
        n => n,
    };

    while report.retired < width {
        let Some(head) = core.rob.head() else {
            break;
        };
        if !is_ready(core.rob.get(head)?) {
            break;
        }
        let Some((tag, mut entry)) = core.rob.pop_head()? else {
            break;
        };
        if let Some(fault) = entry.fault.take() {
            tracing::debug!(pc = format_args!("{:#010x}", entry.inst.pc), "fault at head");
            return Err(fault);
        }

        report.retired += 1;
        core.stats.record_retire(&entry.inst);
        log_retire(core, tag, &entry);

        match entry.inst.opcode {
            Opcode::System if entry.inst.function == Function::Ecall => {
                core.stats.syscalls += 1;
                let outcome = core
                    .syscalls
                    .handle(&mut core.regs, core.memory.as_mut(), core.cycle)?;
                core.regs.pc = entry.value;
                core.squash(entry.value);
                report.squashed = true;
                if let SyscallOutcome::Exit(code) = outcome {
                    core.exit_code = Some(code);
                    report.exit = Some(code);
                }
                break;
            }
            Opcode::Branch => {
                let taken = entry.value != 0;
                core.predictor.update(entry.inst.pc, taken);
                let mispredicted = taken != entry.inst.predicted_taken;
                core.stats.record_branch(mispredicted);
                if mispredicted {
                    let target = if taken {
                        entry.inst.branch_target()
                    } else {
                        entry.inst.fall_through()
                    };
                    tracing::debug!(
                        pc = format_args!("{:#010x}", entry.inst.pc),
                        target = format_args!("{target:#010x}"),
                        taken,
                        "mispredict"
                    );
                    core.regs.pc = target;
                    core.squash(target);
                    report.squashed = true;
                    break;
                }
                core.regs.pc = entry.inst.next_pc;
            }
            _ => {
                if entry.inst.function == Function::Ebreak {
                    tracing::warn!(
                        pc = format_args!("{:#010x}", entry.inst.pc),
                        "ebreak retired as no-op"
                    );
                }
                core.regs.write(entry.rd, entry.value);
                let _ = core.status.release(entry.rd, tag);
                core.regs.pc = entry.inst.next_pc;
            }
        }
    }
    Ok(report)
}

/// Readiness of a head entry per its class.
fn is_ready(entry: &RobEntry) -> bool {
    if entry.fault.is_some() {
        true
    } else if entry.is_store_class() {
        entry.progress >= 1 && entry.complete
    } else if entry.inst.function == Function::Ecall {
        entry.value_ready
    } else {
        entry.complete
    }
}

fn log_retire(core: &Tomasulo, tag: RobTag, entry: &RobEntry) {
    let pc = entry.inst.pc;
    if core.trace || cfg!(feature = "commit-log") {
        tracing::info!(
            cycle = core.cycle,
            %tag,
            pc = format_args!("{pc:#010x}"),
            value = entry.value,
            "retire {}",
            entry.inst
        );
    } else {
        tracing::trace!(
            cycle = core.cycle,
            %tag,
            pc = format_args!("{pc:#010x}"),
            value = entry.value,
            "retire {}",
            entry.inst
        );
    }
}
