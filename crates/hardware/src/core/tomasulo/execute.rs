//! Execute stage for the ALU, MULDIV, and address-generation pools.
//!
//! Stations whose operands are resolved advance in their unit. ALU results are
//! ready after one cycle; multiplies and divides after their configured
//! latency. Address generation moves loads and AMO reads into the load buffer
//! and records store addresses on the reorder buffer.

use super::Tomasulo;
use super::station::{Operand, Station};
use crate::common::Result;
use crate::core::units::alu::Alu;
use crate::core::units::mdu::Mdu;
use crate::isa::{Function, Opcode};

/// Executes every ready ALU station that has not run yet.
pub fn alu_stage(core: &mut Tomasulo) {
    for st in &mut core.alu {
        if st.progress != 0 {
            continue;
        }
        if let Some((a, b)) = st.operands() {
            st.result = Alu::execute(st.inst.function, a, b);
            st.progress = 1;
        }
    }
}

/// Advances every ready MULDIV station by one cycle.
///
/// A divide that would fault on the host records the fault on its ROB entry;
/// it is raised only if that entry reaches the head.
pub fn muldiv_stage(core: &mut Tomasulo) -> Result<()> {
    for st in &mut core.muldiv {
        let Some((a, b)) = st.operands() else {
            continue;
        };
        let latency = Mdu::latency(st.inst.function, &core.config).max(1);
        if st.progress >= latency {
            continue;
        }
        st.progress += 1;
        if st.progress == latency {
            match Mdu::execute(st.inst.function, a, b, st.inst.pc) {
                Ok(value) => st.result = value,
                Err(fault) => {
                    tracing::debug!(pc = format_args!("{:#x}", st.inst.pc), "deferred {fault}");
                    core.rob.get_mut(st.dest)?.fault = Some(fault);
                }
            }
        }
    }
    Ok(())
}

/// Computes effective addresses for ready address stations.
///
/// * Loads: `rs1 + imm` into a new load-buffer entry.
/// * Stores: `rs1 + imm` onto the ROB entry.
/// * AMOs: `rs1` onto the ROB entry; every AMO except SC also enters the load
///   buffer carrying `rs2`, and needs both operands before leaving the pool.
pub fn address_stage(core: &mut Tomasulo) -> Result<()> {
    let pool = std::mem::take(&mut core.address);
    for st in pool {
        let Some((base, src)) = st.operands() else {
            core.address.push(st);
            continue;
        };
        match st.inst.opcode {
            Opcode::Load => {
                let addr = base.wrapping_add(st.a);
                core.load_buffer.push(load_entry(st, addr, 0));
            }
            Opcode::Store => {
                let entry = core.rob.get_mut(st.dest)?;
                entry.addr = base.wrapping_add(st.a);
                entry.addr_ready = true;
            }
            Opcode::Amo => {
                let entry = core.rob.get_mut(st.dest)?;
                entry.addr = base;
                entry.addr_ready = true;
                if st.inst.function != Function::ScW {
                    core.load_buffer.push(load_entry(st, base, src));
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Builds a load-buffer entry: `a` holds the address, `k` the AMO source.
const fn load_entry(st: Station, addr: u32, src: u32) -> Station {
    Station::new(st.inst, Operand::Ready(addr), Operand::Ready(src), st.dest, addr)
}
