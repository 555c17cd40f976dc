//! Memory unit: load buffer, disambiguation, and store write-back.
//!
//! This module drives every access to guest data memory. It provides:
//! 1. **Disambiguation:** On its first examined cycle a load checks older
//!    store-class entries, youngest first. An unknown address or an unready
//!    matching store stalls it; a ready exact match forwards.
//! 2. **Cache latency:** A load with no conflict reads memory after `cache_latency` cycles.
//! 3. **AMO combine:** An AMO read computes the word its store half will write.
//! 4. **Write-back:** The store-class head spends one cycle of write latency, then
//!    writes memory. SC also queues its success code on the load buffer.

use super::Tomasulo;
use super::station::{Operand, Station};
use super::tag::RobTag;
use crate::common::Result;
use crate::core::units::lsu::Lsu;
use crate::isa::{Function, Opcode};
use crate::soc::traits::AccessWidth;

/// Outcome of checking a load against older in-flight stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Disambiguation {
    /// An older store's address or data is not known yet.
    Stall,
    /// An older store to the same address supplies the value.
    Forward(u32),
    /// No older store overlaps; read memory.
    NoConflict,
}

/// Width and signedness of a load-buffer or store-class access.
const fn access_of(function: Function, opcode: Opcode) -> (AccessWidth, bool) {
    match opcode {
        Opcode::Amo => (AccessWidth::Word, false),
        _ => Lsu::access(function),
    }
}

/// Checks the load owned by `dest` at `addr` against older store-class entries.
///
/// Only an exact address match from a store at least as wide as the load
/// forwards; any other overlap waits for the store to retire.
pub fn disambiguate(
    core: &Tomasulo,
    dest: RobTag,
    addr: u32,
    width: AccessWidth,
    signed: bool,
) -> Disambiguation {
    let load_end = u64::from(addr) + u64::from(width.bytes());
    for (_, older) in core.rob.older_than(dest) {
        if !older.is_store_class() {
            continue;
        }
        if !older.addr_ready {
            return Disambiguation::Stall;
        }
        let (store_width, _) = access_of(older.inst.function, older.inst.opcode);
        let store_end = u64::from(older.addr) + u64::from(store_width.bytes());
        let overlaps = u64::from(older.addr) < load_end && u64::from(addr) < store_end;
        if !overlaps {
            continue;
        }
        if older.addr == addr && store_width.bytes() >= width.bytes() && older.value_ready {
            return Disambiguation::Forward(width.extend(older.mem_value, signed));
        }
        return Disambiguation::Stall;
    }
    Disambiguation::NoConflict
}

/// Runs one cycle of the memory unit.
pub fn memory_stage(core: &mut Tomasulo) -> Result<()> {
    let latency = core.config.cache_latency.max(1);
    for idx in 0..core.load_buffer.len() {
        let st = core.load_buffer[idx];
        if st.progress >= latency {
            continue;
        }
        let (width, signed) = access_of(st.inst.function, st.inst.opcode);
        let addr = st.a;

        let loaded = if st.progress == 0 {
            match disambiguate(core, st.dest, addr, width, signed) {
                Disambiguation::Stall => {
                    core.stats.disambiguation_stalls += 1;
                    continue;
                }
                Disambiguation::Forward(value) => {
                    core.stats.loads_forwarded += 1;
                    core.load_buffer[idx].progress = latency;
                    Some(value)
                }
                Disambiguation::NoConflict => {
                    core.load_buffer[idx].progress = 1;
                    None
                }
            }
        } else {
            core.load_buffer[idx].progress += 1;
            None
        };

        let value = match loaded {
            Some(value) => value,
            None if core.load_buffer[idx].progress == latency => {
                match core.memory.read_integer(addr, width, signed) {
                    Ok(value) => value,
                    Err(fault) => {
                        tracing::debug!(addr = format_args!("{addr:#x}"), "deferred {fault}");
                        core.rob.get_mut(st.dest)?.fault = Some(fault);
                        0
                    }
                }
            }
            None => continue,
        };

        core.load_buffer[idx].result = value;
        if st.inst.opcode == Opcode::Amo {
            let entry = core.rob.get_mut(st.dest)?;
            if entry.is_store_class() {
                let src = st.k.value().unwrap_or(0);
                entry.mem_value = Lsu::atomic(st.inst.function, value, src);
                entry.value_ready = true;
            }
        }
    }

    write_back_head(core)
}

/// Applies the write latency and memory write of a store-class head.
fn write_back_head(core: &mut Tomasulo) -> Result<()> {
    let Some(head) = core.rob.head() else {
        return Ok(());
    };
    let entry = core.rob.get_mut(head)?;
    if !entry.is_store_class() || !entry.addr_ready || !entry.value_ready || entry.fault.is_some() {
        return Ok(());
    }
    entry.progress += 1;
    if entry.progress != 1 {
        return Ok(());
    }

    let (width, _) = access_of(entry.inst.function, entry.inst.opcode);
    let (addr, value, inst) = (entry.addr, entry.mem_value, entry.inst);
    tracing::trace!(
        addr = format_args!("{addr:#010x}"),
        value = format_args!("{value:#x}"),
        "{}",
        inst.function.mnemonic()
    );
    core.memory.write(addr, width, value)?;

    if inst.function == Function::ScW {
        let mut done = Station::new(inst, Operand::Ready(addr), Operand::Ready(0), head, addr);
        done.progress = core.config.cache_latency.max(1);
        core.load_buffer.push(done);
    }
    Ok(())
}
