//! Common Data Bus (CDB).
//!
//! Finished reservation stations and load-buffer entries are harvested here,
//! their results are recorded on the reorder buffer, and one message per
//! register-producing instruction is broadcast to every waiting operand.
//! The bus has no width limit.

use super::Tomasulo;
use super::station::Station;
use super::tag::RobTag;
use crate::common::Result;
use crate::core::units::mdu::Mdu;
use crate::isa::Function;

/// A result travelling on the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CdbMessage {
    /// Producer.
    pub tag: RobTag,
    /// Produced value.
    pub value: u32,
}

/// Harvests finished units in pool order (ALU, MULDIV, load buffer) and
/// broadcasts their results.
pub fn cdb_stage(core: &mut Tomasulo) -> Result<()> {
    let config = &core.config;
    let cache_latency = config.cache_latency.max(1);

    let mut finished = take_finished(&mut core.alu, |_| 1);
    finished.extend(take_finished(&mut core.muldiv, |st| {
        Mdu::latency(st.inst.function, config).max(1)
    }));
    finished.extend(take_finished(&mut core.load_buffer, |_| cache_latency));

    let mut messages = Vec::with_capacity(finished.len());
    for st in finished {
        let entry = core.rob.get_mut(st.dest)?;
        entry.value = st.result;
        if st.inst.function == Function::Ecall {
            entry.value_ready = true;
            continue;
        }
        entry.complete = true;
        if entry.rd != 0 {
            messages.push(CdbMessage {
                tag: st.dest,
                value: st.result,
            });
        }
    }

    for msg in messages {
        broadcast(core, msg);
    }
    Ok(())
}

/// Removes stations whose progress has reached their latency, keeping order.
fn take_finished(pool: &mut Vec<Station>, latency: impl Fn(&Station) -> u32) -> Vec<Station> {
    let (done, waiting): (Vec<_>, Vec<_>) = pool
        .drain(..)
        .partition(|st| st.operands_ready() && st.progress >= latency(st));
    *pool = waiting;
    done
}

/// Delivers `msg` to every station, load-buffer entry, and pending store datum.
pub fn broadcast(core: &mut Tomasulo, msg: CdbMessage) {
    tracing::trace!(tag = %msg.tag, value = msg.value, "cdb");
    for st in core
        .alu
        .iter_mut()
        .chain(core.muldiv.iter_mut())
        .chain(core.address.iter_mut())
        .chain(core.load_buffer.iter_mut())
    {
        st.resolve(msg.tag, msg.value);
    }
    core.rob.for_each_mut(|_, entry| {
        if entry.data_source == Some(msg.tag) {
            entry.data_source = None;
            entry.mem_value = msg.value;
            entry.value_ready = true;
        }
    });
}
