//! Tomasulo out-of-order execution engine.
//!
//! This module wires the dynamic-scheduling structures into a cycle-level core.
//! It provides:
//! 1. **Renaming:** The register status table maps each register to its pending producer.
//! 2. **Scheduling:** ALU, MULDIV, and address-generation reservation stations plus a load buffer.
//! 3. **Ordering:** A reorder buffer retires instructions in program order and recovers from
//!    mispredictions with a global squash.
//! 4. **Broadcast:** A common data bus wakes waiting operands every cycle.
//!
//! Each call to [`Tomasulo::tick`] runs the stages in a fixed order:
//! commit, broadcast, execute (ALU, MULDIV, address, memory), issue, fetch.
//! Commit therefore sees the previous cycle's completions, a unit's result is
//! broadcast on the cycle after it is computed, and issue sees this cycle's
//! broadcasts.

/// Common data bus: result harvest and operand wake-up.
pub mod cdb;
/// In-order retirement and squash.
pub mod commit;
/// ALU, MULDIV, and address-generation execution.
pub mod execute;
/// Instruction fetch and branch prediction.
pub mod fetch;
/// Dispatch into the reorder buffer and reservation stations.
pub mod issue;
/// Load buffer, disambiguation, and store write-back.
pub mod memory;
/// Register status table.
pub mod regstat;
/// Reorder buffer.
pub mod rob;
/// Reservation stations and operands.
pub mod station;
/// Generational tags.
pub mod tag;

use std::collections::VecDeque;
use std::fmt;

use self::regstat::RegisterStatus;
use self::rob::ReorderBuffer;
use self::station::{Operand, Station};
use crate::common::{RegisterFile, Result, SimError};
use crate::config::{Config, PipelineConfig};
use crate::core::units::bru::BranchPredictorWrapper;
use crate::isa::Instruction;
use crate::sim::syscall::SyscallHandler;
use crate::soc::traits::Memory;
use crate::stats::SimStats;

/// A fetched instruction waiting in the instruction queue.
#[derive(Debug)]
pub struct Fetched {
    /// The decoded instruction, or a no-op placeholder when `fault` is set.
    pub inst: Instruction,
    /// Fetch or decode fault, raised if the instruction ever retires.
    pub fault: Option<SimError>,
}

/// What happened during one cycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Instructions retired this cycle.
    pub retired: usize,
    /// A misprediction or system call squashed the machine.
    pub squashed: bool,
    /// The guest exited with this status.
    pub exit: Option<i32>,
}

/// Occupancy of the speculative structures.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Occupancy {
    /// Instruction queue entries.
    pub queue: usize,
    /// Reorder buffer entries.
    pub rob: usize,
    /// ALU reservation stations.
    pub alu: usize,
    /// MULDIV reservation stations.
    pub muldiv: usize,
    /// Address-generation reservation stations.
    pub address: usize,
    /// Load buffer entries.
    pub load_buffer: usize,
    /// Registers with a pending producer.
    pub busy_registers: usize,
}

impl Occupancy {
    /// Returns `true` if nothing is in flight after the front end.
    pub const fn is_drained(&self) -> bool {
        self.rob == 0
            && self.alu == 0
            && self.muldiv == 0
            && self.address == 0
            && self.load_buffer == 0
            && self.busy_registers == 0
    }
}

/// The out-of-order core.
pub struct Tomasulo {
    pub(crate) regs: RegisterFile,
    pub(crate) status: RegisterStatus,
    pub(crate) rob: ReorderBuffer,
    pub(crate) alu: Vec<Station>,
    pub(crate) muldiv: Vec<Station>,
    pub(crate) address: Vec<Station>,
    pub(crate) load_buffer: Vec<Station>,
    pub(crate) queue: VecDeque<Fetched>,
    pub(crate) fetch_pc: u32,
    pub(crate) fetch_blocked: bool,
    pub(crate) memory: Box<dyn Memory>,
    pub(crate) syscalls: Box<dyn SyscallHandler>,
    pub(crate) predictor: BranchPredictorWrapper,
    pub(crate) config: PipelineConfig,
    pub(crate) trace: bool,
    pub(crate) cycle: u64,
    pub(crate) stats: SimStats,
    pub(crate) exit_code: Option<i32>,
}

impl Tomasulo {
    /// Creates a core that starts fetching at `regs.pc`.
    ///
    /// # Arguments
    ///
    /// * `config` - Latencies, predictor selection, and tracing.
    /// * `regs` - Initial architectural state (entry point and stack pointer).
    /// * `memory` - Guest memory.
    /// * `syscalls` - Handler invoked when an ECALL retires.
    pub fn new(
        config: &Config,
        regs: RegisterFile,
        memory: Box<dyn Memory>,
        syscalls: Box<dyn SyscallHandler>,
    ) -> Self {
        Self {
            fetch_pc: regs.pc,
            regs,
            status: RegisterStatus::new(),
            rob: ReorderBuffer::new(),
            alu: Vec::new(),
            muldiv: Vec::new(),
            address: Vec::new(),
            load_buffer: Vec::new(),
            queue: VecDeque::new(),
            fetch_blocked: false,
            memory,
            syscalls,
            predictor: BranchPredictorWrapper::new(config),
            config: config.pipeline.clone(),
            trace: config.general.trace,
            cycle: 0,
            stats: SimStats::default(),
            exit_code: None,
        }
    }

    /// Replaces the configured branch predictor.
    #[must_use]
    pub fn with_predictor(mut self, predictor: BranchPredictorWrapper) -> Self {
        self.predictor = predictor;
        self
    }

    /// Advances the machine by one clock cycle.
    ///
    /// # Returns
    ///
    /// What retired this cycle, or the first fatal error (a deferred fault at the
    /// head, an unimplemented system call, or a failed store). Once the guest
    /// has exited the clock stops and every call reports the exit again.
    pub fn tick(&mut self) -> Result<TickReport> {
        if let Some(code) = self.exit_code {
            return Ok(TickReport {
                exit: Some(code),
                ..TickReport::default()
            });
        }
        let report = commit::commit_stage(self)?;
        if report.exit.is_none() {
            cdb::cdb_stage(self)?;
            execute::alu_stage(self);
            execute::muldiv_stage(self)?;
            execute::address_stage(self)?;
            memory::memory_stage(self)?;
            issue::issue_stage(self);
            fetch::fetch_stage(self);
        }
        self.cycle += 1;
        self.stats.cycles = self.cycle;
        Ok(report)
    }

    /// Reads a source register at issue time.
    ///
    /// A busy register yields its producer's value if that producer has already
    /// completed, and a pending reference otherwise.
    pub(crate) fn read_operand(&self, reg: usize) -> Operand {
        if reg == 0 {
            return Operand::Ready(0);
        }
        match self.status.producer(reg) {
            Some(tag) => match self.rob.try_get(tag) {
                Some(entry) if entry.complete => Operand::Ready(entry.value),
                Some(_) => Operand::Pending(tag),
                None => Operand::Ready(self.regs.read(reg)),
            },
            None => Operand::Ready(self.regs.read(reg)),
        }
    }

    /// Discards all speculative state and restarts fetch at `target`.
    pub(crate) fn squash(&mut self, target: u32) {
        tracing::debug!(
            target = format_args!("{target:#010x}"),
            rob = self.rob.len(),
            queue = self.queue.len(),
            "squash"
        );
        self.queue.clear();
        self.alu.clear();
        self.muldiv.clear();
        self.address.clear();
        self.load_buffer.clear();
        self.rob.clear();
        self.status.clear();
        self.fetch_pc = target;
        self.fetch_blocked = false;
        self.stats.squashes += 1;
    }

    /// Committed architectural registers.
    pub const fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// Guest memory.
    pub fn memory(&self) -> &dyn Memory {
        self.memory.as_ref()
    }

    /// Guest memory, mutably.
    pub fn memory_mut(&mut self) -> &mut dyn Memory {
        self.memory.as_mut()
    }

    /// Performance counters.
    pub const fn stats(&self) -> &SimStats {
        &self.stats
    }

    /// Cycles simulated so far.
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// Exit status, once the guest has exited.
    pub const fn exit_code(&self) -> Option<i32> {
        self.exit_code
    }

    /// Address the front end will fetch next.
    pub const fn fetch_pc(&self) -> u32 {
        self.fetch_pc
    }

    /// The branch predictor.
    pub const fn predictor(&self) -> &BranchPredictorWrapper {
        &self.predictor
    }

    /// Current size of every speculative structure.
    pub fn occupancy(&self) -> Occupancy {
        Occupancy {
            queue: self.queue.len(),
            rob: self.rob.len(),
            alu: self.alu.len(),
            muldiv: self.muldiv.len(),
            address: self.address.len(),
            load_buffer: self.load_buffer.len(),
            busy_registers: self.status.busy_count(),
        }
    }
}

impl fmt::Debug for Tomasulo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tomasulo")
            .field("cycle", &self.cycle)
            .field("pc", &format_args!("{:#010x}", self.regs.pc))
            .field("fetch_pc", &format_args!("{:#010x}", self.fetch_pc))
            .field("occupancy", &self.occupancy())
            .field("predictor", &self.predictor)
            .finish_non_exhaustive()
    }
}
