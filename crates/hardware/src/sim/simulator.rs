//! Simulator: owns a loaded program and the out-of-order core that runs it.
//!
//! `Simulator` glues the loader, the system-call layer, and the Tomasulo core
//! together and drives the clock until the guest exits, a fatal error occurs,
//! or the optional cycle bound is reached.

use std::path::Path;

use crate::common::Result;
use crate::config::Config;
use crate::core::Tomasulo;
use crate::core::tomasulo::TickReport;
use crate::sim::loader::{self, LoadedImage};
use crate::sim::syscall::{LinuxSyscalls, SyscallHandler};
use crate::stats::SimStats;

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunOutcome {
    /// The guest called `exit`/`exit_group` with this status.
    Exited(i32),
    /// `max_cycles` elapsed first.
    CycleLimit(u64),
}

/// Top-level simulator.
#[derive(Debug)]
pub struct Simulator {
    /// The execution core, including guest memory and architectural state.
    pub core: Tomasulo,
    max_cycles: Option<u64>,
}

impl Simulator {
    /// Loads `path` and builds a simulator using host system calls.
    pub fn from_elf(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let image = loader::load_elf(path, &config.memory)?;
        Ok(Self::new(image, config, Box::new(LinuxSyscalls::new())))
    }

    /// Builds a simulator around an already loaded image.
    ///
    /// # Arguments
    ///
    /// * `image` - Memory and entry state from the loader.
    /// * `config` - Engine and run settings.
    /// * `syscalls` - Handler for ECALL.
    pub fn new(image: LoadedImage, config: &Config, syscalls: Box<dyn SyscallHandler>) -> Self {
        let regs = image.registers();
        let core = Tomasulo::new(config, regs, Box::new(image.memory), syscalls);
        Self {
            core,
            max_cycles: config.general.max_cycles,
        }
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) -> Result<TickReport> {
        self.core.tick()
    }

    /// Runs until the guest exits or the cycle bound is reached.
    ///
    /// # Returns
    ///
    /// How the run ended, or the fatal error that stopped it.
    pub fn run(&mut self) -> Result<RunOutcome> {
        loop {
            let report = self.tick()?;
            if let Some(code) = report.exit {
                tracing::info!(
                    cycles = self.core.cycle(),
                    retired = self.core.stats().instructions_retired,
                    code,
                    "bye"
                );
                return Ok(RunOutcome::Exited(code));
            }
            if let Some(limit) = self.max_cycles.filter(|limit| self.core.cycle() >= *limit) {
                tracing::warn!(
                    limit,
                    pc = format_args!("{:#010x}", self.core.regs().pc),
                    "cycle limit reached"
                );
                return Ok(RunOutcome::CycleLimit(limit));
            }
        }
    }

    /// Performance counters collected so far.
    pub const fn stats(&self) -> &SimStats {
        self.core.stats()
    }
}
