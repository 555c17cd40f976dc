//! Simulation statistics collection and reporting.
//!
//! This module tracks performance metrics for the out-of-order engine. It provides:
//! 1. **Cycle and IPC:** Total cycles, retired instructions, and derived metrics (CPI, MIPS).
//! 2. **Instruction mix:** Counts by category (ALU, mul/div, load, store, atomic, branch, jump, system).
//! 3. **Branch prediction:** Resolved branches, mispredictions, accuracy, and squashes.
//! 4. **Memory pipeline:** Store-to-load forwards and disambiguation stalls.
//! 5. **Stalls:** Fetch stalls on unresolved JALR targets and throttled issue cycles.
//!
//! The report goes to stderr so it never interleaves with the guest's stdout.

use std::time::Instant;

use crate::isa::{Function, Instruction, Opcode};

/// Simulation statistics structure tracking all performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total simulator cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,

    /// Count of integer ALU instructions retired (including LUI/AUIPC and fences).
    pub inst_alu: u64,
    /// Count of multiply/divide instructions retired.
    pub inst_muldiv: u64,
    /// Count of load instructions retired.
    pub inst_load: u64,
    /// Count of store instructions retired.
    pub inst_store: u64,
    /// Count of atomic instructions retired.
    pub inst_atomic: u64,
    /// Count of conditional branches retired.
    pub inst_branch: u64,
    /// Count of JAL/JALR retired.
    pub inst_jump: u64,
    /// Count of system (ECALL, EBREAK) instructions retired.
    pub inst_system: u64,
    /// Count of suppressed floating-point instructions fetched.
    pub fp_suppressed: u64,

    /// Number of branch predictions that were correct.
    pub branch_predictions: u64,
    /// Number of branch predictions that were wrong (mispredictions).
    pub branch_mispredictions: u64,
    /// Number of global squashes (mispredictions plus system calls).
    pub squashes: u64,

    /// Loads (and AMO reads) satisfied from an in-flight store.
    pub loads_forwarded: u64,
    /// Cycles a load waited on an older store's address or data.
    pub disambiguation_stalls: u64,
    /// Cycles fetch waited for a JALR base register.
    pub fetch_stalls: u64,
    /// Cycles issue was throttled by `issue_interval`.
    pub issue_stalls: u64,

    /// System calls dispatched.
    pub syscalls: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_muldiv: 0,
            inst_load: 0,
            inst_store: 0,
            inst_atomic: 0,
            inst_branch: 0,
            inst_jump: 0,
            inst_system: 0,
            fp_suppressed: 0,
            branch_predictions: 0,
            branch_mispredictions: 0,
            squashes: 0,
            loads_forwarded: 0,
            disambiguation_stalls: 0,
            fetch_stalls: 0,
            issue_stalls: 0,
            syscalls: 0,
        }
    }
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"instruction_mix"`, `"branch"`, `"memory"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "branch", "memory"];

impl SimStats {
    /// Counts one retired instruction in the mix.
    pub fn record_retire(&mut self, inst: &Instruction) {
        self.instructions_retired += 1;
        let bucket = match inst.opcode {
            Opcode::Load => &mut self.inst_load,
            Opcode::Store => &mut self.inst_store,
            Opcode::Amo => &mut self.inst_atomic,
            Opcode::Branch => &mut self.inst_branch,
            Opcode::Jal | Opcode::Jalr => &mut self.inst_jump,
            Opcode::System => &mut self.inst_system,
            Opcode::Op if inst.function.is_multiply() || inst.function.is_divide() => {
                &mut self.inst_muldiv
            }
            _ => &mut self.inst_alu,
        };
        *bucket += 1;
    }

    /// Counts a resolved conditional branch.
    pub const fn record_branch(&mut self, mispredicted: bool) {
        if mispredicted {
            self.branch_mispredictions += 1;
        } else {
            self.branch_predictions += 1;
        }
    }

    /// Fraction of conditional branches predicted correctly, in percent.
    pub fn branch_accuracy(&self) -> f64 {
        let total = self.branch_predictions + self.branch_mispredictions;
        if total == 0 {
            0.0
        } else {
            100.0 * (self.branch_predictions as f64 / total as f64)
        }
    }

    /// Instructions retired per cycle.
    pub fn ipc(&self) -> f64 {
        self.instructions_retired as f64 / self.cycles.max(1) as f64
    }

    /// Prints only the requested statistics sections to stderr.
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64().max(f64::EPSILON);
        let cyc = self.cycles.max(1);
        let instr = self.instructions_retired.max(1);
        let pct = |n: u64, of: u64| (n as f64 / of as f64) * 100.0;

        if want("summary") {
            let cpi = cyc as f64 / instr as f64;
            let mips = (self.instructions_retired as f64 / seconds) / 1_000_000.0;
            let khz = (self.cycles as f64 / seconds) / 1000.0;
            eprintln!("\n==========================================================");
            eprintln!("RV32 TOMASULO SIMULATION STATISTICS");
            eprintln!("==========================================================");
            eprintln!("host_seconds             {seconds:.4} s");
            eprintln!("sim_cycles               {}", self.cycles);
            eprintln!("sim_freq                 {khz:.2} kHz");
            eprintln!("sim_insts                {}", self.instructions_retired);
            eprintln!("sim_ipc                  {:.4}", self.ipc());
            eprintln!("sim_cpi                  {cpi:.4}");
            eprintln!("sim_mips                 {mips:.2}");
            eprintln!("sim_syscalls             {}", self.syscalls);
            eprintln!("----------------------------------------------------------");
        }
        if want("instruction_mix") {
            eprintln!("INSTRUCTION MIX");
            for (name, count) in [
                ("op.alu", self.inst_alu),
                ("op.muldiv", self.inst_muldiv),
                ("op.load", self.inst_load),
                ("op.store", self.inst_store),
                ("op.atomic", self.inst_atomic),
                ("op.branch", self.inst_branch),
                ("op.jump", self.inst_jump),
                ("op.system", self.inst_system),
            ] {
                eprintln!("  {name:<22} {count} ({:.2}%)", pct(count, instr));
            }
            eprintln!("  {:<22} {}", "fp.suppressed", self.fp_suppressed);
            eprintln!("----------------------------------------------------------");
        }
        if want("branch") {
            eprintln!("BRANCH PREDICTION");
            eprintln!(
                "  bp.lookups             {}",
                self.branch_predictions + self.branch_mispredictions
            );
            eprintln!("  bp.mispredicts         {}", self.branch_mispredictions);
            eprintln!("  bp.accuracy            {:.2}%", self.branch_accuracy());
            eprintln!("  squashes               {}", self.squashes);
            eprintln!("  stalls.fetch           {} ({:.2}%)", self.fetch_stalls, pct(self.fetch_stalls, cyc));
            eprintln!("  stalls.issue           {} ({:.2}%)", self.issue_stalls, pct(self.issue_stalls, cyc));
            eprintln!("----------------------------------------------------------");
        }
        if want("memory") {
            eprintln!("MEMORY PIPELINE");
            eprintln!("  lsu.forwarded          {}", self.loads_forwarded);
            eprintln!("  lsu.disambig_stalls    {}", self.disambiguation_stalls);
        }
        eprintln!("==========================================================");
    }

    /// Prints all statistics sections to stderr.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
