//! RV32 Tomasulo simulator CLI.
//!
//! This binary loads a statically linked RV32IMA Linux ELF and runs it on the
//! out-of-order core. It performs:
//! 1. **Configuration:** Built-in defaults, optionally a JSON file, then command-line overrides.
//! 2. **Run:** Ticks the core until the guest exits, a fatal error occurs, or the cycle bound hits.
//! 3. **Report:** Prints the statistics to stderr and exits with the guest's status.
//!
//! Logging goes through `tracing`; set `RUST_LOG` (e.g. `RUST_LOG=debug`) to see squashes
//! and system calls, or pass `--trace` to log every retired instruction.

use std::path::{Path, PathBuf};
use std::process;

use clap::builder::PossibleValuesParser;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use rvsim_tomasulo_core::Simulator;
use rvsim_tomasulo_core::common::RegisterFile;
use rvsim_tomasulo_core::config::{BranchPredictor, Config};
use rvsim_tomasulo_core::sim::RunOutcome;
use rvsim_tomasulo_core::stats::STATS_SECTIONS;

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "RV32IMA Tomasulo out-of-order simulator",
    long_about = "Run a statically linked RV32 Linux ELF on a Tomasulo out-of-order core.\n\nExamples:\n  sim run hello.elf\n  sim run --predictor two-bit --max-cycles 1000000 qsort.elf\n  sim run --config machine.json --stats branch,memory bench.elf"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an ELF executable.
    Run {
        /// RV32 ELF executable.
        elf: PathBuf,

        /// JSON configuration file; missing fields take their defaults.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Branch direction predictor.
        #[arg(short, long, value_enum)]
        predictor: Option<PredictorArg>,

        /// Stop after this many cycles.
        #[arg(long)]
        max_cycles: Option<u64>,

        /// Log every retired instruction.
        #[arg(long)]
        trace: bool,

        /// Statistics sections to print (comma separated); all by default.
        #[arg(
            long,
            value_delimiter = ',',
            value_parser = PossibleValuesParser::new(STATS_SECTIONS.iter().copied())
        )]
        stats: Vec<String>,
    },
}

/// Predictor names accepted on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum PredictorArg {
    /// Always taken.
    Static,
    /// 2-bit saturating counters.
    TwoBit,
}

impl From<PredictorArg> for BranchPredictor {
    fn from(arg: PredictorArg) -> Self {
        match arg {
            PredictorArg::Static => Self::Static,
            PredictorArg::TwoBit => Self::TwoBit,
        }
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            elf,
            config,
            predictor,
            max_cycles,
            trace,
            stats,
        } => {
            let mut config = match config {
                Some(path) => Config::from_file(&path).unwrap_or_else(|e| {
                    eprintln!("[!] FATAL: could not read config '{}': {e}", path.display());
                    process::exit(1);
                }),
                None => Config::default(),
            };
            if let Some(p) = predictor {
                config.pipeline.branch_predictor = p.into();
            }
            if max_cycles.is_some() {
                config.general.max_cycles = max_cycles;
            }
            config.general.trace |= trace;
            cmd_run(&elf, &config, &stats);
        }
    }
}

/// Loads `elf`, runs it to completion, prints statistics, and exits with the guest status.
///
/// A fatal simulator error prints the error and the committed registers and exits with code 1.
fn cmd_run(elf: &Path, config: &Config, sections: &[String]) {
    let mut sim = Simulator::from_elf(elf, config).unwrap_or_else(|e| {
        eprintln!("[!] FATAL: could not load '{}': {e}", elf.display());
        process::exit(1);
    });
    tracing::info!(
        predictor = ?config.pipeline.branch_predictor,
        pc = format_args!("{:#010x}", sim.core.regs().pc),
        "starting"
    );

    let code = match sim.run() {
        Ok(RunOutcome::Exited(code)) => {
            eprintln!("\n[*] Exit code {code} after {} cycles", sim.core.cycle());
            code
        }
        Ok(RunOutcome::CycleLimit(limit)) => {
            eprintln!("\n[!] Cycle limit {limit} reached");
            1
        }
        Err(e) => {
            eprintln!("\n[!] FATAL: {e}");
            dump_registers(sim.core.regs());
            1
        }
    };
    sim.stats().print_sections(sections);
    process::exit(code);
}

/// Prints the committed pc and registers to stderr.
fn dump_registers(regs: &RegisterFile) {
    eprintln!("  pc        = {:#010x}", regs.pc);
    for (idx, val) in regs.snapshot().iter().enumerate().skip(1) {
        eprintln!("  x{idx:<2} {:<4} = {val:#010x}", RegisterFile::abi_name(idx));
    }
}
