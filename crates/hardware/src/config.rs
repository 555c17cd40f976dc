//! Configuration system for the simulator.
//!
//! This module defines the configuration structures used to parameterize a run. It provides:
//! 1. **Defaults:** Baseline latencies, memory layout, and predictor sizing.
//! 2. **Structures:** Hierarchical config for general, memory, and pipeline settings.
//! 3. **Enums:** Branch predictor selection.
//!
//! Configuration is read from JSON (`Config::from_json`) or built with `Config::default()`
//! for the CLI. Every field is optional in JSON and falls back to its default.

use std::path::Path;

use serde::Deserialize;

use crate::common::Result;
use crate::common::constants;

/// Default configuration constants for the simulator.
///
/// These values define the baseline machine when not explicitly overridden
/// in a JSON configuration file.
mod defaults {
    use super::constants;

    /// Multiply latency in MULDIV cycles.
    pub const MUL_LATENCY: u32 = constants::MUL_LATENCY;

    /// Divide and remainder latency in MULDIV cycles.
    pub const DIV_LATENCY: u32 = constants::DIV_LATENCY;

    /// Memory-unit latency for loads in cycles.
    pub const CACHE_LATENCY: u32 = constants::CACHE_LATENCY;

    /// Stack region size (8 MiB).
    pub const STACK_SIZE: u32 = constants::STACK_SIZE;

    /// Thread-local storage window size.
    pub const TLS_SIZE: u32 = constants::TLS_SIZE;

    /// Bytes mapped past the image for `.bss` and heap (8 MiB).
    pub const HEAP_HEADROOM: u32 = constants::HEAP_HEADROOM;

    /// 2-bit predictor table size (log2, 1024 counters).
    pub const TWO_BIT_TABLE_BITS: u32 = 10;

    /// Instructions retired per cycle; 0 retires every ready head.
    pub const RETIRE_WIDTH: usize = 0;

    /// Issue one instruction every N cycles.
    pub const ISSUE_INTERVAL: u32 = 1;
}

/// Branch predictor algorithms.
///
/// Specifies the direction predictor consulted by fetch for conditional branches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum BranchPredictor {
    /// Static predictor.
    ///
    /// Predicts every conditional branch taken.
    #[default]
    Static,
    /// 2-bit saturating counter predictor.
    ///
    /// Per-PC counters indexed by the word address, initialised to strongly taken.
    #[serde(alias = "TwoBitCounter", alias = "2bit")]
    TwoBit,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use rvsim_tomasulo_core::config::{BranchPredictor, Config};
///
/// let json = r#"{
///     "general": { "trace": true },
///     "pipeline": { "branch_predictor": "TwoBit", "mul_latency": 3 }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert!(config.general.trace);
/// assert_eq!(config.pipeline.branch_predictor, BranchPredictor::TwoBit);
/// assert_eq!(config.pipeline.mul_latency, 3);
/// assert_eq!(config.pipeline.div_latency, 8);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// General simulation settings
    #[serde(default)]
    pub general: GeneralConfig,
    /// Guest memory layout
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Out-of-order engine parameters
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Arguments
    ///
    /// * `json` - JSON text; missing sections and fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// General simulation settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GeneralConfig {
    /// Log every retired instruction at `INFO` level.
    #[serde(default)]
    pub trace: bool,

    /// Stop after this many cycles if the guest has not exited.
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

/// Guest memory layout.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Size of the stack region at the top of the address space.
    #[serde(default = "MemoryConfig::default_stack_size")]
    pub stack_size: u32,

    /// Size of the thread-local storage window at address zero.
    #[serde(default = "MemoryConfig::default_tls_size")]
    pub tls_size: u32,

    /// Bytes mapped past the highest loaded segment.
    #[serde(default = "MemoryConfig::default_heap_headroom")]
    pub heap_headroom: u32,
}

impl MemoryConfig {
    fn default_stack_size() -> u32 {
        defaults::STACK_SIZE
    }

    fn default_tls_size() -> u32 {
        defaults::TLS_SIZE
    }

    fn default_heap_headroom() -> u32 {
        defaults::HEAP_HEADROOM
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            stack_size: defaults::STACK_SIZE,
            tls_size: defaults::TLS_SIZE,
            heap_headroom: defaults::HEAP_HEADROOM,
        }
    }
}

/// Out-of-order engine and branch predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineConfig {
    /// Branch predictor type
    #[serde(default)]
    pub branch_predictor: BranchPredictor,

    /// 2-bit predictor configuration
    #[serde(default)]
    pub two_bit: TwoBitConfig,

    /// Multiply latency (cycles in the MULDIV unit)
    #[serde(default = "PipelineConfig::default_mul_latency")]
    pub mul_latency: u32,

    /// Divide/remainder latency (cycles in the MULDIV unit)
    #[serde(default = "PipelineConfig::default_div_latency")]
    pub div_latency: u32,

    /// Load latency after disambiguation (cycles in the memory unit)
    #[serde(default = "PipelineConfig::default_cache_latency")]
    pub cache_latency: u32,

    /// Maximum instructions retired per cycle (0 = unbounded)
    #[serde(default = "PipelineConfig::default_retire_width")]
    pub retire_width: usize,

    /// Issue at most one instruction every `issue_interval` cycles
    #[serde(default = "PipelineConfig::default_issue_interval")]
    pub issue_interval: u32,
}

impl PipelineConfig {
    fn default_mul_latency() -> u32 {
        defaults::MUL_LATENCY
    }

    fn default_div_latency() -> u32 {
        defaults::DIV_LATENCY
    }

    fn default_cache_latency() -> u32 {
        defaults::CACHE_LATENCY
    }

    fn default_retire_width() -> usize {
        defaults::RETIRE_WIDTH
    }

    fn default_issue_interval() -> u32 {
        defaults::ISSUE_INTERVAL
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            branch_predictor: BranchPredictor::default(),
            two_bit: TwoBitConfig::default(),
            mul_latency: defaults::MUL_LATENCY,
            div_latency: defaults::DIV_LATENCY,
            cache_latency: defaults::CACHE_LATENCY,
            retire_width: defaults::RETIRE_WIDTH,
            issue_interval: defaults::ISSUE_INTERVAL,
        }
    }
}

/// 2-bit saturating counter predictor configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TwoBitConfig {
    /// Counter table size (log2)
    #[serde(default = "TwoBitConfig::default_table_bits")]
    pub table_bits: u32,
}

impl TwoBitConfig {
    fn default_table_bits() -> u32 {
        defaults::TWO_BIT_TABLE_BITS
    }
}

impl Default for TwoBitConfig {
    fn default() -> Self {
        Self {
            table_bits: defaults::TWO_BIT_TABLE_BITS,
        }
    }
}
