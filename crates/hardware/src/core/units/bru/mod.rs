//! Branch prediction unit (BRU) implementations.
//!
//! This module contains the direction predictors fetch can consult: a static
//! always-taken predictor and a 2-bit saturating counter table. Callers may also
//! inject their own `BranchPredictor`.

pub use self::branch_predictor::BranchPredictor;

/// Branch predictor trait.
pub mod branch_predictor;

/// Static branch predictor (always taken).
pub mod static_bp;

/// 2-bit saturating counter predictor.
pub mod two_bit;

use std::fmt;

use self::{static_bp::StaticPredictor, two_bit::TwoBitPredictor};
use crate::config::{BranchPredictor as BpType, Config};

/// Enum wrapper for static dispatch of the built-in Branch Predictors.
/// `Custom` boxes a caller-supplied predictor.
pub enum BranchPredictorWrapper {
    /// Always taken.
    Static(StaticPredictor),
    /// 2-bit saturating counters.
    TwoBit(TwoBitPredictor),
    /// Caller-supplied predictor.
    Custom(Box<dyn BranchPredictor>),
}

impl BranchPredictorWrapper {
    /// Creates the predictor selected by the configuration.
    pub fn new(config: &Config) -> Self {
        match config.pipeline.branch_predictor {
            BpType::Static => Self::Static(StaticPredictor::new()),
            BpType::TwoBit => Self::TwoBit(TwoBitPredictor::new(config.pipeline.two_bit.table_bits)),
        }
    }

    /// Wraps a caller-supplied predictor.
    pub fn custom(bp: impl BranchPredictor + 'static) -> Self {
        Self::Custom(Box::new(bp))
    }
}

impl fmt::Debug for BranchPredictorWrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(bp) => f.debug_tuple("Static").field(bp).finish(),
            Self::TwoBit(bp) => f.debug_tuple("TwoBit").field(&bp.len()).finish(),
            Self::Custom(_) => f.write_str("Custom"),
        }
    }
}

impl BranchPredictor for BranchPredictorWrapper {
    #[inline(always)]
    fn predict(&self, pc: u32) -> bool {
        match self {
            Self::Static(bp) => bp.predict(pc),
            Self::TwoBit(bp) => bp.predict(pc),
            Self::Custom(bp) => bp.predict(pc),
        }
    }

    #[inline(always)]
    fn update(&mut self, pc: u32, taken: bool) {
        match self {
            Self::Static(bp) => bp.update(pc, taken),
            Self::TwoBit(bp) => bp.update(pc, taken),
            Self::Custom(bp) => bp.update(pc, taken),
        }
    }
}
