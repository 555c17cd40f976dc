//! Static Branch Predictor.
//!
//! Implements an "Always Taken" policy for conditional branches: fetch always
//! follows the branch target, and every not-taken branch is a misprediction
//! resolved at commit.

use super::BranchPredictor;

/// Always-taken predictor. Holds no state.
#[derive(Clone, Copy, Debug, Default)]
pub struct StaticPredictor;

impl StaticPredictor {
    /// Creates a new Static Predictor.
    pub const fn new() -> Self {
        Self
    }
}

impl BranchPredictor for StaticPredictor {
    fn predict(&self, _pc: u32) -> bool {
        true
    }

    fn update(&mut self, _pc: u32, _taken: bool) {}
}
