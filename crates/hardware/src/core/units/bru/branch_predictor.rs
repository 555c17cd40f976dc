//! Branch Predictor Interface.
//!
//! This module defines the `BranchPredictor` trait every direction predictor
//! implements. Fetch queries it for conditional branches; commit trains it with
//! the resolved outcome.

/// Trait for branch direction prediction algorithms.
pub trait BranchPredictor {
    /// Predicts whether the conditional branch at `pc` will be taken.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    ///
    /// # Returns
    ///
    /// `true` to fetch from the branch target, `false` to fall through.
    fn predict(&self, pc: u32) -> bool;

    /// Trains the predictor with a resolved outcome.
    ///
    /// Called by commit when the branch retires.
    ///
    /// # Arguments
    ///
    /// * `pc` - Program counter of the branch instruction
    /// * `taken` - Whether the branch was actually taken
    fn update(&mut self, pc: u32, taken: bool);
}
