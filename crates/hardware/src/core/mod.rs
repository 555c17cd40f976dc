//! Core processor implementation.
//!
//! This module contains the Tomasulo out-of-order engine and the functional
//! units it schedules work onto.

/// Tomasulo engine (renaming, reservation stations, ROB, CDB, commit).
pub mod tomasulo;

/// Execution units (ALU, MDU, LSU helpers, branch predictors).
pub mod units;

pub use self::tomasulo::Tomasulo;
