//! Register status table.
//!
//! Maps each architectural register to the in-flight instruction that will
//! produce its next value. Only the most recent renamer owns a register:
//! releases are checked against the owning tag so an older producer retiring
//! never clears a younger claim.

use super::tag::RobTag;
use crate::common::constants::NUM_REGS;

/// Busy bit plus producer tag for each integer register.
#[derive(Clone, Debug, Default)]
pub struct RegisterStatus {
    producers: [Option<RobTag>; NUM_REGS],
}

impl RegisterStatus {
    /// Creates a table with every register idle.
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending producer of `reg`, if it is busy.
    #[inline]
    pub fn producer(&self, reg: usize) -> Option<RobTag> {
        if reg == 0 { None } else { self.producers[reg] }
    }

    /// Marks `reg` busy, owned by `tag`. Claims on x0 are ignored.
    pub fn claim(&mut self, reg: usize, tag: RobTag) {
        if reg != 0 {
            self.producers[reg] = Some(tag);
        }
    }

    /// Clears `reg` if `tag` still owns it.
    ///
    /// # Returns
    ///
    /// `true` if the busy bit was cleared.
    pub fn release(&mut self, reg: usize, tag: RobTag) -> bool {
        if self.producer(reg) == Some(tag) {
            self.producers[reg] = None;
            true
        } else {
            false
        }
    }

    /// Number of busy registers.
    pub fn busy_count(&self) -> usize {
        self.producers.iter().filter(|p| p.is_some()).count()
    }

    /// Clears every busy bit.
    pub fn clear(&mut self) {
        self.producers = [None; NUM_REGS];
    }
}
