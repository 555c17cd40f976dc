//! 2-Bit Saturating Counter Predictor.
//!
//! A table of 2-bit counters indexed by the branch's word address. Counters
//! start strongly taken (3), predict taken at 2 or 3, and saturate toward each
//! resolved outcome.
//!
//! # Performance
//!
//! - **Time Complexity:** O(1) predict and update.
//! - **Space Complexity:** O(2^N) bytes for N table bits.
//! - **Best Case:** Loop branches; a single exit costs one misprediction, not two.
//! - **Worst Case:** Aliased branches with opposite biases sharing a counter.

use super::BranchPredictor;

/// Initial counter value (strongly taken).
const INITIAL_COUNTER: u8 = 3;

/// Largest counter value.
const COUNTER_MAX: u8 = 3;

/// Counter values at or above this threshold predict taken.
const TAKEN_THRESHOLD: u8 = 2;

/// Per-PC 2-bit saturating counter predictor.
#[derive(Clone, Debug)]
pub struct TwoBitPredictor {
    /// Pattern table of 2-bit counters.
    table: Vec<u8>,
    mask: u32,
}

impl TwoBitPredictor {
    /// Creates a predictor with `2^table_bits` counters.
    ///
    /// # Arguments
    ///
    /// * `table_bits` - log2 of the table size (clamped to 1..=20).
    pub fn new(table_bits: u32) -> Self {
        let size = 1u32 << table_bits.clamp(1, 20);
        Self {
            table: vec![INITIAL_COUNTER; size as usize],
            mask: size - 1,
        }
    }

    /// Number of counters in the table.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` if the table is empty (never, after construction).
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Current counter for `pc`.
    pub fn counter(&self, pc: u32) -> u8 {
        self.table[self.index(pc)]
    }

    #[inline]
    const fn index(&self, pc: u32) -> usize {
        ((pc >> 2) & self.mask) as usize
    }
}

impl BranchPredictor for TwoBitPredictor {
    fn predict(&self, pc: u32) -> bool {
        self.counter(pc) >= TAKEN_THRESHOLD
    }

    fn update(&mut self, pc: u32, taken: bool) {
        let idx = self.index(pc);
        let counter = &mut self.table[idx];
        *counter = if taken {
            (*counter + 1).min(COUNTER_MAX)
        } else {
            counter.saturating_sub(1)
        };
    }
}
