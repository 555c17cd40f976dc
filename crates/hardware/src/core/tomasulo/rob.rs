//! Reorder Buffer (ROB) for in-order commit.
//!
//! The ROB records every in-flight instruction in program order. It provides:
//! 1. **Allocation:** Appends an entry at the tail and hands back a stable tag.
//! 2. **Lookup:** Tag-checked access for units that outlive an entry's position.
//! 3. **In-order Retirement:** Only the head may leave, via `pop_head`.
//! 4. **Disambiguation Walk:** Iterates entries older than a given one, youngest first.
//! 5. **Flush:** Drops every entry; outstanding tags go stale.
//!
//! Storage is a generational arena; program order is a queue of tags.

use std::collections::VecDeque;

use super::tag::{Arena, RobTag};
use crate::common::{Result, SimError};
use crate::isa::Instruction;

/// A single entry in the Reorder Buffer.
#[derive(Debug)]
pub struct RobEntry {
    /// The instruction.
    pub inst: Instruction,
    /// Destination register (x10 for ECALL, 0 for none).
    pub rd: usize,
    /// Effective address of a store or AMO.
    pub addr: u32,
    /// Result (or, for stores, issue) has been recorded.
    pub complete: bool,
    /// Register result, branch outcome, or ECALL return pc.
    pub value: u32,
    /// Word a store or AMO writes back at commit.
    pub mem_value: u32,
    /// `addr` is valid.
    pub addr_ready: bool,
    /// `mem_value` (or, for ECALL, `value`) is valid.
    pub value_ready: bool,
    /// Write-latency cycles spent while at the head.
    pub progress: u32,
    /// Pending producer of the store data operand.
    pub data_source: Option<RobTag>,
    /// Fault raised when the entry reaches the head.
    pub fault: Option<SimError>,
}

impl RobEntry {
    /// Creates a fresh entry for `inst` writing `rd`.
    pub const fn new(inst: Instruction, rd: usize) -> Self {
        Self {
            inst,
            rd,
            addr: 0,
            complete: false,
            value: 0,
            mem_value: 0,
            addr_ready: false,
            value_ready: false,
            progress: 0,
            data_source: None,
            fault: None,
        }
    }

    /// Creates an entry that will raise `fault` at commit instead of executing.
    pub fn faulted(inst: Instruction, fault: SimError) -> Self {
        Self {
            fault: Some(fault),
            ..Self::new(inst, 0)
        }
    }

    /// Stores and non-LR AMOs write memory at commit.
    pub fn is_store_class(&self) -> bool {
        self.inst.is_store_class()
    }
}

/// Reorder Buffer: unbounded, strictly FIFO.
#[derive(Debug, Default)]
pub struct ReorderBuffer {
    entries: Arena<RobEntry>,
    order: VecDeque<RobTag>,
}

impl ReorderBuffer {
    /// Creates an empty ROB.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of in-flight entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if nothing is in flight.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Appends `entry` at the tail.
    pub fn push(&mut self, entry: RobEntry) -> RobTag {
        let tag = self.entries.insert(entry);
        self.order.push_back(tag);
        tag
    }

    /// Tag of the oldest entry.
    pub fn head(&self) -> Option<RobTag> {
        self.order.front().copied()
    }

    /// Returns `true` if `tag` is the oldest entry.
    pub fn is_head(&self, tag: RobTag) -> bool {
        self.head() == Some(tag)
    }

    /// Looks up a live entry.
    pub fn get(&self, tag: RobTag) -> Result<&RobEntry> {
        self.entries.get(tag).ok_or(SimError::StaleTag(tag))
    }

    /// Looks up a live entry mutably.
    pub fn get_mut(&mut self, tag: RobTag) -> Result<&mut RobEntry> {
        self.entries.get_mut(tag).ok_or(SimError::StaleTag(tag))
    }

    /// Looks up an entry that may already have retired or been squashed.
    pub fn try_get(&self, tag: RobTag) -> Option<&RobEntry> {
        self.entries.get(tag)
    }

    /// Removes the head entry.
    pub fn pop_head(&mut self) -> Result<Option<(RobTag, RobEntry)>> {
        let Some(tag) = self.order.pop_front() else {
            return Ok(None);
        };
        let entry = self.entries.remove(tag).ok_or(SimError::StaleTag(tag))?;
        Ok(Some((tag, entry)))
    }

    /// Iterates entries from head to tail.
    pub fn iter(&self) -> impl Iterator<Item = (RobTag, &RobEntry)> + '_ {
        self.order
            .iter()
            .filter_map(|tag| self.entries.get(*tag).map(|entry| (*tag, entry)))
    }

    /// Visits every live entry mutably, in no particular order.
    pub fn for_each_mut(&mut self, mut f: impl FnMut(RobTag, &mut RobEntry)) {
        for (tag, entry) in self.entries.iter_mut() {
            f(tag, entry);
        }
    }

    /// Iterates entries strictly older than `tag`, youngest first.
    ///
    /// Yields nothing if `tag` is not in flight.
    pub fn older_than(&self, tag: RobTag) -> impl Iterator<Item = (RobTag, &RobEntry)> + '_ {
        let pos = self.order.iter().position(|t| *t == tag).unwrap_or(0);
        self.order
            .iter()
            .take(pos)
            .rev()
            .filter_map(|tag| self.entries.get(*tag).map(|entry| (*tag, entry)))
    }

    /// Drops every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}
