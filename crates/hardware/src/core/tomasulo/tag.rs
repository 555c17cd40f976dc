//! Reorder-buffer tags and the generational arena behind them.
//!
//! A `RobTag` is a slot index paired with the slot's generation at allocation
//! time. Freeing a slot bumps its generation, so a tag held by a reservation
//! station, the register status table, or a CDB message can never alias a
//! younger instruction that later reuses the slot: lookups with the old tag
//! simply miss.

use std::fmt;

/// Stable identity of an in-flight instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RobTag {
    index: u32,
    generation: u32,
}

impl RobTag {
    /// Slot index inside the arena.
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Generation of the slot when this tag was issued.
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for RobTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}.{}", self.index, self.generation)
    }
}

#[derive(Debug)]
struct Slot<T> {
    generation: u32,
    value: Option<T>,
}

/// Slot arena with generation-checked handles.
#[derive(Debug)]
pub struct Arena<T> {
    slots: Vec<Slot<T>>,
    free: Vec<u32>,
    len: usize,
}

impl<T> Default for Arena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Arena<T> {
    /// Creates an empty arena.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live values.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if no values are live.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stores `value` and returns its tag.
    pub fn insert(&mut self, value: T) -> RobTag {
        self.len += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.value = Some(value);
            return RobTag {
                index,
                generation: slot.generation,
            };
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            value: Some(value),
        });
        RobTag {
            index,
            generation: 0,
        }
    }

    /// Returns the value for `tag`, or `None` if the tag is stale.
    pub fn get(&self, tag: RobTag) -> Option<&T> {
        self.slots
            .get(tag.index as usize)
            .filter(|slot| slot.generation == tag.generation)
            .and_then(|slot| slot.value.as_ref())
    }

    /// Mutable variant of [`Arena::get`].
    pub fn get_mut(&mut self, tag: RobTag) -> Option<&mut T> {
        self.slots
            .get_mut(tag.index as usize)
            .filter(|slot| slot.generation == tag.generation)
            .and_then(|slot| slot.value.as_mut())
    }

    /// Removes and returns the value for `tag`; the tag becomes stale.
    pub fn remove(&mut self, tag: RobTag) -> Option<T> {
        let slot = self
            .slots
            .get_mut(tag.index as usize)
            .filter(|slot| slot.generation == tag.generation)?;
        let value = slot.value.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(tag.index);
        self.len -= 1;
        Some(value)
    }

    /// Iterates live values mutably, in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (RobTag, &mut T)> + '_ {
        self.slots.iter_mut().enumerate().filter_map(|(index, slot)| {
            let generation = slot.generation;
            slot.value.as_mut().map(|value| {
                (
                    RobTag {
                        index: index as u32,
                        generation,
                    },
                    value,
                )
            })
        })
    }

    /// Drops every live value; all outstanding tags become stale.
    pub fn clear(&mut self) {
        for (index, slot) in self.slots.iter_mut().enumerate() {
            if slot.value.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(index as u32);
            }
        }
        self.len = 0;
    }
}
