//! Obstacle storage.
//!
//! One arena holds every obstacle; "static" and "dynamic" are filters over
//! it, not separate lists.  Handles stay valid across unrelated removals:
//! removing an obstacle leaves a free slot that a later insert reuses, so an
//! `ObstacleId` held by the host keeps pointing at the obstacle it named (or
//! at nothing, never at a shifted neighbor).

use std::fmt;

use crate::obstacle::Obstacle;

// ── ObstacleId ────────────────────────────────────────────────────────────────

/// Stable handle to an obstacle in an [`ObstacleArena`].
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObstacleId(pub u32);

impl ObstacleId {
    /// Sentinel meaning "no valid ID".
    pub const INVALID: ObstacleId = ObstacleId(u32::MAX);

    /// Cast to `usize` for direct slot indexing.
    #[inline(always)]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl Default for ObstacleId {
    /// Returns the `INVALID` sentinel so uninitialized IDs are visibly invalid.
    #[inline(always)]
    fn default() -> Self {
        Self::INVALID
    }
}

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObstacleId({})", self.0)
    }
}

// ── ObstacleArena ─────────────────────────────────────────────────────────────

/// Slot arena with stable indices and free-slot reuse.
#[derive(Clone, Debug, Default)]
pub struct ObstacleArena {
    slots: Vec<Option<Obstacle>>,
    live: usize,
}

impl ObstacleArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an obstacle, reusing the first free slot if one exists.
    pub fn insert(&mut self, obstacle: Obstacle) -> ObstacleId {
        self.live += 1;
        match self.slots.iter().position(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(obstacle);
                ObstacleId(slot as u32)
            }
            None => {
                self.slots.push(Some(obstacle));
                ObstacleId((self.slots.len() - 1) as u32)
            }
        }
    }

    /// Remove and return the obstacle at `id`, if it exists.
    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        let removed = self.slots.get_mut(id.index()).and_then(Option::take);
        if removed.is_some() {
            self.live -= 1;
        }
        removed
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: ObstacleId) -> Option<&mut Obstacle> {
        self.slots.get_mut(id.index()).and_then(Option::as_mut)
    }

    /// Number of live obstacles (not slots).
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    /// Drop every obstacle and all slot history.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.live = 0;
    }

    // ── Iteration ─────────────────────────────────────────────────────────

    pub fn iter(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|o| (ObstacleId(i as u32), o)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (ObstacleId, &mut Obstacle)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_mut().map(|o| (ObstacleId(i as u32), o)))
    }

    /// Live obstacles that never move.
    pub fn statics(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.iter().filter(|(_, o)| !o.is_dynamic())
    }

    /// Live obstacles with a motion model.
    pub fn dynamics(&self) -> impl Iterator<Item = (ObstacleId, &Obstacle)> {
        self.iter().filter(|(_, o)| o.is_dynamic())
    }
}
