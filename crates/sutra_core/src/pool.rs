//! Fixed-capacity entity pool with slot recycling.
//!
//! Slots are reused in place, never deallocated, so memory stays bounded
//! regardless of how long a visualization runs. Slot indices stay stable
//! for the pool's lifetime, which lets tethers and anchors hold plain
//! indices instead of references.

use crate::entity::VisualEntity;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PoolError {
    #[error("slot {slot} out of bounds for pool of {len}")]
    SlotOutOfBounds { slot: usize, len: usize },
}

#[derive(Debug)]
pub struct EntityPool {
    slots: Vec<VisualEntity>,
    spawn_ticks: Vec<u64>,
    next_tick: u64,
    capacity: usize,
}

impl EntityPool {
    pub fn with_capacity(capacity: usize) -> Self {
        // A zero-capacity pool could never hold a spawn target.
        let capacity = capacity.max(1);
        Self {
            slots: Vec::with_capacity(capacity),
            spawn_ticks: Vec::with_capacity(capacity),
            next_tick: 0,
            capacity,
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Add an entity, recycling the oldest slot when the pool is full.
    ///
    /// Returns the slot index. Spawning never allocates beyond the fixed
    /// capacity and never fails.
    pub fn spawn(&mut self, entity: VisualEntity) -> usize {
        let tick = self.next_tick;
        self.next_tick += 1;

        if self.slots.len() < self.capacity {
            self.slots.push(entity);
            self.spawn_ticks.push(tick);
            return self.slots.len() - 1;
        }

        // Full: evict the slot that has been alive the longest.
        let slot = self
            .spawn_ticks
            .iter()
            .enumerate()
            .min_by_key(|(_, &t)| t)
            .map(|(i, _)| i)
            .unwrap_or(0);
        tracing::trace!(slot, "pool full, recycling oldest slot");
        self.slots[slot] = entity;
        self.spawn_ticks[slot] = tick;
        slot
    }

    pub fn get(&self, slot: usize) -> Result<&VisualEntity, PoolError> {
        self.slots.get(slot).ok_or(PoolError::SlotOutOfBounds {
            slot,
            len: self.slots.len(),
        })
    }

    pub fn get_mut(&mut self, slot: usize) -> Result<&mut VisualEntity, PoolError> {
        let len = self.slots.len();
        self.slots
            .get_mut(slot)
            .ok_or(PoolError::SlotOutOfBounds { slot, len })
    }

    pub fn slots(&self) -> &[VisualEntity] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [VisualEntity] {
        &mut self.slots
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualEntity> {
        self.slots.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut VisualEntity> {
        self.slots.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_spawn_fills_then_recycles_oldest() {
        let mut pool = EntityPool::with_capacity(3);
        let a = pool.spawn(VisualEntity::at(Vec3::X));
        let b = pool.spawn(VisualEntity::at(Vec3::Y));
        let c = pool.spawn(VisualEntity::at(Vec3::Z));
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(pool.len(), 3);

        // Pool is full: the next spawn reuses slot 0 (oldest).
        let d = pool.spawn(VisualEntity::at(Vec3::NEG_X));
        assert_eq!(d, 0);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(0).unwrap().position, Vec3::NEG_X);

        // And the one after that reuses slot 1.
        let e = pool.spawn(VisualEntity::at(Vec3::NEG_Y));
        assert_eq!(e, 1);
    }

    #[test]
    fn test_out_of_bounds_access_is_an_error() {
        let mut pool = EntityPool::with_capacity(2);
        pool.spawn(VisualEntity::default());
        assert_eq!(
            pool.get(5),
            Err(PoolError::SlotOutOfBounds { slot: 5, len: 1 })
        );
        assert!(pool.get_mut(1).is_err());
        assert!(pool.get(0).is_ok());
    }

    #[test]
    fn test_capacity_never_grows() {
        let mut pool = EntityPool::with_capacity(4);
        for i in 0..100 {
            pool.spawn(VisualEntity::at(Vec3::splat(i as f32)));
        }
        assert_eq!(pool.len(), 4);
        assert_eq!(pool.capacity(), 4);
    }
}
