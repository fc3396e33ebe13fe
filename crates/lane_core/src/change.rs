//! Deferred structural mutation.
//!
//! Stages never create, destroy or re-tag entities while scanning.
//! Instead they record typed mutation records into a [`ChangeQueue`]
//! that the tick driver flushes once the stage's scan is complete.
//! This keeps every stage reading the consistent snapshot left by the
//! previous stage and avoids iterator invalidation.

use crate::components::{EntityId, Faction, Projectile};
use crate::math::{Fixed, Vec2Fixed};

/// One pending structural mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Set or clear an agent's target reference.
    SetTarget {
        /// Agent whose reference is updated.
        entity: EntityId,
        /// New target, or `None` to clear.
        target: Option<EntityId>,
    },
    /// Set or clear the collision-engaged flag.
    SetEngaged {
        /// Agent whose flag is updated.
        entity: EntityId,
        /// New flag value.
        engaged: bool,
    },
    /// Mark a shooter as holding an in-range target and refresh its
    /// release window.
    SetAttacking {
        /// Shooter-capable entity.
        entity: EntityId,
        /// Grace window before the flag may clear again.
        release: Fixed,
    },
    /// Remove an entity from the store.
    Destroy {
        /// Entity to remove.
        entity: EntityId,
    },
    /// Disable a building in place.
    Disable {
        /// Building to disable.
        entity: EntityId,
    },
    /// Create a projectile entity.
    SpawnProjectile {
        /// Owning faction.
        faction: Faction,
        /// Spawn position (the shooter's position).
        position: Vec2Fixed,
        /// Flight state.
        projectile: Projectile,
    },
}

/// Pending change list for one stage, applied atomically at stage end.
#[derive(Debug, Clone, Default)]
pub struct ChangeQueue {
    changes: Vec<Change>,
}

impl ChangeQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            changes: Vec::new(),
        }
    }

    /// Record a change.
    pub fn push(&mut self, change: Change) {
        self.changes.push(change);
    }

    /// Number of pending changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    /// Drain the pending changes in record order.
    pub fn drain(&mut self) -> impl Iterator<Item = Change> + '_ {
        self.changes.drain(..)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_preserves_record_order() {
        let mut queue = ChangeQueue::new();
        queue.push(Change::Destroy { entity: 2 });
        queue.push(Change::Destroy { entity: 1 });
        queue.push(Change::SetEngaged {
            entity: 3,
            engaged: true,
        });

        let drained: Vec<_> = queue.drain().collect();
        assert_eq!(drained.len(), 3);
        assert_eq!(drained[0], Change::Destroy { entity: 2 });
        assert!(queue.is_empty());
    }
}
