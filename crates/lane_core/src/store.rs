//! Entity storage.
//!
//! All combat entities live in one store as a single record with
//! optional capability components. Agents, buildings and projectiles
//! are distinguished by which capabilities they carry, so shooting and
//! targetability work across kinds without inheritance.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::components::{
    AgentStats, AttackGroup, Building, EntityId, Faction, Health, HealthBarLink, Projectile,
    Shooter,
};
use crate::math::Vec2Fixed;

/// An entity with optional capability components.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier for this entity.
    pub id: EntityId,
    /// World position.
    pub position: Vec2Fixed,
    /// Owning faction.
    pub faction: Faction,
    /// Target classification when this entity is shot at.
    pub attack_group: AttackGroup,
    /// Health for damageable entities. Projectiles carry none.
    pub health: Option<Health>,
    /// Mobile-unit capability.
    pub agent: Option<AgentStats>,
    /// Stationary-structure capability.
    pub building: Option<Building>,
    /// Ranged capability.
    pub shooter: Option<Shooter>,
    /// Projectile flight state.
    pub projectile: Option<Projectile>,
    /// Current target reference, recomputed every tick by the sensor.
    pub target: Option<EntityId>,
    /// Melee-contact flag; while set, seek/lane movement is suppressed.
    pub engaged: bool,
    /// Renderer health-bar attachment, severed on death.
    pub health_bar: Option<HealthBarLink>,
    /// Opaque visual tag for the render layer; never read by the pipeline.
    pub sprite_id: Option<String>,
}

impl Entity {
    /// Create a bare entity with no capabilities.
    #[must_use]
    pub fn new(id: EntityId, position: Vec2Fixed, faction: Faction) -> Self {
        Self {
            id,
            position,
            faction,
            attack_group: AttackGroup::default(),
            health: None,
            agent: None,
            building: None,
            shooter: None,
            projectile: None,
            target: None,
            engaged: false,
            health_bar: None,
            sprite_id: None,
        }
    }

    /// Check whether this entity is a mobile agent.
    #[must_use]
    pub fn is_agent(&self) -> bool {
        self.agent.is_some()
    }

    /// Check whether this entity is a building.
    #[must_use]
    pub fn is_building(&self) -> bool {
        self.building.is_some()
    }

    /// Alive check used by targeting and shooting: positive health and,
    /// for buildings, not disabled.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        if let Some(building) = &self.building {
            if building.disabled {
                return false;
            }
        }
        self.health.map_or(false, |h| !h.is_dead())
    }

    /// Whether the shooter capability currently pauses this entity.
    #[must_use]
    pub fn is_attacking(&self) -> bool {
        self.shooter.map_or(false, |s| s.attacking)
    }
}

/// Storage for all entities in the simulation.
///
/// Uses a `HashMap` for O(1) lookup by id, with deterministic iteration
/// via sorted keys when processing stages. Ids are handed out
/// monotonically and never reused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntityStorage {
    entities: HashMap<EntityId, Entity>,
    next_id: EntityId,
}

impl EntityStorage {
    /// Create empty entity storage.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entities: HashMap::new(),
            next_id: 1,
        }
    }

    /// Insert a new entity and return its assigned id.
    pub fn insert(&mut self, mut entity: Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        entity.id = id;
        self.entities.insert(id, entity);
        id
    }

    /// Remove an entity by id.
    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        self.entities.remove(&id)
    }

    /// Get an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Get a mutable reference to an entity by id.
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Check if an entity exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Get the number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if storage is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Get sorted entity ids for deterministic iteration.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<_> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Iterate over all entities (not in deterministic order).
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId, &Entity)> {
        self.entities.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Fixed;

    #[test]
    fn test_ids_are_monotonic_and_never_reused() {
        let mut store = EntityStorage::new();
        let a = store.insert(Entity::new(0, Vec2Fixed::ZERO, Faction::A));
        let b = store.insert(Entity::new(0, Vec2Fixed::ZERO, Faction::B));
        assert!(b > a);

        store.remove(a);
        let c = store.insert(Entity::new(0, Vec2Fixed::ZERO, Faction::A));
        assert!(c > b);
    }

    #[test]
    fn test_disabled_building_is_not_alive() {
        let mut entity = Entity::new(1, Vec2Fixed::ZERO, Faction::A);
        entity.health = Some(Health::new(Fixed::from_num(100)));
        entity.building = Some(Building::new(Fixed::from_num(0.65), Fixed::from_num(4)));
        assert!(entity.is_alive());

        entity.building.as_mut().unwrap().disabled = true;
        assert!(!entity.is_alive());
    }

    #[test]
    fn test_sorted_ids_deterministic() {
        let mut store = EntityStorage::new();
        for _ in 0..5 {
            store.insert(Entity::new(0, Vec2Fixed::ZERO, Faction::A));
        }
        assert_eq!(store.sorted_ids(), vec![1, 2, 3, 4, 5]);
    }
}
