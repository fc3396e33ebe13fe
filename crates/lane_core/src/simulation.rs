//! Core simulation loop and external interface.
//!
//! The simulation advances in discrete ticks. Each tick runs a fixed,
//! ordered pipeline: grid rebuild, sensing, melee resolution, movement,
//! shooting, attacking release, projectile flight, projectile collision
//! and death cleanup. Stages defer structural mutation into a pending
//! change list that is applied atomically between stages, so no stage
//! ever observes another stage's in-progress writes.
//!
//! External collaborators (renderer, UI, config loaders) interact only
//! through the narrow surface here: spawn requests, building
//! configuration, movement orders, health/position read-outs and the
//! per-tick destroyed/disabled notifications.
//!
//! # Example
//!
//! ```
//! use lane_core::simulation::{AgentSpawnParams, Simulation};
//! use lane_core::components::Faction;
//! use lane_core::math::{Fixed, Vec2Fixed};
//!
//! let mut sim = Simulation::new();
//! let unit = sim.spawn_agent(AgentSpawnParams::new(Vec2Fixed::ZERO, Faction::A));
//!
//! let events = sim.tick(Fixed::from_num(0.05));
//! assert!(events.destroyed.is_empty());
//! assert!(sim.position_of(unit).unwrap().x > Fixed::ZERO);
//! ```

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::change::{Change, ChangeQueue};
use crate::components::{
    AgentStats, AttackGroup, Building, EntityId, Faction, Health, HealthBarLink, MoveAxis,
    MoveOrder, Shooter, TargetMask,
};
use crate::config::SimConfig;
use crate::error::{Result, SimError};
use crate::grid::SpatialGrid;
use crate::math::{fixed_serde, Fixed, Vec2Fixed};
use crate::store::{Entity, EntityStorage};
use crate::systems;

/// Ranged-capability parameters inside a spawn request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShooterParams {
    /// Firing range in world units.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Seconds between shots. Clamped to the configured minimum.
    #[serde(with = "fixed_serde")]
    pub fire_cooldown: Fixed,
    /// Damage per projectile.
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
    /// Eligible target groups.
    pub target_mask: TargetMask,
}

/// Spawn request for a mobile agent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentSpawnParams {
    /// Initial position.
    pub position: Vec2Fixed,
    /// Owning faction.
    pub faction: Faction,
    /// Target classification.
    pub attack_group: AttackGroup,
    /// Maximum health. Clamped to at least 1.
    pub health: Fixed,
    /// Movement speed.
    pub move_speed: Fixed,
    /// Enemy detection range.
    pub detect_range: Fixed,
    /// Collision radius.
    pub radius: Fixed,
    /// Optional ranged capability.
    pub shooter: Option<ShooterParams>,
    /// Opaque visual tag for the render layer.
    pub sprite_id: Option<String>,
}

impl AgentSpawnParams {
    /// Spawn request with stock unit defaults.
    #[must_use]
    pub fn new(position: Vec2Fixed, faction: Faction) -> Self {
        Self {
            position,
            faction,
            attack_group: AttackGroup::Ground,
            health: Fixed::from_num(1),
            move_speed: Fixed::from_num(6),
            detect_range: Fixed::from_num(0.6),
            radius: Fixed::from_num(0.15),
            shooter: None,
            sprite_id: None,
        }
    }

    /// Builder method to set maximum health.
    #[must_use]
    pub fn with_health(mut self, health: Fixed) -> Self {
        self.health = health;
        self
    }

    /// Builder method to set the attack-group classification.
    #[must_use]
    pub fn with_group(mut self, group: AttackGroup) -> Self {
        self.attack_group = group;
        self
    }

    /// Builder method to attach a ranged capability.
    #[must_use]
    pub fn with_shooter(mut self, shooter: ShooterParams) -> Self {
        self.shooter = Some(shooter);
        self
    }
}

/// Spawn request for a stationary building, issued once at scene setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingSpawnParams {
    /// Position of the structure.
    pub position: Vec2Fixed,
    /// Owning faction.
    pub faction: Faction,
    /// Target classification.
    pub attack_group: AttackGroup,
    /// Maximum health. Clamped to at least 1.
    pub health: Fixed,
    /// Hitbox radius for projectile overlap tests.
    pub hitbox_radius: Fixed,
    /// Speed when executing a movement order.
    pub move_speed: Fixed,
    /// Optional ranged capability.
    pub shooter: Option<ShooterParams>,
    /// Opaque visual tag for the render layer.
    pub sprite_id: Option<String>,
}

impl BuildingSpawnParams {
    /// Spawn request with stock structure defaults.
    #[must_use]
    pub fn new(position: Vec2Fixed, faction: Faction) -> Self {
        Self {
            position,
            faction,
            attack_group: AttackGroup::Ground,
            health: Fixed::from_num(200),
            hitbox_radius: Fixed::from_num(0.65),
            move_speed: Fixed::from_num(4),
            shooter: None,
            sprite_id: None,
        }
    }
}

/// One-shot building configuration, applied at scene setup.
///
/// Optional fields override the building's shooter only when positive,
/// mirroring how absent config values leave defaults untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuildingConfig {
    /// Maximum health. Clamped to at least 1.
    pub health: Fixed,
    /// Fire cooldown in seconds. Clamped to the configured minimum.
    pub cooldown: Fixed,
    /// Target classification of the building itself.
    pub attack_group: AttackGroup,
    /// Owning faction.
    pub faction: Faction,
    /// Shooter range override.
    pub shoot_range: Option<Fixed>,
    /// Shooter damage override.
    pub damage: Option<Fixed>,
    /// Shooter target-mask override.
    pub target_mask: Option<TargetMask>,
    /// Movement speed override.
    pub move_speed: Option<Fixed>,
}

/// Alive/disabled status exposed to external observers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityStatus {
    /// Acting normally.
    Alive,
    /// A dead building: present but inert and untargetable.
    Disabled,
}

/// Notifications produced by one tick, emitted once at cleanup time.
///
/// The render layer uses these to detach health bars and sprites; the
/// simulation itself never reads them back.
#[derive(Debug, Clone, Default)]
pub struct TickEvents {
    /// Agents and projectiles removed this tick.
    pub destroyed: Vec<EntityId>,
    /// Buildings disabled this tick.
    pub disabled: Vec<EntityId>,
    /// Health-bar attachments severed from dying owners.
    pub bars_detached: Vec<(EntityId, HealthBarLink)>,
    /// Projectiles created this tick.
    pub projectiles_spawned: Vec<EntityId>,
}

/// The core battlefield simulation.
///
/// Owns the entity store and the spatial grid; both are only mutated by
/// the tick pipeline and the external interface between ticks.
#[derive(Debug, Clone)]
pub struct Simulation {
    tick: u64,
    config: SimConfig,
    entities: EntityStorage,
    grid: SpatialGrid,
}

impl Simulation {
    /// Create an empty simulation with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(SimConfig::default())
    }

    /// Create an empty simulation with explicit configuration.
    #[must_use]
    pub fn with_config(config: SimConfig) -> Self {
        Self {
            tick: 0,
            config,
            entities: EntityStorage::new(),
            grid: SpatialGrid::new(config.cell_size),
        }
    }

    /// Get the current tick number.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Get the active configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a reference to the entity storage.
    #[must_use]
    pub fn entities(&self) -> &EntityStorage {
        &self.entities
    }

    /// Get an entity by id.
    #[must_use]
    pub fn get_entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(id)
    }

    // ------------------------------------------------------------------
    // External interface
    // ------------------------------------------------------------------

    /// Spawn a mobile agent, returning its id.
    ///
    /// Nonsensical values are normalized rather than rejected: health is
    /// clamped to at least 1 and shooter cooldowns to the configured
    /// minimum.
    pub fn spawn_agent(&mut self, params: AgentSpawnParams) -> EntityId {
        let mut entity = Entity::new(0, params.position, params.faction);
        entity.attack_group = params.attack_group;
        entity.health = Some(Health::new(params.health));
        entity.agent = Some(AgentStats {
            move_speed: params.move_speed,
            detect_range: params.detect_range,
            radius: params.radius,
        });
        entity.shooter = params.shooter.map(|p| self.normalized_shooter(p));
        entity.sprite_id = params.sprite_id;

        let id = self.entities.insert(entity);
        tracing::trace!(id, faction = ?params.faction, "agent spawned");
        id
    }

    /// Spawn a stationary building, returning its id.
    pub fn spawn_building(&mut self, params: BuildingSpawnParams) -> EntityId {
        let mut entity = Entity::new(0, params.position, params.faction);
        entity.attack_group = params.attack_group;
        entity.health = Some(Health::new(params.health));
        entity.building = Some(Building::new(params.hitbox_radius, params.move_speed));
        entity.shooter = params.shooter.map(|p| self.normalized_shooter(p));
        entity.sprite_id = params.sprite_id;

        let id = self.entities.insert(entity);
        tracing::trace!(id, faction = ?params.faction, "building spawned");
        id
    }

    /// Apply a setup-time configuration to an existing building.
    ///
    /// Ensures the building has a shooter (stock turret defaults) and
    /// applies positive overrides; health is reset to the configured
    /// maximum.
    pub fn apply_building_config(&mut self, id: EntityId, cfg: BuildingConfig) -> Result<()> {
        let min_cooldown = self.config.min_cooldown;
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(SimError::EntityNotFound(id))?;
        if entity.building.is_none() {
            return Err(SimError::NotABuilding(id));
        }

        entity.faction = cfg.faction;
        entity.attack_group = cfg.attack_group;
        entity.health = Some(Health::new(cfg.health));

        let shooter = entity.shooter.get_or_insert_with(|| {
            Shooter::new(
                Fixed::from_num(7.5),
                cfg.cooldown,
                Fixed::from_num(1),
                TargetMask::ALL,
            )
        });
        shooter.fire_cooldown = cfg.cooldown.max(min_cooldown);
        if let Some(range) = cfg.shoot_range.filter(|r| *r > Fixed::ZERO) {
            shooter.range = range;
        }
        if let Some(damage) = cfg.damage.filter(|d| *d > Fixed::ZERO) {
            shooter.damage = damage;
        }
        if let Some(mask) = cfg.target_mask.filter(|m| m.0 != 0) {
            shooter.target_mask = mask;
        }
        if let Some(speed) = cfg.move_speed.filter(|s| *s > Fixed::ZERO) {
            if let Some(building) = entity.building.as_mut() {
                building.move_speed = speed;
            }
        }
        Ok(())
    }

    /// Issue a movement order to a building.
    ///
    /// Orders to dead or disabled buildings are silently dropped; they
    /// never move again.
    pub fn issue_move_order(
        &mut self,
        id: EntityId,
        destination: Vec2Fixed,
        axis: MoveAxis,
    ) -> Result<()> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(SimError::EntityNotFound(id))?;
        let alive = entity.is_alive();
        let Some(building) = entity.building.as_mut() else {
            return Err(SimError::NotABuilding(id));
        };
        if alive {
            building.move_order = Some(MoveOrder { destination, axis });
        } else {
            tracing::trace!(id, "move order to dead building dropped");
        }
        Ok(())
    }

    /// Register a renderer health-bar attachment for an entity.
    pub fn attach_health_bar(&mut self, id: EntityId, link: HealthBarLink) -> Result<()> {
        let entity = self
            .entities
            .get_mut(id)
            .ok_or(SimError::EntityNotFound(id))?;
        entity.health_bar = Some(link);
        Ok(())
    }

    /// Poll an entity's health. `None` if the entity no longer exists.
    #[must_use]
    pub fn health_of(&self, id: EntityId) -> Option<Health> {
        self.entities.get(id).and_then(|e| e.health)
    }

    /// Poll an entity's position.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<Vec2Fixed> {
        self.entities.get(id).map(|e| e.position)
    }

    /// Poll an entity's alive/disabled status.
    #[must_use]
    pub fn status_of(&self, id: EntityId) -> Option<EntityStatus> {
        self.entities.get(id).map(|e| {
            if e.building.map_or(false, |b| b.disabled) {
                EntityStatus::Disabled
            } else {
                EntityStatus::Alive
            }
        })
    }

    // ------------------------------------------------------------------
    // Tick pipeline
    // ------------------------------------------------------------------

    /// Advance the simulation by one tick of `dt` seconds.
    ///
    /// Stage order is fixed: grid rebuild, sensor, melee resolver,
    /// movement, shooting, attacking release, projectile move,
    /// projectile hit, cleanup. Returns the notifications produced by
    /// this tick.
    pub fn tick(&mut self, dt: Fixed) -> TickEvents {
        let mut events = TickEvents::default();
        let mut changes = ChangeQueue::new();

        systems::build_grid(&self.entities, &mut self.grid);

        systems::sense_and_tag(&self.entities, &self.grid, &mut changes);
        self.apply_changes(&mut changes, &mut events);

        systems::resolve_melee(&self.entities, &mut changes);
        self.apply_changes(&mut changes, &mut events);

        systems::seek_or_lane_move(&mut self.entities, dt);
        systems::building_order_move(&mut self.entities, &self.config, dt);

        systems::shooting(&mut self.entities, &self.grid, &self.config, dt, &mut changes);
        self.apply_changes(&mut changes, &mut events);

        systems::attacking_release(&mut self.entities, dt);

        systems::projectile_move(&mut self.entities, dt, &mut changes);
        self.apply_changes(&mut changes, &mut events);

        systems::projectile_hit(&mut self.entities, &self.grid, &mut changes);
        self.apply_changes(&mut changes, &mut events);

        systems::death_cleanup(&self.entities, &mut changes);
        self.apply_changes(&mut changes, &mut events);

        self.tick += 1;
        tracing::debug!(
            tick = self.tick,
            entities = self.entities.len(),
            destroyed = events.destroyed.len(),
            disabled = events.disabled.len(),
            "tick complete"
        );
        events
    }

    /// Flush a pending change list against the store.
    ///
    /// Changes referencing entities that no longer exist are absorbed
    /// silently; duplicate destroys report at most one notification.
    fn apply_changes(&mut self, changes: &mut ChangeQueue, events: &mut TickEvents) {
        for change in changes.drain() {
            match change {
                Change::SetTarget { entity, target } => {
                    if let Some(e) = self.entities.get_mut(entity) {
                        e.target = target;
                    }
                }
                Change::SetEngaged { entity, engaged } => {
                    if let Some(e) = self.entities.get_mut(entity) {
                        e.engaged = engaged;
                    }
                }
                Change::SetAttacking { entity, release } => {
                    if let Some(shooter) =
                        self.entities.get_mut(entity).and_then(|e| e.shooter.as_mut())
                    {
                        shooter.attacking = true;
                        shooter.release_left = release;
                    }
                }
                Change::Destroy { entity } => {
                    if let Some(removed) = self.entities.remove(entity) {
                        if let Some(link) = removed.health_bar {
                            events.bars_detached.push((entity, link));
                        }
                        events.destroyed.push(entity);
                    }
                }
                Change::Disable { entity } => {
                    if let Some(e) = self.entities.get_mut(entity) {
                        let newly_disabled = e.building.as_mut().map_or(false, |b| {
                            if b.disabled {
                                false
                            } else {
                                b.disabled = true;
                                b.move_order = None;
                                true
                            }
                        });
                        if newly_disabled {
                            if let Some(link) = e.health_bar.take() {
                                events.bars_detached.push((entity, link));
                            }
                            events.disabled.push(entity);
                        }
                    }
                }
                Change::SpawnProjectile {
                    faction,
                    position,
                    projectile,
                } => {
                    let mut entity = Entity::new(0, position, faction);
                    entity.projectile = Some(projectile);
                    let id = self.entities.insert(entity);
                    events.projectiles_spawned.push(id);
                }
            }
        }
    }

    fn normalized_shooter(&self, params: ShooterParams) -> Shooter {
        Shooter::new(
            params.range,
            params.fire_cooldown.max(self.config.min_cooldown),
            params.damage,
            params.target_mask,
        )
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Two simulations that ran the same inputs produce identical
    /// hashes; the cleanup-idempotence tests also rely on this.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.tick.hash(&mut hasher);

        let ids = self.entities.sorted_ids();
        ids.len().hash(&mut hasher);
        for id in ids {
            let Some(entity) = self.entities.get(id) else {
                continue;
            };
            id.hash(&mut hasher);
            entity.position.x.to_bits().hash(&mut hasher);
            entity.position.y.to_bits().hash(&mut hasher);
            entity.target.hash(&mut hasher);
            entity.engaged.hash(&mut hasher);
            if let Some(health) = entity.health {
                health.current.to_bits().hash(&mut hasher);
                health.max.to_bits().hash(&mut hasher);
            }
            if let Some(shooter) = entity.shooter {
                shooter.cooldown_remaining.to_bits().hash(&mut hasher);
                shooter.attacking.hash(&mut hasher);
            }
            if let Some(projectile) = entity.projectile {
                projectile.lifetime_left.to_bits().hash(&mut hasher);
            }
            if let Some(building) = entity.building {
                building.disabled.hash(&mut hasher);
            }
        }
        hasher.finish()
    }
}

impl Default for Simulation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fx(v: f64) -> Fixed {
        Fixed::from_num(v)
    }

    const DT: f64 = 0.05;

    #[test]
    fn test_simulation_new() {
        let sim = Simulation::new();
        assert_eq!(sim.get_tick(), 0);
        assert!(sim.entities().is_empty());
    }

    #[test]
    fn test_spawn_roundtrip_before_any_tick() {
        let mut sim = Simulation::new();
        let pos = Vec2Fixed::new(fx(3.0), fx(-1.5));
        let id = sim.spawn_agent(
            AgentSpawnParams::new(pos, Faction::B).with_health(fx(25.0)),
        );

        assert_eq!(sim.position_of(id), Some(pos));
        let health = sim.health_of(id).unwrap();
        assert_eq!(health.current, fx(25.0));
        assert_eq!(health.max, fx(25.0));
        assert_eq!(sim.status_of(id), Some(EntityStatus::Alive));
    }

    #[test]
    fn test_spawn_normalizes_bad_values() {
        let mut sim = Simulation::new();
        let id = sim.spawn_agent(
            AgentSpawnParams::new(Vec2Fixed::ZERO, Faction::A)
                .with_health(fx(-10.0))
                .with_shooter(ShooterParams {
                    range: fx(5.0),
                    fire_cooldown: fx(-1.0),
                    damage: fx(2.0),
                    target_mask: TargetMask::ALL,
                }),
        );

        let entity = sim.get_entity(id).unwrap();
        assert_eq!(entity.health.unwrap().max, fx(1.0));
        assert!(entity.shooter.unwrap().fire_cooldown >= sim.config().min_cooldown);
    }

    #[test]
    fn test_tick_increments() {
        let mut sim = Simulation::new();
        sim.tick(fx(DT));
        sim.tick(fx(DT));
        assert_eq!(sim.get_tick(), 2);
    }

    #[test]
    fn test_mutual_melee_annihilation_in_one_tick() {
        let mut sim = Simulation::new();
        let a = sim.spawn_agent(AgentSpawnParams::new(Vec2Fixed::ZERO, Faction::A));
        let b = sim.spawn_agent(AgentSpawnParams::new(
            Vec2Fixed::new(fx(0.2), fx(0.0)),
            Faction::B,
        ));

        let events = sim.tick(fx(DT));
        assert!(events.destroyed.contains(&a));
        assert!(events.destroyed.contains(&b));
        assert!(sim.get_entity(a).is_none());
        assert!(sim.get_entity(b).is_none());
    }

    #[test]
    fn test_destroyed_reported_once_per_entity() {
        let mut sim = Simulation::new();
        let a = sim.spawn_agent(AgentSpawnParams::new(Vec2Fixed::ZERO, Faction::A));
        let _b = sim.spawn_agent(AgentSpawnParams::new(
            Vec2Fixed::new(fx(0.2), fx(0.0)),
            Faction::B,
        ));

        let events = sim.tick(fx(DT));
        assert_eq!(events.destroyed.iter().filter(|&&id| id == a).count(), 1);
    }

    #[test]
    fn test_dead_building_disabled_and_order_discarded() {
        let mut sim = Simulation::new();
        let b = sim.spawn_building(BuildingSpawnParams::new(Vec2Fixed::ZERO, Faction::A));
        sim.issue_move_order(b, Vec2Fixed::new(fx(5.0), fx(0.0)), MoveAxis::Free)
            .unwrap();

        sim.get_entity(b).unwrap();
        sim.entities
            .get_mut(b)
            .unwrap()
            .health
            .as_mut()
            .unwrap()
            .current = Fixed::ZERO;

        let events = sim.tick(fx(DT));
        assert!(events.disabled.contains(&b));
        assert_eq!(sim.status_of(b), Some(EntityStatus::Disabled));
        // Record persists at its original position, order forgotten.
        assert_eq!(sim.position_of(b), Some(Vec2Fixed::ZERO));
        assert!(sim
            .get_entity(b)
            .unwrap()
            .building
            .unwrap()
            .move_order
            .is_none());

        // Ticking again produces no further notifications for it.
        let events = sim.tick(fx(DT));
        assert!(!events.disabled.contains(&b));
    }

    #[test]
    fn test_cleanup_idempotent() {
        let mut sim = Simulation::new();
        sim.spawn_agent(AgentSpawnParams::new(Vec2Fixed::ZERO, Faction::A));
        let b = sim.spawn_building(BuildingSpawnParams::new(
            Vec2Fixed::new(fx(10.0), fx(0.0)),
            Faction::B,
        ));
        sim.entities
            .get_mut(b)
            .unwrap()
            .health
            .as_mut()
            .unwrap()
            .current = fx(-1.0);
        sim.tick(fx(DT));

        // Re-running the cleanup stage on an already-clean store is a no-op.
        let before = sim.state_hash();
        let mut changes = ChangeQueue::new();
        let mut events = TickEvents::default();
        systems::death_cleanup(&sim.entities, &mut changes);
        sim.apply_changes(&mut changes, &mut events);
        assert!(events.destroyed.is_empty());
        assert!(events.disabled.is_empty());
        assert_eq!(sim.state_hash(), before);
    }

    #[test]
    fn test_bars_detached_on_death() {
        let mut sim = Simulation::new();
        let a = sim.spawn_agent(AgentSpawnParams::new(Vec2Fixed::ZERO, Faction::A));
        let link = HealthBarLink {
            background: 901,
            fill: 902,
        };
        sim.attach_health_bar(a, link).unwrap();
        sim.entities
            .get_mut(a)
            .unwrap()
            .health
            .as_mut()
            .unwrap()
            .current = Fixed::ZERO;

        let events = sim.tick(fx(DT));
        assert!(events.bars_detached.contains(&(a, link)));
        assert!(events.destroyed.contains(&a));
    }

    #[test]
    fn test_move_order_rejects_non_building() {
        let mut sim = Simulation::new();
        let a = sim.spawn_agent(AgentSpawnParams::new(Vec2Fixed::ZERO, Faction::A));
        let err = sim
            .issue_move_order(a, Vec2Fixed::ZERO, MoveAxis::Free)
            .unwrap_err();
        assert!(matches!(err, SimError::NotABuilding(_)));

        let err = sim
            .issue_move_order(999, Vec2Fixed::ZERO, MoveAxis::Free)
            .unwrap_err();
        assert!(matches!(err, SimError::EntityNotFound(999)));
    }

    #[test]
    fn test_deterministic_hash() {
        let build = || {
            let mut sim = Simulation::new();
            sim.spawn_agent(AgentSpawnParams::new(Vec2Fixed::ZERO, Faction::A));
            sim.spawn_agent(AgentSpawnParams::new(
                Vec2Fixed::new(fx(4.0), fx(0.0)),
                Faction::B,
            ));
            for _ in 0..10 {
                sim.tick(fx(DT));
            }
            sim.state_hash()
        };
        assert_eq!(build(), build());
    }
}
