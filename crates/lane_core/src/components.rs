//! Entity component definitions.
//!
//! Components are pure data with no behavior beyond small helpers. An
//! entity is composed from these records; capabilities such as shooting
//! or a building hitbox are attachable to any entity kind.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed, Vec2Fixed};

/// Unique identifier for entities.
pub type EntityId = u64;

/// One of the two opposing sides.
///
/// Every interaction - targeting, melee contact, projectile hits -
/// only ever applies across factions, never within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Left-side faction, advances toward +X.
    A,
    /// Right-side faction, advances toward -X.
    B,
}

impl Faction {
    /// Check whether another faction is a valid target for this one.
    #[must_use]
    pub const fn opposes(self, other: Self) -> bool {
        !matches!((self, other), (Self::A, Self::A) | (Self::B, Self::B))
    }

    /// Default lane travel direction along the X axis.
    #[must_use]
    pub fn lane_direction(self) -> Fixed {
        match self {
            Self::A => Fixed::from_num(1),
            Self::B => Fixed::from_num(-1),
        }
    }
}

/// Target classification for an entity.
///
/// Shooters gate candidate eligibility through a bitmask over this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum AttackGroup {
    /// Ground units and structures.
    #[default]
    Ground,
    /// Airborne units.
    Air,
    /// Orbital platforms.
    Orbital,
}

impl AttackGroup {
    /// Bit for this group inside a [`TargetMask`].
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::Ground => 1 << 0,
            Self::Air => 1 << 1,
            Self::Orbital => 1 << 2,
        }
    }
}

/// Bitmask over [`AttackGroup`] gating what a shooter may hit.
///
/// An empty mask means "all groups eligible" - this matches how building
/// configs with no `canAttack` list behave.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TargetMask(pub u8);

impl TargetMask {
    /// Mask that allows every group.
    pub const ALL: Self = Self(0);

    /// Build a mask from a list of allowed groups.
    #[must_use]
    pub fn from_groups(groups: &[AttackGroup]) -> Self {
        Self(groups.iter().fold(0, |m, g| m | g.bit()))
    }

    /// Add a group to the mask.
    #[must_use]
    pub const fn with_group(self, group: AttackGroup) -> Self {
        Self(self.0 | group.bit())
    }

    /// Check whether a group is an eligible target under this mask.
    #[must_use]
    pub const fn allows(self, group: AttackGroup) -> bool {
        self.0 == 0 || self.0 & group.bit() != 0
    }
}

/// Health component for damageable entities.
///
/// Damage is plain subtraction; intermediate negative values are
/// tolerated within a tick and resolved by the cleanup stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Current health points. May dip below zero mid-tick.
    #[serde(with = "fixed_serde")]
    pub current: Fixed,
    /// Maximum health points.
    #[serde(with = "fixed_serde")]
    pub max: Fixed,
}

impl Health {
    /// Create new health at full, clamped to at least 1.
    #[must_use]
    pub fn new(max: Fixed) -> Self {
        let max = max.max(Fixed::from_num(1));
        Self { current: max, max }
    }

    /// Check if the entity is dead (health <= 0).
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.current <= Fixed::ZERO
    }

    /// Apply damage.
    pub fn apply_damage(&mut self, amount: Fixed) {
        self.current -= amount;
    }

    /// Health as a fraction of maximum, clamped to [0, 1].
    #[must_use]
    pub fn fraction(&self) -> Fixed {
        if self.max <= Fixed::ZERO {
            return Fixed::ZERO;
        }
        (self.current / self.max).clamp(Fixed::ZERO, Fixed::from_num(1))
    }
}

/// Mobile-unit stats for agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    /// Movement speed in world units per second.
    #[serde(with = "fixed_serde")]
    pub move_speed: Fixed,
    /// How far the agent senses enemies.
    #[serde(with = "fixed_serde")]
    pub detect_range: Fixed,
    /// Collision proximity radius.
    #[serde(with = "fixed_serde")]
    pub radius: Fixed,
}

/// Ranged capability attachable to agents and buildings.
///
/// An entity without this component never fires. The cooldown timer and
/// the attacking/release state live here alongside the configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shooter {
    /// Firing range in world units.
    #[serde(with = "fixed_serde")]
    pub range: Fixed,
    /// Seconds between shots.
    #[serde(with = "fixed_serde")]
    pub fire_cooldown: Fixed,
    /// Damage dealt by each projectile.
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
    /// Which attack groups this shooter may hit.
    pub target_mask: TargetMask,
    /// Remaining cooldown before the next shot.
    #[serde(with = "fixed_serde")]
    pub cooldown_remaining: Fixed,
    /// Whether the shooter currently holds an in-range target. While
    /// set, the entity's own movement is suppressed.
    pub attacking: bool,
    /// Time left on the attacking-release grace window.
    #[serde(with = "fixed_serde")]
    pub release_left: Fixed,
}

impl Shooter {
    /// Create a shooter. The cooldown starts elapsed so the first shot
    /// fires as soon as a target is acquired.
    #[must_use]
    pub fn new(range: Fixed, fire_cooldown: Fixed, damage: Fixed, target_mask: TargetMask) -> Self {
        Self {
            range,
            fire_cooldown,
            damage,
            target_mask,
            cooldown_remaining: Fixed::ZERO,
            attacking: false,
            release_left: Fixed::ZERO,
        }
    }

    /// Check if the cooldown has elapsed.
    #[must_use]
    pub fn can_fire(&self) -> bool {
        self.cooldown_remaining <= Fixed::ZERO
    }

    /// Reset the cooldown after firing.
    pub fn reset_cooldown(&mut self) {
        self.cooldown_remaining = self.fire_cooldown;
    }

    /// Tick down the cooldown by elapsed time.
    ///
    /// Only decrements while positive, so overshoot past zero is
    /// bounded by a single tick's worth of elapsed time.
    pub fn tick_cooldown(&mut self, dt: Fixed) {
        if self.cooldown_remaining > Fixed::ZERO {
            self.cooldown_remaining -= dt;
        }
    }
}

/// Axis constraint for building movement orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MoveAxis {
    /// Unconstrained 2D movement.
    #[default]
    Free,
    /// Movement locked to the building's current Y.
    HorizontalOnly,
}

/// An externally-issued movement order for a building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveOrder {
    /// Destination position.
    pub destination: Vec2Fixed,
    /// Axis constraint applied while traveling.
    pub axis: MoveAxis,
}

/// Stationary-structure state.
///
/// Buildings are never destroyed; on death they are disabled in place so
/// the rest of the simulation keeps finding them at a stable identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Building {
    /// Hitbox radius used for projectile overlap tests.
    #[serde(with = "fixed_serde")]
    pub hitbox_radius: Fixed,
    /// Movement speed when executing an order.
    #[serde(with = "fixed_serde")]
    pub move_speed: Fixed,
    /// Pending movement order, if any.
    pub move_order: Option<MoveOrder>,
    /// Set once health reaches zero; the record persists but the
    /// building stops acting and stops being targetable.
    pub disabled: bool,
}

impl Building {
    /// Create an enabled building with no pending order.
    #[must_use]
    pub fn new(hitbox_radius: Fixed, move_speed: Fixed) -> Self {
        Self {
            hitbox_radius,
            move_speed,
            move_order: None,
            disabled: false,
        }
    }
}

/// Projectile flight state.
///
/// The owning faction lives on the entity record; damage and radius are
/// captured at spawn time from the shooter and the projectile defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projectile {
    /// Damage applied to the first opposing entity hit.
    #[serde(with = "fixed_serde")]
    pub damage: Fixed,
    /// Collision radius.
    #[serde(with = "fixed_serde")]
    pub radius: Fixed,
    /// Velocity in world units per second.
    pub velocity: Vec2Fixed,
    /// Remaining lifetime in seconds.
    #[serde(with = "fixed_serde")]
    pub lifetime_left: Fixed,
}

/// Renderer-side health-bar attachment ids.
///
/// The simulation never dereferences these; it only reports them back
/// when the owner dies so the render layer can detach its quads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBarLink {
    /// Background quad id.
    pub background: u64,
    /// Fill quad id.
    pub fill: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_faction_opposition() {
        assert!(Faction::A.opposes(Faction::B));
        assert!(Faction::B.opposes(Faction::A));
        assert!(!Faction::A.opposes(Faction::A));
        assert!(!Faction::B.opposes(Faction::B));
    }

    #[test]
    fn test_lane_directions_oppose() {
        assert_eq!(
            Faction::A.lane_direction(),
            -Faction::B.lane_direction()
        );
    }

    #[test]
    fn test_empty_mask_allows_all() {
        let mask = TargetMask::ALL;
        assert!(mask.allows(AttackGroup::Ground));
        assert!(mask.allows(AttackGroup::Air));
        assert!(mask.allows(AttackGroup::Orbital));
    }

    #[test]
    fn test_mask_gates_groups() {
        let mask = TargetMask::from_groups(&[AttackGroup::Ground, AttackGroup::Orbital]);
        assert!(mask.allows(AttackGroup::Ground));
        assert!(!mask.allows(AttackGroup::Air));
        assert!(mask.allows(AttackGroup::Orbital));
    }

    #[test]
    fn test_health_tolerates_overkill() {
        let mut health = Health::new(Fixed::from_num(10));
        health.apply_damage(Fixed::from_num(25));
        assert!(health.is_dead());
        assert!(health.current < Fixed::ZERO);
        assert_eq!(health.fraction(), Fixed::ZERO);
    }

    #[test]
    fn test_health_clamps_minimum() {
        let health = Health::new(Fixed::from_num(-5));
        assert_eq!(health.max, Fixed::from_num(1));
        assert!(!health.is_dead());
    }

    #[test]
    fn test_shooter_cooldown_overshoot_bounded() {
        let mut shooter = Shooter::new(
            Fixed::from_num(5),
            Fixed::from_num(1),
            Fixed::from_num(2),
            TargetMask::ALL,
        );
        shooter.reset_cooldown();

        let dt = Fixed::from_num(0.3);
        for _ in 0..10 {
            shooter.tick_cooldown(dt);
        }
        // Ticking while already elapsed must not keep driving it down.
        assert!(shooter.cooldown_remaining > -dt);
    }
}
