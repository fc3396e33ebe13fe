//! Simulation-wide tuning parameters.
//!
//! One immutable configuration struct is built before the first tick and
//! passed by reference into every stage. There is no ambient global state.

use serde::{Deserialize, Serialize};

use crate::math::{fixed_serde, Fixed};

/// Parameters applied to every projectile a faction fires.
///
/// Shooters only configure range, damage, cooldown and target mask;
/// flight speed, collision radius and lifetime come from here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectileDefaults {
    /// Flight speed in world units per second.
    #[serde(with = "fixed_serde")]
    pub speed: Fixed,
    /// Collision radius.
    #[serde(with = "fixed_serde")]
    pub radius: Fixed,
    /// Lifetime in seconds before the projectile expires harmlessly.
    #[serde(with = "fixed_serde")]
    pub lifetime: Fixed,
}

impl Default for ProjectileDefaults {
    fn default() -> Self {
        Self {
            speed: Fixed::from_num(14),
            radius: Fixed::from_num(0.12),
            lifetime: Fixed::from_num(2),
        }
    }
}

/// Immutable-after-init simulation configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Spatial grid cell size. Chosen so a typical interaction radius
    /// spans one to two cells.
    #[serde(with = "fixed_serde")]
    pub cell_size: Fixed,
    /// Defaults for spawned projectiles.
    pub projectile: ProjectileDefaults,
    /// How long the attacking flag is held after a shooter loses its
    /// target, so movement resumes smoothly instead of twitching.
    #[serde(with = "fixed_serde")]
    pub attack_release: Fixed,
    /// Distance within which a building movement order counts as arrived.
    #[serde(with = "fixed_serde")]
    pub arrive_epsilon: Fixed,
    /// Lower clamp for configured fire cooldowns.
    #[serde(with = "fixed_serde")]
    pub min_cooldown: Fixed,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            cell_size: Fixed::from_num(0.5),
            projectile: ProjectileDefaults::default(),
            attack_release: Fixed::from_num(0.1),
            arrive_epsilon: Fixed::from_num(0.02),
            min_cooldown: Fixed::from_num(0.01),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_sane() {
        let cfg = SimConfig::default();
        assert!(cfg.cell_size > Fixed::ZERO);
        assert!(cfg.projectile.lifetime > Fixed::ZERO);
        assert!(cfg.min_cooldown > Fixed::ZERO);
        assert!(cfg.arrive_epsilon < cfg.cell_size);
    }
}
