//! Test fixtures and helpers.
//!
//! Pre-built spawn requests and entity configurations for consistent
//! testing, plus proptest strategies over fixed-point inputs.

use std::sync::Once;

use fixed::types::I32F32;
use proptest::prelude::*;

use lane_core::components::{AttackGroup, Faction, TargetMask};
use lane_core::math::{Fixed, Vec2Fixed};
use lane_core::simulation::{AgentSpawnParams, BuildingSpawnParams, ShooterParams};

/// Create a fixed-point number from an integer.
#[must_use]
pub fn fixed(n: i32) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a fixed-point number from a float (for tests only).
///
/// Note: In real simulation code, never use floats.
/// This is only for convenient test setup.
#[must_use]
pub fn fixed_f(n: f64) -> I32F32 {
    I32F32::from_num(n)
}

/// Create a position from float coordinates (for tests only).
#[must_use]
pub fn pos(x: f64, y: f64) -> Vec2Fixed {
    Vec2Fixed::new(fixed_f(x), fixed_f(y))
}

/// The standard fixed timestep used across tests: 20 ticks per second.
#[must_use]
pub fn standard_dt() -> Fixed {
    fixed_f(0.05)
}

/// Spawn request for a stock melee minion at a position.
#[must_use]
pub fn melee_minion(position: Vec2Fixed, faction: Faction) -> AgentSpawnParams {
    AgentSpawnParams::new(position, faction).with_health(fixed(1))
}

/// Spawn request for a ranged minion: slower, tougher, shoots at 3.0.
#[must_use]
pub fn ranged_minion(position: Vec2Fixed, faction: Faction) -> AgentSpawnParams {
    let mut params = AgentSpawnParams::new(position, faction)
        .with_health(fixed(3))
        .with_shooter(ShooterParams {
            range: fixed(3),
            fire_cooldown: fixed_f(0.8),
            damage: fixed(1),
            target_mask: TargetMask::ALL,
        });
    params.move_speed = fixed(4);
    params
}

/// Spawn request for a stock defensive turret building.
#[must_use]
pub fn turret(position: Vec2Fixed, faction: Faction) -> BuildingSpawnParams {
    let mut params = BuildingSpawnParams::new(position, faction);
    params.shooter = Some(ShooterParams {
        range: fixed_f(7.5),
        fire_cooldown: fixed(1),
        damage: fixed(2),
        target_mask: TargetMask::from_groups(&[AttackGroup::Ground, AttackGroup::Air]),
    });
    params
}

/// Install a tracing subscriber honoring `RUST_LOG`, once per process.
///
/// Safe to call from every test; later calls are no-ops.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Strategy over battlefield positions within a plausible lane arena.
pub fn arb_position() -> impl Strategy<Value = Vec2Fixed> {
    (-20.0f64..20.0, -5.0f64..5.0).prop_map(|(x, y)| pos(x, y))
}

/// Strategy over plausible per-tick timesteps (10 to 60 ticks/second).
pub fn arb_dt() -> impl Strategy<Value = Fixed> {
    (0.016f64..0.1).prop_map(fixed_f)
}

/// Strategy over either faction.
pub fn arb_faction() -> impl Strategy<Value = Faction> {
    prop_oneof![Just(Faction::A), Just(Faction::B)]
}
