//! Battle scenario builders.
//!
//! Pre-built battlefield setups shared by integration tests and
//! benchmarks, so both exercise the same entity mixes.

use lane_core::components::{Faction, MoveAxis};
use lane_core::math::Fixed;
use lane_core::simulation::Simulation;

use crate::fixtures::{melee_minion, pos, ranged_minion, turret};

/// Two opposing melee waves marching down the lane toward each other.
///
/// `per_side` units per faction, spread across three rows, 16 units of
/// lane between the front lines.
#[must_use]
pub fn melee_clash(per_side: usize) -> Simulation {
    let mut sim = Simulation::new();
    for i in 0..per_side {
        #[allow(clippy::cast_precision_loss)]
        let row = (i % 3) as f64 - 1.0;
        #[allow(clippy::cast_precision_loss)]
        let col = (i / 3) as f64 * 0.5;
        sim.spawn_agent(melee_minion(pos(-8.0 - col, row), Faction::A));
        sim.spawn_agent(melee_minion(pos(8.0 + col, row), Faction::B));
    }
    sim
}

/// A mixed skirmish: melee front line, ranged support, one turret each.
#[must_use]
pub fn mixed_skirmish(per_side: usize) -> Simulation {
    let mut sim = melee_clash(per_side);
    for i in 0..per_side / 2 {
        #[allow(clippy::cast_precision_loss)]
        let row = (i % 3) as f64 - 1.0;
        sim.spawn_agent(ranged_minion(pos(-11.0, row), Faction::A));
        sim.spawn_agent(ranged_minion(pos(11.0, row), Faction::B));
    }
    sim.spawn_building(turret(pos(-14.0, 0.0), Faction::A));
    sim.spawn_building(turret(pos(14.0, 0.0), Faction::B));
    sim
}

/// A carrier building crawling along the lane through enemy contact.
#[must_use]
pub fn advancing_carrier() -> Simulation {
    let mut sim = Simulation::new();
    let carrier = sim.spawn_building(turret(pos(-10.0, 0.0), Faction::A));
    sim.issue_move_order(carrier, pos(10.0, 0.0), MoveAxis::HorizontalOnly)
        .expect("carrier exists");
    for i in 0..6 {
        #[allow(clippy::cast_precision_loss)]
        let row = (i % 3) as f64 - 1.0;
        sim.spawn_agent(melee_minion(pos(5.0, row), Faction::B));
    }
    sim
}

/// Count alive mobile agents belonging to a faction.
#[must_use]
pub fn alive_agents(sim: &Simulation, faction: Faction) -> usize {
    sim.entities()
        .iter()
        .filter(|(_, e)| e.is_agent() && e.faction == faction && e.is_alive())
        .count()
}

/// Run until one side has no agents left, or a tick limit.
///
/// Returns the number of ticks actually run.
pub fn run_until_decided(sim: &mut Simulation, dt: Fixed, max_ticks: u64) -> u64 {
    for n in 0..max_ticks {
        sim.tick(dt);
        if alive_agents(sim, Faction::A) == 0 || alive_agents(sim, Faction::B) == 0 {
            return n + 1;
        }
    }
    max_ticks
}
