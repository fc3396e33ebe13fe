//! Per-stage simulation logic.
//!
//! Each function here is one stage of the fixed tick pipeline:
//! grid build, sensing, melee resolution, movement, shooting, the
//! attacking-release window, projectile flight and collision, and death
//! cleanup. Stages that need structural mutation record it into a
//! [`ChangeQueue`]; the tick driver flushes the queue at stage end so
//! every stage scans a consistent snapshot.

use std::collections::HashMap;

use crate::change::{Change, ChangeQueue};
use crate::components::{AttackGroup, EntityId, Faction, Projectile};
use crate::config::SimConfig;
use crate::grid::{GridItem, SpatialGrid};
use crate::math::{Fixed, Vec2Fixed};
use crate::store::EntityStorage;

/// Threshold below which a direction vector is treated as degenerate.
fn direction_epsilon() -> Fixed {
    Fixed::from_num(0.00001)
}

/// Rebuild the spatial grid from every agent's current position.
///
/// Insertion runs in sorted-id order so that within-cell scan order is
/// deterministic across runs.
pub fn build_grid(store: &EntityStorage, grid: &mut SpatialGrid) {
    grid.clear();
    for id in store.sorted_ids() {
        let Some(entity) = store.get(id) else { continue };
        let Some(stats) = entity.agent else { continue };
        grid.insert(GridItem {
            id,
            position: entity.position,
            faction: entity.faction,
            radius: stats.radius,
        });
    }
}

/// Targeting & collision sensor.
///
/// For each agent, finds the nearest opposing agent within
/// `max(detect_range, r_self + r_other)` via the grid. The target
/// reference is updated every tick; the collision-engaged flag is set
/// only when the winner is within true melee contact (sum of radii).
/// Ties are broken by first-encountered in scan order.
pub fn sense_and_tag(store: &EntityStorage, grid: &SpatialGrid, changes: &mut ChangeQueue) {
    for id in store.sorted_ids() {
        let Some(entity) = store.get(id) else { continue };
        let Some(stats) = entity.agent else { continue };

        let my_pos = entity.position;
        let my_faction = entity.faction;

        let mut best: Option<(EntityId, Fixed, Fixed)> = None; // (id, d2, radius)
        grid.visit_neighborhood(my_pos, stats.detect_range, |item| {
            if item.id == id || !my_faction.opposes(item.faction) {
                return false;
            }
            let d2 = item.position.distance_squared(my_pos);
            let thresh = stats.detect_range.max(stats.radius + item.radius);
            if d2 <= thresh * thresh && best.map_or(true, |(_, best_d2, _)| d2 < best_d2) {
                best = Some((item.id, d2, item.radius));
            }
            false
        });

        match best {
            Some((target, d2, radius)) => {
                let contact = stats.radius + radius;
                changes.push(Change::SetTarget {
                    entity: id,
                    target: Some(target),
                });
                changes.push(Change::SetEngaged {
                    entity: id,
                    engaged: d2 <= contact * contact,
                });
            }
            None => {
                changes.push(Change::SetTarget {
                    entity: id,
                    target: None,
                });
                changes.push(Change::SetEngaged {
                    entity: id,
                    engaged: false,
                });
            }
        }
    }
}

/// Melee collision resolver.
///
/// Mutually-targeting agents in contact annihilate each other. A
/// one-sided engagement does nothing; the agent holds position until
/// the foe reciprocates or the sensor retargets next tick.
pub fn resolve_melee(store: &EntityStorage, changes: &mut ChangeQueue) {
    for id in store.sorted_ids() {
        let Some(entity) = store.get(id) else { continue };
        let Some(stats) = entity.agent else { continue };
        if !entity.engaged {
            continue;
        }
        let Some(target_id) = entity.target else { continue };
        let Some(other) = store.get(target_id) else { continue };
        let Some(other_stats) = other.agent else { continue };

        let thresh = stats.radius + other_stats.radius;
        if other.position.distance_squared(entity.position) > thresh * thresh {
            continue;
        }

        let reciprocated = other.engaged && other.target == Some(id);
        if reciprocated {
            // Symmetric annihilation; duplicate destroys from the
            // mirrored pair are absorbed when the queue is applied.
            changes.push(Change::Destroy { entity: id });
            changes.push(Change::Destroy { entity: target_id });
        }
    }
}

/// Seek-or-lane movement for agents.
///
/// Agents flagged collision-engaged or attacking hold position. The
/// rest steer toward their target's last-known position, falling back
/// to the faction lane direction when there is no target or the
/// direction degenerates.
pub fn seek_or_lane_move(store: &mut EntityStorage, dt: Fixed) {
    let positions: HashMap<EntityId, Vec2Fixed> =
        store.iter().map(|(id, e)| (*id, e.position)).collect();

    let mut moves: Vec<(EntityId, Vec2Fixed)> = Vec::new();
    for id in store.sorted_ids() {
        let Some(entity) = store.get(id) else { continue };
        let Some(stats) = entity.agent else { continue };
        if entity.engaged || entity.is_attacking() {
            continue;
        }

        let pos = entity.position;
        let lane = Vec2Fixed::new(entity.faction.lane_direction() * stats.move_speed, Fixed::ZERO);
        let velocity = match entity.target.and_then(|t| positions.get(&t)) {
            Some(&target_pos) => {
                let to = target_pos - pos;
                let len = to.length();
                if len > direction_epsilon() {
                    Vec2Fixed::new(to.x / len, to.y / len).scaled(stats.move_speed)
                } else {
                    lane
                }
            }
            // Stale target reference is treated as no target.
            None => lane,
        };

        moves.push((id, pos + velocity.scaled(dt)));
    }

    for (id, new_pos) in moves {
        if let Some(entity) = store.get_mut(id) {
            entity.position = new_pos;
        }
    }
}

/// Building movement-order execution.
///
/// Moves a building toward its ordered destination at its configured
/// speed, honoring the axis constraint, and snaps to the destination
/// once within the arrival epsilon. Dead buildings never move and
/// forget any pending order.
pub fn building_order_move(store: &mut EntityStorage, config: &SimConfig, dt: Fixed) {
    for id in store.sorted_ids() {
        let Some(entity) = store.get_mut(id) else { continue };
        let pos = entity.position;
        let dead = entity.health.map_or(true, |h| h.is_dead());
        let Some(building) = entity.building.as_mut() else {
            continue;
        };

        if dead || building.disabled {
            building.move_order = None;
            continue;
        }
        let Some(order) = building.move_order else {
            continue;
        };

        let mut destination = order.destination;
        if order.axis == crate::components::MoveAxis::HorizontalOnly {
            destination.y = pos.y;
        }

        let delta = destination - pos;
        let dist = delta.length();
        if dist <= config.arrive_epsilon {
            building.move_order = None;
            entity.position = destination;
            continue;
        }

        let mut step = building.move_speed * dt;
        if step > dist {
            step = dist;
        }
        entity.position = pos + delta.normalize().scaled(step);
    }
}

/// Snapshot of an alive building taken before the shooting scan.
struct BuildingView {
    id: EntityId,
    position: Vec2Fixed,
    faction: Faction,
    group: AttackGroup,
    radius: Fixed,
}

fn alive_buildings(store: &EntityStorage) -> Vec<BuildingView> {
    let mut views = Vec::new();
    for id in store.sorted_ids() {
        let Some(entity) = store.get(id) else { continue };
        let Some(building) = entity.building else { continue };
        if !entity.is_alive() {
            continue;
        }
        views.push(BuildingView {
            id,
            position: entity.position,
            faction: entity.faction,
            group: entity.attack_group,
            radius: building.hitbox_radius,
        });
    }
    views
}

/// Shooting & cooldown controller.
///
/// Every alive shooter-capable entity searches agents (via the grid,
/// widened to its range) and buildings (linear scan; their count is
/// small and fixed) for the nearest opposing, alive, mask-eligible
/// target. Holding a target sets the attacking flag and, once the
/// cooldown has elapsed, fires a projectile at the target's current
/// position. Without a target the cooldown still ticks down and the
/// release window (see [`attacking_release`]) eventually clears the flag.
pub fn shooting(
    store: &mut EntityStorage,
    grid: &SpatialGrid,
    config: &SimConfig,
    dt: Fixed,
    changes: &mut ChangeQueue,
) {
    let buildings = alive_buildings(store);

    for id in store.sorted_ids() {
        let Some(entity) = store.get(id) else { continue };
        let Some(shooter) = entity.shooter else { continue };
        if !entity.is_alive() {
            continue;
        }

        let my_pos = entity.position;
        let my_faction = entity.faction;
        let range2 = shooter.range * shooter.range;
        let mask = shooter.target_mask;

        let mut best: Option<(Vec2Fixed, Fixed)> = None; // (position, d2)

        // Agents via the grid; positions and liveness re-read from the
        // store since the grid snapshot predates this tick's movement.
        grid.visit_neighborhood(my_pos, shooter.range, |item| {
            if item.id == id || !my_faction.opposes(item.faction) {
                return false;
            }
            let Some(candidate) = store.get(item.id) else {
                return false;
            };
            if !candidate.is_alive() || !mask.allows(candidate.attack_group) {
                return false;
            }
            let d2 = candidate.position.distance_squared(my_pos);
            if d2 <= range2 && best.map_or(true, |(_, best_d2)| d2 < best_d2) {
                best = Some((candidate.position, d2));
            }
            false
        });

        for view in &buildings {
            if view.id == id || !my_faction.opposes(view.faction) || !mask.allows(view.group) {
                continue;
            }
            let d2 = view.position.distance_squared(my_pos);
            if d2 <= range2 && best.map_or(true, |(_, best_d2)| d2 < best_d2) {
                best = Some((view.position, d2));
            }
        }

        let Some((target_pos, _)) = best else {
            if let Some(sh) = store.get_mut(id).and_then(|e| e.shooter.as_mut()) {
                sh.tick_cooldown(dt);
            }
            continue;
        };

        changes.push(Change::SetAttacking {
            entity: id,
            release: config.attack_release,
        });

        if shooter.can_fire() {
            let to = target_pos - my_pos;
            let len = to.length();
            if len > direction_epsilon() {
                let velocity =
                    Vec2Fixed::new(to.x / len, to.y / len).scaled(config.projectile.speed);
                changes.push(Change::SpawnProjectile {
                    faction: my_faction,
                    position: my_pos,
                    projectile: Projectile {
                        damage: shooter.damage,
                        radius: config.projectile.radius,
                        velocity,
                        lifetime_left: config.projectile.lifetime,
                    },
                });
                if let Some(sh) = store.get_mut(id).and_then(|e| e.shooter.as_mut()) {
                    sh.reset_cooldown();
                }
            }
        } else if let Some(sh) = store.get_mut(id).and_then(|e| e.shooter.as_mut()) {
            sh.tick_cooldown(dt);
        }
    }
}

/// Attacking-release mechanism.
///
/// The attacking flag is held for a short grace window after the last
/// tick that found a target in range, so movement resumes smoothly
/// instead of flickering between paused and moving.
pub fn attacking_release(store: &mut EntityStorage, dt: Fixed) {
    for id in store.sorted_ids() {
        let Some(shooter) = store.get_mut(id).and_then(|e| e.shooter.as_mut()) else {
            continue;
        };
        if !shooter.attacking {
            continue;
        }
        shooter.release_left -= dt;
        if shooter.release_left <= Fixed::ZERO {
            shooter.attacking = false;
            shooter.release_left = Fixed::ZERO;
        }
    }
}

/// Projectile flight integration and lifetime expiry.
pub fn projectile_move(store: &mut EntityStorage, dt: Fixed, changes: &mut ChangeQueue) {
    for id in store.sorted_ids() {
        let Some(entity) = store.get_mut(id) else { continue };
        let pos = entity.position;
        let Some(projectile) = entity.projectile.as_mut() else {
            continue;
        };

        entity.position = pos + projectile.velocity.scaled(dt);
        projectile.lifetime_left -= dt;
        if projectile.lifetime_left <= Fixed::ZERO {
            // Expired in flight; no damage is dealt.
            changes.push(Change::Destroy { entity: id });
        }
    }
}

/// Projectile collision resolution.
///
/// Each projectile hits at most one victim per tick: the first
/// opposing-faction candidate in scan order whose combined radius
/// overlaps it. Agents are found through the grid, buildings through a
/// direct scan. Damage is applied immediately; a victim driven to zero
/// health is picked up by this tick's cleanup stage.
pub fn projectile_hit(store: &mut EntityStorage, grid: &SpatialGrid, changes: &mut ChangeQueue) {
    struct ProjectileView {
        id: EntityId,
        position: Vec2Fixed,
        faction: Faction,
        damage: Fixed,
        radius: Fixed,
    }

    let mut projectiles = Vec::new();
    for id in store.sorted_ids() {
        let Some(entity) = store.get(id) else { continue };
        let Some(projectile) = entity.projectile else { continue };
        projectiles.push(ProjectileView {
            id,
            position: entity.position,
            faction: entity.faction,
            damage: projectile.damage,
            radius: projectile.radius,
        });
    }
    let buildings = alive_buildings(store);

    for proj in &projectiles {
        let mut victim: Option<EntityId> = None;

        grid.visit_neighborhood(proj.position, proj.radius, |item| {
            if !proj.faction.opposes(item.faction) {
                return false;
            }
            let Some(candidate) = store.get(item.id) else {
                return false;
            };
            if !candidate.is_alive() {
                return false;
            }
            let r = proj.radius + item.radius;
            if candidate.position.distance_squared(proj.position) <= r * r {
                victim = Some(item.id);
                return true;
            }
            false
        });

        if victim.is_none() {
            for view in &buildings {
                if !proj.faction.opposes(view.faction) {
                    continue;
                }
                let r = proj.radius + view.radius;
                if view.position.distance_squared(proj.position) <= r * r {
                    victim = Some(view.id);
                    break;
                }
            }
        }

        let Some(victim_id) = victim else { continue };
        if let Some(health) = store.get_mut(victim_id).and_then(|e| e.health.as_mut()) {
            health.apply_damage(proj.damage);
        }
        changes.push(Change::Destroy { entity: proj.id });
    }
}

/// Lifecycle & cleanup.
///
/// Agents and projectiles at or below zero health/lifetime are
/// destroyed; dead buildings are disabled in place. Runs last so every
/// kill from this tick resolves before the next tick's grid rebuild.
pub fn death_cleanup(store: &EntityStorage, changes: &mut ChangeQueue) {
    for id in store.sorted_ids() {
        let Some(entity) = store.get(id) else { continue };

        if let Some(projectile) = entity.projectile {
            if projectile.lifetime_left <= Fixed::ZERO {
                changes.push(Change::Destroy { entity: id });
                continue;
            }
        }

        let Some(health) = entity.health else { continue };
        if !health.is_dead() {
            continue;
        }

        if let Some(building) = entity.building {
            if !building.disabled {
                changes.push(Change::Disable { entity: id });
            }
        } else {
            changes.push(Change::Destroy { entity: id });
        }
    }
}
