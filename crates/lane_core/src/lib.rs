//! # Lane Core
//!
//! Deterministic battlefield simulation core for Lane Brawl.
//!
//! This crate contains **only** deterministic logic:
//! - No rendering
//! - No IO
//! - No system randomness
//! - No floating-point math (uses fixed-point)
//!
//! This separation enables:
//! - Identical replays from identical inputs
//! - Headless balance testing
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`components`] - Entity component definitions
//! - [`store`] - Entity storage
//! - [`grid`] - Spatial hash grid
//! - [`change`] - Deferred structural mutation
//! - [`systems`] - Per-tick pipeline stages
//! - [`simulation`] - Tick driver and external interface
//! - [`config`] - Simulation-wide tuning parameters
//! - [`math`] - Fixed-point math utilities

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod change;
pub mod components;
pub mod config;
pub mod error;
pub mod grid;
pub mod math;
pub mod simulation;
pub mod store;
pub mod systems;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::components::*;
    pub use crate::config::{ProjectileDefaults, SimConfig};
    pub use crate::error::{Result, SimError};
    pub use crate::grid::SpatialGrid;
    pub use crate::math::{Fixed, Vec2Fixed};
    pub use crate::simulation::{
        AgentSpawnParams, BuildingConfig, BuildingSpawnParams, EntityStatus, ShooterParams,
        Simulation, TickEvents,
    };
    pub use crate::store::{Entity, EntityStorage};
}
