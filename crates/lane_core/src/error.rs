//! Error types for the combat simulation.
//!
//! Only the external interface (spawning, configuration, movement orders)
//! surfaces errors. Conditions inside the tick pipeline - stale target
//! references, queries against an empty grid - are absorbed locally and
//! never halt the simulation.

use thiserror::Error;

/// Result type alias using [`SimError`].
pub type Result<T> = std::result::Result<T, SimError>;

/// Top-level error type for the simulation's external interface.
#[derive(Debug, Error)]
pub enum SimError {
    /// Invalid entity reference.
    #[error("Entity not found: {0}")]
    EntityNotFound(u64),

    /// An operation that only applies to buildings was issued to
    /// another entity kind.
    #[error("Entity {0} is not a building")]
    NotABuilding(u64),

    /// Invalid simulation state.
    #[error("Invalid simulation state: {0}")]
    InvalidState(String),
}
