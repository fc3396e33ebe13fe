//! # Lane Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Determinism test harness
//! - Fixture spawning helpers
//! - Battle scenario builders
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod scenarios;

/// Re-export proptest for convenience.
pub use proptest;
