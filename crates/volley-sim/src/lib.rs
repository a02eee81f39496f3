//! Simulation engine for VOLLEY.
//!
//! Owns the hecs ECS world, rebuilds the spatial grid each tick, runs
//! all systems in a fixed phase order, and produces `WorldSnapshot`s.
//! Completely headless, enabling deterministic testing.

pub mod engine;
pub mod spatial;
pub mod systems;
pub mod world_setup;

pub use volley_core as core;
pub use engine::{ArmyComposition, BattleConfig, BattleEngine, ConfigError};
