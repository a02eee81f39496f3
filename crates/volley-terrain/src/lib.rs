//! Terrain for VOLLEY battlefields.
//!
//! Procedural map generation, per-cell terrain types and elevation, and
//! the point lookups the combat and movement systems consume.

pub use volley_core as core;

pub mod effects;
pub mod generate;
pub mod map;

// Re-export key types for convenience.
pub use effects::TerrainEffect;
pub use generate::generate;
pub use map::{TerrainCell, TerrainMap};
