//! Fixed effect tuples per terrain type.

use serde::{Deserialize, Serialize};

use volley_core::enums::TerrainType;

/// Movement and combat modifiers a terrain cell imposes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TerrainEffect {
    pub speed_multiplier: f64,
    /// Fraction of incoming damage absorbed (0-1).
    pub cover_bonus: f64,
    /// Extra speed multiplier applied only to cavalry.
    pub cavalry_penalty: f64,
    /// Whether formation slots may be held here.
    pub formation_allowed: bool,
    /// Artillery damage/range bias of the ground (table data; see hill).
    pub artillery_bonus: f64,
    /// Attack bias conferred by the ground itself beyond its elevation
    /// level (table data).
    pub elevation_bonus: f64,
}

/// Effect lookup for a terrain type. The set of types is closed, so this
/// is a plain match.
pub fn effect_of(kind: TerrainType) -> TerrainEffect {
    match kind {
        TerrainType::Grass => TerrainEffect {
            speed_multiplier: 1.0,
            cover_bonus: 0.0,
            cavalry_penalty: 1.0,
            formation_allowed: true,
            artillery_bonus: 0.0,
            elevation_bonus: 0.0,
        },
        TerrainType::Hill => TerrainEffect {
            speed_multiplier: 0.8,
            cover_bonus: 0.1,
            cavalry_penalty: 0.7,
            formation_allowed: true,
            artillery_bonus: 0.3,
            elevation_bonus: 0.15,
        },
        TerrainType::Forest => TerrainEffect {
            speed_multiplier: 0.6,
            cover_bonus: 0.35,
            cavalry_penalty: 0.3,
            formation_allowed: false,
            artillery_bonus: -0.5,
            elevation_bonus: 0.0,
        },
        TerrainType::Road => TerrainEffect {
            speed_multiplier: 1.3,
            cover_bonus: 0.0,
            cavalry_penalty: 1.0,
            formation_allowed: true,
            artillery_bonus: 0.0,
            elevation_bonus: 0.0,
        },
        TerrainType::Mud => TerrainEffect {
            speed_multiplier: 0.5,
            cover_bonus: 0.0,
            cavalry_penalty: 0.4,
            formation_allowed: true,
            artillery_bonus: -0.2,
            elevation_bonus: 0.0,
        },
        TerrainType::Building => TerrainEffect {
            speed_multiplier: 0.0,
            cover_bonus: 0.5,
            cavalry_penalty: 0.0,
            formation_allowed: false,
            artillery_bonus: 0.0,
            elevation_bonus: 0.1,
        },
    }
}
