//! Events emitted by the simulation for audio cues and cosmetic effects.
//!
//! The engine only produces the facts; playback and particle rendering
//! are external collaborators' concerns.

use serde::{Deserialize, Serialize};

use crate::enums::{AttackAspect, Side, UnitKind};
use crate::types::Vec2;

/// Named audio hints drained into each snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum AudioEvent {
    MusketFired { side: Side },
    CannonFired { side: Side },
    MeleeClash { x: f64, y: f64 },
    Shellburst { x: f64, y: f64 },
    UnitDied { side: Side, kind: UnitKind },
    UnitRouted { side: Side },
}

/// Category of a visual-effect fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum EffectKind {
    MuzzleSmoke,
    MeleeDust,
    Blood,
    Crater,
    /// Floating damage readout; `aspect` tells the renderer which
    /// emphasis to use.
    DamageNumber { amount: f64, aspect: AttackAspect },
    RoutMarker,
    PanicMarker,
}

impl EffectKind {
    /// Seconds the fact stays alive before the driver drops it.
    pub fn lifetime_secs(&self) -> f64 {
        match self {
            EffectKind::MuzzleSmoke | EffectKind::MeleeDust => 1.5,
            EffectKind::Blood => 0.7,
            EffectKind::Crater => 20.0,
            EffectKind::DamageNumber { .. } => 1.2,
            EffectKind::RoutMarker | EffectKind::PanicMarker => 1.2,
        }
    }
}

/// A positioned, expiring visual-effect fact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectFact {
    pub kind: EffectKind,
    pub x: f64,
    pub y: f64,
    pub remaining_secs: f64,
}

impl EffectFact {
    pub fn new(kind: EffectKind, at: Vec2) -> Self {
        let remaining_secs = kind.lifetime_secs();
        Self {
            kind,
            x: at.x,
            y: at.y,
            remaining_secs,
        }
    }
}
