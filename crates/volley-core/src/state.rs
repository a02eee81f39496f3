//! World snapshot: the complete plain-data state handed to consumers
//! (renderer, audio layer, network transport) after each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::{AudioEvent, EffectFact};
use crate::types::SimTime;

/// Complete visible state after one tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorldSnapshot {
    pub time: SimTime,
    pub outcome: BattleOutcome,
    /// Phase of the computer-controlled side (if any).
    pub ai_phase: AiPhase,
    pub units: Vec<UnitView>,
    pub projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectFact>,
    pub audio_events: Vec<AudioEvent>,
    pub counts: SideCounts,
    pub width: f64,
    pub height: f64,
}

/// One unit on the field. Dead units are included with `hp == 0` so the
/// renderer can draw casualties; they never act again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitView {
    /// Stable id (generational handle bits).
    pub id: u64,
    pub side: Side,
    pub kind: UnitKind,
    pub x: f64,
    pub y: f64,
    pub facing: f64,
    pub hp: f64,
    pub max_hp: f64,
    pub morale: f64,
    pub max_morale: f64,
    pub fatigue: f64,
    pub state: UnitState,
    pub in_formation: bool,
    /// Remaining hit-flash seconds (0 = not flashing).
    pub flash: f64,
    pub selected: bool,
}

/// One shot in flight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub kind: ProjectileKind,
    pub side: Side,
    pub x: f64,
    pub y: f64,
}

/// Live/total unit counts per side. "Live" excludes dead and routing.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SideCounts {
    pub player_live: u32,
    pub player_total: u32,
    pub enemy_live: u32,
    pub enemy_total: u32,
}

impl SideCounts {
    pub fn live(&self, side: Side) -> u32 {
        match side {
            Side::Player => self.player_live,
            Side::Enemy => self.enemy_live,
        }
    }
}
