//! ECS components for hecs entities.
//!
//! Components are plain data structs with no game logic; systems in the
//! sim crate do the work. Components holding `hecs::Entity` references
//! are not serialized: snapshots expose stable u64 ids instead.

use hecs::Entity;
use serde::{Deserialize, Serialize};

use crate::enums::{FormationType, OrderKind, ProjectileKind, Side, UnitKind};
use crate::types::Vec2;

/// Whether a point falls inside a unit's padded hitbox (used for click
/// picking and bullet impacts).
pub fn contains_point(kind: UnitKind, unit_at: Vec2, point: Vec2) -> bool {
    let stats = kind.stats();
    let hw = stats.half_width + 2.0;
    let hh = stats.half_height + 2.0;
    point.x >= unit_at.x - hw
        && point.x <= unit_at.x + hw
        && point.y >= unit_at.y - hh
        && point.y <= unit_at.y + hh
}

/// Battlefield position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

/// Facing angle in radians (`atan2` convention).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Facing(pub f64);

/// Mutable condition of a unit. Hit points and morale are clamped to
/// `[0, max]`; a unit at 0 hp is permanently dead.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Vitals {
    pub hp: f64,
    pub morale: f64,
    /// 0-100; degrades combat and movement in five bands.
    pub fatigue: f64,
}

/// Countdown timers tied to combat.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct CombatTimers {
    /// Seconds until the next shot or melee blow.
    pub reload: f64,
    /// Visual hit-feedback fact; rendering is the caller's concern.
    pub flash: f64,
}

/// The unit's current command and formation bookkeeping.
///
/// `target` stays valid after the referenced unit dies (units are never
/// despawned); every dereference goes through a liveness check.
#[derive(Debug, Clone, Default)]
pub struct Orders {
    pub kind: OrderKind,
    pub move_target: Option<Vec2>,
    pub target: Option<Entity>,
    /// Facing to adopt on arrival at a formation slot.
    pub formation_facing: Option<f64>,
    /// Shape of the formation this unit was last ordered into.
    pub formation: Option<FormationType>,
    /// Whether the unit currently stands in its slot.
    pub in_formation: bool,
}

impl Orders {
    /// Drop the current command and leave formation.
    pub fn clear(&mut self) {
        self.kind = OrderKind::None;
        self.move_target = None;
        self.target = None;
        self.formation_facing = None;
        self.in_formation = false;
    }
}

/// A ranged shot in flight.
#[derive(Debug, Clone)]
pub struct Projectile {
    pub kind: ProjectileKind,
    /// Muzzle point the shot left from.
    pub origin: Vec2,
    pub velocity: Vec2,
    /// Aim point (already includes accuracy spread).
    pub target: Vec2,
    pub damage: f64,
    pub side: Side,
    /// Firing unit, for flanking attribution on impact.
    pub shooter: Entity,
    /// Straight-line distance from muzzle to aim point.
    pub dist_total: f64,
    /// Monotonically accumulating distance flown.
    pub traveled: f64,
}
