//! Immutable stat tables for unit kinds, formations, and fatigue bands.
//!
//! The set of kinds is closed and small, so these are plain `match`
//! lookups into static blocks rather than any registry machinery.

use serde::{Deserialize, Serialize};

use crate::enums::{FormationType, UnitKind};

/// Immutable combat profile for a unit kind.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UnitStats {
    pub name: &'static str,
    /// Base movement speed (distance units per second).
    pub speed: f64,
    /// Maximum firing range.
    pub range: f64,
    /// Seconds between ranged shots (before fatigue scaling).
    pub reload_secs: f64,
    /// Base damage per hit.
    pub damage: f64,
    pub max_hp: f64,
    pub max_morale: f64,
    /// Hitbox half-extents.
    pub half_width: f64,
    pub half_height: f64,
    /// Multiplier applied to base damage in hand-to-hand combat.
    pub melee: f64,
}

static INFANTRY: UnitStats = UnitStats {
    name: "Line Infantry",
    speed: 8.0,
    range: 200.0,
    reload_secs: 2.0,
    damage: 15.0,
    max_hp: 100.0,
    max_morale: 100.0,
    half_width: 8.0,
    half_height: 8.0,
    melee: 0.8,
};

static CAVALRY: UnitStats = UnitStats {
    name: "Hussars",
    speed: 25.0,
    range: 20.0,
    reload_secs: 1.0,
    damage: 35.0,
    max_hp: 120.0,
    max_morale: 120.0,
    half_width: 12.0,
    half_height: 12.0,
    melee: 1.2,
};

static ARTILLERY: UnitStats = UnitStats {
    name: "12-lb Cannon",
    speed: 5.0,
    range: 400.0,
    reload_secs: 8.0,
    damage: 40.0,
    max_hp: 80.0,
    max_morale: 80.0,
    half_width: 16.0,
    half_height: 16.0,
    melee: 0.2,
};

impl UnitKind {
    /// Stat block for this kind.
    pub fn stats(self) -> &'static UnitStats {
        match self {
            UnitKind::Infantry => &INFANTRY,
            UnitKind::Cavalry => &CAVALRY,
            UnitKind::Artillery => &ARTILLERY,
        }
    }
}

/// Combat/movement multipliers a formation confers while its units hold
/// their slots.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormationStats {
    pub speed_multiplier: f64,
    pub ranged_accuracy_mod: f64,
    pub melee_attack_mod: f64,
    /// Divides incoming melee damage (higher = sturdier).
    pub melee_defense_mod: f64,
    /// Divides incoming damage from cavalry (higher = sturdier).
    pub cavalry_defense_mod: f64,
    pub units_per_row: usize,
}

impl FormationType {
    pub fn stats(self) -> FormationStats {
        match self {
            FormationType::Line => FormationStats {
                speed_multiplier: 1.0,
                ranged_accuracy_mod: 1.2,
                melee_attack_mod: 1.0,
                melee_defense_mod: 0.8,
                cavalry_defense_mod: 0.5,
                units_per_row: 15,
            },
            FormationType::Column => FormationStats {
                speed_multiplier: 1.3,
                ranged_accuracy_mod: 0.6,
                melee_attack_mod: 1.3,
                melee_defense_mod: 1.0,
                cavalry_defense_mod: 0.7,
                units_per_row: 4,
            },
            FormationType::Square => FormationStats {
                speed_multiplier: 0.5,
                ranged_accuracy_mod: 0.8,
                melee_attack_mod: 0.7,
                melee_defense_mod: 1.3,
                cavalry_defense_mod: 2.0,
                units_per_row: 8,
            },
            FormationType::Wedge => FormationStats {
                speed_multiplier: 1.4,
                ranged_accuracy_mod: 0.3,
                melee_attack_mod: 1.5,
                melee_defense_mod: 0.6,
                cavalry_defense_mod: 1.0,
                units_per_row: 1,
            },
            FormationType::Skirmish => FormationStats {
                speed_multiplier: 1.2,
                ranged_accuracy_mod: 0.9,
                melee_attack_mod: 0.6,
                melee_defense_mod: 0.5,
                cavalry_defense_mod: 0.3,
                units_per_row: 20,
            },
            FormationType::HollowSquare => FormationStats {
                speed_multiplier: 0.3,
                ranged_accuracy_mod: 0.7,
                melee_attack_mod: 0.6,
                melee_defense_mod: 1.5,
                cavalry_defense_mod: 2.5,
                units_per_row: 10,
            },
        }
    }
}

/// Multipliers derived from a unit's current fatigue level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FatigueModifiers {
    /// Damage dealt multiplier.
    pub damage: f64,
    /// Damage taken multiplier (above 1.0 = takes more).
    pub defense: f64,
    /// Movement speed multiplier.
    pub speed: f64,
    /// Reload/cooldown time multiplier (above 1.0 = slower).
    pub reload: f64,
}

/// Map a fatigue level (0-100) to its modifier band.
///
/// Bands: fresh < 20, active < 40, winded < 60, tired < 80, exhausted
/// at 80 and above.
pub fn fatigue_modifiers(fatigue: f64) -> FatigueModifiers {
    if fatigue < 20.0 {
        FatigueModifiers {
            damage: 1.0,
            defense: 1.0,
            speed: 1.0,
            reload: 1.0,
        }
    } else if fatigue < 40.0 {
        FatigueModifiers {
            damage: 0.95,
            defense: 1.05,
            speed: 0.95,
            reload: 1.1,
        }
    } else if fatigue < 60.0 {
        FatigueModifiers {
            damage: 0.85,
            defense: 1.15,
            speed: 0.85,
            reload: 1.25,
        }
    } else if fatigue < 80.0 {
        FatigueModifiers {
            damage: 0.7,
            defense: 1.3,
            speed: 0.7,
            reload: 1.5,
        }
    } else {
        FatigueModifiers {
            damage: 0.5,
            defense: 1.5,
            speed: 0.5,
            reload: 2.0,
        }
    }
}
