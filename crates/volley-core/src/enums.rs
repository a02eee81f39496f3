//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// One of the two opposing forces.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    #[default]
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Facing angle toward the opposing baseline at deployment.
    /// Player deploys at the bottom of the field (+y) facing up.
    pub fn baseline_facing(self) -> f64 {
        match self {
            Side::Player => -std::f64::consts::FRAC_PI_2,
            Side::Enemy => std::f64::consts::FRAC_PI_2,
        }
    }

    /// Sign of "forward" along the y axis for this side.
    pub fn advance_sign(self) -> f64 {
        match self {
            Side::Player => -1.0,
            Side::Enemy => 1.0,
        }
    }
}

/// Troop category with an associated immutable stat block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitKind {
    Infantry,
    Cavalry,
    Artillery,
}

/// Per-unit behavioral state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnitState {
    #[default]
    Idle,
    Moving,
    Combat,
    /// Terminal: the unit flees the field and is no longer controllable.
    Routing,
}

/// Current command assigned to a unit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    #[default]
    None,
    Move,
    Attack,
}

/// Named geometric arrangement with associated combat/movement modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormationType {
    /// Max firepower, weak flanks.
    #[default]
    Line,
    /// Fast march, charge bonus, narrow front.
    Column,
    /// All-round defense, anti-cavalry, slow.
    Square,
    /// Cavalry charge formation, penetration.
    Wedge,
    /// Spread out, harder to hit, no volley.
    Skirmish,
    /// Perimeter-only square enclosing protected units.
    HollowSquare,
}

/// Battlefield cell type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TerrainType {
    #[default]
    Grass,
    Hill,
    Forest,
    Road,
    Mud,
    Building,
}

/// Ranged shot category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    /// Always detonates at its terminal point (area damage).
    Cannonball,
}

/// Phase of the computer-controlled side's battle plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiPhase {
    /// Form the initial battle line.
    #[default]
    Deploy,
    /// Step the infantry line toward the enemy.
    Advance,
    /// Hold and fire with priority targeting.
    Engage,
    /// One-time coordinated cavalry charge on the weak flank.
    Flank,
    /// Declared but unreachable: no transition enters it yet.
    Retreat,
}

/// Which aspect of the defender an attack arrives from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackAspect {
    Front,
    Flank,
    Rear,
}

impl AttackAspect {
    /// Damage multiplier for this aspect.
    pub fn damage_modifier(self) -> f64 {
        match self {
            AttackAspect::Front => 1.0,
            AttackAspect::Flank => 1.3,
            AttackAspect::Rear => 1.6,
        }
    }
}

/// Result of the battle. `Draw` covers simultaneous mutual annihilation
/// within a single tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BattleOutcome {
    #[default]
    Ongoing,
    Victory {
        winner: Side,
    },
    Draw,
}

impl BattleOutcome {
    pub fn is_over(self) -> bool {
        !matches!(self, BattleOutcome::Ongoing)
    }
}
