//! Phased controller for the computer-commanded side.
//!
//! Runs on a fixed think interval (not every tick) so decisions arrive
//! at human-like latency. Each think pass reads an immutable battlefield
//! view and emits orders; the sim crate applies them to unit components.

use std::collections::HashMap;

use hecs::Entity;
use tracing::debug;

use volley_core::constants::*;
use volley_core::enums::{AiPhase, Side, UnitKind};
use volley_core::types::Vec2;

use crate::targeting;

/// One visible unit. Views contain live, non-routing units only.
#[derive(Debug, Clone, Copy)]
pub struct UnitInfo {
    pub entity: Entity,
    pub side: Side,
    pub kind: UnitKind,
    pub pos: Vec2,
    /// Current hp as a fraction of maximum.
    pub hp_frac: f64,
    /// Listed firing range of this unit's kind.
    pub range: f64,
    /// Whether the unit currently has any command.
    pub has_order: bool,
    /// Whether the unit currently has a (validated) target unit.
    pub has_target: bool,
}

/// Immutable battlefield view handed to one think pass.
pub struct Battlefield<'a> {
    pub width: f64,
    pub height: f64,
    /// The side this controller commands.
    pub side: Side,
    pub units: &'a [UnitInfo],
}

impl Battlefield<'_> {
    fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    fn controlled(&self, kind: UnitKind) -> impl Iterator<Item = &UnitInfo> + '_ {
        self.units
            .iter()
            .filter(move |u| u.side == self.side && u.kind == kind)
    }
}

/// An order for one unit, applied by the sim at the current tick boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiOrder {
    /// Move to a point; `facing` optionally commands the arrival facing.
    MoveTo {
        unit: Entity,
        target: Vec2,
        facing: Option<f64>,
    },
    /// Attack a specific enemy unit.
    Attack { unit: Entity, target: Entity },
}

/// Persistent controller state for one side, carried across ticks.
#[derive(Debug, Clone)]
pub struct AiState {
    pub phase: AiPhase,
    pub phase_timer: f64,
    pub think_timer: f64,
    /// Y coordinate of the advancing infantry line.
    pub infantry_line_y: f64,
    /// The cavalry charge is a one-time commitment per battle.
    pub cavalry_charged: bool,
    /// Artillery unit -> its currently assigned target.
    pub artillery_targets: HashMap<Entity, Entity>,
}

impl AiState {
    pub fn new(infantry_line_y: f64) -> Self {
        Self {
            phase: AiPhase::Deploy,
            phase_timer: 0.0,
            think_timer: 0.0,
            infantry_line_y,
            cavalry_charged: false,
            artillery_targets: HashMap::new(),
        }
    }
}

/// Width (in units) of the AI's infantry battle line.
const LINE_WIDTH: usize = 40;

/// Accumulate time and, once per think interval, run the phase machine.
/// Returns the orders to apply (empty between think passes).
pub fn think(state: &mut AiState, field: &Battlefield, dt: f64) -> Vec<AiOrder> {
    state.think_timer += dt;
    if state.think_timer < AI_THINK_INTERVAL {
        return Vec::new();
    }
    state.think_timer = 0.0;
    state.phase_timer += AI_THINK_INTERVAL;

    // Drop artillery assignments whose gun or target is gone; the view
    // only lists live units.
    let alive: std::collections::HashSet<Entity> =
        field.units.iter().map(|u| u.entity).collect();
    state
        .artillery_targets
        .retain(|gun, target| alive.contains(gun) && alive.contains(target));

    let mut orders = Vec::new();
    match state.phase {
        AiPhase::Deploy => deploy(state, field, &mut orders),
        AiPhase::Advance => advance(state, field, &mut orders),
        AiPhase::Engage => engage(state, field, &mut orders),
        AiPhase::Flank => flank(state, field, &mut orders),
        // Reserved: no transition enters Retreat yet.
        AiPhase::Retreat => {}
    }
    orders
}

fn transition(state: &mut AiState, to: AiPhase) {
    debug!(from = ?state.phase, ?to, "ai phase transition");
    state.phase = to;
    state.phase_timer = 0.0;
}

/// DEPLOY: form the battle line, with infantry in the center, cavalry
/// on the flanks, and artillery just behind. Only idle units receive
/// slots, so a harassed deployment does not thrash.
fn deploy(state: &mut AiState, field: &Battlefield, orders: &mut Vec<AiOrder>) {
    let side = field.side;
    let center_x = field.width / 2.0;
    let line_y = if side == Side::Enemy {
        160.0
    } else {
        field.height - 160.0
    };
    let facing = side.baseline_facing();
    let forward = side.advance_sign();

    for (i, unit) in field.controlled(UnitKind::Infantry).enumerate() {
        if unit.has_order {
            continue;
        }
        let col = (i % LINE_WIDTH) as f64;
        let row = (i / LINE_WIDTH) as f64;
        orders.push(AiOrder::MoveTo {
            unit: unit.entity,
            target: Vec2::new(
                center_x - (LINE_WIDTH as f64 * UNIT_SPACING) / 2.0 + col * UNIT_SPACING,
                line_y + forward * row * UNIT_SPACING,
            ),
            facing: Some(facing),
        });
    }

    let cavalry: Vec<&UnitInfo> = field.controlled(UnitKind::Cavalry).collect();
    let half = cavalry.len() / 2;
    for (i, unit) in cavalry.iter().enumerate() {
        if unit.has_order {
            continue;
        }
        let wing = if i < half { -1.0 } else { 1.0 };
        let local = if i < half { i } else { i - half };
        orders.push(AiOrder::MoveTo {
            unit: unit.entity,
            target: Vec2::new(
                center_x + wing * 280.0 + (local % 5) as f64 * 15.0,
                line_y + (local / 5) as f64 * 15.0,
            ),
            facing: Some(facing),
        });
    }

    for (i, unit) in field.controlled(UnitKind::Artillery).enumerate() {
        if unit.has_order {
            continue;
        }
        orders.push(AiOrder::MoveTo {
            unit: unit.entity,
            target: Vec2::new(
                center_x - 200.0 + i as f64 * 60.0,
                line_y - forward * 50.0,
            ),
            facing: Some(facing),
        });
    }

    if state.phase_timer > AI_DEPLOY_TIME {
        state.infantry_line_y = line_y;
        transition(state, AiPhase::Advance);
    }
}

/// ADVANCE: step the infantry line toward the enemy centroid until
/// within engagement range; artillery opens up on dense clusters.
fn advance(state: &mut AiState, field: &Battlefield, orders: &mut Vec<AiOrder>) {
    let side = field.side;
    let forward = side.advance_sign();
    let enemy_centroid =
        targeting::centroid(field.units, side.opponent(), field.center());

    let dist_to_enemy = forward * (enemy_centroid.y - state.infantry_line_y);
    if dist_to_enemy > AI_ENGAGE_RANGE {
        state.infantry_line_y += forward * AI_ADVANCE_STEP;

        let center_x = field.width / 2.0;
        for (i, unit) in field.controlled(UnitKind::Infantry).enumerate() {
            let col = (i % LINE_WIDTH) as f64;
            let row = (i / LINE_WIDTH) as f64;
            orders.push(AiOrder::MoveTo {
                unit: unit.entity,
                target: Vec2::new(
                    center_x - (LINE_WIDTH as f64 * UNIT_SPACING) / 2.0 + col * UNIT_SPACING,
                    state.infantry_line_y + forward * row * UNIT_SPACING,
                ),
                facing: None,
            });
        }
    } else {
        transition(state, AiPhase::Engage);
    }

    for gun in field.controlled(UnitKind::Artillery) {
        if gun.has_order && gun.has_target {
            continue;
        }
        if let Some((seed, count)) =
            targeting::densest_cluster(field.units, side, AI_CLUSTER_RADIUS)
        {
            if count >= AI_MIN_CLUSTER_SIZE {
                state.artillery_targets.insert(gun.entity, seed.entity);
                orders.push(AiOrder::Attack {
                    unit: gun.entity,
                    target: seed.entity,
                });
            }
        }
    }
}

/// ENGAGE: infantry picks priority targets and fires or closes part of
/// the distance; artillery falls back when threatened, otherwise
/// counters enemy cavalry first and clusters second.
fn engage(state: &mut AiState, field: &Battlefield, orders: &mut Vec<AiOrder>) {
    let side = field.side;
    let forward = side.advance_sign();

    for inf in field.controlled(UnitKind::Infantry) {
        if inf.has_order && inf.has_target {
            continue;
        }
        if let Some(target) = targeting::priority_target(inf, field.units) {
            if target.pos.distance(inf.pos) <= inf.range {
                orders.push(AiOrder::Attack {
                    unit: inf.entity,
                    target: target.entity,
                });
            } else {
                // Close part of the distance without over-committing.
                orders.push(AiOrder::MoveTo {
                    unit: inf.entity,
                    target: inf.pos + (target.pos - inf.pos) * 0.3,
                    facing: None,
                });
            }
        }
    }

    let friendly_centroid = targeting::centroid(field.units, side, field.center());
    for gun in field.controlled(UnitKind::Artillery) {
        let threatened = targeting::nearest_enemy(field.units, side, gun.pos)
            .is_some_and(|e| e.pos.distance(gun.pos) < AI_ARTILLERY_DANGER_RADIUS);

        if threatened {
            state.artillery_targets.remove(&gun.entity);
            orders.push(AiOrder::MoveTo {
                unit: gun.entity,
                target: Vec2::new(
                    gun.pos.x + (friendly_centroid.x - gun.pos.x) * 0.5,
                    gun.pos.y - forward * 60.0,
                ),
                facing: None,
            });
        } else if !(gun.has_order && gun.has_target) {
            let counter_charge = field
                .units
                .iter()
                .filter(|u| u.side != side && u.kind == UnitKind::Cavalry)
                .min_by(|a, b| {
                    a.pos
                        .distance_squared(gun.pos)
                        .total_cmp(&b.pos.distance_squared(gun.pos))
                });
            let target = counter_charge.map(|c| c.entity).or_else(|| {
                targeting::densest_cluster(field.units, side, AI_CLUSTER_RADIUS)
                    .map(|(seed, _)| seed.entity)
            });
            if let Some(target) = target {
                state.artillery_targets.insert(gun.entity, target);
                orders.push(AiOrder::Attack {
                    unit: gun.entity,
                    target,
                });
            }
        }
    }

    let enemy_centroid =
        targeting::centroid(field.units, side.opponent(), field.center());
    if targeting::infantry_engaged(field.units, side, enemy_centroid, AI_ENGAGE_RANGE)
        && !state.cavalry_charged
    {
        transition(state, AiPhase::Flank);
    }
}

/// FLANK: one coordinated cavalry charge against the weaker enemy flank,
/// preferring artillery and wounded targets; afterwards everyone keeps
/// re-acquiring targets with the shared priority rule.
fn flank(state: &mut AiState, field: &Battlefield, orders: &mut Vec<AiOrder>) {
    let side = field.side;

    if !state.cavalry_charged {
        let center_x = field.width / 2.0;
        let enemies: Vec<UnitInfo> = field
            .units
            .iter()
            .filter(|u| u.side != side)
            .copied()
            .collect();
        let left = enemies.iter().filter(|e| e.pos.x < center_x).count();
        let right = enemies.len() - left;
        let weak_left = left < right;

        let flank_enemies: Vec<UnitInfo> = enemies
            .iter()
            .filter(|e| (e.pos.x < center_x) == weak_left)
            .copied()
            .collect();
        let priority: Vec<UnitInfo> = flank_enemies
            .iter()
            .filter(|e| e.kind == UnitKind::Artillery || e.hp_frac < AI_WOUNDED_HP_FRACTION)
            .copied()
            .collect();
        let charge_targets = if priority.is_empty() {
            flank_enemies
        } else {
            priority
        };

        if !charge_targets.is_empty() {
            for (i, cav) in field.controlled(UnitKind::Cavalry).enumerate() {
                let target = &charge_targets[i % charge_targets.len()];
                orders.push(AiOrder::Attack {
                    unit: cav.entity,
                    target: target.entity,
                });
            }
        }
        state.cavalry_charged = true;
        debug!(weak_left, "cavalry committed to flanking charge");
    }

    // Units already given a charge order this pass keep it; the view's
    // order flags are from before this think.
    let committed: std::collections::HashSet<Entity> = orders
        .iter()
        .map(|order| match order {
            AiOrder::MoveTo { unit, .. } | AiOrder::Attack { unit, .. } => *unit,
        })
        .collect();

    // Re-acquire for anyone whose target died.
    for unit in field
        .units
        .iter()
        .filter(|u| u.side == side && u.kind != UnitKind::Artillery)
    {
        if committed.contains(&unit.entity) || (unit.has_order && unit.has_target) {
            continue;
        }
        if let Some(target) = targeting::priority_target(unit, field.units) {
            orders.push(AiOrder::Attack {
                unit: unit.entity,
                target: target.entity,
            });
        }
    }

    for gun in field.controlled(UnitKind::Artillery) {
        if gun.has_order && gun.has_target {
            continue;
        }
        if let Some((seed, _)) = targeting::densest_cluster(field.units, side, AI_CLUSTER_RADIUS)
        {
            state.artillery_targets.insert(gun.entity, seed.entity);
            orders.push(AiOrder::Attack {
                unit: gun.entity,
                target: seed.entity,
            });
        }
    }
}
