//! Bridge between the pure AI controller and the ECS world.
//!
//! Revalidates target references, extracts the battlefield view, runs
//! the controller, and applies the orders it emits.

use hecs::{Entity, World};

use volley_ai::{think, AiOrder, AiState, Battlefield, UnitInfo};
use volley_core::components::{Orders, Position, Vitals};
use volley_core::enums::{OrderKind, Side, UnitState};

/// Run one AI slice for the computer-controlled side.
pub fn run(world: &mut World, ai: &mut AiState, side: Side, width: f64, height: f64, dt: f64) {
    validate_targets(world, side);

    let view = battlefield_view(world);
    let orders = think(
        ai,
        &Battlefield {
            width,
            height,
            side,
            units: &view,
        },
        dt,
    );

    for order in orders {
        match order {
            AiOrder::MoveTo {
                unit,
                target,
                facing,
            } => {
                if let Ok(mut orders) = world.get::<&mut Orders>(unit) {
                    orders.kind = OrderKind::Move;
                    orders.move_target = Some(target);
                    orders.target = None;
                    if facing.is_some() {
                        orders.formation_facing = facing;
                    }
                }
            }
            AiOrder::Attack { unit, target } => {
                if let Ok(mut orders) = world.get::<&mut Orders>(unit) {
                    orders.kind = OrderKind::Attack;
                    orders.target = Some(target);
                    orders.move_target = None;
                }
            }
        }
    }
}

/// Clear any order on the controlled side whose target unit has died or
/// broken: the reference stays valid, the command does not.
fn validate_targets(world: &mut World, side: Side) {
    let targeted: Vec<(Entity, Entity)> = world
        .query::<(&Side, &Orders, &Vitals, &UnitState)>()
        .iter()
        .filter(|(_, (unit_side, _, vitals, state))| {
            **unit_side == side && vitals.hp > 0.0 && **state != UnitState::Routing
        })
        .filter_map(|(entity, (_, orders, _, _))| orders.target.map(|t| (entity, t)))
        .collect();

    for (entity, target) in targeted {
        if target_is_valid(world, target) {
            continue;
        }
        if let Ok(mut orders) = world.get::<&mut Orders>(entity) {
            orders.target = None;
            orders.kind = OrderKind::None;
        }
    }
}

fn target_is_valid(world: &World, target: Entity) -> bool {
    let alive = world.get::<&Vitals>(target).map_or(false, |v| v.hp > 0.0);
    let steady = world
        .get::<&UnitState>(target)
        .map_or(false, |s| *s != UnitState::Routing);
    alive && steady
}

/// Snapshot of every live, non-routing unit on the field.
fn battlefield_view(world: &World) -> Vec<UnitInfo> {
    world
        .query::<(
            &Position,
            &Side,
            &volley_core::enums::UnitKind,
            &Vitals,
            &UnitState,
            &Orders,
        )>()
        .iter()
        .filter(|(_, (_, _, _, vitals, state, _))| {
            vitals.hp > 0.0 && **state != UnitState::Routing
        })
        .map(|(entity, (pos, side, kind, vitals, _, orders))| UnitInfo {
            entity,
            side: *side,
            kind: *kind,
            pos: pos.0,
            hp_frac: vitals.hp / kind.stats().max_hp,
            range: kind.stats().range,
            has_order: orders.kind != OrderKind::None,
            has_target: orders.target.is_some(),
        })
        .collect()
}
