//! Selection queries and drag-order interpretation.
//!
//! Commands referencing dead or routed units degrade to no-ops; a
//! formation order with nothing selected does nothing.

use hecs::{Entity, World};
use rand_chacha::ChaCha8Rng;

use volley_core::components::{contains_point, Orders, Position, Vitals};
use volley_core::constants::*;
use volley_core::enums::{FormationType, OrderKind, Side, UnitKind, UnitState};
use volley_core::types::{bearing, Vec2};

/// Live, non-routing units of `side` inside a rect. A rect smaller than
/// the click threshold is treated as a point pick.
pub fn select_rect(world: &World, side: Side, a: Vec2, b: Vec2) -> Vec<Entity> {
    let min = a.min(b);
    let max = a.max(b);
    let is_click = max.x - min.x < CLICK_THRESHOLD && max.y - min.y < CLICK_THRESHOLD;

    selectable(world, side)
        .into_iter()
        .filter(|(_, pos, kind)| {
            if is_click {
                contains_point(*kind, *pos, min)
            } else {
                pos.x > min.x && pos.x < max.x && pos.y > min.y && pos.y < max.y
            }
        })
        .map(|(entity, _, _)| entity)
        .collect()
}

/// Every live, non-routing unit of one kind.
pub fn select_kind(world: &World, side: Side, kind: UnitKind) -> Vec<Entity> {
    selectable(world, side)
        .into_iter()
        .filter(|(_, _, k)| *k == kind)
        .map(|(entity, _, _)| entity)
        .collect()
}

pub fn select_all(world: &World, side: Side) -> Vec<Entity> {
    selectable(world, side)
        .into_iter()
        .map(|(entity, _, _)| entity)
        .collect()
}

/// Double-click style: all units of the same kind as the clicked unit
/// within a radius of it.
pub fn select_nearby(world: &World, side: Side, at: Vec2, radius: f64) -> Vec<Entity> {
    let candidates = selectable(world, side);
    let Some((_, clicked_pos, clicked_kind)) = candidates
        .iter()
        .find(|(_, pos, kind)| contains_point(*kind, *pos, at))
        .copied()
    else {
        return Vec::new();
    };

    candidates
        .into_iter()
        .filter(|(_, pos, kind)| *kind == clicked_kind && pos.distance(clicked_pos) <= radius)
        .map(|(entity, _, _)| entity)
        .collect()
}

/// Interpret a pointer drag for the current selection.
///
/// Short drag onto a live enemy: attack order. Short drag onto ground:
/// formation-preserving translate, facing the enemy mass. Long drag:
/// "move to start, face toward end" with fresh slot geometry, pairing
/// units to slots by perpendicular projection to minimize path crossing.
pub fn issue_order(
    world: &mut World,
    rng: &mut ChaCha8Rng,
    selected: &[Entity],
    side: Side,
    start: Vec2,
    end: Vec2,
    formation: FormationType,
) {
    let drag_len = start.distance(end);

    // Filter the selection down to units still able to take orders.
    let units: Vec<(Entity, Vec2)> = selected
        .iter()
        .filter_map(|&entity| {
            let alive = world.get::<&Vitals>(entity).ok()?.hp > 0.0;
            let steady = *world.get::<&UnitState>(entity).ok()? != UnitState::Routing;
            if !(alive && steady) {
                return None;
            }
            let pos = world.get::<&Position>(entity).ok()?.0;
            Some((entity, pos))
        })
        .collect();
    if units.is_empty() {
        return;
    }

    if drag_len < FORMATION_DRAG_THRESHOLD {
        if let Some(enemy) = enemy_at_point(world, side, end) {
            for (entity, _) in &units {
                if let Ok(mut orders) = world.get::<&mut Orders>(*entity) {
                    orders.kind = OrderKind::Attack;
                    orders.target = Some(enemy);
                    orders.move_target = None;
                    orders.formation_facing = None;
                }
            }
            return;
        }

        // Click-move: translate the current arrangement, turning to face
        // the enemy mass.
        let centroid =
            units.iter().map(|(_, p)| *p).sum::<Vec2>() / units.len() as f64;
        let facing = enemy_centroid(world, side)
            .map(|c| bearing(end, c))
            .unwrap_or_else(|| side.baseline_facing());
        let offset = end - centroid;

        for (entity, pos) in &units {
            if let Ok(mut orders) = world.get::<&mut Orders>(*entity) {
                orders.kind = OrderKind::Move;
                orders.target = None;
                orders.move_target = Some(*pos + offset);
                orders.formation_facing = Some(facing);
                orders.in_formation = false;
            }
        }
        return;
    }

    // Drag-move: move to the start point, face toward the end point.
    let facing = bearing(start, end);
    let slots = volley_formation::positions(
        units.len(),
        start,
        facing,
        formation,
        UNIT_SPACING,
        rng,
    );

    // Pair by sorted projection onto the perpendicular-to-facing axis.
    let perp = facing + std::f64::consts::FRAC_PI_2;
    let project = |p: Vec2| perp.cos() * p.x + perp.sin() * p.y;

    let mut sorted_units = units;
    sorted_units.sort_by(|a, b| project(a.1).total_cmp(&project(b.1)));
    let mut sorted_slots = slots;
    sorted_slots.sort_by(|a, b| project(*a).total_cmp(&project(*b)));

    for ((entity, _), slot) in sorted_units.iter().zip(sorted_slots.iter()) {
        if let Ok(mut orders) = world.get::<&mut Orders>(*entity) {
            orders.kind = OrderKind::Move;
            orders.target = None;
            orders.move_target = Some(*slot);
            orders.formation_facing = Some(facing);
            orders.formation = Some(formation);
            orders.in_formation = false;
        }
    }
}

fn selectable(world: &World, side: Side) -> Vec<(Entity, Vec2, UnitKind)> {
    world
        .query::<(&Position, &Side, &UnitKind, &Vitals, &UnitState)>()
        .iter()
        .filter(|(_, (_, unit_side, _, vitals, state))| {
            **unit_side == side && vitals.hp > 0.0 && **state != UnitState::Routing
        })
        .map(|(entity, (pos, _, kind, _, _))| (entity, pos.0, *kind))
        .collect()
}

fn enemy_at_point(world: &World, side: Side, at: Vec2) -> Option<Entity> {
    world
        .query::<(&Position, &Side, &UnitKind, &Vitals)>()
        .iter()
        .find(|(_, (pos, unit_side, kind, vitals))| {
            **unit_side != side && vitals.hp > 0.0 && contains_point(**kind, pos.0, at)
        })
        .map(|(entity, _)| entity)
}

fn enemy_centroid(world: &World, side: Side) -> Option<Vec2> {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for (_, (pos, unit_side, vitals, state)) in world
        .query::<(&Position, &Side, &Vitals, &UnitState)>()
        .iter()
    {
        if *unit_side != side && vitals.hp > 0.0 && *state != UnitState::Routing {
            sum += pos.0;
            count += 1;
        }
    }
    (count > 0).then(|| sum / count as f64)
}
