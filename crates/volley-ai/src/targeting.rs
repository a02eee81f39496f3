//! Target selection helpers shared by the controller phases.
//!
//! All functions operate on the battlefield view, which only contains
//! live, non-routing units: callers never re-check liveness here.

use volley_core::constants::{AI_ARTILLERY_HUNT_RANGE_MULT, AI_WOUNDED_HP_FRACTION};
use volley_core::enums::{Side, UnitKind};
use volley_core::types::Vec2;

use crate::controller::UnitInfo;

/// Centroid of one side's force, or `fallback` if the side is wiped out.
pub fn centroid(units: &[UnitInfo], side: Side, fallback: Vec2) -> Vec2 {
    let mut sum = Vec2::ZERO;
    let mut count = 0u32;
    for u in units.iter().filter(|u| u.side == side) {
        sum += u.pos;
        count += 1;
    }
    if count == 0 {
        fallback
    } else {
        sum / count as f64
    }
}

/// Nearest unit of the opposing side.
pub fn nearest_enemy<'a>(units: &'a [UnitInfo], side: Side, from: Vec2) -> Option<&'a UnitInfo> {
    units
        .iter()
        .filter(|u| u.side != side)
        .min_by(|a, b| {
            a.pos
                .distance_squared(from)
                .total_cmp(&b.pos.distance_squared(from))
        })
}

/// Priority targeting rule shared by infantry and committed cavalry:
/// enemy artillery within 1.5x range, then wounded enemies (below half
/// health) within range, then the nearest enemy.
pub fn priority_target<'a>(from: &UnitInfo, units: &'a [UnitInfo]) -> Option<&'a UnitInfo> {
    let nearest_of = |pred: &dyn Fn(&UnitInfo) -> bool| {
        units
            .iter()
            .filter(|u| u.side != from.side && pred(u))
            .min_by(|a, b| {
                a.pos
                    .distance_squared(from.pos)
                    .total_cmp(&b.pos.distance_squared(from.pos))
            })
    };

    if let Some(gun) = nearest_of(&|u| u.kind == UnitKind::Artillery) {
        if gun.pos.distance(from.pos) < from.range * AI_ARTILLERY_HUNT_RANGE_MULT {
            return Some(gun);
        }
    }

    if let Some(wounded) = nearest_of(&|u| u.hp_frac < AI_WOUNDED_HP_FRACTION) {
        if wounded.pos.distance(from.pos) < from.range {
            return Some(wounded);
        }
    }

    nearest_enemy(units, from.side, from.pos)
}

/// Densest enemy grouping: the enemy unit with the most enemies (itself
/// included) within `radius`, with its neighbor count.
pub fn densest_cluster<'a>(
    units: &'a [UnitInfo],
    against: Side,
    radius: f64,
) -> Option<(&'a UnitInfo, u32)> {
    let enemies: Vec<&UnitInfo> = units.iter().filter(|u| u.side != against).collect();
    let mut best: Option<(&UnitInfo, u32)> = None;

    for seed in &enemies {
        let count = enemies
            .iter()
            .filter(|o| o.pos.distance(seed.pos) < radius)
            .count() as u32;
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((*seed, count));
        }
    }
    best
}

/// Whether any of the side's infantry has closed to within the given
/// range of the enemy centroid.
pub fn infantry_engaged(units: &[UnitInfo], side: Side, enemy_centroid: Vec2, range: f64) -> bool {
    units
        .iter()
        .filter(|u| u.side == side && u.kind == UnitKind::Infantry)
        .any(|u| u.pos.distance(enemy_centroid) < range)
}
