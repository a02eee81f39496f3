//! Initial army deployment.
//!
//! Both sides field the same composition, mirrored across the
//! battlefield: a main infantry line, a reserve line behind it, an
//! artillery park behind the infantry, and two cavalry wings.

use hecs::{Entity, World};

use volley_core::components::{CombatTimers, Facing, Orders, Position, Vitals};
use volley_core::constants::UNIT_SPACING;
use volley_core::enums::{Side, UnitKind, UnitState};
use volley_core::types::Vec2;

use crate::engine::ArmyComposition;

/// Spawn both armies facing each other across the field.
pub fn deploy_armies(world: &mut World, width: f64, height: f64, army: &ArmyComposition) {
    spawn_army(world, Side::Player, width, height, army);
    spawn_army(world, Side::Enemy, width, height, army);
}

fn spawn_army(world: &mut World, side: Side, width: f64, height: f64, army: &ArmyComposition) {
    let center_x = width / 2.0;
    let base_y = match side {
        Side::Player => height - 150.0,
        Side::Enemy => 150.0,
    };
    // Ranks stack from the baseline toward the enemy.
    let forward = side.advance_sign();

    // Main infantry line.
    let line_origin = center_x - (army.line_rank_width as f64 * UNIT_SPACING) / 2.0;
    for rank in 0..army.line_ranks {
        for file in 0..army.line_rank_width {
            spawn_unit(
                world,
                side,
                UnitKind::Infantry,
                Vec2::new(
                    line_origin + file as f64 * UNIT_SPACING,
                    base_y + forward * rank as f64 * UNIT_SPACING,
                ),
            );
        }
    }

    // Reserve line behind the main body.
    let reserve_origin = center_x - (army.reserve_rank_width as f64 * UNIT_SPACING) / 2.0;
    for rank in 0..army.reserve_ranks {
        for file in 0..army.reserve_rank_width {
            spawn_unit(
                world,
                side,
                UnitKind::Infantry,
                Vec2::new(
                    reserve_origin + file as f64 * UNIT_SPACING,
                    base_y - forward * 80.0 + forward * rank as f64 * UNIT_SPACING,
                ),
            );
        }
    }

    // Artillery park just behind the infantry.
    let gun_spacing = 60.0;
    let gun_origin = center_x - (army.artillery.saturating_sub(1)) as f64 * gun_spacing / 2.0;
    for i in 0..army.artillery {
        spawn_unit(
            world,
            side,
            UnitKind::Artillery,
            Vec2::new(gun_origin + i as f64 * gun_spacing, base_y - forward * 40.0),
        );
    }

    // Cavalry wings, five files wide.
    for wing_x in [100.0, width - 150.0] {
        for i in 0..army.cavalry_per_wing {
            let file = (i % 5) as f64;
            let row = (i / 5) as f64;
            spawn_unit(
                world,
                side,
                UnitKind::Cavalry,
                Vec2::new(wing_x + file * 15.0, base_y + forward * 50.0 + row * 15.0),
            );
        }
    }
}

/// Spawn one unit at full strength, idle, facing the enemy baseline.
pub fn spawn_unit(world: &mut World, side: Side, kind: UnitKind, at: Vec2) -> Entity {
    let stats = kind.stats();
    world.spawn((
        Position(at),
        Facing(side.baseline_facing()),
        side,
        kind,
        Vitals {
            hp: stats.max_hp,
            morale: stats.max_morale,
            fatigue: 0.0,
        },
        CombatTimers::default(),
        Orders::default(),
        UnitState::Idle,
    ))
}
