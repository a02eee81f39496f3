//! Snapshot system: queries the ECS world and builds a complete
//! `WorldSnapshot`. Read-only over the world.

use hecs::{Entity, World};

use volley_core::components::{CombatTimers, Facing, Orders, Position, Projectile, Vitals};
use volley_core::enums::{AiPhase, BattleOutcome, Side, UnitKind, UnitState};
use volley_core::events::{AudioEvent, EffectFact};
use volley_core::state::{ProjectileView, UnitView, WorldSnapshot};
use volley_core::types::SimTime;

use crate::systems::victory;

#[allow(clippy::too_many_arguments)]
pub fn build_snapshot(
    world: &World,
    time: SimTime,
    outcome: BattleOutcome,
    ai_phase: AiPhase,
    selected: &[Entity],
    effects: &[EffectFact],
    audio_events: Vec<AudioEvent>,
    width: f64,
    height: f64,
) -> WorldSnapshot {
    WorldSnapshot {
        time,
        outcome,
        ai_phase,
        units: build_units(world, selected),
        projectiles: build_projectiles(world),
        effects: effects.to_vec(),
        audio_events,
        counts: victory::count_sides(world),
        width,
        height,
    }
}

fn build_units(world: &World, selected: &[Entity]) -> Vec<UnitView> {
    let mut units: Vec<UnitView> = world
        .query::<(
            &Position,
            &Facing,
            &Side,
            &UnitKind,
            &Vitals,
            &CombatTimers,
            &UnitState,
            &Orders,
        )>()
        .iter()
        .map(
            |(entity, (pos, facing, side, kind, vitals, timers, state, orders))| {
                let stats = kind.stats();
                UnitView {
                    id: entity.to_bits().get(),
                    side: *side,
                    kind: *kind,
                    x: pos.0.x,
                    y: pos.0.y,
                    facing: facing.0,
                    hp: vitals.hp,
                    max_hp: stats.max_hp,
                    morale: vitals.morale,
                    max_morale: stats.max_morale,
                    fatigue: vitals.fatigue,
                    state: *state,
                    in_formation: orders.in_formation,
                    flash: timers.flash,
                    selected: selected.contains(&entity),
                }
            },
        )
        .collect();

    units.sort_by_key(|u| u.id);
    units
}

fn build_projectiles(world: &World) -> Vec<ProjectileView> {
    let mut projectiles: Vec<(u64, ProjectileView)> = world
        .query::<(&Position, &Projectile)>()
        .iter()
        .map(|(entity, (pos, proj))| {
            (
                entity.to_bits().get(),
                ProjectileView {
                    kind: proj.kind,
                    side: proj.side,
                    x: pos.0.x,
                    y: pos.0.y,
                },
            )
        })
        .collect();

    projectiles.sort_by_key(|(id, _)| *id);
    projectiles.into_iter().map(|(_, view)| view).collect()
}
