//! Per-unit per-tick state machine: movement, combat engagement, local
//! separation, morale recovery, and fatigue accrual.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use volley_core::components::{CombatTimers, Facing, Orders, Position, Vitals};
use volley_core::constants::*;
use volley_core::enums::{OrderKind, Side, UnitKind, UnitState};
use volley_core::events::{AudioEvent, EffectFact, EffectKind};
use volley_core::stats::fatigue_modifiers;
use volley_core::types::{bearing, heading_vec, normalize_angle, rotate_toward, Vec2};
use volley_terrain::TerrainMap;

use crate::spatial::SpatialGrid;
use crate::systems::combat::{self, AttackerInfo, DamageSource};

/// Per-tick context shared by every unit update.
pub struct UpdateCtx<'a> {
    pub dt: f64,
    pub width: f64,
    pub height: f64,
    pub terrain: &'a TerrainMap,
    pub grid: &'a SpatialGrid,
    pub rng: &'a mut ChaCha8Rng,
    pub effects: &'a mut Vec<EffectFact>,
    pub audio: &'a mut Vec<AudioEvent>,
}

/// Update every unit. Units are processed in spawn order; dead units
/// are skipped permanently.
pub fn run(world: &mut World, ctx: &mut UpdateCtx) {
    let units: Vec<Entity> = world
        .query::<&UnitKind>()
        .iter()
        .map(|(entity, _)| entity)
        .collect();

    for entity in units {
        update_one(world, entity, ctx);
    }
}

fn update_one(world: &mut World, entity: Entity, ctx: &mut UpdateCtx) {
    let dt = ctx.dt;

    // Working copies; written back in stages so nested combat calls see
    // fresh state.
    let Ok(kind) = world.get::<&UnitKind>(entity).map(|k| *k) else {
        return;
    };
    let Ok(side) = world.get::<&Side>(entity).map(|s| *s) else {
        return;
    };
    let Ok(mut vitals) = world.get::<&Vitals>(entity).map(|v| *v) else {
        return;
    };
    if vitals.hp <= 0.0 {
        return;
    }
    let Ok(mut pos) = world.get::<&Position>(entity).map(|p| p.0) else {
        return;
    };
    let Ok(mut facing) = world.get::<&Facing>(entity).map(|f| f.0) else {
        return;
    };
    let Ok(mut timers) = world.get::<&CombatTimers>(entity).map(|t| *t) else {
        return;
    };
    let Ok(mut orders) = world.get::<&Orders>(entity).map(|o| (*o).clone()) else {
        return;
    };
    let Ok(mut state) = world.get::<&UnitState>(entity).map(|s| *s) else {
        return;
    };
    let stats = kind.stats();

    timers.flash = (timers.flash - dt).max(0.0);
    if timers.reload > 0.0 {
        timers.reload -= dt;
    }

    // Routing: headlong flight with a wobble, removed once well off-field.
    if state == UnitState::Routing {
        facing += (ctx.rng.gen::<f64>() - 0.5) * ROUTING_WOBBLE;
        pos += heading_vec(facing) * stats.speed * ROUTING_SPEED_MULT * dt;

        if pos.x < -ROUTING_OFFSCREEN_MARGIN
            || pos.x > ctx.width + ROUTING_OFFSCREEN_MARGIN
            || pos.y < -ROUTING_OFFSCREEN_MARGIN
            || pos.y > ctx.height + ROUTING_OFFSCREEN_MARGIN
        {
            vitals.hp = 0.0;
        }
        write_back(world, entity, pos, facing, vitals, timers, &orders, state);
        return;
    }

    // Resolve the current command into an optional movement target.
    let mut move_target: Option<Vec2> = None;
    match orders.kind {
        OrderKind::Move if orders.move_target.is_some() => {
            move_target = orders.move_target;
            state = UnitState::Moving;
        }
        OrderKind::Attack if orders.target.is_some() => {
            match target_snapshot(world, orders.target) {
                Some(target_pos) => {
                    let engage_dist = if kind == UnitKind::Cavalry {
                        CAVALRY_ENGAGE_RANGE
                    } else {
                        stats.range * ENGAGE_RANGE_RATIO
                    };
                    if pos.distance(target_pos) > engage_dist {
                        move_target = Some(target_pos);
                        state = UnitState::Moving;
                        orders.in_formation = false;
                    } else {
                        state = UnitState::Combat;
                    }
                }
                None => {
                    // Stale reference: drop the command, fall back to idle.
                    orders.kind = OrderKind::None;
                    orders.target = None;
                    state = UnitState::Idle;
                }
            }
        }
        _ => state = UnitState::Idle,
    }
    let travelling = move_target.is_some();

    // Execute movement.
    if let Some(dest) = move_target {
        let d = pos.distance(dest);

        if d < ARRIVE_RADIUS && orders.kind == OrderKind::Move {
            // Snap into the slot and adopt the commanded facing.
            pos = dest;
            orders.kind = OrderKind::None;
            orders.move_target = None;
            orders.in_formation = true;
            state = UnitState::Idle;
            if let Some(slot_facing) = orders.formation_facing {
                facing = slot_facing;
            }
        } else {
            let travel_bearing = bearing(pos, dest);

            // Blend toward the commanded facing over the final approach.
            let facing_target = match orders.formation_facing {
                Some(slot_facing)
                    if orders.kind == OrderKind::Move && d < FORMATION_ROTATION_DISTANCE =>
                {
                    let blend = 1.0 - d / FORMATION_ROTATION_DISTANCE;
                    blend_angles(travel_bearing, slot_facing, blend)
                }
                _ => travel_bearing,
            };
            facing = rotate_toward(facing, facing_target, dt * TURN_SPEED_MULT);

            let fmods = fatigue_modifiers(vitals.fatigue);
            let mut speed = stats.speed * fmods.speed * ctx.terrain.speed_modifier(kind, pos);
            if orders.in_formation {
                if let Some(f) = orders.formation {
                    speed *= f.stats().speed_multiplier;
                }
            }
            if orders.kind == OrderKind::Move && d < SLOWDOWN_DISTANCE {
                speed *= d / SLOWDOWN_DISTANCE;
            }
            speed = speed.max(MIN_SPEED);

            // Misaligned units creep rather than stall outright.
            let alignment = (((facing - travel_bearing).cos() + 1.0) / 2.0).max(ALIGNMENT_FLOOR);
            pos += heading_vec(facing) * speed * alignment * dt;
            orders.in_formation = false;
        }
    }

    // Local separation. Skipped while travelling to an assigned slot
    // (the slot list already spaces units) and while standing formed.
    if !orders.in_formation && !travelling {
        for other in ctx.grid.query(pos, 1) {
            if other == entity {
                continue;
            }
            let Some((other_pos, other_kind, other_formed)) = neighbor_snapshot(world, other)
            else {
                continue;
            };
            let min_sep =
                (stats.half_width + other_kind.stats().half_width) / MIN_SEPARATION_DIVISOR;
            let d = pos.distance(other_pos);
            if d < min_sep {
                let push = bearing(other_pos, pos);
                let weight = if other_formed {
                    FORMED_SEPARATION_WEIGHT
                } else {
                    1.0
                };
                let force = (min_sep - d) * SEPARATION_FORCE * weight;
                pos += heading_vec(push) * force * dt;
            }
        }
    }

    pos.x = pos.x.clamp(FIELD_MARGIN, ctx.width - FIELD_MARGIN);
    pos.y = pos.y.clamp(FIELD_MARGIN, ctx.height - FIELD_MARGIN);

    // Movement is settled; publish before combat so nested reads (shot
    // accuracy, flanking attribution) see this tick's position.
    write_back(world, entity, pos, facing, vitals, timers, &orders, state);

    // Combat, only when standing.
    if !travelling {
        let shoot_target = if orders.kind == OrderKind::Attack {
            orders
                .target
                .and_then(|t| target_snapshot(world, Some(t)).map(|p| (t, p)))
        } else {
            nearest_enemy(world, entity, side, pos)
                .filter(|(_, _, d)| *d <= stats.range)
                .map(|(e, p, _)| (e, p))
        };

        if let Some((target, target_pos)) = shoot_target {
            let d = pos.distance(target_pos);
            let fmods = fatigue_modifiers(vitals.fatigue);

            if d < MELEE_RANGE {
                if timers.reload <= 0.0 {
                    let mut damage = stats.damage * stats.melee * fmods.damage;
                    if orders.in_formation {
                        if let Some(f) = orders.formation {
                            damage *= f.stats().melee_attack_mod;
                        }
                    }
                    combat::apply_damage(
                        world,
                        ctx.terrain,
                        target,
                        damage,
                        Some(AttackerInfo { pos, kind }),
                        DamageSource::Melee,
                        ctx.effects,
                        ctx.audio,
                    );
                    timers.reload = MELEE_COOLDOWN * fmods.reload;

                    let mid = (pos + target_pos) / 2.0;
                    ctx.effects.push(EffectFact::new(EffectKind::MeleeDust, mid));
                    ctx.audio.push(AudioEvent::MeleeClash { x: mid.x, y: mid.y });
                }
            } else if d <= stats.range {
                let angle_to = bearing(pos, target_pos);
                let off_axis = normalize_angle(facing - angle_to).abs();
                if off_axis < RANGED_FACING_TOLERANCE {
                    // Cavalry never volley; they close to sabre range.
                    if timers.reload <= 0.0 && kind != UnitKind::Cavalry {
                        combat::fire_at(world, entity, target, ctx.rng, ctx.effects, ctx.audio);
                        timers.reload = (stats.reload_secs
                            + ctx.rng.gen::<f64>() * RELOAD_JITTER_SECS)
                            * fmods.reload;
                    }
                } else {
                    facing = rotate_toward(facing, angle_to, dt * COMBAT_TURN_SPEED);
                }
            }
        }
    }

    // Morale recovery: only out of contact and in good company.
    let nearest = nearest_enemy(world, entity, side, pos);
    let in_combat = nearest.is_some_and(|(_, _, d)| d < COMBAT_PROXIMITY);
    if !in_combat {
        let allies = allies_within(world, entity, side, pos, RALLY_RADIUS);
        if allies >= RALLY_MIN_ALLIES {
            let rate = RALLY_BASE_RATE + (allies as f64).min(RALLY_MAX_BONUS);
            vitals.morale = (vitals.morale + rate * dt).min(stats.max_morale);
        }
    }

    // Fatigue accrual: fighting is hardest, cavalry tire fast on the
    // move, idle units recover.
    let is_fighting =
        nearest.is_some_and(|(_, _, d)| d < MELEE_RANGE + FIGHTING_PROXIMITY_SLACK);
    let rate = if is_fighting {
        FATIGUE_FIGHT_RATE
    } else if orders.move_target.is_some() {
        if kind == UnitKind::Cavalry {
            FATIGUE_CHARGE_RATE
        } else {
            FATIGUE_MARCH_RATE
        }
    } else {
        FATIGUE_IDLE_RATE
    };
    vitals.fatigue = (vitals.fatigue + rate * dt).clamp(0.0, 100.0);

    write_back(world, entity, pos, facing, vitals, timers, &orders, state);
}

/// Partial blend between two angles (`t` in 0..1 along the shortest arc).
pub fn blend_angles(from: f64, to: f64, t: f64) -> f64 {
    let diff = normalize_angle(to - from);
    if diff.abs() < t {
        to
    } else {
        from + diff.signum() * t
    }
}

/// Position of a live target, if the reference still dereferences to a
/// living unit.
fn target_snapshot(world: &World, target: Option<Entity>) -> Option<Vec2> {
    let target = target?;
    let alive = world.get::<&Vitals>(target).ok()?.hp > 0.0;
    if !alive {
        return None;
    }
    Some(world.get::<&Position>(target).ok()?.0)
}

fn neighbor_snapshot(world: &World, entity: Entity) -> Option<(Vec2, UnitKind, bool)> {
    let vitals = *world.get::<&Vitals>(entity).ok()?;
    let state = *world.get::<&UnitState>(entity).ok()?;
    if vitals.hp <= 0.0 || state == UnitState::Routing {
        return None;
    }
    let pos = world.get::<&Position>(entity).ok()?.0;
    let kind = *world.get::<&UnitKind>(entity).ok()?;
    let formed = world.get::<&Orders>(entity).ok()?.in_formation;
    Some((pos, kind, formed))
}

/// Nearest live, non-routing enemy of `side`. Full scan: target finding
/// is not spatially accelerated.
fn nearest_enemy(
    world: &World,
    entity: Entity,
    side: Side,
    from: Vec2,
) -> Option<(Entity, Vec2, f64)> {
    let mut best: Option<(Entity, Vec2, f64)> = None;
    for (other, (pos, other_side, vitals, state)) in world
        .query::<(&Position, &Side, &Vitals, &UnitState)>()
        .iter()
    {
        if other == entity
            || *other_side == side
            || vitals.hp <= 0.0
            || *state == UnitState::Routing
        {
            continue;
        }
        let d = from.distance(pos.0);
        if best.map_or(true, |(_, _, bd)| d < bd) {
            best = Some((other, pos.0, d));
        }
    }
    best
}

fn allies_within(world: &World, entity: Entity, side: Side, from: Vec2, radius: f64) -> u32 {
    let mut count = 0;
    for (other, (pos, other_side, vitals, state)) in world
        .query::<(&Position, &Side, &Vitals, &UnitState)>()
        .iter()
    {
        if other == entity
            || *other_side != side
            || vitals.hp <= 0.0
            || *state == UnitState::Routing
        {
            continue;
        }
        if from.distance(pos.0) < radius {
            count += 1;
        }
    }
    count
}

#[allow(clippy::too_many_arguments)]
fn write_back(
    world: &mut World,
    entity: Entity,
    pos: Vec2,
    facing: f64,
    vitals: Vitals,
    timers: CombatTimers,
    orders: &Orders,
    state: UnitState,
) {
    if let Ok(mut p) = world.get::<&mut Position>(entity) {
        p.0 = pos;
    }
    if let Ok(mut f) = world.get::<&mut Facing>(entity) {
        f.0 = facing;
    }
    if let Ok(mut v) = world.get::<&mut Vitals>(entity) {
        *v = vitals;
    }
    if let Ok(mut t) = world.get::<&mut CombatTimers>(entity) {
        *t = timers;
    }
    if let Ok(mut o) = world.get::<&mut Orders>(entity) {
        *o = orders.clone();
    }
    if let Ok(mut s) = world.get::<&mut UnitState>(entity) {
        *s = state;
    }
}
