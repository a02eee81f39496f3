//! Combat resolution: accuracy, flanking, the single damage entry
//! point, morale cascades, and area damage.

use hecs::{Entity, World};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::debug;

use volley_core::components::{CombatTimers, Facing, Orders, Position, Projectile, Vitals};
use volley_core::constants::*;
use volley_core::enums::{AttackAspect, ProjectileKind, Side, UnitKind, UnitState};
use volley_core::events::{AudioEvent, EffectFact, EffectKind};
use volley_core::stats::{fatigue_modifiers, UnitStats};
use volley_core::types::{bearing, heading_vec, normalize_angle, Vec2};
use volley_terrain::TerrainMap;

/// How a damage amount arrived at the defender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageSource {
    Melee,
    Ranged,
    /// Area damage; never flanks and never takes elevation scaling.
    Blast,
}

/// Attacking unit facts needed by the damage pipeline. Area damage has
/// no attacker.
#[derive(Debug, Clone, Copy)]
pub struct AttackerInfo {
    pub pos: Vec2,
    pub kind: UnitKind,
}

/// Classify a relative incoming angle (0 = dead ahead, PI = dead
/// astern). Exactly 45 degrees is still frontal; exactly 135 is still a
/// flank hit.
pub fn aspect_from_relative(relative: f64) -> AttackAspect {
    use std::f64::consts::FRAC_PI_4;
    if relative <= FRAC_PI_4 {
        AttackAspect::Front
    } else if relative > 3.0 * FRAC_PI_4 {
        AttackAspect::Rear
    } else {
        AttackAspect::Flank
    }
}

/// Which aspect an attack from `attacker_at` strikes relative to the
/// defender's facing.
pub fn calculate_flanking(attacker_at: Vec2, defender_at: Vec2, defender_facing: f64) -> AttackAspect {
    let attack_angle = bearing(attacker_at, defender_at);
    // Reverse to get the direction the attack comes *from*.
    let incoming = attack_angle + std::f64::consts::PI;
    let relative = normalize_angle(incoming - defender_facing).abs();
    aspect_from_relative(relative)
}

/// Chance-to-hit model for a ranged shot; drives aim-point spread.
pub fn accuracy(
    stats: &UnitStats,
    kind: UnitKind,
    vitals: &Vitals,
    in_formation: bool,
    dist: f64,
) -> f64 {
    let mut acc = 1.0;

    // Range penalty: -40% at maximum range.
    acc *= 1.0 - (dist / stats.range) * 0.4;

    // Shaken troops can't aim.
    acc *= vitals.morale / stats.max_morale;

    // Massed volleys versus scattered fire.
    acc *= if in_formation { 1.2 } else { 0.8 };

    // Trained gunners.
    if kind == UnitKind::Artillery {
        acc *= 1.3;
    }

    acc.clamp(0.2, 1.0)
}

/// Spawn a projectile from `shooter` toward `target`'s current position,
/// with accuracy-driven aim spread.
pub fn fire_at(
    world: &mut World,
    shooter: Entity,
    target: Entity,
    rng: &mut ChaCha8Rng,
    effects: &mut Vec<EffectFact>,
    audio: &mut Vec<AudioEvent>,
) {
    let (pos, facing, side, kind, vitals, in_formation) = {
        let Ok(pos) = world.get::<&Position>(shooter) else {
            return;
        };
        let Ok(facing) = world.get::<&Facing>(shooter) else {
            return;
        };
        let Ok(side) = world.get::<&Side>(shooter) else {
            return;
        };
        let Ok(kind) = world.get::<&UnitKind>(shooter) else {
            return;
        };
        let Ok(vitals) = world.get::<&Vitals>(shooter) else {
            return;
        };
        let Ok(orders) = world.get::<&Orders>(shooter) else {
            return;
        };
        (pos.0, facing.0, *side, *kind, *vitals, orders.in_formation)
    };
    let Ok(target_pos) = world.get::<&Position>(target).map(|p| p.0) else {
        return;
    };

    let stats = kind.stats();
    let acc = accuracy(stats, kind, &vitals, in_formation, pos.distance(target_pos));
    let spread = (1.0 - acc) * MAX_SPREAD_DISTANCE;
    let aim = target_pos
        + Vec2::new(
            (rng.gen::<f64>() - 0.5) * spread,
            (rng.gen::<f64>() - 0.5) * spread,
        );

    let muzzle = pos + heading_vec(facing) * (stats.half_width * 0.5 + 2.0);
    if rng.gen_bool(0.5) {
        effects.push(EffectFact::new(EffectKind::MuzzleSmoke, muzzle));
    }

    let damage = stats.damage * fatigue_modifiers(vitals.fatigue).damage;
    let (proj_kind, speed, angle_spread) = match kind {
        UnitKind::Artillery => (
            ProjectileKind::Cannonball,
            CANNONBALL_SPEED,
            CANNONBALL_ANGLE_SPREAD,
        ),
        _ => (ProjectileKind::Bullet, BULLET_SPEED, BULLET_ANGLE_SPREAD),
    };
    audio.push(match proj_kind {
        ProjectileKind::Cannonball => AudioEvent::CannonFired { side },
        ProjectileKind::Bullet => AudioEvent::MusketFired { side },
    });

    let angle = bearing(muzzle, aim) + (rng.gen::<f64>() - 0.5) * angle_spread;
    world.spawn((
        Position(muzzle),
        Projectile {
            kind: proj_kind,
            origin: muzzle,
            velocity: heading_vec(angle) * speed,
            target: aim,
            damage,
            side,
            shooter,
            dist_total: muzzle.distance(aim),
            traveled: 0.0,
        },
    ));
}

/// The single entry point all damage sources go through.
///
/// Composes flanking, terrain cover, elevation advantage, formation
/// defense and fatigue defense against the base amount, then applies
/// hit point and morale loss, death, and rout cascades.
pub fn apply_damage(
    world: &mut World,
    terrain: &TerrainMap,
    target: Entity,
    base: f64,
    attacker: Option<AttackerInfo>,
    source: DamageSource,
    effects: &mut Vec<EffectFact>,
    audio: &mut Vec<AudioEvent>,
) {
    let (pos, facing, side, kind, fatigue, routing, in_formation, formation) = {
        let Ok(vitals) = world.get::<&Vitals>(target) else {
            return;
        };
        if vitals.hp <= 0.0 {
            return;
        }
        let Ok(pos) = world.get::<&Position>(target) else {
            return;
        };
        let Ok(facing) = world.get::<&Facing>(target) else {
            return;
        };
        let Ok(side) = world.get::<&Side>(target) else {
            return;
        };
        let Ok(kind) = world.get::<&UnitKind>(target) else {
            return;
        };
        let Ok(state) = world.get::<&UnitState>(target) else {
            return;
        };
        let Ok(orders) = world.get::<&Orders>(target) else {
            return;
        };
        (
            pos.0,
            facing.0,
            *side,
            *kind,
            vitals.fatigue,
            *state == UnitState::Routing,
            orders.in_formation,
            orders.formation,
        )
    };

    let mut amount = base;

    let aspect = match (attacker, source) {
        (Some(a), DamageSource::Melee | DamageSource::Ranged) => {
            Some(calculate_flanking(a.pos, pos, facing))
        }
        _ => None,
    };
    if let Some(aspect) = aspect {
        amount *= aspect.damage_modifier();
    }

    // Defender's cover absorbs its fraction; a full-unit attacker also
    // gets the elevation advantage.
    amount *= terrain.cover_modifier(pos);
    if let Some(a) = attacker {
        amount *= terrain.elevation_advantage(a.pos, pos);
    }

    // Formation defense while the defender holds a slot.
    if in_formation {
        if let Some(f) = formation {
            let fstats = f.stats();
            if attacker.is_some_and(|a| a.kind == UnitKind::Cavalry) {
                amount /= fstats.cavalry_defense_mod;
            } else if source == DamageSource::Melee {
                amount /= fstats.melee_defense_mod;
            }
        }
    }

    amount *= fatigue_modifiers(fatigue).defense;

    let mut died = false;
    let mut broke = false;
    if let Ok(mut vitals) = world.get::<&mut Vitals>(target) {
        vitals.hp = (vitals.hp - amount).max(0.0);
        vitals.morale = (vitals.morale - amount * MORALE_DAMAGE_RATIO).max(0.0);
        died = vitals.hp <= 0.0;
        broke = !died && vitals.morale <= 0.0 && !routing;
    }
    if let Ok(mut timers) = world.get::<&mut CombatTimers>(target) {
        timers.flash = HIT_FLASH_SECS;
    }

    effects.push(EffectFact::new(EffectKind::Blood, pos));
    effects.push(EffectFact::new(
        EffectKind::DamageNumber {
            amount,
            aspect: aspect.unwrap_or(AttackAspect::Front),
        },
        pos,
    ));

    if died {
        audio.push(AudioEvent::UnitDied { side, kind });
    } else if broke {
        begin_rout(world, target, 0, effects, audio);
    }
}

/// Transition a unit into the terminal ROUTING state and frighten
/// nearby allies, recursively, up to the cascade depth bound.
fn begin_rout(
    world: &mut World,
    entity: Entity,
    depth: u32,
    effects: &mut Vec<EffectFact>,
    audio: &mut Vec<AudioEvent>,
) {
    let (pos, side) = {
        let Ok(pos) = world.get::<&Position>(entity) else {
            return;
        };
        let Ok(side) = world.get::<&Side>(entity) else {
            return;
        };
        (pos.0, *side)
    };

    if let Ok(mut state) = world.get::<&mut UnitState>(entity) {
        *state = UnitState::Routing;
    }
    if let Ok(mut orders) = world.get::<&mut Orders>(entity) {
        orders.clear();
    }
    effects.push(EffectFact::new(EffectKind::RoutMarker, pos));
    audio.push(AudioEvent::UnitRouted { side });
    debug!(?side, depth, "unit broke and is routing");

    cascade(world, entity, pos, side, depth, effects, audio);
}

fn cascade(
    world: &mut World,
    source: Entity,
    source_pos: Vec2,
    source_side: Side,
    depth: u32,
    effects: &mut Vec<EffectFact>,
    audio: &mut Vec<AudioEvent>,
) {
    if depth > CASCADE_MAX_DEPTH {
        return;
    }

    let allies: Vec<Entity> = world
        .query::<(&Position, &Side, &Vitals, &UnitState)>()
        .iter()
        .filter(|(e, (pos, side, vitals, state))| {
            *e != source
                && **side == source_side
                && vitals.hp > 0.0
                && **state != UnitState::Routing
                && pos.0.distance(source_pos) < CASCADE_RADIUS
        })
        .map(|(e, _)| e)
        .collect();

    for ally in allies {
        // A deeper branch of this cascade may already have broken them.
        let still_steady = world
            .get::<&UnitState>(ally)
            .map(|s| *s != UnitState::Routing)
            .unwrap_or(false);
        let alive = world
            .get::<&Vitals>(ally)
            .map(|v| v.hp > 0.0)
            .unwrap_or(false);
        if !still_steady || !alive {
            continue;
        }

        let mut broke = false;
        if let Ok(mut vitals) = world.get::<&mut Vitals>(ally) {
            vitals.morale = (vitals.morale - CASCADE_MORALE_LOSS).max(0.0);
            broke = vitals.morale <= 0.0;
        }
        if let Ok(pos) = world.get::<&Position>(ally) {
            effects.push(EffectFact::new(EffectKind::PanicMarker, pos.0));
        }
        if broke {
            begin_rout(world, ally, depth + 1, effects, audio);
        }
    }
}

/// Area damage around a point. Hits every unit in the radius regardless
/// of side, with no flanking and no elevation scaling.
pub fn create_explosion(
    world: &mut World,
    terrain: &TerrainMap,
    at: Vec2,
    radius: f64,
    damage: f64,
    effects: &mut Vec<EffectFact>,
    audio: &mut Vec<AudioEvent>,
) {
    let victims: Vec<Entity> = world
        .query::<(&Position, &Vitals, &UnitKind)>()
        .iter()
        .filter(|(_, (pos, vitals, _))| vitals.hp > 0.0 && pos.0.distance(at) < radius)
        .map(|(e, _)| e)
        .collect();

    for victim in victims {
        apply_damage(
            world,
            terrain,
            victim,
            damage * BLAST_DAMAGE_RATIO,
            None,
            DamageSource::Blast,
            effects,
            audio,
        );
    }

    effects.push(EffectFact::new(EffectKind::Crater, at));
    audio.push(AudioEvent::Shellburst { x: at.x, y: at.y });
}
