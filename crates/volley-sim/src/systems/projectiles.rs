//! Projectile flight, impact detection, and terminal bursts.

use hecs::{Entity, World};

use volley_core::components::{contains_point, Position, Projectile, Vitals};
use volley_core::constants::BLAST_RADIUS;
use volley_core::enums::{ProjectileKind, Side, UnitKind};
use volley_core::events::{AudioEvent, EffectFact};
use volley_core::types::Vec2;
use volley_terrain::TerrainMap;

use crate::spatial::SpatialGrid;
use crate::systems::combat::{self, AttackerInfo, DamageSource};

struct Impact {
    target: Entity,
    damage: f64,
    shooter: Entity,
}

struct Burst {
    at: Vec2,
    damage: f64,
}

/// Advance every projectile; retire those that reach their aim point,
/// leave the field, or strike an enemy. Cannonballs always burst at
/// their terminal point.
#[allow(clippy::too_many_arguments)]
pub fn run(
    world: &mut World,
    terrain: &TerrainMap,
    grid: &SpatialGrid,
    width: f64,
    height: f64,
    dt: f64,
    despawn_buffer: &mut Vec<Entity>,
    effects: &mut Vec<EffectFact>,
    audio: &mut Vec<AudioEvent>,
) {
    let mut impacts: Vec<Impact> = Vec::new();
    let mut bursts: Vec<Burst> = Vec::new();

    {
        let mut query = world.query::<(&mut Position, &mut Projectile)>();
        'projectiles: for (entity, (pos, proj)) in query.iter() {
            let step = proj.velocity * dt;
            pos.0 += step;
            proj.traveled += step.length();

            let out_of_bounds =
                pos.0.x < 0.0 || pos.0.x > width || pos.0.y < 0.0 || pos.0.y > height;
            if proj.traveled >= proj.dist_total || out_of_bounds {
                despawn_buffer.push(entity);
                if proj.kind == ProjectileKind::Cannonball {
                    bursts.push(Burst {
                        at: pos.0,
                        damage: proj.damage,
                    });
                }
                continue;
            }

            // Impact test against units in the projectile's current cell.
            for unit in grid.entities_in_cell(pos.0) {
                let Ok(unit_side) = world.get::<&Side>(*unit) else {
                    continue;
                };
                if *unit_side == proj.side {
                    continue;
                }
                let alive = world.get::<&Vitals>(*unit).map_or(false, |v| v.hp > 0.0);
                if !alive {
                    continue;
                }
                let Ok(unit_pos) = world.get::<&Position>(*unit).map(|p| p.0) else {
                    continue;
                };
                let Ok(unit_kind) = world.get::<&UnitKind>(*unit).map(|k| *k) else {
                    continue;
                };
                if contains_point(unit_kind, unit_pos, pos.0) {
                    impacts.push(Impact {
                        target: *unit,
                        damage: proj.damage,
                        shooter: proj.shooter,
                    });
                    despawn_buffer.push(entity);
                    if proj.kind == ProjectileKind::Cannonball {
                        bursts.push(Burst {
                            at: pos.0,
                            damage: proj.damage,
                        });
                    }
                    continue 'projectiles;
                }
            }
        }
    }

    for impact in impacts {
        // Flanking is attributed to the shooter's position at impact
        // time; units are never despawned, so the handle still resolves.
        let attacker = world
            .get::<&Position>(impact.shooter)
            .ok()
            .map(|p| p.0)
            .and_then(|p| {
                world
                    .get::<&UnitKind>(impact.shooter)
                    .ok()
                    .map(|k| AttackerInfo { pos: p, kind: *k })
            });
        combat::apply_damage(
            world,
            terrain,
            impact.target,
            impact.damage,
            attacker,
            DamageSource::Ranged,
            effects,
            audio,
        );
    }

    for burst in bursts {
        combat::create_explosion(
            world, terrain, burst.at, BLAST_RADIUS, burst.damage, effects, audio,
        );
    }

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
