//! Win condition evaluation and per-side strength counts.

use hecs::World;

use volley_core::enums::{BattleOutcome, Side, UnitState};
use volley_core::components::Vitals;
use volley_core::state::SideCounts;

/// Count each side's units. "Live" excludes the dead and the routing;
/// totals count every unit ever fielded.
pub fn count_sides(world: &World) -> SideCounts {
    let mut counts = SideCounts::default();
    for (_, (side, vitals, state)) in world.query::<(&Side, &Vitals, &UnitState)>().iter() {
        let live = vitals.hp > 0.0 && *state != UnitState::Routing;
        match side {
            Side::Player => {
                counts.player_total += 1;
                if live {
                    counts.player_live += 1;
                }
            }
            Side::Enemy => {
                counts.enemy_total += 1;
                if live {
                    counts.enemy_live += 1;
                }
            }
        }
    }
    counts
}

/// Latching win check. A side with no live, non-routing units loses;
/// both sides hitting zero in the same tick is a draw.
pub fn evaluate(counts: &SideCounts, current: BattleOutcome) -> BattleOutcome {
    if current.is_over() {
        return current;
    }
    match (counts.player_live, counts.enemy_live) {
        (0, 0) => BattleOutcome::Draw,
        (0, _) => BattleOutcome::Victory {
            winner: Side::Enemy,
        },
        (_, 0) => BattleOutcome::Victory {
            winner: Side::Player,
        },
        _ => BattleOutcome::Ongoing,
    }
}
