#[cfg(test)]
mod tests {
    use crate::commands::PlayerCommand;
    use crate::enums::*;
    use crate::stats::{fatigue_modifiers, FormationStats};
    use crate::types::{bearing, normalize_angle, rotate_toward, Vec2};

    /// Verify the enums that cross the snapshot boundary round-trip
    /// through serde_json.
    #[test]
    fn test_side_serde() {
        for v in [Side::Player, Side::Enemy] {
            let json = serde_json::to_string(&v).unwrap();
            let back: Side = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_formation_type_serde() {
        let variants = vec![
            FormationType::Line,
            FormationType::Column,
            FormationType::Square,
            FormationType::Wedge,
            FormationType::Skirmish,
            FormationType::HollowSquare,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: FormationType = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_battle_outcome_serde() {
        let variants = vec![
            BattleOutcome::Ongoing,
            BattleOutcome::Victory {
                winner: Side::Player,
            },
            BattleOutcome::Draw,
        ];
        for v in variants {
            let json = serde_json::to_string(&v).unwrap();
            let back: BattleOutcome = serde_json::from_str(&json).unwrap();
            assert_eq!(v, back);
        }
    }

    #[test]
    fn test_order_command_serde() {
        let cmd = PlayerCommand::Order {
            side: Side::Player,
            start_x: 10.0,
            start_y: 20.0,
            end_x: 110.0,
            end_y: 20.0,
            formation: FormationType::Square,
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"Order\""));
        let _back: PlayerCommand = serde_json::from_str(&json).unwrap();
    }

    // ---- Stat tables ----

    #[test]
    fn test_unit_stats_lookup() {
        assert_eq!(UnitKind::Infantry.stats().range, 200.0);
        assert_eq!(UnitKind::Cavalry.stats().speed, 25.0);
        assert_eq!(UnitKind::Artillery.stats().reload_secs, 8.0);
    }

    #[test]
    fn test_hollow_square_is_best_anti_cavalry() {
        let all = [
            FormationType::Line,
            FormationType::Column,
            FormationType::Square,
            FormationType::Wedge,
            FormationType::Skirmish,
            FormationType::HollowSquare,
        ];
        let best = all
            .iter()
            .map(|f| f.stats())
            .map(|s: FormationStats| s.cavalry_defense_mod)
            .fold(f64::MIN, f64::max);
        assert_eq!(best, FormationType::HollowSquare.stats().cavalry_defense_mod);
    }

    // ---- Fatigue bands ----

    #[test]
    fn test_fatigue_monotonic_across_bands() {
        // Representative fatigue level per band, in increasing order.
        let levels = [0.0, 25.0, 45.0, 65.0, 85.0];
        let mods: Vec<_> = levels.iter().map(|&f| fatigue_modifiers(f)).collect();

        for pair in mods.windows(2) {
            assert!(
                pair[1].damage <= pair[0].damage,
                "damage dealt must not increase with fatigue"
            );
            assert!(
                pair[1].defense >= pair[0].defense,
                "damage taken must not decrease with fatigue"
            );
            assert!(pair[1].speed <= pair[0].speed);
            assert!(pair[1].reload >= pair[0].reload);
        }
    }

    #[test]
    fn test_exhausted_band_exact_values() {
        let m = fatigue_modifiers(80.0);
        assert_eq!(m.damage, 0.5);
        assert_eq!(m.defense, 1.5);
        assert_eq!(m.speed, 0.5);
        assert_eq!(m.reload, 2.0);
    }

    #[test]
    fn test_flanking_aspect_ordering() {
        assert!(
            AttackAspect::Rear.damage_modifier() > AttackAspect::Flank.damage_modifier()
                && AttackAspect::Flank.damage_modifier() > AttackAspect::Front.damage_modifier()
        );
    }

    // ---- Angle helpers ----

    #[test]
    fn test_normalize_angle_wraps() {
        use std::f64::consts::PI;
        assert!((normalize_angle(3.0 * PI) - PI).abs() < 1e-9);
        assert!((normalize_angle(-3.0 * PI) - PI).abs() < 1e-9);
        assert_eq!(normalize_angle(0.5), 0.5);
    }

    #[test]
    fn test_rotate_toward_takes_shortest_arc() {
        use std::f64::consts::PI;
        // From just below +PI to just above -PI: shortest arc crosses the seam.
        let next = rotate_toward(PI - 0.1, -PI + 0.1, 0.05);
        assert!(next > PI - 0.1, "should rotate forward through the seam");
    }

    #[test]
    fn test_rotate_toward_snaps_when_close() {
        assert_eq!(rotate_toward(0.0, 0.02, 0.05), 0.02);
    }

    #[test]
    fn test_bearing_cardinal() {
        let b = bearing(Vec2::new(0.0, 0.0), Vec2::new(0.0, 5.0));
        assert!((b - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }

    #[test]
    fn test_side_helpers() {
        assert_eq!(Side::Player.opponent(), Side::Enemy);
        assert_eq!(Side::Enemy.advance_sign(), 1.0);
        assert!(Side::Player.baseline_facing() < 0.0);
    }
}
