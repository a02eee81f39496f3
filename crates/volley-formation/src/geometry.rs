//! Slot generators for the six tactical shapes.
//!
//! All shapes emit slots in a deterministic order (rank-major, left to
//! right across the facing axis) so callers can pair units to slots by
//! sorted projection without crossing paths.

use rand::Rng;

use volley_core::enums::FormationType;
use volley_core::types::{heading_vec, Vec2};

/// Generate exactly `count` slot points for a formation anchored at
/// `anchor`, facing `facing` radians, with `spacing` between neighbors.
pub fn positions<R: Rng>(
    count: usize,
    anchor: Vec2,
    facing: f64,
    formation: FormationType,
    spacing: f64,
    rng: &mut R,
) -> Vec<Vec2> {
    match formation {
        FormationType::Line => ranked(count, anchor, facing, spacing, line_rank_width(count), 0.8),
        FormationType::Column => ranked(count, anchor, facing, spacing * 0.8, 4, 1.0 / 0.8),
        FormationType::Square => square(count, anchor, facing, spacing),
        FormationType::Wedge => wedge(count, anchor, facing, spacing),
        FormationType::Skirmish => skirmish(count, anchor, facing, spacing, rng),
        FormationType::HollowSquare => hollow_square(count, anchor, facing, spacing),
    }
}

fn line_rank_width(count: usize) -> usize {
    count.min(FormationType::Line.stats().units_per_row).max(1)
}

/// Shared rank-stacking layout: `rank_width` units per rank across the
/// perpendicular axis, ranks stacked `depth_ratio x spacing` apart along
/// the facing axis.
fn ranked(
    count: usize,
    anchor: Vec2,
    facing: f64,
    spacing: f64,
    rank_width: usize,
    depth_ratio: f64,
) -> Vec<Vec2> {
    let ahead = heading_vec(facing);
    let across = heading_vec(facing + std::f64::consts::FRAC_PI_2);
    let mut slots = Vec::with_capacity(count);

    let mut placed = 0;
    let mut rank = 0usize;
    while placed < count {
        let in_rank = rank_width.min(count - placed);
        for col in 0..in_rank {
            let x = (col as f64 - (in_rank as f64 - 1.0) / 2.0) * spacing;
            let y = rank as f64 * spacing * depth_ratio;
            slots.push(anchor + across * x + ahead * y);
            placed += 1;
        }
        rank += 1;
    }
    slots
}

/// `ceil(sqrt(n))`-sided filled grid centered on the anchor, rotated by
/// the facing angle.
fn square(count: usize, anchor: Vec2, facing: f64, spacing: f64) -> Vec<Vec2> {
    let side = (count as f64).sqrt().ceil() as usize;
    let mut slots = Vec::with_capacity(count);

    for i in 0..count {
        let row = i / side;
        let col = i % side;
        let x = (col as f64 - (side as f64 - 1.0) / 2.0) * spacing;
        let y = (row as f64 - (side as f64 - 1.0) / 2.0) * spacing;
        slots.push(anchor + rotate(Vec2::new(x, y), facing));
    }
    slots
}

/// Triangular point: row r holds 2r+1 units centered on the facing axis,
/// rows stacked behind the apex.
fn wedge(count: usize, anchor: Vec2, facing: f64, spacing: f64) -> Vec<Vec2> {
    let ahead = heading_vec(facing);
    let across = heading_vec(facing + std::f64::consts::FRAC_PI_2);
    let mut slots = Vec::with_capacity(count);

    let mut placed = 0;
    let mut row = 0usize;
    while placed < count {
        let in_row = row * 2 + 1;
        for col in 0..in_row {
            if placed >= count {
                break;
            }
            let x = (col as f64 - row as f64) * spacing * 0.8;
            let y = row as f64 * spacing;
            slots.push(anchor + across * x + ahead * y);
            placed += 1;
        }
        row += 1;
    }
    slots
}

/// Loose grid, 10 per row at 2.5x spacing, with small per-slot jitter.
fn skirmish<R: Rng>(count: usize, anchor: Vec2, facing: f64, spacing: f64, rng: &mut R) -> Vec<Vec2> {
    let ahead = heading_vec(facing);
    let across = heading_vec(facing + std::f64::consts::FRAC_PI_2);
    let wide = spacing * 2.5;
    let mut slots = Vec::with_capacity(count);

    let mut placed = 0;
    let mut row = 0usize;
    while placed < count {
        let in_row = 10.min(count - placed);
        for col in 0..in_row {
            let jitter_x = (rng.gen::<f64>() - 0.5) * spacing * 0.5;
            let jitter_y = (rng.gen::<f64>() - 0.5) * spacing * 0.5;
            let x = (col as f64 - (in_row as f64 - 1.0) / 2.0) * wide + jitter_x;
            let y = row as f64 * wide + jitter_y;
            slots.push(anchor + across * x + ahead * y);
            placed += 1;
        }
        row += 1;
    }
    slots
}

/// Perimeter-only square with an empty interior for protected units.
/// The side is two cells larger than the minimal filled square, grown
/// further if the perimeter alone cannot seat everyone.
fn hollow_square(count: usize, anchor: Vec2, facing: f64, spacing: f64) -> Vec<Vec2> {
    let mut side = (count as f64).sqrt().ceil() as usize + 2;
    while side > 1 && 4 * side - 4 < count {
        side += 1;
    }
    let mut slots = Vec::with_capacity(count);

    for row in 0..side {
        for col in 0..side {
            if slots.len() >= count {
                return slots;
            }
            let on_edge = row == 0 || row == side - 1 || col == 0 || col == side - 1;
            if !on_edge {
                continue;
            }
            let x = (col as f64 - (side as f64 - 1.0) / 2.0) * spacing;
            let y = (row as f64 - (side as f64 - 1.0) / 2.0) * spacing;
            slots.push(anchor + rotate(Vec2::new(x, y), facing));
        }
    }
    slots
}

fn rotate(v: Vec2, angle: f64) -> Vec2 {
    let (sin, cos) = angle.sin_cos();
    Vec2::new(v.x * cos - v.y * sin, v.x * sin + v.y * cos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use volley_core::constants::UNIT_SPACING;

    const ALL: [FormationType; 6] = [
        FormationType::Line,
        FormationType::Column,
        FormationType::Square,
        FormationType::Wedge,
        FormationType::Skirmish,
        FormationType::HollowSquare,
    ];

    fn slots(count: usize, formation: FormationType) -> Vec<Vec2> {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        positions(
            count,
            Vec2::new(400.0, 300.0),
            -std::f64::consts::FRAC_PI_2,
            formation,
            UNIT_SPACING,
            &mut rng,
        )
    }

    #[test]
    fn test_every_shape_returns_exact_count() {
        for formation in ALL {
            for count in [1, 1, 15, 16, 50] {
                assert_eq!(
                    slots(count, formation).len(),
                    count,
                    "{formation:?} with {count} units"
                );
            }
        }
    }

    #[test]
    fn test_line_caps_rank_width() {
        let pts = slots(45, FormationType::Line);
        // 45 infantry at 15 per rank: three ranks along the facing axis.
        // Facing is -PI/2, so ranks separate along y.
        let mut ys: Vec<i64> = pts.iter().map(|p| p.y.round() as i64).collect();
        ys.sort_unstable();
        ys.dedup();
        assert_eq!(ys.len(), 3);
    }

    #[test]
    fn test_wedge_rows_widen() {
        let pts = slots(9, FormationType::Wedge);
        // Rows of 1, 3, 5 units: the apex row is a single point.
        let apex_y = pts[0].y.round() as i64;
        let apex_count = pts
            .iter()
            .filter(|p| p.y.round() as i64 == apex_y)
            .count();
        assert_eq!(apex_count, 1);
    }

    #[test]
    fn test_square_centered_on_anchor() {
        let pts = slots(16, FormationType::Square);
        let centroid = pts.iter().copied().sum::<Vec2>() / 16.0;
        assert!((centroid - Vec2::new(400.0, 300.0)).length() < 1.0);
    }

    #[test]
    fn test_hollow_square_interior_is_empty() {
        let pts = slots(12, FormationType::HollowSquare);
        // side = ceil(sqrt(12)) + 2 = 6; interior spans +-1.5 spacings.
        let anchor = Vec2::new(400.0, 300.0);
        for p in &pts {
            let offset = (*p - anchor).abs();
            let ring = offset.x.max(offset.y);
            assert!(
                ring > UNIT_SPACING * 1.6,
                "slot {p:?} sits inside the hollow interior"
            );
        }
    }

    #[test]
    fn test_hollow_square_grows_for_large_counts() {
        // A perimeter of the default side could not seat 50; the shape
        // must still return 50 distinct slots.
        let pts = slots(50, FormationType::HollowSquare);
        assert_eq!(pts.len(), 50);
        for (i, a) in pts.iter().enumerate() {
            for b in pts.iter().skip(i + 1) {
                assert!((*a - *b).length() > 1e-6, "duplicate slot");
            }
        }
    }

    #[test]
    fn test_skirmish_spacing_is_loose() {
        let pts = slots(10, FormationType::Skirmish);
        // Neighbors in one row sit ~2.5 spacings apart (max 0.5 jitter).
        let mut min_gap = f64::MAX;
        for (i, a) in pts.iter().enumerate() {
            for b in pts.iter().skip(i + 1) {
                min_gap = min_gap.min((*a - *b).length());
            }
        }
        assert!(min_gap > UNIT_SPACING * 1.5);
    }

    #[test]
    fn test_skirmish_jitter_is_seeded() {
        let a = slots(20, FormationType::Skirmish);
        let b = slots(20, FormationType::Skirmish);
        assert_eq!(a, b);
    }
}
