//! Procedural battlefield generation.
//!
//! Feature order matters: later features only paint over grass, so a
//! hill is never cut by a road and forests never swallow the hill.

use rand::Rng;

use volley_core::constants::TERRAIN_CELL_SIZE;
use volley_core::enums::TerrainType;

use crate::map::TerrainMap;

/// Generate a battlefield for the given dimensions.
pub fn generate<R: Rng>(width: f64, height: f64, rng: &mut R) -> TerrainMap {
    let cols = (width / TERRAIN_CELL_SIZE).ceil() as usize;
    let rows = (height / TERRAIN_CELL_SIZE).ceil() as usize;
    let mut map = TerrainMap::new(TERRAIN_CELL_SIZE, cols, rows);

    carve_hill(&mut map, rng);
    carve_forests(&mut map, rng);
    trace_road(&mut map, rng);
    carve_mud(&mut map, rng);
    place_building(&mut map, rng);

    map
}

/// One circular hill near the map middle: elevation 2 inside the inner
/// half-radius, 1 outside it.
fn carve_hill<R: Rng>(map: &mut TerrainMap, rng: &mut R) {
    let cols = map.cols as f64;
    let rows = map.rows as f64;
    let center_col = (cols / 2.0 + (rng.gen::<f64>() - 0.5) * cols * 0.3).floor() as i64;
    let center_row = (rows / 2.0 + (rng.gen::<f64>() - 0.5) * rows * 0.2).floor() as i64;
    let radius = rng.gen_range(3..5) as i64;

    for dy in -radius..=radius {
        for dx in -radius..=radius {
            let d = ((dx * dx + dy * dy) as f64).sqrt();
            if d > radius as f64 {
                continue;
            }
            if let Some(cell) = cell_at_signed(map, center_row + dy, center_col + dx) {
                cell.kind = TerrainType::Hill;
                cell.elevation = if d < radius as f64 * 0.5 { 2 } else { 1 };
            }
        }
    }
}

/// 1-2 forest clusters near the flanks, skipping hill cells.
fn carve_forests<R: Rng>(map: &mut TerrainMap, rng: &mut R) {
    let cols = map.cols as f64;
    let rows = map.rows as f64;
    let count = rng.gen_range(1..3);

    for i in 0..count {
        let flank = if i == 0 { 0.15 } else { 0.85 };
        let center_col = (cols * flank + (rng.gen::<f64>() - 0.5) * cols * 0.1).floor() as i64;
        let center_row = (rows * (0.3 + rng.gen::<f64>() * 0.4)).floor() as i64;
        let radius = rng.gen_range(2..4) as i64;

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                if d > radius as f64 || rng.gen::<f64>() <= 0.2 {
                    continue;
                }
                if let Some(cell) = cell_at_signed(map, center_row + dy, center_col + dx) {
                    if cell.kind != TerrainType::Hill {
                        cell.kind = TerrainType::Forest;
                    }
                }
            }
        }
    }
}

/// One road column from top to bottom with a sinusoidal wobble, painting
/// grass only.
fn trace_road<R: Rng>(map: &mut TerrainMap, rng: &mut R) {
    let cols = map.cols as f64;
    let road_col = (cols * 0.4 + rng.gen::<f64>() * cols * 0.2).floor() as i64;

    for row in 0..map.rows {
        let wobble = ((row as f64 * 0.3).sin() * 1.5).floor() as i64;
        if let Some(cell) = cell_at_signed(map, row as i64, road_col + wobble) {
            if cell.kind == TerrainType::Grass {
                cell.kind = TerrainType::Road;
            }
        }
    }
}

/// 1-2 circular mud patches over grass.
fn carve_mud<R: Rng>(map: &mut TerrainMap, rng: &mut R) {
    let rows = map.rows as f64;
    let count = rng.gen_range(1..3);

    for _ in 0..count {
        let center_col = rng.gen_range(0..map.cols) as i64;
        let center_row = (rows * 0.3 + rng.gen::<f64>() * rows * 0.4).floor() as i64;
        let radius = rng.gen_range(1..3) as i64;

        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let d = ((dx * dx + dy * dy) as f64).sqrt();
                if d > radius as f64 {
                    continue;
                }
                if let Some(cell) = cell_at_signed(map, center_row + dy, center_col + dx) {
                    if cell.kind == TerrainType::Grass {
                        cell.kind = TerrainType::Mud;
                    }
                }
            }
        }
    }
}

/// With 50% probability, one farmhouse on grass.
fn place_building<R: Rng>(map: &mut TerrainMap, rng: &mut R) {
    if !rng.gen_bool(0.5) {
        return;
    }
    let col = (map.cols as f64 * (0.3 + rng.gen::<f64>() * 0.4)).floor() as i64;
    let row = (map.rows as f64 * (0.4 + rng.gen::<f64>() * 0.2)).floor() as i64;
    if let Some(cell) = cell_at_signed(map, row, col) {
        if cell.kind == TerrainType::Grass {
            cell.kind = TerrainType::Building;
        }
    }
}

fn cell_at_signed(
    map: &mut TerrainMap,
    row: i64,
    col: i64,
) -> Option<&mut crate::map::TerrainCell> {
    if row < 0 || col < 0 {
        return None;
    }
    map.cell_mut(row as usize, col as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use volley_core::types::Vec2;

    #[test]
    fn test_generation_is_seeded() {
        let a = generate(1600.0, 1000.0, &mut ChaCha8Rng::seed_from_u64(7));
        let b = generate(1600.0, 1000.0, &mut ChaCha8Rng::seed_from_u64(7));
        for row in 0..a.rows {
            for col in 0..a.cols {
                assert_eq!(a.cell(row, col).kind, b.cell(row, col).kind);
                assert_eq!(a.cell(row, col).elevation, b.cell(row, col).elevation);
            }
        }
    }

    #[test]
    fn test_map_covers_field() {
        let map = generate(1600.0, 1000.0, &mut ChaCha8Rng::seed_from_u64(1));
        assert_eq!(map.cols, 32);
        assert_eq!(map.rows, 20);
    }

    #[test]
    fn test_hill_has_high_ground() {
        let map = generate(1600.0, 1000.0, &mut ChaCha8Rng::seed_from_u64(3));
        let mut top = 0;
        for row in 0..map.rows {
            for col in 0..map.cols {
                top = top.max(map.cell(row, col).elevation);
            }
        }
        assert_eq!(top, 2, "hill core should reach elevation 2");
    }

    #[test]
    fn test_road_never_cuts_hill() {
        for seed in 0..8 {
            let map = generate(1600.0, 1000.0, &mut ChaCha8Rng::seed_from_u64(seed));
            for row in 0..map.rows {
                for col in 0..map.cols {
                    let cell = map.cell(row, col);
                    if cell.kind == TerrainType::Road {
                        assert_eq!(cell.elevation, 0, "roads only overwrite grass");
                    }
                }
            }
        }
    }

    #[test]
    fn test_offmap_lookup_through_generated_map() {
        let map = generate(800.0, 600.0, &mut ChaCha8Rng::seed_from_u64(5));
        let effect = map.effect_at(Vec2::new(-500.0, -500.0));
        assert_eq!(effect.speed_multiplier, 1.0);
    }
}
