//! TerrainMap: generated battlefield grid with point lookups.

use serde::{Deserialize, Serialize};

use volley_core::constants::ELEVATION_DAMAGE_STEP;
use volley_core::enums::{TerrainType, UnitKind};
use volley_core::types::Vec2;

use crate::effects::{effect_of, TerrainEffect};

/// One grid cell.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TerrainCell {
    pub kind: TerrainType,
    /// 0 = low ground, 2 = hilltop.
    pub elevation: u8,
}

/// Immutable-after-generation battlefield grid, row-major.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TerrainMap {
    pub cell_size: f64,
    pub cols: usize,
    pub rows: usize,
    cells: Vec<TerrainCell>,
}

impl TerrainMap {
    pub fn new(cell_size: f64, cols: usize, rows: usize) -> Self {
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![TerrainCell::default(); cols * rows],
        }
    }

    /// Uniform map of one terrain type at elevation 0 (scenario and test
    /// setups).
    pub fn filled(cell_size: f64, cols: usize, rows: usize, kind: TerrainType) -> Self {
        Self {
            cell_size,
            cols,
            rows,
            cells: vec![
                TerrainCell {
                    kind,
                    elevation: 0
                };
                cols * rows
            ],
        }
    }

    pub fn cell(&self, row: usize, col: usize) -> TerrainCell {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            TerrainCell::default()
        }
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TerrainCell> {
        if row < self.rows && col < self.cols {
            Some(&mut self.cells[row * self.cols + col])
        } else {
            None
        }
    }

    /// Cell containing a point. Off-map points are expected (projectiles
    /// in flight) and default to grass at elevation 0.
    pub fn cell_at(&self, at: Vec2) -> TerrainCell {
        let col = (at.x / self.cell_size).floor();
        let row = (at.y / self.cell_size).floor();
        if col < 0.0 || row < 0.0 {
            return TerrainCell::default();
        }
        self.cell(row as usize, col as usize)
    }

    pub fn effect_at(&self, at: Vec2) -> TerrainEffect {
        effect_of(self.cell_at(at).kind)
    }

    /// Movement speed multiplier for a unit kind standing at a point.
    /// Cavalry additionally take the cell's cavalry penalty.
    pub fn speed_modifier(&self, kind: UnitKind, at: Vec2) -> f64 {
        let effect = self.effect_at(at);
        let mut speed = effect.speed_multiplier;
        if kind == UnitKind::Cavalry {
            speed *= effect.cavalry_penalty;
        }
        speed
    }

    /// Fraction of damage that gets through the defender's cover
    /// (0.35 cover = 0.65 damage taken).
    pub fn cover_modifier(&self, defender_at: Vec2) -> f64 {
        1.0 - self.effect_at(defender_at).cover_bonus
    }

    /// Damage multiplier from the attacker's elevation advantage over the
    /// defender: `1 + 0.1 x level difference`.
    pub fn elevation_advantage(&self, attacker_at: Vec2, defender_at: Vec2) -> f64 {
        let diff =
            self.cell_at(attacker_at).elevation as f64 - self.cell_at(defender_at).elevation as f64;
        1.0 + diff * ELEVATION_DAMAGE_STEP
    }

    /// Whether formation slots may be held at a point.
    pub fn formation_allowed(&self, at: Vec2) -> bool {
        self.effect_at(at).formation_allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat_map() -> TerrainMap {
        TerrainMap::new(50.0, 10, 10)
    }

    #[test]
    fn test_out_of_bounds_defaults_to_grass() {
        let map = flat_map();
        let cell = map.cell_at(Vec2::new(-100.0, 5000.0));
        assert_eq!(cell.kind, TerrainType::Grass);
        assert_eq!(cell.elevation, 0);
    }

    #[test]
    fn test_cavalry_penalty_composes_with_speed() {
        let mut map = flat_map();
        map.cell_mut(0, 0).unwrap().kind = TerrainType::Forest;
        let at = Vec2::new(10.0, 10.0);
        let infantry = map.speed_modifier(UnitKind::Infantry, at);
        let cavalry = map.speed_modifier(UnitKind::Cavalry, at);
        assert!((infantry - 0.6).abs() < 1e-9);
        assert!((cavalry - 0.6 * 0.3).abs() < 1e-9);
    }

    #[test]
    fn test_cover_modifier() {
        let mut map = flat_map();
        map.cell_mut(2, 2).unwrap().kind = TerrainType::Forest;
        let in_forest = Vec2::new(125.0, 125.0);
        assert!((map.cover_modifier(in_forest) - 0.65).abs() < 1e-9);
        assert_eq!(map.cover_modifier(Vec2::new(10.0, 10.0)), 1.0);
    }

    #[test]
    fn test_elevation_advantage_symmetric() {
        let mut map = flat_map();
        map.cell_mut(0, 0).unwrap().elevation = 2;
        let high = Vec2::new(10.0, 10.0);
        let low = Vec2::new(260.0, 260.0);
        assert!((map.elevation_advantage(high, low) - 1.2).abs() < 1e-9);
        assert!((map.elevation_advantage(low, high) - 0.8).abs() < 1e-9);
    }
}
