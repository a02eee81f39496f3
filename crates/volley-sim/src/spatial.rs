//! Uniform spatial grid for proximity queries.
//!
//! Rebuilt from scratch every tick: units move every tick, so
//! incremental maintenance is not worth the complexity. Used for local
//! separation neighborhoods and bullet impact cell tests; target
//! finding stays a full scan.

use std::collections::HashMap;

use hecs::Entity;

use volley_core::constants::GRID_CELL_SIZE;
use volley_core::types::Vec2;

#[derive(Debug, Default)]
pub struct SpatialGrid {
    cells: HashMap<(i64, i64), Vec<Entity>>,
}

impl SpatialGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty the index. Bucket allocations are kept for reuse.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    pub fn cell_of(at: Vec2) -> (i64, i64) {
        (
            (at.x / GRID_CELL_SIZE).floor() as i64,
            (at.y / GRID_CELL_SIZE).floor() as i64,
        )
    }

    /// Bucket an entity by its position.
    pub fn insert(&mut self, at: Vec2, entity: Entity) {
        self.cells.entry(Self::cell_of(at)).or_default().push(entity);
    }

    /// Entities in the single cell containing `at`.
    pub fn entities_in_cell(&self, at: Vec2) -> &[Entity] {
        self.cells
            .get(&Self::cell_of(at))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Entities in the (2 x radius + 1)^2 block of cells centered on the
    /// cell containing `at`.
    pub fn query(&self, at: Vec2, cell_radius: i64) -> Vec<Entity> {
        let (cx, cy) = Self::cell_of(at);
        let mut out = Vec::new();
        for gx in (cx - cell_radius)..=(cx + cell_radius) {
            for gy in (cy - cell_radius)..=(cy + cell_radius) {
                if let Some(bucket) = self.cells.get(&(gx, gy)) {
                    out.extend_from_slice(bucket);
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mint(n: usize) -> Vec<Entity> {
        let mut world = hecs::World::new();
        (0..n).map(|_| world.spawn(())).collect()
    }

    #[test]
    fn test_query_covers_neighborhood_block() {
        let e = mint(3);
        let mut grid = SpatialGrid::new();
        grid.insert(Vec2::new(10.0, 10.0), e[0]);
        grid.insert(Vec2::new(30.0, 10.0), e[1]); // adjacent cell
        grid.insert(Vec2::new(200.0, 200.0), e[2]); // far away

        let near = grid.query(Vec2::new(12.0, 12.0), 1);
        assert!(near.contains(&e[0]));
        assert!(near.contains(&e[1]));
        assert!(!near.contains(&e[2]));
    }

    #[test]
    fn test_single_cell_lookup() {
        let e = mint(2);
        let mut grid = SpatialGrid::new();
        grid.insert(Vec2::new(10.0, 10.0), e[0]);
        grid.insert(Vec2::new(30.0, 10.0), e[1]);

        let cell = grid.entities_in_cell(Vec2::new(5.0, 5.0));
        assert_eq!(cell, &[e[0]]);
    }

    #[test]
    fn test_clear_empties_index() {
        let e = mint(1);
        let mut grid = SpatialGrid::new();
        grid.insert(Vec2::new(0.0, 0.0), e[0]);
        grid.clear();
        assert!(grid.entities_in_cell(Vec2::new(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_negative_coordinates_bucket_correctly() {
        let e = mint(1);
        let mut grid = SpatialGrid::new();
        grid.insert(Vec2::new(-1.0, -1.0), e[0]);
        assert_eq!(SpatialGrid::cell_of(Vec2::new(-1.0, -1.0)), (-1, -1));
        assert!(grid.entities_in_cell(Vec2::new(-5.0, -5.0)).contains(&e[0]));
    }
}
