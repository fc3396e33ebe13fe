//! Uniform-cell spatial hash over agent positions.
//!
//! The grid is rebuilt from scratch at the start of every tick and read
//! only afterwards; there is no removal API. Queries scan the block of
//! cells covering a search radius and linear-scan the entries inside,
//! which keeps neighbor lookups sub-linear without all-pairs scans.

use std::collections::HashMap;

use crate::components::{EntityId, Faction};
use crate::math::{Fixed, Vec2Fixed};

/// Snapshot of one agent inserted into the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridItem {
    /// Entity id of the agent.
    pub id: EntityId,
    /// Position at rebuild time.
    pub position: Vec2Fixed,
    /// Owning faction.
    pub faction: Faction,
    /// Collision radius.
    pub radius: Fixed,
}

/// Uniform-cell hash index over 2D positions.
#[derive(Debug, Clone)]
pub struct SpatialGrid {
    cell_size: Fixed,
    cells: HashMap<(i32, i32), Vec<GridItem>>,
}

impl SpatialGrid {
    /// Create an empty grid with the given cell size.
    #[must_use]
    pub fn new(cell_size: Fixed) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Cell coordinates containing a position.
    fn cell_of(&self, position: Vec2Fixed) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor().to_num::<i32>(),
            (position.y / self.cell_size).floor().to_num::<i32>(),
        )
    }

    /// Drop all entries, keeping allocated cell buckets for reuse.
    pub fn clear(&mut self) {
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    /// Insert an item keyed by its current position.
    ///
    /// Insertion order within a cell is preserved, so rebuilding from a
    /// sorted id sequence keeps query scan order deterministic.
    pub fn insert(&mut self, item: GridItem) {
        let cell = self.cell_of(item.position);
        self.cells.entry(cell).or_default().push(item);
    }

    /// Total number of indexed items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    /// Check whether the grid holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }

    /// Visit every item in the cell block covering `radius` around a point.
    ///
    /// Scans at least the 3x3 neighborhood, widening proportionally to
    /// the radius rounded up to whole cells. Cells are walked in fixed
    /// row-major order. The visitor returns `true` to stop scanning
    /// early (first-match-wins queries); the function reports whether a
    /// visitor stopped the scan.
    ///
    /// No distance filtering is applied here - callers compare squared
    /// distances against their own thresholds.
    pub fn visit_neighborhood<F>(&self, center: Vec2Fixed, radius: Fixed, mut visit: F) -> bool
    where
        F: FnMut(&GridItem) -> bool,
    {
        let (cx, cy) = self.cell_of(center);
        let span = (radius / self.cell_size).ceil().to_num::<i32>().max(1);

        for dy in -span..=span {
            for dx in -span..=span {
                let Some(bucket) = self.cells.get(&(cx + dx, cy + dy)) else {
                    continue;
                };
                for item in bucket {
                    if visit(item) {
                        return true;
                    }
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: EntityId, x: f64, y: f64, faction: Faction) -> GridItem {
        GridItem {
            id,
            position: Vec2Fixed::new(Fixed::from_num(x), Fixed::from_num(y)),
            faction,
            radius: Fixed::from_num(0.15),
        }
    }

    fn collect_ids(grid: &SpatialGrid, center: Vec2Fixed, radius: Fixed) -> Vec<EntityId> {
        let mut ids = Vec::new();
        grid.visit_neighborhood(center, radius, |it| {
            ids.push(it.id);
            false
        });
        ids
    }

    #[test]
    fn test_empty_grid_yields_no_candidates() {
        let grid = SpatialGrid::new(Fixed::from_num(0.5));
        let ids = collect_ids(&grid, Vec2Fixed::ZERO, Fixed::from_num(1));
        assert!(ids.is_empty());
    }

    #[test]
    fn test_neighborhood_includes_adjacent_cells() {
        let mut grid = SpatialGrid::new(Fixed::from_num(0.5));
        grid.insert(item(1, 0.1, 0.1, Faction::A));
        grid.insert(item(2, 0.6, 0.1, Faction::B)); // next cell over
        grid.insert(item(3, 5.0, 5.0, Faction::B)); // far away

        let ids = collect_ids(
            &grid,
            Vec2Fixed::new(Fixed::from_num(0.1), Fixed::from_num(0.1)),
            Fixed::from_num(0.4),
        );
        assert!(ids.contains(&1));
        assert!(ids.contains(&2));
        assert!(!ids.contains(&3));
    }

    #[test]
    fn test_scan_widens_with_radius() {
        let mut grid = SpatialGrid::new(Fixed::from_num(0.5));
        // Two cells away: outside the default 3x3 block.
        grid.insert(item(7, 1.3, 0.0, Faction::B));

        let narrow = collect_ids(&grid, Vec2Fixed::ZERO, Fixed::from_num(0.4));
        assert!(narrow.is_empty());

        let wide = collect_ids(&grid, Vec2Fixed::ZERO, Fixed::from_num(1.5));
        assert_eq!(wide, vec![7]);
    }

    #[test]
    fn test_negative_coordinates_hash_to_distinct_cells() {
        let mut grid = SpatialGrid::new(Fixed::from_num(0.5));
        grid.insert(item(1, -0.3, -0.3, Faction::A));
        grid.insert(item(2, 0.3, 0.3, Faction::B));

        let ids = collect_ids(
            &grid,
            Vec2Fixed::new(Fixed::from_num(-0.3), Fixed::from_num(-0.3)),
            Fixed::from_num(0.4),
        );
        assert!(ids.contains(&1));
        assert!(ids.contains(&2));
    }

    #[test]
    fn test_visitor_early_exit() {
        let mut grid = SpatialGrid::new(Fixed::from_num(0.5));
        grid.insert(item(1, 0.0, 0.0, Faction::A));
        grid.insert(item(2, 0.05, 0.0, Faction::A));

        let mut seen = 0;
        let stopped = grid.visit_neighborhood(Vec2Fixed::ZERO, Fixed::from_num(0.4), |_| {
            seen += 1;
            true
        });
        assert!(stopped);
        assert_eq!(seen, 1);
    }

    #[test]
    fn test_clear_then_rebuild() {
        let mut grid = SpatialGrid::new(Fixed::from_num(0.5));
        grid.insert(item(1, 0.0, 0.0, Faction::A));
        assert_eq!(grid.len(), 1);

        grid.clear();
        assert!(grid.is_empty());

        grid.insert(item(2, 0.0, 0.0, Faction::B));
        assert_eq!(collect_ids(&grid, Vec2Fixed::ZERO, Fixed::from_num(0.4)), vec![2]);
    }
}
