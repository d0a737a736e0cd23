//! Blocked terrain cells
//!
//! Walls are stored as a sparse set of square grid cells. Points map to the
//! cell that contains them; segments are sampled along their length.

use ahash::AHashSet;
use glam::{IVec2, Vec2};

/// Grid size used when none is given
const DEFAULT_CELL_SIZE: f32 = 1.0;

/// Samples per cell when walking a segment
const SEGMENT_SAMPLES_PER_CELL: f32 = 4.0;

/// Sparse set of impassable grid cells
#[derive(Debug, Clone)]
pub struct BlockedCells {
    walls: AHashSet<IVec2>,
    cell_size: f32,
}

impl Default for BlockedCells {
    fn default() -> Self {
        Self::with_cell_size(DEFAULT_CELL_SIZE)
    }
}

impl BlockedCells {
    pub fn with_cell_size(cell_size: f32) -> Self {
        debug_assert!(cell_size > 0.0, "cell size must be positive");
        Self {
            walls: AHashSet::new(),
            cell_size,
        }
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Mark the cell at grid coordinates as a wall
    pub fn block(&mut self, x: i32, y: i32) {
        self.walls.insert(IVec2::new(x, y));
    }

    /// Grid cell holding `point`
    pub fn cell_of(&self, point: Vec2) -> IVec2 {
        (point / self.cell_size).floor().as_ivec2()
    }

    pub fn is_position_blocked(&self, point: Vec2) -> bool {
        self.walls.contains(&self.cell_of(point))
    }

    /// Wall off every cell whose center falls within `min..=max`
    pub fn block_rect(&mut self, min: Vec2, max: Vec2) {
        let first = self.cell_of(min);
        let last = (max / self.cell_size).ceil().as_ivec2();

        for y in first.y..last.y {
            for x in first.x..last.x {
                let center = (IVec2::new(x, y).as_vec2() + 0.5) * self.cell_size;
                if center.cmpge(min).all() && center.cmple(max).all() {
                    self.walls.insert(IVec2::new(x, y));
                }
            }
        }
    }

    /// Whether the segment `from -> to` crosses a wall cell
    pub fn is_segment_blocked(&self, from: Vec2, to: Vec2) -> bool {
        let samples = (from.distance(to) * SEGMENT_SAMPLES_PER_CELL / self.cell_size)
            .ceil()
            .max(1.0) as u32;
        (0..=samples).any(|i| self.is_position_blocked(from.lerp(to, i as f32 / samples as f32)))
    }

    /// Number of wall cells
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_maps_to_containing_cell() {
        let cells = BlockedCells::with_cell_size(10.0);
        assert_eq!(cells.cell_of(Vec2::new(5.0, 15.0)), IVec2::new(0, 1));
        assert_eq!(cells.cell_of(Vec2::new(-5.0, -15.0)), IVec2::new(-1, -2));
    }

    #[test]
    fn test_single_wall_cell() {
        let mut cells = BlockedCells::with_cell_size(10.0);
        cells.block(2, 0);

        assert!(cells.is_position_blocked(Vec2::new(25.0, 5.0)));
        assert!(!cells.is_position_blocked(Vec2::new(15.0, 5.0)));
        assert_eq!(cells.len(), 1);
    }

    #[test]
    fn test_block_rect_uses_cell_centers() {
        let mut cells = BlockedCells::with_cell_size(10.0);
        cells.block_rect(Vec2::new(0.0, 0.0), Vec2::new(30.0, 20.0));

        assert_eq!(cells.len(), 6);
        assert!(cells.is_position_blocked(Vec2::new(25.0, 15.0)));
        assert!(!cells.is_position_blocked(Vec2::new(35.0, 15.0)));
    }

    #[test]
    fn test_segment_crossing_wall() {
        let mut cells = BlockedCells::with_cell_size(10.0);
        cells.block(5, 0);

        assert!(cells.is_segment_blocked(Vec2::new(5.0, 5.0), Vec2::new(95.0, 5.0)));
        assert!(!cells.is_segment_blocked(Vec2::new(5.0, 25.0), Vec2::new(95.0, 25.0)));
    }

    #[test]
    fn test_default_is_empty() {
        assert!(BlockedCells::default().is_empty());
    }
}
