//! Reference collision world: blocked terrain cells plus circular bodies

use glam::Vec2;

use crate::spatial::blocking::BlockedCells;
use crate::spatial::collision::{CollisionWorld, Obstacles};

/// Terrain grid with round hostile bodies of a shared radius
#[derive(Debug, Clone)]
pub struct ArenaCollision {
    pub terrain: BlockedCells,
    /// Radius of every hostile body
    pub body_radius: f32,
    /// Radius of the entity being tested against bodies
    pub mover_radius: f32,
    /// Bodies that obstruct sight lines
    ///
    /// Kept in sync by the owner; queries with `Obstacles` do not read it.
    sight_blockers: Vec<Vec2>,
}

impl ArenaCollision {
    pub fn new(terrain: BlockedCells, body_radius: f32) -> Self {
        Self {
            terrain,
            body_radius,
            mover_radius: body_radius,
            sight_blockers: Vec::new(),
        }
    }

    pub fn with_mover_radius(mut self, radius: f32) -> Self {
        self.mover_radius = radius;
        self
    }

    /// Replace the bodies that obstruct line of sight
    pub fn set_sight_blockers(&mut self, bodies: impl IntoIterator<Item = Vec2>) {
        self.sight_blockers.clear();
        self.sight_blockers.extend(bodies);
    }

    fn overlaps_body(&self, position: Vec2, body: Vec2) -> bool {
        let reach = self.body_radius + self.mover_radius;
        position.distance_squared(body) < reach * reach
    }
}

/// Shortest distance from `point` to the segment `a -> b`
fn distance_to_segment(point: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f32::EPSILON {
        return point.distance(a);
    }
    let t = ((point - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    point.distance(a + ab * t)
}

impl CollisionWorld for ArenaCollision {
    fn is_blocked(&self, position: Vec2, obstacles: Obstacles<'_>) -> bool {
        if self.terrain.is_position_blocked(position) {
            return true;
        }
        obstacles
            .active_bodies()
            .any(|body| self.overlaps_body(position, body))
    }

    fn is_line_of_sight_blocked(&self, from: Vec2, to: Vec2, exclude: Option<Vec2>) -> bool {
        if self.terrain.is_segment_blocked(from, to) {
            return true;
        }
        self.sight_blockers
            .iter()
            .filter(|body| Some(**body) != exclude)
            // A body standing on either endpoint is the viewer or the target
            .filter(|body| body.distance(from) > self.body_radius && body.distance(to) > self.body_radius)
            .any(|body| distance_to_segment(*body, from, to) < self.body_radius)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_arena() -> ArenaCollision {
        ArenaCollision::new(BlockedCells::with_cell_size(10.0), 10.0).with_mover_radius(6.0)
    }

    #[test]
    fn test_terrain_blocks_regardless_of_obstacles() {
        let mut arena = open_arena();
        arena.terrain.block(2, 0);
        let p = Vec2::new(25.0, 5.0);
        assert!(arena.is_blocked(p, Obstacles::Terrain));
        assert!(arena.is_blocked(p, Obstacles::only(&Vec2::new(500.0, 500.0))));
    }

    #[test]
    fn test_bodies_only_block_when_listed() {
        let arena = open_arena();
        let body = Vec2::new(50.0, 0.0);
        let near = Vec2::new(40.0, 0.0);

        assert!(!arena.is_blocked(near, Obstacles::Terrain));
        assert!(arena.is_blocked(near, Obstacles::only(&body)));

        let bodies = [body];
        assert!(!arena.is_blocked(near, Obstacles::all_except(&bodies, body)));
    }

    #[test]
    fn test_line_of_sight_through_wall() {
        let mut arena = open_arena();
        arena.terrain.block_rect(Vec2::new(40.0, -50.0), Vec2::new(60.0, 50.0));
        assert!(arena.is_line_of_sight_blocked(Vec2::ZERO, Vec2::new(100.0, 0.0), None));
        assert!(!arena.is_line_of_sight_blocked(Vec2::ZERO, Vec2::new(0.0, 100.0), None));
    }

    #[test]
    fn test_line_of_sight_excludes_self() {
        let mut arena = open_arena();
        let blocker = Vec2::new(50.0, 0.0);
        arena.set_sight_blockers([blocker]);

        let from = Vec2::ZERO;
        let to = Vec2::new(100.0, 0.0);
        assert!(arena.is_line_of_sight_blocked(from, to, None));
        assert!(!arena.is_line_of_sight_blocked(from, to, Some(blocker)));
    }

    #[test]
    fn test_distance_to_degenerate_segment() {
        let p = Vec2::new(3.0, 4.0);
        assert!((distance_to_segment(p, Vec2::ZERO, Vec2::ZERO) - 5.0).abs() < 1e-5);
    }
}
