//! Collision capability contracts and per-call gates
//!
//! A `CollisionWorld` answers two questions: is a position blocked given a
//! set of hostile bodies, and is the segment between two points blocked.
//! Callers never hand closures around; they build a small gate value that
//! borrows the world and fixes the obstacle set for one call site.

use glam::Vec2;

/// Which dynamic bodies count as obstacles for a query, on top of terrain
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Obstacles<'a> {
    /// Terrain only; every hostile can be walked through
    Terrain,
    /// Terrain plus the listed hostile bodies, minus any body sitting exactly
    /// at `exclude`
    Hostiles {
        bodies: &'a [Vec2],
        exclude: Option<Vec2>,
    },
}

impl<'a> Obstacles<'a> {
    /// Terrain plus a single hostile body
    pub fn only(body: &'a Vec2) -> Self {
        Obstacles::Hostiles {
            bodies: std::slice::from_ref(body),
            exclude: None,
        }
    }

    /// Terrain plus every body except the one at `self_position`
    pub fn all_except(bodies: &'a [Vec2], self_position: Vec2) -> Self {
        Obstacles::Hostiles {
            bodies,
            exclude: Some(self_position),
        }
    }

    /// Bodies that take part in the query
    pub fn active_bodies(&self) -> impl Iterator<Item = Vec2> + 'a {
        let (bodies, exclude): (&'a [Vec2], Option<Vec2>) = match *self {
            Obstacles::Terrain => (&[], None),
            Obstacles::Hostiles { bodies, exclude } => (bodies, exclude),
        };
        bodies
            .iter()
            .copied()
            .filter(move |body| Some(*body) != exclude)
    }
}

/// Geometry solver consumed by the coordinator
pub trait CollisionWorld {
    /// True when `position` overlaps terrain or one of the active bodies
    fn is_blocked(&self, position: Vec2, obstacles: Obstacles<'_>) -> bool;

    /// True when the straight segment `from -> to` is obstructed
    ///
    /// `exclude` names the position of an entity whose own geometry must not
    /// block its view.
    fn is_line_of_sight_blocked(&self, from: Vec2, to: Vec2, exclude: Option<Vec2>) -> bool;
}

/// Step-by-step movement predicate
pub trait MovementTest {
    fn is_blocked(&self, candidate: Vec2) -> bool;
}

/// Line-of-sight predicate
pub trait SightTest {
    fn is_line_of_sight_blocked(&self, from: Vec2, to: Vec2) -> bool;
}

/// Movement predicate bound to one obstacle set
#[derive(Clone, Copy)]
pub struct MovementGate<'a> {
    world: &'a dyn CollisionWorld,
    obstacles: Obstacles<'a>,
}

impl<'a> MovementGate<'a> {
    pub fn new(world: &'a dyn CollisionWorld, obstacles: Obstacles<'a>) -> Self {
        Self { world, obstacles }
    }

    pub fn terrain(world: &'a dyn CollisionWorld) -> Self {
        Self::new(world, Obstacles::Terrain)
    }

    pub fn obstacles(&self) -> Obstacles<'a> {
        self.obstacles
    }
}

impl MovementTest for MovementGate<'_> {
    fn is_blocked(&self, candidate: Vec2) -> bool {
        self.world.is_blocked(candidate, self.obstacles)
    }
}

/// Line-of-sight predicate with an optional self-exclusion
#[derive(Clone, Copy)]
pub struct SightGate<'a> {
    world: &'a dyn CollisionWorld,
    exclude: Option<Vec2>,
}

impl<'a> SightGate<'a> {
    pub fn new(world: &'a dyn CollisionWorld, exclude: Option<Vec2>) -> Self {
        Self { world, exclude }
    }
}

impl SightTest for SightGate<'_> {
    fn is_line_of_sight_blocked(&self, from: Vec2, to: Vec2) -> bool {
        self.world.is_line_of_sight_blocked(from, to, self.exclude)
    }
}
