//! Collision capability and the reference arena geometry

pub mod arena;
pub mod blocking;
pub mod collision;

pub use arena::ArenaCollision;
pub use blocking::BlockedCells;
pub use collision::{CollisionWorld, MovementGate, MovementTest, Obstacles, SightGate, SightTest};
