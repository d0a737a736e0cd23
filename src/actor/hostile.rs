//! Surface the coordinator needs from a hostile actor

use glam::Vec2;

use crate::spatial::collision::{CollisionWorld, MovementTest, SightTest};

/// Collision inputs handed to a hostile for one update
#[derive(Clone, Copy)]
pub struct HostileContext<'a> {
    /// Terrain plus every other hostile; the updating hostile is excluded
    pub movement: &'a dyn MovementTest,
    /// Sight lines ignoring the updating hostile's own body
    pub sight: &'a dyn SightTest,
    pub collision: &'a dyn CollisionWorld,
}

/// An independently updated hostile actor
///
/// Detection, chasing and attack decisions are internal to the implementor.
/// The coordinator reads the flags below and forwards hits.
pub trait Hostile {
    fn position(&self) -> Vec2;

    fn has_detected_player(&self) -> bool;

    fn detection_range(&self) -> f32;

    fn attack_range(&self) -> f32;

    /// True on frames where an attack lands
    fn is_attacking(&self) -> bool;

    /// Goal the hostile is currently moving toward, if any
    fn target_position(&self) -> Option<Vec2>;

    fn update(&mut self, player_position: Vec2, dt: f32, player_sneaking: bool, context: &HostileContext<'_>);

    fn take_hit(&mut self);
}
