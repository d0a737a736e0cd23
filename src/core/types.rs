//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};

pub use glam::Vec2;

/// Index of a hostile in the coordinator's ordered collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct HostileId(pub usize);

impl HostileId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for HostileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "hostile#{}", self.0)
    }
}

/// Frame delta time in seconds
pub type DeltaTime = f32;

/// Move `from` toward `to` by at most `max_step`, never passing `to`.
///
/// Returns `from` unchanged when the two points coincide so a zero vector is
/// never normalized.
pub fn step_towards(from: Vec2, to: Vec2, max_step: f32) -> Vec2 {
    let offset = to - from;
    let distance = offset.length();
    if distance <= f32::EPSILON {
        return from;
    }
    if max_step >= distance {
        return to;
    }
    from + offset / distance * max_step
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostile_id_display() {
        assert_eq!(HostileId::new(3).to_string(), "hostile#3");
        assert_eq!(HostileId(3).index(), 3);
    }

    #[test]
    fn test_step_towards_clamps_to_target() {
        let from = Vec2::new(0.0, 0.0);
        let to = Vec2::new(3.0, 4.0);
        assert_eq!(step_towards(from, to, 10.0), to);

        let partial = step_towards(from, to, 2.5);
        assert!((partial.length() - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_step_towards_same_point() {
        let p = Vec2::new(7.0, -2.0);
        assert_eq!(step_towards(p, p, 5.0), p);
    }
}
