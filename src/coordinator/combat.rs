//! Combat target selection
//!
//! The player is engaged with at most one hostile per frame: the closest one
//! that has detected the player and stands within combat range.

use glam::Vec2;

use crate::actor::hostile::Hostile;
use crate::core::types::HostileId;

/// Closest detecting hostile within `combat_range` of the player
///
/// Ties keep the hostile met first in iteration order.
pub fn select_combat_target<H: Hostile>(
    player_position: Vec2,
    hostiles: &[H],
    combat_range: f32,
) -> Option<HostileId> {
    let mut best: Option<(HostileId, f32)> = None;

    for (index, hostile) in hostiles.iter().enumerate() {
        if !hostile.has_detected_player() {
            continue;
        }
        let distance = hostile.position().distance(player_position);
        if distance > combat_range {
            continue;
        }
        if best.map_or(true, |(_, closest)| distance < closest) {
            best = Some((HostileId::new(index), distance));
        }
    }

    best.map(|(id, _)| id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::hostile::HostileContext;

    struct Dummy {
        position: Vec2,
        detected: bool,
    }

    impl Dummy {
        fn at(x: f32, detected: bool) -> Self {
            Self {
                position: Vec2::new(x, 0.0),
                detected,
            }
        }
    }

    impl Hostile for Dummy {
        fn position(&self) -> Vec2 {
            self.position
        }
        fn has_detected_player(&self) -> bool {
            self.detected
        }
        fn detection_range(&self) -> f32 {
            100.0
        }
        fn attack_range(&self) -> f32 {
            10.0
        }
        fn is_attacking(&self) -> bool {
            false
        }
        fn target_position(&self) -> Option<Vec2> {
            None
        }
        fn update(&mut self, _: Vec2, _: f32, _: bool, _: &HostileContext<'_>) {}
        fn take_hit(&mut self) {}
    }

    #[test]
    fn test_detected_close_hostile_wins_over_undetected() {
        let hostiles = [Dummy::at(50.0, true), Dummy::at(500.0, false)];
        assert_eq!(select_combat_target(Vec2::ZERO, &hostiles, 200.0), Some(HostileId(0)));
    }

    #[test]
    fn test_undetected_never_selected() {
        let hostiles = [Dummy::at(10.0, false)];
        assert_eq!(select_combat_target(Vec2::ZERO, &hostiles, 200.0), None);
    }

    #[test]
    fn test_out_of_range_ignored_and_boundary_included() {
        let hostiles = [Dummy::at(200.5, true), Dummy::at(-200.0, true)];
        assert_eq!(select_combat_target(Vec2::ZERO, &hostiles, 200.0), Some(HostileId(1)));
    }

    #[test]
    fn test_closest_wins() {
        let hostiles = [Dummy::at(150.0, true), Dummy::at(-40.0, true), Dummy::at(90.0, true)];
        assert_eq!(select_combat_target(Vec2::ZERO, &hostiles, 200.0), Some(HostileId(1)));
    }

    #[test]
    fn test_tie_keeps_first() {
        let hostiles = [Dummy::at(-60.0, true), Dummy::at(60.0, true)];
        assert_eq!(select_combat_target(Vec2::ZERO, &hostiles, 200.0), Some(HostileId(0)));
    }

    #[test]
    fn test_empty() {
        let hostiles: [Dummy; 0] = [];
        assert_eq!(select_combat_target(Vec2::ZERO, &hostiles, 200.0), None);
    }
}
