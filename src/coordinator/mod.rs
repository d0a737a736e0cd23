//! Entity coordinator - the per-frame synchronization point
//!
//! Each frame the coordinator resolves which hostile the player is fighting,
//! gates player movement so that only that hostile's body blocks it, ticks
//! the player and then every hostile in order, and applies at most one hit to
//! the player.

pub mod combat;

pub use combat::select_combat_target;

use glam::Vec2;

use crate::actor::hostile::{Hostile, HostileContext};
use crate::actor::player::{MovementContext, Player, StepOutcome, TargetOutcome};
use crate::core::config::CombatConfig;
use crate::core::error::{Result, ShadowError};
use crate::core::types::HostileId;
use crate::diagnostics::{DiagnosticLevel, DiagnosticsSink, FrameMetrics, TracingSink};
use crate::spatial::collision::{CollisionWorld, MovementGate, MovementTest, Obstacles, SightGate};

/// What happened during one `update`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameReport {
    /// Hostile the player was engaged with when the frame started
    pub combat_target: Option<HostileId>,
    pub player_step: StepOutcome,
    /// Hostile whose attack landed this frame
    pub hit_by: Option<HostileId>,
}

pub struct EntityCoordinator<H: Hostile, C: CollisionWorld> {
    player: Player,
    hostiles: Vec<H>,
    collision: Option<C>,
    config: CombatConfig,
    sink: Box<dyn DiagnosticsSink>,
    metrics: FrameMetrics,
    following_cursor: bool,
    /// Current hostile positions, reused across frames
    bodies: Vec<Vec2>,
}

/// Collision world or a loud failure
#[track_caller]
fn attached<'a, C: CollisionWorld>(collision: &'a Option<C>, operation: &str) -> &'a C {
    match collision {
        Some(world) => world,
        None => panic!("collision world must be attached before {}", operation),
    }
}

/// Terrain plus the engaged hostile, or terrain alone
fn combat_obstacles(combat_body: &Option<Vec2>) -> Obstacles<'_> {
    match combat_body {
        Some(body) => Obstacles::only(body),
        None => Obstacles::Terrain,
    }
}

impl<H: Hostile, C: CollisionWorld> EntityCoordinator<H, C> {
    /// Create a coordinator logging through `tracing`; attach collision before updating
    pub fn new(player: Player, hostiles: Vec<H>, config: CombatConfig) -> Self {
        let bodies = Vec::with_capacity(hostiles.len());
        Self {
            player,
            hostiles,
            collision: None,
            config,
            sink: Box::new(TracingSink),
            metrics: FrameMetrics::new(),
            following_cursor: false,
            bodies,
        }
    }

    /// Route diagnostics to `sink`
    pub fn with_sink(mut self, sink: impl DiagnosticsSink + 'static) -> Self {
        self.sink = Box::new(sink);
        self
    }

    /// Builder form of `attach_collision`
    pub fn with_collision(mut self, collision: C) -> Self {
        self.attach_collision(collision);
        self
    }

    /// Install or replace the collision world
    pub fn attach_collision(&mut self, collision: C) {
        self.collision = Some(collision);
    }

    /// Attached collision world
    pub fn collision(&self) -> Option<&C> {
        self.collision.as_ref()
    }

    /// Mutable collision world, e.g. to refresh sight blockers
    pub fn collision_mut(&mut self) -> Option<&mut C> {
        self.collision.as_mut()
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Hostiles in update order
    pub fn hostiles(&self) -> &[H] {
        &self.hostiles
    }

    /// Look up one hostile
    pub fn hostile(&self, id: HostileId) -> Option<&H> {
        self.hostiles.get(id.index())
    }

    /// Combat tuning
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Frame timing window
    pub fn metrics(&self) -> &FrameMetrics {
        &self.metrics
    }

    /// Whether the last frame was driven by a held pointer
    pub fn is_following_cursor(&self) -> bool {
        self.following_cursor
    }

    /// Duration of the last frame body in milliseconds
    pub fn last_pathfinding_time_ms(&self) -> f64 {
        self.metrics.last_pathfinding_time_ms()
    }

    /// Actors (player included) that still had a goal after the last frame
    pub fn active_pathfinding_count(&self) -> usize {
        self.metrics.active_pathfinding_count()
    }

    /// The hostile the player is currently engaged with
    pub fn enemy_in_combat(&self) -> Option<HostileId> {
        select_combat_target(self.player.position(), &self.hostiles, self.config.combat_range)
    }

    /// Advance the player and every hostile by one frame
    ///
    /// # Panics
    ///
    /// Panics if no collision world has been attached.
    #[track_caller]
    pub fn update(&mut self, dt: f32, follow: Option<Vec2>) -> FrameReport {
        let world: &dyn CollisionWorld = attached::<C>(&self.collision, "update");

        self.metrics.begin_frame();
        self.following_cursor = follow.is_some();

        let combat_target =
            select_combat_target(self.player.position(), &self.hostiles, self.config.combat_range);
        let combat_body = combat_target.map(|id| self.hostiles[id.index()].position());
        let combat_hostiles: &[Vec2] = match combat_body.as_ref() {
            Some(body) => std::slice::from_ref(body),
            None => &[],
        };

        let player_gate = MovementGate::new(world, combat_obstacles(&combat_body));
        let player_step = self
            .player
            .update(follow, dt, &MovementContext::gated(&player_gate, combat_hostiles));
        if self.player.has_target() {
            self.metrics.record_active_path();
        }

        let player_position = self.player.position();
        let sneaking = self.player.is_sneaking();
        self.bodies.clear();
        self.bodies.extend(self.hostiles.iter().map(|h| h.position()));

        let mut hit_by = None;
        for (index, hostile) in self.hostiles.iter_mut().enumerate() {
            let snapshot = self.bodies[index];
            {
                let movement = MovementGate::new(world, Obstacles::all_except(&self.bodies, snapshot));
                let sight = SightGate::new(world, Some(snapshot));
                let context = HostileContext {
                    movement: &movement,
                    sight: &sight,
                    collision: world,
                };
                hostile.update(player_position, dt, sneaking, &context);
            }
            self.bodies[index] = hostile.position();

            if hostile.target_position().is_some() {
                self.metrics.record_active_path();
            }

            // One hit per frame; the first attacker in order wins
            if hostile.is_attacking()
                && hostile.position().distance(player_position) <= hostile.attack_range()
            {
                self.player.take_hit();
                hit_by = Some(HostileId::new(index));
                self.sink.record(
                    &format!("player hit by {}", HostileId::new(index)),
                    DiagnosticLevel::Info,
                );
                break;
            }
        }

        self.metrics.end_frame();

        FrameReport {
            combat_target,
            player_step,
            hit_by,
        }
    }

    /// Give the player a click target
    ///
    /// The goal is validated against terrain only. Hostiles near the goal are
    /// reported to the diagnostics sink and never alter the move.
    ///
    /// # Panics
    ///
    /// Panics if no collision world has been attached.
    #[track_caller]
    pub fn move_player_to(&mut self, target: Vec2) -> TargetOutcome {
        let world: &dyn CollisionWorld = attached::<C>(&self.collision, "move_player_to");

        let combat_target =
            select_combat_target(self.player.position(), &self.hostiles, self.config.combat_range);
        let combat_body = combat_target.map(|id| self.hostiles[id.index()].position());
        let gated = MovementGate::new(world, combat_obstacles(&combat_body));
        let terrain = MovementGate::terrain(world);

        let outcome = self.player.set_target(target, Some(&terrain));
        match outcome {
            TargetOutcome::Rejected => {
                self.sink.record(
                    &format!("move target ({:.1}, {:.1}) is inside terrain; ignored", target.x, target.y),
                    DiagnosticLevel::Warn,
                );
                return outcome;
            }
            TargetOutcome::Accepted => {}
        }

        if let Some(id) = combat_target {
            if gated.is_blocked(target) {
                self.sink.record(
                    &format!("move target overlaps engaged {}", id),
                    DiagnosticLevel::Debug,
                );
            }
        }

        for (index, hostile) in self.hostiles.iter().enumerate() {
            let distance = hostile.position().distance(target);
            if distance <= self.config.near_target_distance {
                self.sink.record(
                    &format!(
                        "{} is {:.1} units from move target (detected: {})",
                        HostileId::new(index),
                        distance,
                        hostile.has_detected_player()
                    ),
                    DiagnosticLevel::Debug,
                );
            }
        }

        outcome
    }

    /// Forward a hit to a hostile; range and cooldown are the caller's concern
    pub fn attack_enemy(&mut self, id: HostileId) -> Result<()> {
        let hostile = self
            .hostiles
            .get_mut(id.index())
            .ok_or(ShadowError::UnknownHostile(id))?;
        hostile.take_hit();
        self.sink.record(&format!("player struck {}", id), DiagnosticLevel::Debug);
        Ok(())
    }

    /// Drop the player's click target
    pub fn clear_player_target(&mut self) {
        self.player.clear_target();
    }

    /// Flip the player's sneak mode
    pub fn toggle_player_sneak(&mut self) {
        self.player.toggle_sneak();
    }

    /// Teleport the player; any active target is dropped
    pub fn reset_player_position(&mut self, point: Vec2) {
        self.player.reset_position(point);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::enemy::Enemy;
    use crate::core::config::{EnemyConfig, MovementConfig};
    use crate::diagnostics::MemorySink;
    use crate::spatial::{ArenaCollision, BlockedCells};

    fn coordinator(hostiles: Vec<Enemy>) -> EntityCoordinator<Enemy, ArenaCollision> {
        let player = Player::new(Vec2::ZERO, MovementConfig::default());
        EntityCoordinator::new(player, hostiles, CombatConfig::default())
    }

    #[test]
    #[should_panic(expected = "collision world must be attached before update")]
    fn test_update_without_collision_panics() {
        let mut coordinator = coordinator(Vec::new());
        coordinator.update(0.016, None);
    }

    #[test]
    #[should_panic(expected = "collision world must be attached before move_player_to")]
    fn test_move_without_collision_panics() {
        let mut coordinator = coordinator(Vec::new());
        coordinator.move_player_to(Vec2::new(10.0, 0.0));
    }

    #[test]
    fn test_attack_unknown_hostile() {
        let mut coordinator = coordinator(vec![Enemy::new(Vec2::new(50.0, 0.0), EnemyConfig::default())]);
        let err = coordinator.attack_enemy(HostileId(3)).unwrap_err();
        assert!(matches!(err, ShadowError::UnknownHostile(HostileId(3))));
    }

    #[test]
    fn test_attack_enemy_forwards_hit() {
        let sink = MemorySink::new();
        let mut coordinator = coordinator(vec![Enemy::new(Vec2::new(900.0, 0.0), EnemyConfig::default())])
            .with_sink(sink.clone());

        coordinator.attack_enemy(HostileId(0)).expect("known hostile");

        let enemy = coordinator.hostile(HostileId(0)).expect("hostile exists");
        assert_eq!(enemy.hits_taken(), 1);
        assert!(enemy.has_detected_player());
        assert_eq!(sink.records().len(), 1);
    }

    #[test]
    fn test_rejected_move_is_reported() {
        let mut terrain = BlockedCells::with_cell_size(10.0);
        terrain.block(10, 0);
        let sink = MemorySink::new();
        let mut coordinator = coordinator(Vec::new())
            .with_collision(ArenaCollision::new(terrain, 10.0))
            .with_sink(sink.clone());

        let outcome = coordinator.move_player_to(Vec2::new(105.0, 5.0));

        assert_eq!(outcome, TargetOutcome::Rejected);
        assert!(!coordinator.player().has_target());
        assert_eq!(sink.at_least(DiagnosticLevel::Warn).len(), 1);
    }

    #[test]
    fn test_following_flag_tracks_last_frame() {
        let mut coordinator =
            coordinator(Vec::new()).with_collision(ArenaCollision::new(BlockedCells::default(), 10.0));

        coordinator.update(0.016, Some(Vec2::new(50.0, 0.0)));
        assert!(coordinator.is_following_cursor());

        coordinator.update(0.016, None);
        assert!(!coordinator.is_following_cursor());
    }
}
