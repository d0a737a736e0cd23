//! Reference hostile: a melee chaser with a small state machine
//!
//! Idle at its spawn point until it perceives the player, then chases,
//! strikes on a cooldown once in reach, and walks home after losing track.

use glam::Vec2;

use crate::actor::flash::HitFlash;
use crate::actor::hostile::{Hostile, HostileContext};
use crate::core::config::EnemyConfig;
use crate::core::types::step_towards;
use crate::spatial::collision::Obstacles;

/// Distance at which a returning enemy counts as home
const HOME_TOLERANCE: f32 = 1.0;

/// Fraction of the attack range a chaser closes to before stopping
const CHASE_STANDOFF: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    Idle,
    Chase,
    Attack,
    Returning,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    position: Vec2,
    home: Vec2,
    state: EnemyState,
    detected: bool,
    attacking: bool,
    target: Option<Vec2>,
    cooldown: f32,
    hits_taken: u32,
    flash: HitFlash,
    config: EnemyConfig,
}

impl Enemy {
    pub fn new(position: Vec2, config: EnemyConfig) -> Self {
        let flash = HitFlash::new(config.flash_duration, config.flash_duration / 3.0);
        Self {
            position,
            home: position,
            state: EnemyState::Idle,
            detected: false,
            attacking: false,
            target: None,
            cooldown: 0.0,
            hits_taken: 0,
            flash,
            config,
        }
    }

    pub fn state(&self) -> EnemyState {
        self.state
    }

    pub fn home(&self) -> Vec2 {
        self.home
    }

    pub fn hits_taken(&self) -> u32 {
        self.hits_taken
    }

    pub fn is_flashing(&self) -> bool {
        self.flash.is_flashing()
    }

    /// Perception radius against the player right now
    ///
    /// A sneaking player is only noticed at half range until spotted.
    pub fn effective_detection_range(&self, player_sneaking: bool) -> f32 {
        if player_sneaking && !self.detected {
            self.config.detection_range * 0.5
        } else {
            self.config.detection_range
        }
    }

    fn perceive(&mut self, player_position: Vec2, player_sneaking: bool, context: &HostileContext<'_>) {
        let distance = self.position.distance(player_position);
        if self.detected {
            if distance > self.config.detection_range * self.config.lose_range_factor {
                self.detected = false;
            }
        } else if distance <= self.effective_detection_range(player_sneaking)
            && !context.sight.is_line_of_sight_blocked(self.position, player_position)
        {
            self.detected = true;
        }
    }

    fn next_state(&self, player_position: Vec2) -> EnemyState {
        if self.detected {
            if self.position.distance(player_position) <= self.config.attack_range {
                EnemyState::Attack
            } else {
                EnemyState::Chase
            }
        } else if self.position.distance(self.home) > HOME_TOLERANCE {
            EnemyState::Returning
        } else {
            EnemyState::Idle
        }
    }

    fn try_step(&mut self, candidate: Vec2, context: &HostileContext<'_>) {
        if !context.movement.is_blocked(candidate) {
            self.position = candidate;
        }
    }
}

impl Hostile for Enemy {
    fn position(&self) -> Vec2 {
        self.position
    }

    fn has_detected_player(&self) -> bool {
        self.detected
    }

    fn detection_range(&self) -> f32 {
        self.config.detection_range
    }

    fn attack_range(&self) -> f32 {
        self.config.attack_range
    }

    fn is_attacking(&self) -> bool {
        self.attacking
    }

    fn target_position(&self) -> Option<Vec2> {
        self.target
    }

    fn update(&mut self, player_position: Vec2, dt: f32, player_sneaking: bool, context: &HostileContext<'_>) {
        self.attacking = false;
        self.flash.advance(dt);
        self.cooldown = (self.cooldown - dt).max(0.0);

        self.perceive(player_position, player_sneaking, context);
        self.state = self.next_state(player_position);

        match self.state {
            EnemyState::Idle => {
                self.target = None;
            }
            EnemyState::Chase => {
                self.target = Some(player_position);
                let distance = self.position.distance(player_position);
                let max_step = (self.config.chase_speed * dt)
                    .min((distance - self.config.attack_range * CHASE_STANDOFF).max(0.0));
                let candidate = step_towards(self.position, player_position, max_step);
                self.try_step(candidate, context);
            }
            EnemyState::Attack => {
                self.target = None;
                if self.cooldown <= 0.0 {
                    self.attacking = true;
                    self.cooldown = self.config.attack_cooldown;
                }
            }
            EnemyState::Returning => {
                // Home walled off since spawn: settle where we stand
                if context.collision.is_blocked(self.home, Obstacles::Terrain) {
                    self.home = self.position;
                    self.target = None;
                    self.state = EnemyState::Idle;
                    return;
                }
                self.target = Some(self.home);
                let candidate = step_towards(self.position, self.home, self.config.return_speed * dt);
                self.try_step(candidate, context);
                if self.position.distance(self.home) <= HOME_TOLERANCE {
                    self.position = self.home;
                    self.target = None;
                    self.state = EnemyState::Idle;
                }
            }
        }
    }

    fn take_hit(&mut self) {
        self.flash.trigger();
        self.hits_taken += 1;
        self.detected = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::collision::{CollisionWorld, MovementGate, SightGate};

    /// Open field with a wall on x >= `wall_x` and a global sight switch
    struct Field {
        wall_x: f32,
        sight_blocked: bool,
    }

    impl CollisionWorld for Field {
        fn is_blocked(&self, position: Vec2, _obstacles: Obstacles<'_>) -> bool {
            position.x >= self.wall_x
        }

        fn is_line_of_sight_blocked(&self, _from: Vec2, _to: Vec2, _exclude: Option<Vec2>) -> bool {
            self.sight_blocked
        }
    }

    fn open_field() -> Field {
        Field {
            wall_x: f32::INFINITY,
            sight_blocked: false,
        }
    }

    fn tick(enemy: &mut Enemy, world: &Field, player: Vec2, sneaking: bool, dt: f32) {
        let movement = MovementGate::terrain(world);
        let sight = SightGate::new(world, Some(enemy.position()));
        let context = HostileContext {
            movement: &movement,
            sight: &sight,
            collision: world,
        };
        enemy.update(player, dt, sneaking, &context);
    }

    #[test]
    fn test_detects_walking_player_in_range() {
        let world = open_field();
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyConfig::default());

        tick(&mut enemy, &world, Vec2::new(120.0, 0.0), false, 0.016);

        assert!(enemy.has_detected_player());
        assert_eq!(enemy.state(), EnemyState::Chase);
        assert_eq!(enemy.target_position(), Some(Vec2::new(120.0, 0.0)));
        assert!(enemy.position().x > 0.0);
    }

    #[test]
    fn test_sneaking_halves_undetected_range() {
        let world = open_field();
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyConfig::default());

        tick(&mut enemy, &world, Vec2::new(120.0, 0.0), true, 0.016);
        assert!(!enemy.has_detected_player());
        assert_eq!(enemy.state(), EnemyState::Idle);

        tick(&mut enemy, &world, Vec2::new(70.0, 0.0), true, 0.016);
        assert!(enemy.has_detected_player());
        // Once spotted, sneaking no longer shrinks the range
        assert_eq!(enemy.effective_detection_range(true), 160.0);
    }

    #[test]
    fn test_blocked_sight_prevents_detection() {
        let world = Field {
            wall_x: f32::INFINITY,
            sight_blocked: true,
        };
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyConfig::default());
        tick(&mut enemy, &world, Vec2::new(20.0, 0.0), false, 0.016);
        assert!(!enemy.has_detected_player());
    }

    #[test]
    fn test_strikes_on_cooldown() {
        let world = open_field();
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyConfig::default());
        let player = Vec2::new(10.0, 0.0);

        tick(&mut enemy, &world, player, false, 0.1);
        assert_eq!(enemy.state(), EnemyState::Attack);
        assert!(enemy.is_attacking());

        tick(&mut enemy, &world, player, false, 0.1);
        assert!(!enemy.is_attacking());

        for _ in 0..10 {
            tick(&mut enemy, &world, player, false, 0.1);
        }
        assert_eq!(enemy.state(), EnemyState::Attack);
        assert_eq!(enemy.hits_taken(), 0);
    }

    #[test]
    fn test_chase_stops_at_standoff() {
        let world = open_field();
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyConfig::default());
        let player = Vec2::new(100.0, 0.0);

        for _ in 0..200 {
            tick(&mut enemy, &world, player, false, 0.05);
        }
        let gap = enemy.position().distance(player);
        assert!(gap <= enemy.attack_range());
        assert!(gap >= enemy.attack_range() * CHASE_STANDOFF - 1e-3);
    }

    #[test]
    fn test_wall_stops_chase() {
        let world = Field {
            wall_x: 5.0,
            sight_blocked: false,
        };
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyConfig::default());
        tick(&mut enemy, &world, Vec2::new(100.0, 0.0), false, 0.1);
        assert_eq!(enemy.position(), Vec2::ZERO);
        assert_eq!(enemy.state(), EnemyState::Chase);
    }

    #[test]
    fn test_loses_player_and_returns_home() {
        let world = open_field();
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyConfig::default());

        tick(&mut enemy, &world, Vec2::new(150.0, 0.0), false, 0.5);
        assert!(enemy.position().x > 0.0);

        tick(&mut enemy, &world, Vec2::new(2000.0, 0.0), false, 0.1);
        assert!(!enemy.has_detected_player());
        assert_eq!(enemy.state(), EnemyState::Returning);
        assert_eq!(enemy.target_position(), Some(Vec2::ZERO));

        for _ in 0..100 {
            tick(&mut enemy, &world, Vec2::new(2000.0, 0.0), false, 0.1);
        }
        assert_eq!(enemy.state(), EnemyState::Idle);
        assert_eq!(enemy.position(), Vec2::ZERO);
        assert_eq!(enemy.target_position(), None);
    }

    #[test]
    fn test_hit_aggros_and_flashes() {
        let mut enemy = Enemy::new(Vec2::ZERO, EnemyConfig::default());
        enemy.take_hit();
        assert!(enemy.has_detected_player());
        assert!(enemy.is_flashing());
        assert_eq!(enemy.hits_taken(), 1);
    }
}
