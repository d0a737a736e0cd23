//! Player movement state machine
//!
//! Converts movement intent into a new position every frame. Two intents
//! exist: a follow position re-supplied each frame while the pointer is held,
//! and a click target that persists until reached or cleared. Movement is a
//! two-tier policy: direct stepping at the current speed tier while far from
//! the goal, then smoothing (a fraction of the remaining distance, snapping
//! when within `snap_distance`) once inside the stop threshold.

use glam::Vec2;

use crate::actor::flash::HitFlash;
use crate::core::config::MovementConfig;
use crate::core::types::step_towards;
use crate::spatial::collision::MovementTest;

/// Collision inputs for one player update
#[derive(Clone, Copy, Default)]
pub struct MovementContext<'a> {
    /// Consulted with every candidate position before it is committed
    pub movement: Option<&'a dyn MovementTest>,
    /// Positions of the hostiles the player is engaged with this frame
    pub combat_hostiles: &'a [Vec2],
}

impl<'a> MovementContext<'a> {
    /// No collision at all
    pub fn kinematic() -> Self {
        Self::default()
    }

    /// Check every step against `movement`
    pub fn gated(movement: &'a dyn MovementTest, combat_hostiles: &'a [Vec2]) -> Self {
        Self {
            movement: Some(movement),
            combat_hostiles,
        }
    }
}

/// What a single update did
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// No goal this frame
    Idle,
    /// Position advanced toward the goal
    Moved,
    /// Landed on the click target with no follow position, target cleared
    Arrived,
    /// The movement test rejected the step; position unchanged
    Blocked { in_combat: bool },
}

/// Result of `Player::set_target`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetOutcome {
    Accepted,
    /// The validity test reported the goal position blocked
    Rejected,
}

/// Where the frame's goal came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GoalSource {
    Follow,
    ClickTarget,
}

#[derive(Debug, Clone)]
pub struct Player {
    position: Vec2,
    target: Option<Vec2>,
    current_speed: f32,
    sneaking: bool,
    flash: HitFlash,
    config: MovementConfig,
}

impl Player {
    /// Create an idle player at `position`
    pub fn new(position: Vec2, config: MovementConfig) -> Self {
        let flash = HitFlash::new(config.flash_duration, config.flash_blink_interval);
        Self {
            position,
            target: None,
            current_speed: 0.0,
            sneaking: false,
            flash,
            config,
        }
    }

    /// Current world position
    pub fn position(&self) -> Vec2 {
        self.position
    }

    /// Active click target, if any
    pub fn target(&self) -> Option<Vec2> {
        self.target
    }

    /// Whether a click target is set
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }

    /// Speed chosen by the last update; 0 when idle
    pub fn current_speed(&self) -> f32 {
        self.current_speed
    }

    /// Whether sneak mode is on
    pub fn is_sneaking(&self) -> bool {
        self.sneaking
    }

    /// Whether the hit flash is running
    pub fn is_flashing(&self) -> bool {
        self.flash.is_flashing()
    }

    /// Hit flash state
    pub fn flash(&self) -> &HitFlash {
        &self.flash
    }

    /// False during the hidden half of a blink
    pub fn is_visible(&self) -> bool {
        self.flash.is_visible()
    }

    /// Movement tuning
    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Record a click target
    ///
    /// With a validity test, a blocked goal is rejected and the previous
    /// target (if any) is kept.
    pub fn set_target(&mut self, point: Vec2, validity: Option<&dyn MovementTest>) -> TargetOutcome {
        debug_assert!(point.is_finite(), "non-finite target {:?}", point);
        if validity.is_some_and(|test| test.is_blocked(point)) {
            return TargetOutcome::Rejected;
        }
        self.target = Some(point);
        TargetOutcome::Accepted
    }

    /// Drop the click target and stop
    pub fn clear_target(&mut self) {
        self.target = None;
        self.current_speed = 0.0;
    }

    /// Flip sneak mode
    pub fn toggle_sneak(&mut self) {
        self.sneaking = !self.sneaking;
    }

    /// Restart the hit flash at full duration
    pub fn take_hit(&mut self) {
        self.flash.trigger();
    }

    /// Teleport, dropping any goal
    pub fn reset_position(&mut self, point: Vec2) {
        debug_assert!(point.is_finite(), "non-finite position {:?}", point);
        self.position = point;
        self.clear_target();
    }

    /// Per-frame tick
    pub fn update(&mut self, follow: Option<Vec2>, dt: f32, context: &MovementContext<'_>) -> StepOutcome {
        debug_assert!(dt.is_finite() && dt >= 0.0, "bad delta time {}", dt);
        debug_assert!(follow.map_or(true, |f| f.is_finite()), "non-finite follow position");

        self.flash.advance(dt);

        let Some((goal, source)) = self.resolve_goal(follow) else {
            self.current_speed = 0.0;
            return StepOutcome::Idle;
        };

        let distance = self.position.distance(goal);
        self.current_speed = self.config.speed_for(self.sneaking, distance);

        let stop_threshold = self.config.stop_threshold_for(self.sneaking);
        let candidate = if distance > stop_threshold {
            step_towards(self.position, goal, self.current_speed * dt)
        } else if distance <= self.config.snap_distance {
            goal
        } else {
            let factor = self.config.approach_factor_for(self.sneaking);
            step_towards(self.position, goal, distance * factor)
        };

        if candidate != self.position {
            if let Some(test) = context.movement {
                if test.is_blocked(candidate) {
                    return StepOutcome::Blocked {
                        in_combat: !context.combat_hostiles.is_empty(),
                    };
                }
            }
            self.position = candidate;
        }

        if source == GoalSource::ClickTarget && follow.is_none() && self.position == goal {
            self.clear_target();
            return StepOutcome::Arrived;
        }

        StepOutcome::Moved
    }

    /// Follow position outside the dead-zone wins, otherwise the click target
    fn resolve_goal(&self, follow: Option<Vec2>) -> Option<(Vec2, GoalSource)> {
        let click = self.target.map(|t| (t, GoalSource::ClickTarget));
        match follow {
            Some(point) => {
                let dead_zone = self.config.dead_zone_for(self.sneaking);
                if self.position.distance(point) > dead_zone {
                    Some((point, GoalSource::Follow))
                } else {
                    click
                }
            }
            None => click,
        }
    }
}
