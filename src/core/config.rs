//! Gameplay configuration with documented constants
//!
//! All tuning numbers for movement, combat gating and the reference hostile
//! are collected here. Every section deserializes from TOML with per-field
//! defaults, so a config file only needs to name the values it overrides.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, ShadowError};

/// Player movement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // === SPEED TIERS ===
    /// Speed used for short hops (world units per second)
    ///
    /// Applies when the goal is closer than `near_distance`.
    /// Sneak speed is derived from this value.
    pub walk_speed: f32,

    /// Speed used for long moves (world units per second)
    pub run_speed: f32,

    /// Distance below which the player walks instead of running
    pub near_distance: f32,

    // === ARRIVAL ===
    /// Distance below which direct stepping switches to smoothing
    pub stop_threshold: f32,

    /// Stop threshold while sneaking
    ///
    /// Larger than the normal threshold so the slower gait eases in earlier.
    pub sneak_stop_threshold: f32,

    /// Fraction of the remaining distance covered per smoothing step
    pub approach_factor: f32,

    /// Smoothing fraction while sneaking
    pub sneak_approach_factor: f32,

    /// Remaining distance at which the player snaps onto the goal
    pub snap_distance: f32,

    // === FOLLOW MODE ===
    /// Minimum pointer distance before a follow position becomes a goal
    pub dead_zone: f32,

    /// Dead-zone while sneaking
    pub sneak_dead_zone: f32,

    // === HIT FEEDBACK ===
    /// Seconds the hit flash lasts after `take_hit`
    pub flash_duration: f32,

    /// Seconds per blink phase while flashing
    pub flash_blink_interval: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 75.0,
            run_speed: 150.0,
            near_distance: 100.0,

            stop_threshold: 5.0,
            sneak_stop_threshold: 10.0,
            approach_factor: 0.5,
            sneak_approach_factor: 0.3,
            snap_distance: 1.0,

            dead_zone: 2.0,
            sneak_dead_zone: 8.0,

            flash_duration: 0.5,
            flash_blink_interval: 0.1,
        }
    }
}

impl MovementConfig {
    /// Constant speed while sneaking (half of walking)
    pub fn sneak_speed(&self) -> f32 {
        self.walk_speed / 2.0
    }

    pub fn dead_zone_for(&self, sneaking: bool) -> f32 {
        if sneaking {
            self.sneak_dead_zone
        } else {
            self.dead_zone
        }
    }

    pub fn stop_threshold_for(&self, sneaking: bool) -> f32 {
        if sneaking {
            self.sneak_stop_threshold
        } else {
            self.stop_threshold
        }
    }

    pub fn approach_factor_for(&self, sneaking: bool) -> f32 {
        if sneaking {
            self.sneak_approach_factor
        } else {
            self.approach_factor
        }
    }

    /// Speed tier for a goal `distance` units away
    pub fn speed_for(&self, sneaking: bool, distance: f32) -> f32 {
        if sneaking {
            self.sneak_speed()
        } else if distance < self.near_distance {
            self.walk_speed
        } else {
            self.run_speed
        }
    }

    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.walk_speed <= 0.0 || self.run_speed <= 0.0 {
            return Err("Movement speeds must be positive".into());
        }
        if self.run_speed < self.walk_speed {
            return Err(format!(
                "run_speed ({}) should be >= walk_speed ({})",
                self.run_speed, self.walk_speed
            ));
        }
        for (name, factor) in [
            ("approach_factor", self.approach_factor),
            ("sneak_approach_factor", self.sneak_approach_factor),
        ] {
            if factor <= 0.0 || factor >= 1.0 {
                return Err(format!("{} ({}) must be in (0, 1)", name, factor));
            }
        }
        // Snapping must trigger inside both stop thresholds
        if self.snap_distance >= self.stop_threshold.min(self.sneak_stop_threshold) {
            return Err(format!(
                "snap_distance ({}) should be < both stop thresholds",
                self.snap_distance
            ));
        }
        if self.flash_duration <= 0.0 || self.flash_blink_interval <= 0.0 {
            return Err("Flash timings must be positive".into());
        }
        Ok(())
    }
}

/// Combat gating used by the coordinator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Maximum distance at which a detecting hostile counts as engaged
    pub combat_range: f32,

    /// Radius of the diagnostic scan around a commanded move target
    ///
    /// Only feeds the diagnostics sink; it never changes the move.
    pub near_target_distance: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            combat_range: 200.0,
            near_target_distance: 48.0,
        }
    }
}

impl CombatConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.combat_range <= 0.0 {
            return Err(format!("combat_range ({}) must be positive", self.combat_range));
        }
        if self.near_target_distance < 0.0 {
            return Err("near_target_distance must not be negative".into());
        }
        Ok(())
    }
}

/// Tuning for the reference `Enemy` hostile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyConfig {
    /// Perception radius against a visible, walking player
    ///
    /// Halved while the player sneaks and has not been spotted yet.
    pub detection_range: f32,

    /// Detected players farther than `detection_range * lose_range_factor`
    /// are forgotten
    pub lose_range_factor: f32,

    pub attack_range: f32,

    /// Seconds between strikes
    pub attack_cooldown: f32,

    pub chase_speed: f32,

    /// Speed when walking back to the spawn point
    pub return_speed: f32,

    pub flash_duration: f32,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            detection_range: 160.0,
            lose_range_factor: 1.5,
            attack_range: 28.0,
            attack_cooldown: 1.0,
            chase_speed: 90.0,
            return_speed: 60.0,
            flash_duration: 0.3,
        }
    }
}

impl EnemyConfig {
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.detection_range <= 0.0 || self.attack_range <= 0.0 {
            return Err("Enemy ranges must be positive".into());
        }
        if self.lose_range_factor < 1.0 {
            return Err(format!(
                "lose_range_factor ({}) should be >= 1.0",
                self.lose_range_factor
            ));
        }
        if self.chase_speed <= 0.0 || self.return_speed <= 0.0 {
            return Err("Enemy speeds must be positive".into());
        }
        Ok(())
    }
}

/// Complete configuration file layout
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub movement: MovementConfig,
    pub combat: CombatConfig,
    pub enemy: EnemyConfig,
}

impl GameConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a TOML document
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section for internal consistency
    pub fn validate(&self) -> Result<()> {
        self.movement
            .validate()
            .and_then(|_| self.combat.validate())
            .and_then(|_| self.enemy.validate())
            .map_err(ShadowError::InvalidConfig)
    }
}

/// Load a config file from disk
pub fn load_config(path: impl AsRef<Path>) -> Result<GameConfig> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let config = GameConfig::from_toml_str(&content)?;
    tracing::info!("Loaded game config from {:?}", path);
    Ok(config)
}
