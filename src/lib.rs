//! Shadowstep - real-time 2D stealth combat core
//!
//! Per-frame movement, combat engagement and hit feedback for one player and
//! a set of independent hostiles.

pub mod actor;
pub mod coordinator;
pub mod core;
pub mod diagnostics;
pub mod spatial;

pub use actor::{Enemy, Hostile, HostileContext, MovementContext, Player, StepOutcome, TargetOutcome};
pub use coordinator::{EntityCoordinator, FrameReport};
pub use core::{GameConfig, HostileId, Result, ShadowError, Vec2};
