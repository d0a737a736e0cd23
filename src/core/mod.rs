pub mod config;
pub mod error;
pub mod types;

pub use config::{load_config, CombatConfig, EnemyConfig, GameConfig, MovementConfig};
pub use error::{Result, ShadowError};
pub use types::{HostileId, Vec2};
