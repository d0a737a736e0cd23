pub mod enemy;
pub mod flash;
pub mod hostile;
pub mod player;

pub use enemy::{Enemy, EnemyState};
pub use flash::HitFlash;
pub use hostile::{Hostile, HostileContext};
pub use player::{MovementContext, Player, StepOutcome, TargetOutcome};
