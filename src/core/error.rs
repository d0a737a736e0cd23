use thiserror::Error;

use crate::core::types::HostileId;

#[derive(Error, Debug)]
pub enum ShadowError {
    #[error("Unknown hostile: {0}")]
    UnknownHostile(HostileId),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ShadowError>;
