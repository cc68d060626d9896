//! Error types for climb decisions and configuration.

use thiserror::Error;
use trapdoor_ladders_api::HostError;

#[derive(Debug, Error)]
pub enum ClimbError {
    #[error("host lookup failed: {0}")]
    Host(#[from] HostError),

    #[error("no world is loaded")]
    MissingWorld,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("climb_speed must be finite and positive, got {0}")]
    InvalidClimbSpeed(f64),
}
