use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::motion::CLIMB_SPEED;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrapdoorLaddersConfig {
    /// Upward motion, in blocks per tick, applied while climbing.
    #[serde(default = "default_climb_speed")]
    pub climb_speed: f64,
}

fn default_climb_speed() -> f64 {
    CLIMB_SPEED
}

impl Default for TrapdoorLaddersConfig {
    fn default() -> Self {
        Self {
            climb_speed: default_climb_speed(),
        }
    }
}

impl TrapdoorLaddersConfig {
    /// Parse and validate a config document supplied by the host.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.climb_speed.is_finite() || self.climb_speed <= 0.0 {
            return Err(ConfigError::InvalidClimbSpeed(self.climb_speed));
        }
        Ok(())
    }

    pub fn to_value(&self) -> serde_json::Value {
        serde_json::json!({ "climb_speed": self.climb_speed })
    }
}
