use crate::engine::{ConfigurationError, EngineConfig};
use serde::{Deserialize, Serialize};

/// Configuration for a listening session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Engine configuration (model, expected audio format)
    pub engine: EngineConfig,

    /// Result channel capacity; partials are dropped when full
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            channel_capacity: 64,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.channel_capacity == 0 {
            return Err(ConfigurationError::new("channel capacity must be non-zero"));
        }
        self.engine.validate()
    }
}
