use crate::engine::EngineConfig;
use crate::session::SessionConfig;
use anyhow::Result;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub engine: EngineFileConfig,
    pub channel: ChannelConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct EngineFileConfig {
    pub model_path: String,
    pub sample_rate: u32,
    pub channels: u16,
}

#[derive(Debug, Deserialize)]
pub struct ChannelConfig {
    pub capacity: usize,
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Session configuration derived from the loaded file
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            engine: EngineConfig {
                model_path: self.engine.model_path.clone(),
                sample_rate: self.engine.sample_rate,
                channels: self.engine.channels,
            },
            channel_capacity: self.channel.capacity,
        }
    }
}
