// Configuration loading and validation tests.

mod common;

use common::ScriptedEngine;
use std::io::Write;
use std::sync::Arc;
use tokio::sync::mpsc;
use voice_session::{
    CommandGateway, Config, EngineConfig, SessionConfig, SessionState,
};

#[test]
fn test_session_config_defaults() {
    let config = SessionConfig::default();

    assert_eq!(config.engine.sample_rate, 16000, "Default should be 16kHz");
    assert_eq!(config.engine.channels, 1, "Default should be mono");
    assert_eq!(config.channel_capacity, 64);
    assert!(config.validate().is_ok());
}

#[test]
fn test_engine_config_rejects_empty_model_path() {
    let config = EngineConfig {
        model_path: String::new(),
        ..EngineConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_engine_config_rejects_zero_sample_rate() {
    let config = EngineConfig {
        sample_rate: 0,
        ..EngineConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_engine_config_rejects_bad_channel_count() {
    for channels in [0u16, 3, 8] {
        let config = EngineConfig {
            channels,
            ..EngineConfig::default()
        };
        assert!(config.validate().is_err(), "{} channels accepted", channels);
    }
}

#[test]
fn test_session_config_rejects_zero_capacity() {
    let config = SessionConfig {
        channel_capacity: 0,
        ..SessionConfig::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_config_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("voice-session.toml");
    let mut file = std::fs::File::create(&path).unwrap();
    write!(
        file,
        r#"
[service]
name = "voice-session"

[engine]
model_path = "models/vosk-small-en"
sample_rate = 16000
channels = 1

[channel]
capacity = 32
"#
    )
    .unwrap();

    let stem = path.with_extension("");
    let config = Config::load(stem.to_str().unwrap()).unwrap();
    assert_eq!(config.service.name, "voice-session");
    assert_eq!(config.engine.model_path, "models/vosk-small-en");

    let session = config.session_config();
    assert_eq!(session.engine.sample_rate, 16000);
    assert_eq!(session.channel_capacity, 32);
    assert!(session.validate().is_ok());
}

#[tokio::test]
async fn test_invalid_config_fails_start_synchronously() {
    let bad = SessionConfig {
        engine: EngineConfig {
            model_path: String::new(),
            ..EngineConfig::default()
        },
        ..SessionConfig::default()
    };
    let (gateway, mut events) = CommandGateway::new(Arc::new(ScriptedEngine::new(Vec::new(), None)), bad);

    let (_tx, rx) = mpsc::channel(4);
    let result = gateway.start(rx).await;
    assert!(result.is_err(), "configuration error expected");

    // No session was created and no state change happened
    assert_eq!(gateway.state().await, SessionState::Idle);
    assert!(events.try_recv().is_err());
}
