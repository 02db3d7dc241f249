use anyhow::Result;
use async_trait::async_trait;
use clap::Parser;
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::info;
use voice_session::{
    AudioFrame, Command, CommandGateway, Config, EngineConfig, EngineError, EngineOutput,
    EngineStream, RecognitionEngine, SessionConfig, SessionEvent, SessionState,
};

#[derive(Parser, Debug)]
#[command(name = "voice-session", about = "Streaming speech-recognition session core demo")]
struct Cli {
    /// Path to a config file (without extension, e.g. config/voice-session)
    #[arg(long)]
    config: Option<String>,

    /// Number of synthetic audio frames to feed
    #[arg(long, default_value_t = 6)]
    frames: usize,
}

/// Canned engine for the demo: a partial every other frame, a final on close
struct DemoEngine;

struct DemoStream {
    frames_seen: usize,
    words: Vec<&'static str>,
}

#[async_trait]
impl RecognitionEngine for DemoEngine {
    async fn open(&self, _config: &EngineConfig) -> Result<Box<dyn EngineStream>, EngineError> {
        Ok(Box::new(DemoStream {
            frames_seen: 0,
            words: vec!["hello", "hello world", "hello world demo"],
        }))
    }

    fn name(&self) -> &str {
        "demo"
    }
}

#[async_trait]
impl EngineStream for DemoStream {
    async fn feed(&mut self, _frame: &AudioFrame) -> Result<Vec<EngineOutput>, EngineError> {
        self.frames_seen += 1;
        if self.frames_seen % 2 == 0 {
            let idx = (self.frames_seen / 2 - 1).min(self.words.len() - 1);
            Ok(vec![EngineOutput::Partial(self.words[idx].to_string())])
        } else {
            Ok(Vec::new())
        }
    }

    async fn close(&mut self) -> Option<EngineOutput> {
        let idx = (self.frames_seen / 2).clamp(1, self.words.len()) - 1;
        Some(EngineOutput::Final(self.words[idx].to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let session_config = match &cli.config {
        Some(path) => {
            let cfg = Config::load(path)?;
            info!("Loaded config: {}", cfg.service.name);
            cfg.session_config()
        }
        None => SessionConfig::default(),
    };

    info!("voice-session v0.1.0");
    info!(
        "Engine model: {} ({} Hz, {} ch)",
        session_config.engine.model_path,
        session_config.engine.sample_rate,
        session_config.engine.channels
    );

    let sample_rate = session_config.engine.sample_rate;
    let channels = session_config.engine.channels;
    let (gateway, mut events) = CommandGateway::new(Arc::new(DemoEngine), session_config);

    // Synthetic capture provider: N frames of 100ms silence-shaped PCM
    let (frame_tx, frame_rx) = mpsc::channel(16);
    let samples_per_frame = (sample_rate as usize / 10) * channels as usize;
    let frame_count = cli.frames;
    tokio::spawn(async move {
        for i in 0..frame_count {
            let frame = AudioFrame {
                samples: vec![0i16; samples_per_frame],
                sample_rate,
                channels,
                timestamp_ms: (i as u64) * 100,
            };
            if frame_tx.send(frame).await.is_err() {
                break;
            }
        }
    });

    let outcome = gateway.dispatch(Command::Start(frame_rx)).await?;
    info!("Start: {:?}", outcome);

    // Let the capture provider drain
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let outcome = gateway.dispatch(Command::Stop).await?;
    info!("Stop: {:?}", outcome);

    while let Some(event) = events.recv().await {
        println!("{}", serde_json::to_string(&event)?);
        if matches!(
            event,
            SessionEvent::StateChanged {
                new_state: SessionState::Idle,
                ..
            }
        ) {
            break;
        }
    }

    for segment in gateway.transcript().await {
        info!("Transcript: {}", segment.text);
    }

    Ok(())
}
