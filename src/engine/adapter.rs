use super::error::{ConfigurationError, EngineError};
use super::events::{EngineOutput, RecognitionEvent};
use crate::audio::AudioFrame;
use tracing::{debug, info, warn};

/// Configuration handed to the recognition engine at open time
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// Path to the engine's model directory
    pub model_path: String,
    /// Expected capture sample rate in Hz
    pub sample_rate: u32,
    /// Expected capture channel count (1 = mono, 2 = stereo)
    pub channels: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model_path: "models/default".to_string(),
            sample_rate: 16000, // 16kHz mono is the usual on-device STT format
            channels: 1,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if self.model_path.is_empty() {
            return Err(ConfigurationError::new("model path is empty"));
        }
        if self.sample_rate == 0 {
            return Err(ConfigurationError::new("sample rate must be non-zero"));
        }
        if self.channels == 0 || self.channels > 2 {
            return Err(ConfigurationError::new(format!(
                "unsupported channel count: {}",
                self.channels
            )));
        }
        Ok(())
    }
}

/// Recognition engine abstraction
///
/// Implementations wrap an actual on-device recognizer (Vosk, whisper.cpp,
/// a platform speech API). The engine is a black box to the core: it takes
/// fixed-format PCM frames and yields transcript output. Model selection and
/// loading are engine-internal concerns.
#[async_trait::async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Synchronous configuration check, called before any session state is
    /// touched. Rejecting here surfaces a `ConfigurationError` to the caller
    /// with no session created.
    fn check(&self, config: &EngineConfig) -> Result<(), ConfigurationError> {
        config.validate()
    }

    /// Allocate engine resources and return a ready-to-feed stream
    async fn open(&self, config: &EngineConfig) -> Result<Box<dyn EngineStream>, EngineError>;

    /// Engine name for logging
    fn name(&self) -> &str;
}

/// One open recognizer instance
///
/// Fed from a single audio-producer context; `feed` is never called
/// concurrently with `close`. Dropping the stream must release engine
/// resources, but the adapter always closes explicitly first.
#[async_trait::async_trait]
pub trait EngineStream: Send {
    /// Consume one audio frame, producing zero or more outputs
    async fn feed(&mut self, frame: &AudioFrame) -> Result<Vec<EngineOutput>, EngineError>;

    /// Flush buffered audio and return the pending final output, if any
    async fn close(&mut self) -> Option<EngineOutput>;
}

/// Wraps one open engine stream and attributes its output to a session
///
/// The adapter is the engine handle: it exclusively owns the engine-side
/// resources and is released exactly once, via `close`. Frames fed after
/// close are dropped, not queued.
pub struct RecognizerAdapter {
    stream: Box<dyn EngineStream>,
    session_id: String,
    closed: bool,
    frames_fed: usize,
}

impl RecognizerAdapter {
    /// Open the engine and bind the resulting stream to a session
    pub async fn open(
        engine: &dyn RecognitionEngine,
        config: &EngineConfig,
        session_id: &str,
    ) -> Result<Self, EngineError> {
        info!(
            "Opening recognition engine '{}' for session {}",
            engine.name(),
            session_id
        );

        let stream = engine.open(config).await?;

        Ok(Self {
            stream,
            session_id: session_id.to_string(),
            closed: false,
            frames_fed: 0,
        })
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn frames_fed(&self) -> usize {
        self.frames_fed
    }

    /// Feed one frame to the engine, returning session-attributed events
    ///
    /// Frames arriving after close has begun are dropped and yield no events.
    pub async fn feed(&mut self, frame: &AudioFrame) -> Result<Vec<RecognitionEvent>, EngineError> {
        if self.closed {
            debug!(
                "Dropping frame for closed session {} ({} samples)",
                self.session_id,
                frame.samples.len()
            );
            return Ok(Vec::new());
        }

        let outputs = self.stream.feed(frame).await?;
        self.frames_fed += 1;

        Ok(outputs
            .into_iter()
            .map(|out| RecognitionEvent::from_output(&self.session_id, out))
            .collect())
    }

    /// Flush and release engine resources
    ///
    /// Idempotent: the second and later calls are no-ops. Returns the final
    /// pending event, if the engine had buffered audio left to commit.
    pub async fn close(&mut self) -> Option<RecognitionEvent> {
        if self.closed {
            warn!("close() called twice for session {}", self.session_id);
            return None;
        }
        self.closed = true;

        info!("Closing recognizer for session {}", self.session_id);

        self.stream
            .close()
            .await
            .map(|out| RecognitionEvent::from_output(&self.session_id, out))
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}
