//! Command entry point for the session core
//!
//! The gateway serializes Start/Stop/Reset against the controller. Start
//! uses try-lock semantics: if another command is mid-flight, the caller
//! gets `SessionBusy` immediately. Stop and Reset queue behind the in-flight
//! command instead, which is what makes a Stop issued during Starting apply
//! as soon as the session reaches Listening.

use crate::audio::AudioFrame;
use crate::engine::{ConfigurationError, RecognitionEngine};
use crate::results::ResultChannel;
use crate::session::{
    SessionConfig, SessionController, SessionEvent, SessionState, SessionStats, TranscriptSegment,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tracing::info;

/// Synchronous verdict for a command
///
/// The underlying transition may still complete asynchronously; callers
/// observe completion via StateChanged events on the result channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandOutcome {
    /// Command taken; transition in progress or done
    Accepted,
    /// Conflicts with an in-flight command or an active session
    SessionBusy,
    /// Stop or Reset with nothing to do
    AlreadyIdle,
}

/// A command from the command source
///
/// An explicit enum rather than method-name dispatch, so exhaustiveness is
/// compiler-checked.
pub enum Command {
    /// Begin a session fed by the given capture channel
    Start(mpsc::Receiver<AudioFrame>),
    /// End the active session, flushing the recognizer
    Stop,
    /// Clear the Error state
    Reset,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::Start(_) => write!(f, "Start"),
            Command::Stop => write!(f, "Stop"),
            Command::Reset => write!(f, "Reset"),
        }
    }
}

/// Serializes commands from concurrent callers onto the controller
pub struct CommandGateway {
    controller: Arc<Mutex<SessionController>>,
}

impl CommandGateway {
    /// Build the gateway and its result channel for the given engine
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        config: SessionConfig,
    ) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (events, event_rx) = ResultChannel::new(config.channel_capacity);
        let controller = SessionController::new(engine, config, events);
        (
            Self {
                controller: Arc::new(Mutex::new(controller)),
            },
            event_rx,
        )
    }

    /// Dispatch one command
    pub async fn dispatch(&self, command: Command) -> Result<CommandOutcome, ConfigurationError> {
        info!("Dispatching command: {:?}", command);
        match command {
            Command::Start(frames) => self.start(frames).await,
            Command::Stop => Ok(self.stop().await),
            Command::Reset => Ok(self.reset().await),
        }
    }

    /// Start a session fed by the given capture channel
    ///
    /// Returns `SessionBusy` without waiting when another command is
    /// mid-flight. Configuration errors fail synchronously with no state
    /// change; engine open failures are reported via the result channel.
    pub async fn start(
        &self,
        frames: mpsc::Receiver<AudioFrame>,
    ) -> Result<CommandOutcome, ConfigurationError> {
        let Ok(mut controller) = self.controller.try_lock() else {
            return Ok(CommandOutcome::SessionBusy);
        };
        controller.start(frames).await
    }

    /// Stop the active session; queues behind an in-flight command
    pub async fn stop(&self) -> CommandOutcome {
        let mut controller = self.controller.lock().await;
        controller.stop().await
    }

    /// Clear the Error state; queues behind an in-flight command
    pub async fn reset(&self) -> CommandOutcome {
        let mut controller = self.controller.lock().await;
        controller.reset().await
    }

    /// Current controller state
    pub async fn state(&self) -> SessionState {
        self.controller.lock().await.state()
    }

    /// Statistics for the current session
    pub async fn stats(&self) -> SessionStats {
        self.controller.lock().await.stats().await
    }

    /// Finalized transcript of the current or most recent session
    pub async fn transcript(&self) -> Vec<TranscriptSegment> {
        self.controller.lock().await.transcript().await
    }
}
