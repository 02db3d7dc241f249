use super::config::SessionConfig;
use super::state::SessionState;
use super::stats::{SessionStats, TranscriptSegment};
use crate::audio::AudioFrame;
use crate::engine::{ConfigurationError, RecognitionEngine, RecognitionKind, RecognizerAdapter};
use crate::gateway::CommandOutcome;
use crate::results::ResultChannel;
use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex as StdMutex};
use tokio::sync::{mpsc, watch, Mutex};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// Controller state shared with the audio-forwarding task
///
/// The task needs it to flag a mid-stream engine failure; everything else
/// mutates it under the gateway's command lock.
#[derive(Debug, Default)]
struct StateCell {
    state: SessionState,
    session_id: Option<String>,
}

/// One live session: the spawned forwarding task plus its counters
struct ActiveSession {
    id: String,
    started_at: DateTime<Utc>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
    frames_fed: Arc<AtomicUsize>,
    events_emitted: Arc<AtomicUsize>,
}

/// The state machine governing one listening session at a time
///
/// Owns at most one `RecognizerAdapter`, indirectly: the adapter is moved
/// into the audio-forwarding task at start and closed on every exit path
/// (stop, capture-channel end, engine failure), so the engine handle is
/// released exactly once.
pub struct SessionController {
    engine: Arc<dyn RecognitionEngine>,
    config: SessionConfig,
    events: ResultChannel,
    cell: Arc<StdMutex<StateCell>>,
    current: Option<ActiveSession>,
    /// Finalized transcript of the current/most recent session
    transcript: Arc<Mutex<Vec<TranscriptSegment>>>,
}

impl SessionController {
    pub fn new(
        engine: Arc<dyn RecognitionEngine>,
        config: SessionConfig,
        events: ResultChannel,
    ) -> Self {
        Self {
            engine,
            config,
            events,
            cell: Arc::new(StdMutex::new(StateCell::default())),
            current: None,
            transcript: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn state(&self) -> SessionState {
        self.cell.lock().unwrap_or_else(|e| e.into_inner()).state
    }

    fn set_state(&self, state: SessionState, session_id: Option<String>) {
        let mut cell = self.cell.lock().unwrap_or_else(|e| e.into_inner());
        cell.state = state;
        cell.session_id = session_id;
    }

    /// Start a new session fed by the given capture channel
    ///
    /// Configuration errors surface synchronously with no state change.
    /// Engine open failures are reported asynchronously: the command is
    /// accepted, and the failure arrives as EngineFailed + StateChanged
    /// events on the result channel.
    pub async fn start(
        &mut self,
        frames: mpsc::Receiver<AudioFrame>,
    ) -> Result<CommandOutcome, ConfigurationError> {
        let state = self.state();
        if !state.accepts_start() {
            warn!("Start rejected: session is {}", state);
            return Ok(CommandOutcome::SessionBusy);
        }

        // Both checks run before any state is touched
        self.config.validate()?;
        self.engine.check(&self.config.engine)?;

        let id = format!("session-{}", uuid::Uuid::new_v4());
        info!("Starting session {}", id);

        self.set_state(SessionState::Starting, Some(id.clone()));
        self.events.open_session(&id);
        self.events.state_changed(&id, SessionState::Starting).await;

        let adapter = match RecognizerAdapter::open(&*self.engine, &self.config.engine, &id).await {
            Ok(adapter) => adapter,
            Err(e) => {
                error!("Engine open failed for session {}: {}", id, e);
                self.set_state(SessionState::Error, Some(id.clone()));
                self.events.engine_failed(&id, e.kind, &e.message).await;
                self.events.state_changed(&id, SessionState::Error).await;
                return Ok(CommandOutcome::Accepted);
            }
        };

        {
            let mut transcript = self.transcript.lock().await;
            transcript.clear();
        }

        self.set_state(SessionState::Listening, Some(id.clone()));
        self.events.state_changed(&id, SessionState::Listening).await;

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let frames_fed = Arc::new(AtomicUsize::new(0));
        let events_emitted = Arc::new(AtomicUsize::new(0));

        let task = tokio::spawn(forward_audio(ForwardContext {
            session_id: id.clone(),
            adapter,
            frames,
            shutdown: shutdown_rx,
            events: self.events.clone(),
            cell: Arc::clone(&self.cell),
            transcript: Arc::clone(&self.transcript),
            frames_fed: Arc::clone(&frames_fed),
            events_emitted: Arc::clone(&events_emitted),
        }));

        self.current = Some(ActiveSession {
            id,
            started_at: Utc::now(),
            shutdown: shutdown_tx,
            task: Some(task),
            frames_fed,
            events_emitted,
        });

        Ok(CommandOutcome::Accepted)
    }

    /// Stop the active session, flushing and finalizing the recognizer
    pub async fn stop(&mut self) -> CommandOutcome {
        match self.state() {
            SessionState::Idle => {
                info!("Stop while idle: nothing to do");
                CommandOutcome::AlreadyIdle
            }
            SessionState::Error => {
                // Coalesced no-op; Reset is the way out of Error
                info!("Stop while in error state: nothing to do");
                self.reap_finished_task().await;
                CommandOutcome::AlreadyIdle
            }
            SessionState::Listening => self.stop_listening().await,
            // Unreachable while commands run under the gateway lock
            SessionState::Starting | SessionState::Stopping => CommandOutcome::SessionBusy,
        }
    }

    async fn stop_listening(&mut self) -> CommandOutcome {
        let Some(mut session) = self.current.take() else {
            error!("Listening state with no active session");
            self.set_state(SessionState::Idle, None);
            return CommandOutcome::AlreadyIdle;
        };

        // Claim the transition before signaling, so a concurrent engine
        // failure in the task cannot also claim it
        {
            let mut cell = self.cell.lock().unwrap_or_else(|e| e.into_inner());
            if cell.state != SessionState::Listening {
                // Task moved us to Error between the state() check and here
                drop(cell);
                self.await_task(&mut session).await;
                self.current = Some(session);
                return CommandOutcome::AlreadyIdle;
            }
            cell.state = SessionState::Stopping;
        }

        info!("Stopping session {}", session.id);
        self.events
            .state_changed(&session.id, SessionState::Stopping)
            .await;

        // Wake the forwarding task; it closes the adapter and emits the
        // final event before exiting
        let _ = session.shutdown.send(true);
        self.await_task(&mut session).await;

        self.set_state(SessionState::Idle, None);
        self.events
            .state_changed(&session.id, SessionState::Idle)
            .await;

        info!("Session {} stopped", session.id);
        CommandOutcome::Accepted
    }

    /// Clear the Error state, allowing a new Start
    pub async fn reset(&mut self) -> CommandOutcome {
        match self.state() {
            SessionState::Idle => {
                info!("Reset while idle: nothing to do");
                CommandOutcome::AlreadyIdle
            }
            SessionState::Error => {
                self.reap_finished_task().await;
                let session_id = {
                    let mut cell = self.cell.lock().unwrap_or_else(|e| e.into_inner());
                    cell.state = SessionState::Idle;
                    cell.session_id.take()
                };
                if let Some(id) = &session_id {
                    info!("Reset: session {} cleared", id);
                    self.events.state_changed(id, SessionState::Idle).await;
                }
                CommandOutcome::Accepted
            }
            // Reset is only meaningful from Error; an active session must
            // be stopped first
            SessionState::Listening | SessionState::Starting | SessionState::Stopping => {
                warn!("Reset rejected: session is {}", self.state());
                CommandOutcome::SessionBusy
            }
        }
    }

    /// Current session statistics
    pub async fn stats(&self) -> SessionStats {
        let (state, session_id) = {
            let cell = self.cell.lock().unwrap_or_else(|e| e.into_inner());
            (cell.state, cell.session_id.clone())
        };

        let (started_at, frames_fed, events_emitted) = match &self.current {
            Some(session) => (
                Some(session.started_at),
                session.frames_fed.load(Ordering::SeqCst),
                session.events_emitted.load(Ordering::SeqCst),
            ),
            None => (None, 0, 0),
        };

        let duration_secs = started_at
            .map(|t| Utc::now().signed_duration_since(t).num_milliseconds() as f64 / 1000.0)
            .unwrap_or(0.0);

        SessionStats {
            state,
            session_id,
            started_at,
            duration_secs,
            frames_fed,
            events_emitted,
            partials_dropped: self.events.partials_dropped(),
        }
    }

    /// Finalized transcript of the current or most recent session
    pub async fn transcript(&self) -> Vec<TranscriptSegment> {
        let transcript = self.transcript.lock().await;
        transcript.clone()
    }

    async fn await_task(&self, session: &mut ActiveSession) {
        if let Some(task) = session.task.take() {
            if let Err(e) = task.await {
                error!("Audio forwarding task panicked: {}", e);
            }
        }
    }

    /// Reap the forwarding task left behind by a mid-stream engine failure
    async fn reap_finished_task(&mut self) {
        if let Some(mut session) = self.current.take() {
            let _ = session.shutdown.send(true);
            self.await_task(&mut session).await;
        }
    }
}

/// Everything the audio-forwarding task needs, moved in at spawn
struct ForwardContext {
    session_id: String,
    adapter: RecognizerAdapter,
    frames: mpsc::Receiver<AudioFrame>,
    shutdown: watch::Receiver<bool>,
    events: ResultChannel,
    cell: Arc<StdMutex<StateCell>>,
    transcript: Arc<Mutex<Vec<TranscriptSegment>>>,
    frames_fed: Arc<AtomicUsize>,
    events_emitted: Arc<AtomicUsize>,
}

/// The audio-producer context: pulls frames from the capture provider and
/// feeds them to the adapter, one at a time
///
/// Exits on shutdown signal, capture-channel end, or engine failure. The
/// adapter is closed on every path out.
async fn forward_audio(mut ctx: ForwardContext) {
    info!("Audio forwarding task started for session {}", ctx.session_id);

    loop {
        tokio::select! {
            // Shutdown must win over queued frames: once Stop has signaled,
            // only the frame already mid-processing may complete
            biased;

            _ = ctx.shutdown.changed() => break,
            maybe_frame = ctx.frames.recv() => {
                let Some(frame) = maybe_frame else {
                    info!("Capture channel closed for session {}", ctx.session_id);
                    break;
                };

                match ctx.adapter.feed(&frame).await {
                    Ok(events) => {
                        ctx.frames_fed.fetch_add(1, Ordering::SeqCst);
                        for event in events {
                            if event.kind == RecognitionKind::Final {
                                let mut transcript = ctx.transcript.lock().await;
                                transcript.push(TranscriptSegment {
                                    text: event.text.clone(),
                                    timestamp: Utc::now(),
                                });
                            }
                            ctx.events.recognition(event).await;
                            ctx.events_emitted.fetch_add(1, Ordering::SeqCst);
                        }
                    }
                    Err(e) => {
                        // Implicit stop: the error event goes out before
                        // resources are released, then the terminal
                        // StateChanged closes the channel for this session
                        let won = {
                            let mut cell =
                                ctx.cell.lock().unwrap_or_else(|e| e.into_inner());
                            if cell.state == SessionState::Listening {
                                cell.state = SessionState::Error;
                                true
                            } else {
                                false
                            }
                        };

                        if won {
                            error!(
                                "Engine failed mid-stream for session {}: {}",
                                ctx.session_id, e
                            );
                            ctx.events
                                .engine_failed(&ctx.session_id, e.kind, &e.message)
                                .await;
                            let _ = ctx.adapter.close().await;
                            ctx.events
                                .state_changed(&ctx.session_id, SessionState::Error)
                                .await;
                        } else {
                            // Stop already claimed the transition; just
                            // release the engine
                            warn!(
                                "Engine error during stop for session {}: {}",
                                ctx.session_id, e
                            );
                            let _ = ctx.adapter.close().await;
                        }
                        return;
                    }
                }
            }
        }
    }

    // Graceful close: flush and deliver the pending final, if any
    if let Some(final_event) = ctx.adapter.close().await {
        if final_event.kind == RecognitionKind::Final {
            let mut transcript = ctx.transcript.lock().await;
            transcript.push(TranscriptSegment {
                text: final_event.text.clone(),
                timestamp: Utc::now(),
            });
        }
        ctx.events.recognition(final_event).await;
        ctx.events_emitted.fetch_add(1, Ordering::SeqCst);
    }

    info!("Audio forwarding task stopped for session {}", ctx.session_id);
}
