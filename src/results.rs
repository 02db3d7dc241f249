//! Ordered, backpressured delivery of session events
//!
//! Events flow over a bounded mpsc channel drained independently by the
//! command source. Per-session ordering is the production order. The channel
//! keeps only a weak relation to the current session: a session-id gate that
//! discards recognition events from any session that is no longer active, so
//! late frames from a torn-down session cannot surface.

use crate::engine::{EngineErrorKind, RecognitionEvent};
use crate::session::{SessionEvent, SessionState};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Sender side of the result channel
///
/// Cloned into the audio-producer task; the consumer holds the matching
/// `mpsc::Receiver<SessionEvent>`.
#[derive(Clone)]
pub struct ResultChannel {
    tx: mpsc::Sender<SessionEvent>,
    /// Id of the session currently allowed to deliver recognition events
    session: Arc<Mutex<Option<String>>>,
    partials_dropped: Arc<AtomicUsize>,
}

impl ResultChannel {
    /// Create a channel with the given capacity, returning the consumer end
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<SessionEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (
            Self {
                tx,
                session: Arc::new(Mutex::new(None)),
                partials_dropped: Arc::new(AtomicUsize::new(0)),
            },
            rx,
        )
    }

    /// Admit recognition events for a new session
    pub fn open_session(&self, session_id: &str) {
        let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        *session = Some(session_id.to_string());
    }

    fn is_open_for(&self, session_id: &str) -> bool {
        let session = self.session.lock().unwrap_or_else(|e| e.into_inner());
        session.as_deref() == Some(session_id)
    }

    /// Deliver a recognition event, subject to the session gate and the
    /// overflow policy: partials and silence markers are dropped when the
    /// consumer lags, finals are always awaited.
    pub async fn recognition(&self, event: RecognitionEvent) {
        if !self.is_open_for(&event.session_id) {
            debug!(
                "Discarding {:?} event for inactive session {}",
                event.kind, event.session_id
            );
            return;
        }

        if event.droppable() {
            match self.tx.try_send(SessionEvent::Recognition(event)) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    self.partials_dropped.fetch_add(1, Ordering::SeqCst);
                    warn!("Result channel full, dropping partial event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    debug!("Result channel consumer gone, dropping event");
                }
            }
        } else if self.tx.send(SessionEvent::Recognition(event)).await.is_err() {
            debug!("Result channel consumer gone, dropping final event");
        }
    }

    /// Deliver a state-change notification
    ///
    /// Always delivered, never subject to the gate or the overflow policy.
    /// A terminal transition (Idle or Error) closes the gate after delivery,
    /// so recognition events from the finished session are discarded from
    /// then on.
    pub async fn state_changed(&self, session_id: &str, new_state: SessionState) {
        let event = SessionEvent::StateChanged {
            session_id: session_id.to_string(),
            new_state,
        };
        if self.tx.send(event).await.is_err() {
            debug!("Result channel consumer gone, dropping state change");
        }

        if new_state.is_terminal() {
            let mut session = self.session.lock().unwrap_or_else(|e| e.into_inner());
            *session = None;
        }
    }

    /// Deliver the error event associated with a StateChanged{Error}
    pub async fn engine_failed(&self, session_id: &str, kind: EngineErrorKind, message: &str) {
        let event = SessionEvent::EngineFailed {
            session_id: session_id.to_string(),
            kind,
            message: message.to_string(),
        };
        if self.tx.send(event).await.is_err() {
            debug!("Result channel consumer gone, dropping engine failure");
        }
    }

    pub fn partials_dropped(&self) -> usize {
        self.partials_dropped.load(Ordering::SeqCst)
    }
}
