use super::state::SessionState;
use crate::engine::{EngineErrorKind, RecognitionEvent};
use serde::{Deserialize, Serialize};

/// Everything the core emits on the result channel
///
/// Serializable so a host transport (platform channel, socket, message bus)
/// can carry events without re-marshalling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// Recognizer output: partial, final, or silence
    Recognition(RecognitionEvent),
    /// Session state transition notification
    StateChanged {
        session_id: String,
        new_state: SessionState,
    },
    /// Engine failure associated with the StateChanged{Error} transition
    EngineFailed {
        session_id: String,
        kind: EngineErrorKind,
        message: String,
    },
}

impl SessionEvent {
    pub fn session_id(&self) -> &str {
        match self {
            SessionEvent::Recognition(ev) => &ev.session_id,
            SessionEvent::StateChanged { session_id, .. } => session_id,
            SessionEvent::EngineFailed { session_id, .. } => session_id,
        }
    }
}
