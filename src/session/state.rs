use serde::{Deserialize, Serialize};

/// Session lifecycle state
///
/// Exactly one session may be in {Starting, Listening, Stopping} at any
/// time. Error is terminal but recoverable via an explicit Reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No session; ready to start
    Idle,
    /// Engine is being opened; no frames processed yet
    Starting,
    /// Engine open, frames are being forwarded
    Listening,
    /// Flush and finalize in progress
    Stopping,
    /// Engine failed; requires Reset before a new Start
    Error,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

impl SessionState {
    /// Whether a Start command is accepted in this state
    pub fn accepts_start(self) -> bool {
        self == SessionState::Idle
    }

    /// Whether the state machine considers a transition legal
    pub fn can_transition_to(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Idle, SessionState::Starting)
                | (SessionState::Starting, SessionState::Listening)
                | (SessionState::Starting, SessionState::Error)
                | (SessionState::Listening, SessionState::Stopping)
                | (SessionState::Listening, SessionState::Error)
                | (SessionState::Stopping, SessionState::Idle)
                | (SessionState::Error, SessionState::Idle)
        )
    }

    /// Terminal states close the result channel for the session
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Idle | SessionState::Error)
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SessionState::Idle => "idle",
            SessionState::Starting => "starting",
            SessionState::Listening => "listening",
            SessionState::Stopping => "stopping",
            SessionState::Error => "error",
        };
        write!(f, "{}", name)
    }
}
