use super::state::SessionState;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics about the current (or most recent) session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionStats {
    /// Current state of the controller
    pub state: SessionState,

    /// Id of the active session, if one exists
    pub session_id: Option<String>,

    /// When the active session started
    pub started_at: Option<DateTime<Utc>>,

    /// Seconds since the session started (0 when idle)
    pub duration_secs: f64,

    /// Frames fed to the engine so far
    pub frames_fed: usize,

    /// Recognition events emitted so far
    pub events_emitted: usize,

    /// Partial events dropped under backpressure
    pub partials_dropped: usize,
}

/// A finalized transcript segment retained after the session ends
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    /// Committed text
    pub text: String,

    /// When this segment was finalized
    pub timestamp: DateTime<Utc>,
}
