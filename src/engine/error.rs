use serde::{Deserialize, Serialize};

/// Classification of engine-level failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineErrorKind {
    /// Engine could not be initialized (e.g. model missing)
    ResourceUnavailable,
    /// Engine-level concurrency limit exceeded
    Busy,
    /// Engine did not respond in time (reported by the caller's own
    /// deadline wrapper; the core imposes no timeouts)
    Timeout,
}

/// An engine failure at open time or mid-stream
///
/// Always drives the session into the Error state; recovery requires an
/// explicit Reset from the command source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineError {
    pub kind: EngineErrorKind,
    pub message: String,
}

impl EngineError {
    pub fn new(kind: EngineErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            EngineErrorKind::ResourceUnavailable => {
                write!(f, "engine resource unavailable: {}", self.message)
            }
            EngineErrorKind::Busy => write!(f, "engine busy: {}", self.message),
            EngineErrorKind::Timeout => write!(f, "engine timed out: {}", self.message),
        }
    }
}

impl std::error::Error for EngineError {}

/// Invalid engine configuration or audio format mismatch
///
/// Surfaced synchronously before a session is created; no state change
/// occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigurationError {
    pub message: String,
}

impl ConfigurationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ConfigurationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid configuration: {}", self.message)
    }
}

impl std::error::Error for ConfigurationError {}
