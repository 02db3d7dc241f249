//! Session lifecycle management
//!
//! This module provides the session state machine:
//! - `SessionState` and its transition table
//! - `SessionController`, which owns the active session and its
//!   audio-forwarding task
//! - Session events, configuration, statistics, and transcript retention

mod config;
mod controller;
mod events;
mod state;
mod stats;

pub use config::SessionConfig;
pub use controller::SessionController;
pub use events::SessionEvent;
pub use state::SessionState;
pub use stats::{SessionStats, TranscriptSegment};
