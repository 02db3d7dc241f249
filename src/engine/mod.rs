//! Recognition engine abstraction and the recognizer adapter
//!
//! The engine is an external collaborator exposing open/feed/close. The
//! `RecognizerAdapter` wraps one open engine stream, owns its resources
//! exclusively, and converts raw engine output into session-attributed
//! `RecognitionEvent`s.

mod adapter;
mod error;
mod events;

pub use adapter::{EngineConfig, EngineStream, RecognitionEngine, RecognizerAdapter};
pub use error::{ConfigurationError, EngineError, EngineErrorKind};
pub use events::{EngineOutput, RecognitionEvent, RecognitionKind};
