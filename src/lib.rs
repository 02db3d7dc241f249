pub mod audio;
pub mod config;
pub mod engine;
pub mod gateway;
pub mod results;
pub mod session;

pub use audio::AudioFrame;
pub use config::Config;
pub use engine::{
    ConfigurationError, EngineConfig, EngineError, EngineErrorKind, EngineOutput, EngineStream,
    RecognitionEngine, RecognitionEvent, RecognitionKind, RecognizerAdapter,
};
pub use gateway::{Command, CommandGateway, CommandOutcome};
pub use results::ResultChannel;
pub use session::{
    SessionConfig, SessionController, SessionEvent, SessionState, SessionStats, TranscriptSegment,
};
