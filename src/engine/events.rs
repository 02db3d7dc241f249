use serde::{Deserialize, Serialize};

/// Raw recognizer output for one fed frame, before session attribution
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineOutput {
    /// Interim hypothesis, may be revised by later frames
    Partial(String),
    /// Committed transcript for the utterance
    Final(String),
    /// Frame contained no speech
    Silence,
}

/// Kind of recognizer output carried by a `RecognitionEvent`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecognitionKind {
    Partial,
    Final,
    Silence,
}

/// A unit of recognizer output attributed to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecognitionEvent {
    pub session_id: String,
    pub kind: RecognitionKind,
    /// Transcribed text; empty for silence markers
    pub text: String,
}

impl RecognitionEvent {
    pub(crate) fn from_output(session_id: &str, output: EngineOutput) -> Self {
        let (kind, text) = match output {
            EngineOutput::Partial(text) => (RecognitionKind::Partial, text),
            EngineOutput::Final(text) => (RecognitionKind::Final, text),
            EngineOutput::Silence => (RecognitionKind::Silence, String::new()),
        };
        Self {
            session_id: session_id.to_string(),
            kind,
            text,
        }
    }

    /// Partial events are lossy under backpressure; finals never are
    pub fn droppable(&self) -> bool {
        matches!(self.kind, RecognitionKind::Partial | RecognitionKind::Silence)
    }
}
