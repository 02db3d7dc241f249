// Unit tests for the recognizer adapter: event attribution, close
// idempotence, and the drop-after-close rule.

mod common;

use common::{silent_frame, FeedStep, ScriptedEngine};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use voice_session::{
    EngineConfig, EngineErrorKind, EngineOutput, RecognitionKind, RecognizerAdapter,
};

async fn open_adapter(engine: &ScriptedEngine, session_id: &str) -> RecognizerAdapter {
    RecognizerAdapter::open(engine, &EngineConfig::default(), session_id)
        .await
        .expect("open failed")
}

#[tokio::test]
async fn test_feed_attributes_events_to_session() {
    let engine = ScriptedEngine::new(
        vec![FeedStep::Outputs(vec![
            EngineOutput::Partial("hi".into()),
            EngineOutput::Silence,
        ])],
        None,
    );
    let mut adapter = open_adapter(&engine, "session-42").await;

    let events = adapter.feed(&silent_frame(0)).await.unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].session_id, "session-42");
    assert_eq!(events[0].kind, RecognitionKind::Partial);
    assert_eq!(events[0].text, "hi");
    assert_eq!(events[1].kind, RecognitionKind::Silence);
    assert_eq!(events[1].text, "");
    assert_eq!(adapter.frames_fed(), 1);
}

#[tokio::test]
async fn test_close_is_idempotent() {
    let engine = ScriptedEngine::new(Vec::new(), Some(EngineOutput::Final("bye".into())));
    let closes = Arc::clone(&engine.closes);
    let mut adapter = open_adapter(&engine, "s").await;

    let first = adapter.close().await;
    assert!(matches!(first, Some(ev) if ev.kind == RecognitionKind::Final && ev.text == "bye"));

    let second = adapter.close().await;
    assert!(second.is_none());
    assert_eq!(closes.load(Ordering::SeqCst), 1, "engine closed exactly once");
    assert!(adapter.is_closed());
}

#[tokio::test]
async fn test_frames_after_close_are_dropped() {
    let engine = ScriptedEngine::new(
        vec![FeedStep::Outputs(vec![EngineOutput::Partial("x".into())])],
        None,
    );
    let mut adapter = open_adapter(&engine, "s").await;
    adapter.close().await;

    let events = adapter.feed(&silent_frame(0)).await.unwrap();
    assert!(events.is_empty());
    assert_eq!(adapter.frames_fed(), 0, "dropped frame is not counted");
}

#[tokio::test]
async fn test_open_failure_propagates() {
    let engine = ScriptedEngine::failing_open(EngineErrorKind::Busy);
    let result = RecognizerAdapter::open(&engine, &EngineConfig::default(), "s").await;

    let err = result.err().expect("open should fail");
    assert_eq!(err.kind, EngineErrorKind::Busy);
}

#[tokio::test]
async fn test_feed_error_propagates() {
    let engine = ScriptedEngine::new(
        vec![FeedStep::Fail(voice_session::EngineError::new(
            EngineErrorKind::Timeout,
            "no response",
        ))],
        None,
    );
    let mut adapter = open_adapter(&engine, "s").await;

    let err = adapter.feed(&silent_frame(0)).await.err().expect("feed should fail");
    assert_eq!(err.kind, EngineErrorKind::Timeout);
}
