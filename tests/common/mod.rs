// Scripted recognition engine for driving the session core in tests.
//
// The engine consumes a script of per-frame steps; each feed pops the next
// step. An exhausted script yields no events.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use voice_session::{
    AudioFrame, EngineConfig, EngineError, EngineErrorKind, EngineOutput, EngineStream,
    RecognitionEngine,
};

pub enum FeedStep {
    Outputs(Vec<EngineOutput>),
    Fail(EngineError),
}

pub struct ScriptedEngine {
    script: Mutex<VecDeque<FeedStep>>,
    close_output: Mutex<Option<EngineOutput>>,
    open_error: Mutex<Option<EngineError>>,
    open_delay: Option<Duration>,
    feed_delay: Option<Duration>,
    pub opens: Arc<AtomicUsize>,
    pub closes: Arc<AtomicUsize>,
}

impl ScriptedEngine {
    pub fn new(script: Vec<FeedStep>, close_output: Option<EngineOutput>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            close_output: Mutex::new(close_output),
            open_error: Mutex::new(None),
            open_delay: None,
            feed_delay: None,
            opens: Arc::new(AtomicUsize::new(0)),
            closes: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Engine whose open() always fails with the given kind
    pub fn failing_open(kind: EngineErrorKind) -> Self {
        let mut engine = Self::new(Vec::new(), None);
        engine.open_error = Mutex::new(Some(EngineError::new(kind, "scripted open failure")));
        engine
    }

    /// Delay open() so tests can overlap commands with engine startup
    pub fn with_open_delay(mut self, delay: Duration) -> Self {
        self.open_delay = Some(delay);
        self
    }

    /// Delay each feed() so tests can overlap commands with decoding
    pub fn with_feed_delay(mut self, delay: Duration) -> Self {
        self.feed_delay = Some(delay);
        self
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecognitionEngine for ScriptedEngine {
    async fn open(&self, _config: &EngineConfig) -> Result<Box<dyn EngineStream>, EngineError> {
        if let Some(delay) = self.open_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = self.open_error.lock().unwrap().take() {
            return Err(err);
        }

        self.opens.fetch_add(1, Ordering::SeqCst);
        let script = std::mem::take(&mut *self.script.lock().unwrap());
        let close_output = self.close_output.lock().unwrap().take();

        Ok(Box::new(ScriptedStream {
            script,
            close_output,
            feed_delay: self.feed_delay,
            closes: Arc::clone(&self.closes),
        }))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

pub struct ScriptedStream {
    script: VecDeque<FeedStep>,
    close_output: Option<EngineOutput>,
    feed_delay: Option<Duration>,
    closes: Arc<AtomicUsize>,
}

#[async_trait]
impl EngineStream for ScriptedStream {
    async fn feed(&mut self, _frame: &AudioFrame) -> Result<Vec<EngineOutput>, EngineError> {
        if let Some(delay) = self.feed_delay {
            tokio::time::sleep(delay).await;
        }
        match self.script.pop_front() {
            Some(FeedStep::Outputs(outputs)) => Ok(outputs),
            Some(FeedStep::Fail(err)) => Err(err),
            None => Ok(Vec::new()),
        }
    }

    async fn close(&mut self) -> Option<EngineOutput> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        self.close_output.take()
    }
}

/// A 100ms frame of silence in the default capture format
pub fn silent_frame(timestamp_ms: u64) -> AudioFrame {
    AudioFrame {
        samples: vec![0i16; 1600],
        sample_rate: 16000,
        channels: 1,
        timestamp_ms,
    }
}
