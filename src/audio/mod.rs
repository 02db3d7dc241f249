//! Audio frame types shared with the capture provider
//!
//! The core does not capture audio itself. A capture provider (cpal,
//! ScreenCaptureKit, a file reader in tests) delivers `AudioFrame`s over an
//! mpsc channel handed to the gateway at session start. The format is fixed
//! per deployment; no resampling or negotiation happens here.

mod frame;

pub use frame::AudioFrame;
