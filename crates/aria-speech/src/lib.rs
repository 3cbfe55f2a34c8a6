//! Aria Speech - capture and playback bridges
//!
//! Wraps platform speech engines behind two seams:
//! - [`capture::RecognitionEngine`] for continuous, interim-result speech
//!   recognition (events in, transcripts out)
//! - [`playback::SynthesisEngine`] for text-to-speech with per-mode voices
//!
//! Engine availability is detected once at startup; a missing engine
//! degrades that capability to disabled without affecting anything else.

#![forbid(unsafe_code)]

pub mod capture;
pub mod config;
pub mod error;
pub mod playback;

pub use capture::{CaptureBridge, CaptureEvent, RecognitionEngine};
pub use config::PlaybackOptions;
pub use error::{Error, Result};
pub use playback::{Playback, SynthesisEngine, Utterance, Voice};
