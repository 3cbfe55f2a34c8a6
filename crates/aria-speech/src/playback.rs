//! Speech playback bridge.
//!
//! Wraps a synthesis engine, binding one voice per mode. Starting playback
//! always preempts any in-progress utterance; there is no audio queue.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::config::PlaybackOptions;
use crate::error::{Error, Result};

/// A voice offered by the synthesis engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    /// Engine-reported voice name
    pub name: String,
    /// BCP-47 language tag
    pub language: String,
}

impl Voice {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            language: language.into(),
        }
    }
}

/// One playback request.
#[derive(Debug, Clone)]
pub struct Utterance {
    /// Text to speak
    pub text: String,
    /// Selected voice, or the engine default when none matched
    pub voice: Option<Voice>,
    /// Fixed prosody settings
    pub options: PlaybackOptions,
}

/// A platform text-to-speech engine.
#[async_trait]
pub trait SynthesisEngine: Send + Sync {
    /// Voices currently available. May be empty until the engine finishes
    /// loading its catalog.
    async fn voices(&self) -> Vec<Voice>;

    /// Speak one utterance.
    async fn speak(&self, utterance: Utterance) -> Result<()>;

    /// Cancel any in-progress utterance.
    fn cancel(&self);
}

/// Pick a voice for a mode.
///
/// Preference order: the mode's voice hint as a case-insensitive name
/// substring, then a name suggesting a female voice, then the first
/// available voice. The gender heuristic is locale- and engine-dependent;
/// it is a best-effort preference, not a contract.
#[must_use]
pub fn pick_voice(voices: &[Voice], hint: Option<&str>) -> Option<Voice> {
    if let Some(hint) = hint.map(str::to_lowercase).filter(|h| !h.is_empty()) {
        if let Some(voice) = voices
            .iter()
            .find(|v| v.name.to_lowercase().contains(&hint))
        {
            return Some(voice.clone());
        }
    }

    voices
        .iter()
        .find(|v| v.name.to_lowercase().contains("female"))
        .or_else(|| voices.first())
        .cloned()
}

/// Speaks assistant replies with a per-mode voice.
pub struct Playback {
    engine: Option<Arc<dyn SynthesisEngine>>,
    options: PlaybackOptions,
    /// Voice bound to each mode; chosen once when engine voices become
    /// available, cached thereafter rather than rechosen each time.
    assignments: Mutex<HashMap<String, Voice>>,
}

impl Playback {
    /// Wrap the engine detected at startup, if any.
    #[must_use]
    pub fn new(engine: Option<Arc<dyn SynthesisEngine>>) -> Self {
        if engine.is_none() {
            debug!("no synthesis engine detected, playback disabled");
        }
        Self {
            engine,
            options: PlaybackOptions::default(),
            assignments: Mutex::new(HashMap::new()),
        }
    }

    /// Whether a synthesis engine was detected.
    #[must_use]
    pub fn available(&self) -> bool {
        self.engine.is_some()
    }

    /// The voice bound to a mode, assigning one if needed.
    pub async fn voice_for_mode(&self, mode_id: &str, hint: Option<&str>) -> Option<Voice> {
        let engine = self.engine.as_ref()?;

        let mut assignments = self.assignments.lock().await;
        if let Some(voice) = assignments.get(mode_id) {
            return Some(voice.clone());
        }

        let voices = engine.voices().await;
        let voice = pick_voice(&voices, hint)?;
        debug!(mode = mode_id, voice = %voice.name, "voice bound to mode");
        assignments.insert(mode_id.to_string(), voice.clone());
        Some(voice)
    }

    /// Speak reply text for a mode, preempting any in-progress utterance.
    pub async fn say(&self, mode_id: &str, hint: Option<&str>, text: &str) -> Result<()> {
        let engine = self
            .engine
            .as_ref()
            .ok_or(Error::Disabled("speech playback"))?;

        let voice = self.voice_for_mode(mode_id, hint).await;

        // Always cancel before speaking; there is no queue.
        engine.cancel();
        engine
            .speak(Utterance {
                text: text.to_string(),
                voice,
                options: self.options,
            })
            .await
    }
}
