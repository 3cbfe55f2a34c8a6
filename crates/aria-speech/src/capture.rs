//! Speech capture bridge.
//!
//! Wraps a continuous, interim-results recognition engine. The engine pushes
//! [`CaptureEvent`]s (over whatever channel the adapter chooses, typically
//! tokio mpsc); the bridge folds them into live preview text and finalized
//! transcripts ready for submission.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::{Error, Result};

/// Event emitted by a recognition engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureEvent {
    /// Partial hypothesis, for live display only
    Interim(String),
    /// Finalized transcript, ready to submit
    Final(String),
    /// Engine failure description
    Error(String),
    /// Engine stopped on its own
    Ended,
}

/// A platform speech-recognition engine running in continuous mode.
#[async_trait]
pub trait RecognitionEngine: Send + Sync {
    /// Adapter name, for logs.
    fn name(&self) -> &str;

    /// Begin recognizing.
    async fn start(&self) -> Result<()>;

    /// Stop recognizing.
    async fn stop(&self) -> Result<()>;
}

/// Translates engine events into text submissions and tracks the listening
/// flag. With no engine detected, capture stays disabled and every other
/// capability is unaffected.
pub struct CaptureBridge {
    engine: Option<Arc<dyn RecognitionEngine>>,
    listening: Mutex<bool>,
    interim: Mutex<String>,
}

impl CaptureBridge {
    /// Wrap the engine detected at startup, if any.
    #[must_use]
    pub fn new(engine: Option<Arc<dyn RecognitionEngine>>) -> Self {
        if engine.is_none() {
            debug!("no recognition engine detected, capture disabled");
        }
        Self {
            engine,
            listening: Mutex::new(false),
            interim: Mutex::new(String::new()),
        }
    }

    /// Whether a recognition engine was detected.
    #[must_use]
    pub fn available(&self) -> bool {
        self.engine.is_some()
    }

    /// Whether capture is currently running.
    pub async fn is_listening(&self) -> bool {
        *self.listening.lock().await
    }

    /// Current interim text for live display.
    pub async fn live_preview(&self) -> String {
        self.interim.lock().await.clone()
    }

    /// Start the engine and raise the listening flag.
    pub async fn start_listening(&self) -> Result<()> {
        let engine = self
            .engine
            .as_ref()
            .ok_or(Error::Disabled("speech capture"))?;
        engine.start().await?;
        self.interim.lock().await.clear();
        *self.listening.lock().await = true;
        debug!(engine = engine.name(), "capture started");
        Ok(())
    }

    /// Stop the engine and lower the listening flag.
    pub async fn stop_listening(&self) -> Result<()> {
        if let Some(engine) = &self.engine {
            engine.stop().await?;
        }
        *self.listening.lock().await = false;
        Ok(())
    }

    /// Fold one engine event into the bridge state.
    ///
    /// Returns finalized text when the event completes an utterance; the
    /// caller submits it as a message. A finalized result also stops
    /// listening, and an engine error stops and resets the flag.
    pub async fn handle_event(&self, event: CaptureEvent) -> Option<String> {
        match event {
            CaptureEvent::Interim(text) => {
                self.interim.lock().await.push_str(&text);
                None
            }
            CaptureEvent::Final(text) => {
                self.interim.lock().await.clear();
                if let Err(err) = self.stop_listening().await {
                    warn!("failed to stop capture after final result: {err}");
                }
                Some(text)
            }
            CaptureEvent::Error(description) => {
                warn!("recognition engine error: {description}");
                self.interim.lock().await.clear();
                if let Err(err) = self.stop_listening().await {
                    warn!("failed to stop capture after engine error: {err}");
                }
                None
            }
            CaptureEvent::Ended => {
                *self.listening.lock().await = false;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct FakeEngine {
        starts: AtomicUsize,
        stops: AtomicUsize,
    }

    #[async_trait]
    impl RecognitionEngine for FakeEngine {
        fn name(&self) -> &str {
            "fake"
        }

        async fn start(&self) -> Result<()> {
            self.starts.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn stop(&self) -> Result<()> {
            self.stops.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn bridge_with_engine() -> (CaptureBridge, Arc<FakeEngine>) {
        let engine = Arc::new(FakeEngine::default());
        (CaptureBridge::new(Some(engine.clone())), engine)
    }

    #[tokio::test]
    async fn interim_text_accumulates_for_display() {
        let (bridge, _) = bridge_with_engine();
        bridge.start_listening().await.unwrap();

        assert!(bridge
            .handle_event(CaptureEvent::Interim("hello ".into()))
            .await
            .is_none());
        assert!(bridge
            .handle_event(CaptureEvent::Interim("world".into()))
            .await
            .is_none());
        assert_eq!(bridge.live_preview().await, "hello world");
    }

    #[tokio::test]
    async fn final_result_yields_text_and_stops_listening() {
        let (bridge, engine) = bridge_with_engine();
        bridge.start_listening().await.unwrap();
        bridge
            .handle_event(CaptureEvent::Interim("turn on".into()))
            .await;

        let text = bridge
            .handle_event(CaptureEvent::Final("turn on the lights".into()))
            .await;

        assert_eq!(text.as_deref(), Some("turn on the lights"));
        assert!(!bridge.is_listening().await);
        assert_eq!(bridge.live_preview().await, "");
        assert_eq!(engine.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn engine_error_resets_the_listening_flag() {
        let (bridge, engine) = bridge_with_engine();
        bridge.start_listening().await.unwrap();

        let out = bridge
            .handle_event(CaptureEvent::Error("no-speech".into()))
            .await;

        assert!(out.is_none());
        assert!(!bridge.is_listening().await);
        assert_eq!(engine.stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn engine_ended_clears_the_flag_without_stop_call() {
        let (bridge, engine) = bridge_with_engine();
        bridge.start_listening().await.unwrap();

        bridge.handle_event(CaptureEvent::Ended).await;

        assert!(!bridge.is_listening().await);
        assert_eq!(engine.stops.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_engine_disables_capture_only() {
        let bridge = CaptureBridge::new(None);
        assert!(!bridge.available());
        assert!(matches!(
            bridge.start_listening().await,
            Err(Error::Disabled(_))
        ));
        // Event handling still degrades gracefully.
        assert!(bridge
            .handle_event(CaptureEvent::Final("ignored".into()))
            .await
            .is_some());
    }
}
