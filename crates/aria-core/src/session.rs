//! Session controller.
//!
//! Single active session, no persistence. The controller owns all mutable
//! console state (message log, mode catalog, integrations, flags) behind a
//! mutex that is never held across an await, and orchestrates gateway calls
//! with single-in-flight cancellation: submitting while a request is
//! streaming cancels the previous request, and a cancelled request's late
//! result is discarded without touching state.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use aria_llm::{ChatRequest, ConsoleProvider, DesignRequest, Turn};

use crate::error::{Error, Result};
use crate::integration::{seed_integrations, Integration, IntegrationStatus};
use crate::message::{Message, Role};
use crate::mode::{seed_modes, Capability, Mode};

/// Description used when a mode is spawned with no proposal and no notes.
const DEFAULT_MODE_SEED: &str = "A fresh conversational mode.";

/// Spawned-mode descriptions are clipped to this many characters.
const MODE_DESCRIPTION_LIMIT: usize = 220;

/// Accent rotation for spawned modes.
const ACCENT_PALETTE: &[&str] = &["#fbbf24", "#a78bfa", "#2dd4bf", "#fb7185"];

/// How a submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Result or error was appended to the log
    Completed,
    /// A newer submission aborted this one; nothing was appended
    Cancelled,
    /// Blank input, nothing was sent
    Skipped,
}

/// Read-only view of the session flags for UI rendering.
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    /// Current mode id
    pub current_mode: String,
    /// A chat request is in flight
    pub streaming: bool,
    /// Speech capture is active
    pub listening: bool,
    /// Total messages across all modes
    pub message_count: usize,
    /// Latest design-synthesis proposal, if any
    pub latest_proposal: Option<String>,
}

struct SessionState {
    messages: Vec<Message>,
    modes: Vec<Mode>,
    integrations: Vec<Integration>,
    current_mode: String,
    pending_input: String,
    operator_notes: String,
    latest_proposal: Option<String>,
    streaming: bool,
    listening: bool,
    spawned_modes: u64,
    drafted_connectors: u64,
}

impl SessionState {
    fn new() -> Self {
        let modes = seed_modes();
        let current_mode = modes[0].id.clone();
        Self {
            messages: Vec::new(),
            modes,
            integrations: seed_integrations(),
            current_mode,
            pending_input: String::new(),
            operator_notes: String::new(),
            latest_proposal: None,
            streaming: false,
            listening: false,
            spawned_modes: 0,
            drafted_connectors: 0,
        }
    }

    fn current_mode_entry(&self) -> &Mode {
        // current_mode always references a seeded or spawned mode
        self.modes
            .iter()
            .find(|m| m.id == self.current_mode)
            .unwrap_or(&self.modes[0])
    }

    /// Mode-scoped history in wire form, oldest first.
    fn mode_transcript(&self) -> Vec<Turn> {
        self.messages
            .iter()
            .filter(|m| m.mode_id == self.current_mode)
            .map(|m| Turn::new(m.role.as_str(), m.text.clone()))
            .collect()
    }

    fn push(&mut self, role: Role, text: impl Into<String>) {
        let mode_id = self.current_mode.clone();
        self.messages.push(Message::new(role, text, mode_id));
    }
}

struct Inflight {
    next_generation: u64,
    current: Option<(u64, CancellationToken)>,
}

/// Orchestrates user actions against the gateway and mutates session state.
pub struct SessionController {
    provider: Arc<dyn ConsoleProvider>,
    state: tokio::sync::Mutex<SessionState>,
    inflight: tokio::sync::Mutex<Inflight>,
}

impl SessionController {
    /// Create a controller with seeded modes and integrations.
    #[must_use]
    pub fn new(provider: Arc<dyn ConsoleProvider>) -> Self {
        Self {
            provider,
            state: tokio::sync::Mutex::new(SessionState::new()),
            inflight: tokio::sync::Mutex::new(Inflight {
                next_generation: 0,
                current: None,
            }),
        }
    }

    /// Submit a user utterance (typed or transcribed).
    ///
    /// Appends the user message, streams one gateway call, then appends the
    /// assistant reply (plus a system message when a plan is present) or a
    /// system error notice. Streaming always clears in a final step, owned
    /// by the newest submission.
    pub async fn submit(&self, text: &str) -> SubmitOutcome {
        let text = text.trim().to_string();
        if text.is_empty() {
            return SubmitOutcome::Skipped;
        }

        // Cancel any in-flight request before issuing the new one.
        let (generation, token) = {
            let mut inflight = self.inflight.lock().await;
            if let Some((_, previous)) = inflight.current.take() {
                debug!("aborting in-flight chat request");
                previous.cancel();
            }
            inflight.next_generation += 1;
            let token = CancellationToken::new();
            inflight.current = Some((inflight.next_generation, token.clone()));
            (inflight.next_generation, token)
        };

        let request = {
            let mut state = self.state.lock().await;
            let conversation = state.mode_transcript();
            let mode = state.current_mode_entry();
            let request = ChatRequest {
                message: text.clone(),
                mode_id: Some(mode.id.clone()),
                system_prompt: Some(mode.system_prompt.clone()),
                conversation,
            };
            state.push(Role::User, text);
            state.pending_input.clear();
            state.streaming = true;
            request
        };

        let outcome = tokio::select! {
            // Cancellation wins when both arms are ready in the same poll.
            biased;
            _ = token.cancelled() => {
                // A newer submission owns the session now; its result is the
                // only one that may reach the log.
                SubmitOutcome::Cancelled
            }
            result = self.provider.chat(request) => {
                let mut state = self.state.lock().await;
                // Re-check under the lock: the token may have been cancelled
                // between the resolving poll and acquiring the state lock.
                if token.is_cancelled() {
                    SubmitOutcome::Cancelled
                } else {
                    match result {
                        Ok(chat) => {
                            state.push(Role::Assistant, chat.reply);
                            if let Some(plan) = chat.plan {
                                state.push(Role::System, plan);
                            }
                        }
                        Err(err) => {
                            state.push(Role::System, format!("Request failed: {err}"));
                        }
                    }
                    SubmitOutcome::Completed
                }
            }
        };

        // Guaranteed cleanup, but only if this submission is still current.
        let mut inflight = self.inflight.lock().await;
        if inflight
            .current
            .as_ref()
            .is_some_and(|(g, _)| *g == generation)
        {
            inflight.current = None;
            drop(inflight);
            self.state.lock().await.streaming = false;
        }

        outcome
    }

    /// Run a one-shot design synthesis over the current mode's transcript.
    ///
    /// Independent of the chat call: the two may overlap and neither cancels
    /// the other. The proposal is retained for mode auto-spawning.
    pub async fn run_design_synthesis(&self) -> Result<String> {
        let request = {
            let state = self.state.lock().await;
            DesignRequest {
                mode_id: Some(state.current_mode.clone()),
                notes: Some(state.operator_notes.clone()).filter(|n| !n.trim().is_empty()),
                transcript: state.mode_transcript(),
            }
        };

        let outcome = self.provider.design(request).await?;

        let mut state = self.state.lock().await;
        state.latest_proposal = Some(outcome.proposal.clone());
        info!("design proposal captured ({} chars)", outcome.proposal.len());
        Ok(outcome.proposal)
    }

    /// Spawn a mode from the latest proposal (or notes, or a default seed)
    /// and make it current.
    pub async fn auto_spawn_mode(&self) -> Mode {
        let mut state = self.state.lock().await;

        let source = state
            .latest_proposal
            .clone()
            .filter(|p| !p.trim().is_empty())
            .or_else(|| {
                Some(state.operator_notes.trim().to_string()).filter(|n| !n.is_empty())
            })
            .unwrap_or_else(|| DEFAULT_MODE_SEED.to_string());

        let description: String = source.trim().chars().take(MODE_DESCRIPTION_LIMIT).collect();

        state.spawned_modes += 1;
        let n = state.spawned_modes;
        let mode = Mode {
            id: format!("auto-{n}"),
            name: format!("Auto Mode {n}"),
            accent: ACCENT_PALETTE[(n as usize - 1) % ACCENT_PALETTE.len()].to_string(),
            description: description.clone(),
            system_prompt: format!(
                "You are Aria running a newly synthesized mode. {description}"
            ),
            capabilities: vec![Capability {
                id: "adaptive".to_string(),
                label: "Adaptive".to_string(),
                detail: "Synthesized from the latest design proposal".to_string(),
            }],
            voice_hint: None,
        };

        info!(mode = %mode.id, "auto-spawned mode");
        state.modes.push(mode.clone());
        state.current_mode = mode.id.clone();
        mode
    }

    /// Create a connector draft from the operator notes, prepending it to
    /// the integration list and clearing the notes field.
    pub async fn create_connector_draft(&self) -> Result<Integration> {
        let mut state = self.state.lock().await;

        let notes = state.operator_notes.trim().to_string();
        if notes.is_empty() {
            return Err(Error::NotesRequired);
        }

        state.drafted_connectors += 1;
        let n = state.drafted_connectors;
        let draft = Integration {
            id: format!("draft-{n}"),
            name: format!("Draft connector {n}"),
            endpoint: String::new(),
            description: notes,
            status: IntegrationStatus::Draft,
            notes: None,
        };

        state.integrations.insert(0, draft.clone());
        state.operator_notes.clear();
        Ok(draft)
    }

    /// Switch the current mode. History is kept; only display filtering and
    /// outgoing transcripts change.
    pub async fn set_mode(&self, mode_id: &str) -> Result<()> {
        let mut state = self.state.lock().await;
        if !state.modes.iter().any(|m| m.id == mode_id) {
            return Err(Error::UnknownMode(mode_id.to_string()));
        }
        state.current_mode = mode_id.to_string();
        Ok(())
    }

    /// Messages of the current mode, in creation order.
    pub async fn visible_messages(&self) -> Vec<Message> {
        let state = self.state.lock().await;
        state
            .messages
            .iter()
            .filter(|m| m.mode_id == state.current_mode)
            .cloned()
            .collect()
    }

    /// All modes, seeded plus spawned.
    pub async fn modes(&self) -> Vec<Mode> {
        self.state.lock().await.modes.clone()
    }

    /// All integrations, newest drafts first.
    pub async fn integrations(&self) -> Vec<Integration> {
        self.state.lock().await.integrations.clone()
    }

    /// The mode currently steering the model.
    pub async fn current_mode(&self) -> Mode {
        self.state.lock().await.current_mode_entry().clone()
    }

    /// Replace the operator notes.
    pub async fn set_operator_notes(&self, notes: &str) {
        self.state.lock().await.operator_notes = notes.to_string();
    }

    /// Track the live transcription preview for the input field.
    pub async fn set_pending_input(&self, text: &str) {
        self.state.lock().await.pending_input = text.to_string();
    }

    /// Flip the speech-capture flag.
    pub async fn set_listening(&self, listening: bool) {
        self.state.lock().await.listening = listening;
    }

    /// Flags and counters for UI rendering.
    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.lock().await;
        SessionSnapshot {
            current_mode: state.current_mode.clone(),
            streaming: state.streaming,
            listening: state.listening,
            message_count: state.messages.len(),
            latest_proposal: state.latest_proposal.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex as StdMutex;
    use std::time::Duration;

    use aria_llm::{ChatOutcome, DesignOutcome};

    /// Echo provider: replies `echo: <message>`, slower when the message
    /// starts with "slow", failing when it starts with "fail". Records every
    /// chat request it receives.
    struct FakeProvider {
        requests: StdMutex<Vec<ChatRequest>>,
        plan: Option<String>,
        proposal: String,
    }

    impl FakeProvider {
        fn new() -> Self {
            Self {
                requests: StdMutex::new(Vec::new()),
                plan: None,
                proposal: "- build the thing".to_string(),
            }
        }

        fn with_plan(plan: &str) -> Self {
            Self {
                plan: Some(plan.to_string()),
                ..Self::new()
            }
        }
    }

    #[async_trait]
    impl ConsoleProvider for FakeProvider {
        async fn chat(&self, request: ChatRequest) -> aria_llm::Result<ChatOutcome> {
            let message = request.message.clone();
            self.requests.lock().unwrap().push(request);
            if message.starts_with("slow") {
                tokio::time::sleep(Duration::from_millis(200)).await;
            }
            if message.starts_with("fail") {
                return Err(aria_llm::Error::Network("connection reset".to_string()));
            }
            Ok(ChatOutcome {
                reply: format!("echo: {message}"),
                plan: self.plan.clone(),
            })
        }

        async fn design(&self, _request: DesignRequest) -> aria_llm::Result<DesignOutcome> {
            Ok(DesignOutcome {
                proposal: self.proposal.clone(),
            })
        }
    }

    fn controller_with(provider: FakeProvider) -> (Arc<SessionController>, Arc<FakeProvider>) {
        let provider = Arc::new(provider);
        (
            Arc::new(SessionController::new(provider.clone())),
            provider,
        )
    }

    #[tokio::test]
    async fn submit_appends_user_and_assistant_messages() {
        let (controller, _) = controller_with(FakeProvider::new());

        let outcome = controller.submit("hello there").await;
        assert_eq!(outcome, SubmitOutcome::Completed);

        let messages = controller.visible_messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::User);
        assert_eq!(messages[0].text, "hello there");
        assert_eq!(messages[1].role, Role::Assistant);
        assert_eq!(messages[1].text, "echo: hello there");
        assert!(!controller.snapshot().await.streaming);
    }

    #[tokio::test]
    async fn plan_lands_as_system_message() {
        let (controller, _) = controller_with(FakeProvider::with_plan("- step one"));

        controller.submit("plan something").await;

        let messages = controller.visible_messages().await;
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[2].role, Role::System);
        assert_eq!(messages[2].text, "- step one");
    }

    #[tokio::test]
    async fn gateway_error_becomes_system_message_and_session_recovers() {
        let (controller, _) = controller_with(FakeProvider::new());

        controller.submit("fail please").await;

        let messages = controller.visible_messages().await;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].role, Role::System);
        assert!(messages[1].text.starts_with("Request failed:"));
        assert!(!controller.snapshot().await.streaming);

        // The session stays usable after a failure.
        controller.submit("try again").await;
        assert_eq!(controller.visible_messages().await.len(), 4);
    }

    #[tokio::test]
    async fn blank_input_is_skipped() {
        let (controller, provider) = controller_with(FakeProvider::new());
        assert_eq!(controller.submit("   ").await, SubmitOutcome::Skipped);
        assert!(controller.visible_messages().await.is_empty());
        assert!(provider.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn second_submission_cancels_the_first() {
        let (controller, _) = controller_with(FakeProvider::new());

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("slow question").await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = controller.submit("quick question").await;
        assert_eq!(second, SubmitOutcome::Completed);
        assert_eq!(first.await.unwrap(), SubmitOutcome::Cancelled);

        // Only the second submission's result reached the log.
        let texts: Vec<_> = controller
            .visible_messages()
            .await
            .iter()
            .map(|m| m.text.clone())
            .collect();
        assert!(texts.contains(&"echo: quick question".to_string()));
        assert!(!texts.iter().any(|t| t == "echo: slow question"));
        assert!(!controller.snapshot().await.streaming);
    }

    /// Provider whose first chat call parks until the second call arrives,
    /// so the first request's result and its cancellation become ready in
    /// the same poll of the submitting task.
    struct RacingProvider {
        gate: tokio::sync::Notify,
        calls: StdMutex<usize>,
    }

    impl RacingProvider {
        fn new() -> Self {
            Self {
                gate: tokio::sync::Notify::new(),
                calls: StdMutex::new(0),
            }
        }
    }

    #[async_trait]
    impl ConsoleProvider for RacingProvider {
        async fn chat(&self, request: ChatRequest) -> aria_llm::Result<ChatOutcome> {
            let first = {
                let mut calls = self.calls.lock().unwrap();
                *calls += 1;
                *calls == 1
            };
            if first {
                self.gate.notified().await;
            } else {
                self.gate.notify_one();
            }
            Ok(ChatOutcome {
                reply: format!("echo: {}", request.message),
                plan: None,
            })
        }

        async fn design(&self, _request: DesignRequest) -> aria_llm::Result<DesignOutcome> {
            Ok(DesignOutcome {
                proposal: String::new(),
            })
        }
    }

    #[tokio::test]
    async fn result_ready_at_cancellation_never_reaches_the_log() {
        let controller = Arc::new(SessionController::new(Arc::new(RacingProvider::new())));

        let first = {
            let controller = controller.clone();
            tokio::spawn(async move { controller.submit("first").await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        // Releases the parked first request at the same moment its token is
        // cancelled; the stale reply must still be discarded.
        let second = controller.submit("second").await;
        assert_eq!(second, SubmitOutcome::Completed);
        assert_eq!(first.await.unwrap(), SubmitOutcome::Cancelled);

        let texts: Vec<_> = controller
            .visible_messages()
            .await
            .iter()
            .map(|m| m.text.clone())
            .collect();
        assert_eq!(texts, ["first", "second", "echo: second"]);
    }

    #[tokio::test]
    async fn transcript_sent_to_gateway_is_mode_scoped_and_ordered() {
        let (controller, provider) = controller_with(FakeProvider::new());

        controller.submit("first").await;
        controller.set_mode("engineer").await.unwrap();
        controller.submit("second").await;
        controller.set_mode("concierge").await.unwrap();
        controller.submit("third").await;

        let requests = provider.requests.lock().unwrap();
        let last = requests.last().unwrap();
        assert_eq!(last.mode_id.as_deref(), Some("concierge"));
        let roles: Vec<_> = last
            .conversation
            .iter()
            .map(|t| (t.role.clone(), t.content.clone()))
            .collect();
        // Only the concierge history travels, in original order.
        assert_eq!(
            roles,
            vec![
                ("user".to_string(), "first".to_string()),
                ("assistant".to_string(), "echo: first".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn switching_modes_filters_display_but_keeps_history() {
        let (controller, _) = controller_with(FakeProvider::new());

        controller.submit("for concierge").await;
        controller.set_mode("muse").await.unwrap();

        assert!(controller.visible_messages().await.is_empty());
        assert_eq!(controller.snapshot().await.message_count, 2);

        controller.set_mode("concierge").await.unwrap();
        assert_eq!(controller.visible_messages().await.len(), 2);
    }

    #[tokio::test]
    async fn unknown_mode_is_rejected() {
        let (controller, _) = controller_with(FakeProvider::new());
        assert!(matches!(
            controller.set_mode("nope").await,
            Err(Error::UnknownMode(_))
        ));
    }

    #[tokio::test]
    async fn design_synthesis_stores_the_proposal() {
        let (controller, _) = controller_with(FakeProvider::new());
        let proposal = controller.run_design_synthesis().await.unwrap();
        assert_eq!(proposal, "- build the thing");
        assert_eq!(
            controller.snapshot().await.latest_proposal.as_deref(),
            Some("- build the thing")
        );
    }

    #[tokio::test]
    async fn spawned_mode_truncates_description_and_becomes_current() {
        let (controller, _) = controller_with(FakeProvider::new());

        controller.set_operator_notes(&"x".repeat(400)).await;
        let mode = controller.auto_spawn_mode().await;

        assert_eq!(mode.description.chars().count(), 220);
        assert_eq!(controller.snapshot().await.current_mode, mode.id);
        assert_eq!(controller.modes().await.len(), 4);
    }

    #[tokio::test]
    async fn spawn_prefers_proposal_then_notes_then_default() {
        let (controller, _) = controller_with(FakeProvider::new());

        // Nothing available: fixed default phrase.
        let mode = controller.auto_spawn_mode().await;
        assert_eq!(mode.description, DEFAULT_MODE_SEED);

        controller.set_operator_notes("from the notes").await;
        let mode = controller.auto_spawn_mode().await;
        assert_eq!(mode.description, "from the notes");

        controller.run_design_synthesis().await.unwrap();
        let mode = controller.auto_spawn_mode().await;
        assert_eq!(mode.description, "- build the thing");
    }

    #[tokio::test]
    async fn spawned_mode_ids_stay_unique() {
        let (controller, _) = controller_with(FakeProvider::new());
        let a = controller.auto_spawn_mode().await;
        let b = controller.auto_spawn_mode().await;
        assert_ne!(a.id, b.id);

        let modes = controller.modes().await;
        let mut ids: Vec<_> = modes.iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), modes.len());
    }

    #[tokio::test]
    async fn connector_draft_requires_notes() {
        let (controller, _) = controller_with(FakeProvider::new());
        assert!(matches!(
            controller.create_connector_draft().await,
            Err(Error::NotesRequired)
        ));
    }

    #[tokio::test]
    async fn connector_draft_is_prepended_and_notes_cleared() {
        let (controller, _) = controller_with(FakeProvider::new());
        let seeded = controller.integrations().await.len();

        controller.set_operator_notes("wire up the CRM").await;
        let draft = controller.create_connector_draft().await.unwrap();

        assert_eq!(draft.status, IntegrationStatus::Draft);
        assert_eq!(draft.description, "wire up the CRM");

        let integrations = controller.integrations().await;
        assert_eq!(integrations.len(), seeded + 1);
        assert_eq!(integrations[0].id, draft.id);

        // Notes were consumed.
        assert!(matches!(
            controller.create_connector_draft().await,
            Err(Error::NotesRequired)
        ));
    }
}
