//! Provider abstraction for the console gateway.
//!
//! The session layer and the HTTP endpoints both program against
//! [`ConsoleProvider`] so the Gemini client can be swapped for a fake in
//! tests without touching either caller.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::prompt::Turn;

/// A conversational turn request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// The new user utterance (required, non-blank)
    pub message: String,
    /// Mode the utterance belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_id: Option<String>,
    /// System instructions steering the model for this mode
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    /// Prior conversation, oldest first
    #[serde(default)]
    pub conversation: Vec<Turn>,
}

/// Normalized result of a conversational turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatOutcome {
    /// Assistant reply (never empty)
    pub reply: String,
    /// Optional follow-up plan extracted from the structured reply
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

/// A design-synthesis request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    /// Mode the synthesis is scoped to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode_id: Option<String>,
    /// Operator notes to fold into the roadmap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Conversation transcript, oldest first
    #[serde(default)]
    pub transcript: Vec<Turn>,
}

/// Result of a design-synthesis call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DesignOutcome {
    /// Markdown roadmap proposal
    pub proposal: String,
}

/// Gateway seam between the console and the hosted model.
#[async_trait]
pub trait ConsoleProvider: Send + Sync {
    /// Run one conversational turn and shape the reply.
    async fn chat(&self, request: ChatRequest) -> Result<ChatOutcome>;

    /// Run a one-shot design-synthesis summarization.
    async fn design(&self, request: DesignRequest) -> Result<DesignOutcome>;
}
