//! Chat endpoint
//!
//! POST /api/chat - run one conversational turn through the gateway.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use aria_llm::{ChatRequest as GatewayChatRequest, Turn};

use super::{gateway_error_response, missing_credential_response, ApiState, ErrorBody};

/// Incoming chat request.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    /// New utterance (required, non-blank after trimming)
    pub message: String,
    /// Owning mode
    #[serde(default)]
    pub mode_id: Option<String>,
    /// Mode system instructions
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// Prior conversation, oldest first
    #[serde(default)]
    pub conversation: Vec<WireTurn>,
}

/// Wire-form conversation turn.
#[derive(Debug, Serialize, Deserialize)]
pub struct WireTurn {
    pub role: String,
    pub content: String,
}

/// Shaped chat reply.
#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan: Option<String>,
}

/// Run one conversational turn.
async fn chat(State(state): State<ApiState>, Json(request): Json<ChatRequest>) -> Response {
    if request.message.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorBody {
                error: "Message is required.".to_string(),
            }),
        )
            .into_response();
    }

    let Some(provider) = state.provider else {
        return missing_credential_response();
    };

    let gateway_request = GatewayChatRequest {
        message: request.message,
        mode_id: request.mode_id,
        system_prompt: request.system_prompt,
        conversation: request
            .conversation
            .into_iter()
            .map(|t| Turn::new(t.role, t.content))
            .collect(),
    };

    match provider.chat(gateway_request).await {
        Ok(outcome) => Json(ChatResponse {
            reply: outcome.reply,
            plan: outcome.plan,
        })
        .into_response(),
        Err(err) => gateway_error_response(err),
    }
}

/// Create chat routes.
pub fn chat_routes(state: ApiState) -> Router {
    Router::new()
        .route("/api/chat", post(chat))
        .with_state(state)
}
