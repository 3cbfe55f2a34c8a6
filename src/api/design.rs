//! Design-synthesis endpoint
//!
//! POST /api/design - one-shot summarization producing a roadmap proposal.

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};

use aria_llm::{DesignRequest as GatewayDesignRequest, Turn};

use super::chat::WireTurn;
use super::{gateway_error_response, missing_credential_response, ApiState};

/// Incoming design request. Every field is optional; an empty request asks
/// for a roadmap from nothing, which the model is free to invent.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRequest {
    #[serde(default)]
    pub mode_id: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub transcript: Vec<WireTurn>,
}

/// Design reply.
#[derive(Debug, Serialize)]
pub struct DesignResponse {
    pub proposal: String,
}

/// Run one design synthesis.
async fn design(State(state): State<ApiState>, Json(request): Json<DesignRequest>) -> Response {
    let Some(provider) = state.provider else {
        return missing_credential_response();
    };

    let gateway_request = GatewayDesignRequest {
        mode_id: request.mode_id,
        notes: request.notes,
        transcript: request
            .transcript
            .into_iter()
            .map(|t| Turn::new(t.role, t.content))
            .collect(),
    };

    match provider.design(gateway_request).await {
        Ok(outcome) => Json(DesignResponse {
            proposal: outcome.proposal,
        })
        .into_response(),
        Err(err) => gateway_error_response(err),
    }
}

/// Create design routes.
pub fn design_routes(state: ApiState) -> Router {
    Router::new()
        .route("/api/design", post(design))
        .with_state(state)
}
