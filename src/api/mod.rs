//! Web API module for Aria
//!
//! Provides the gateway endpoints:
//! - `POST /api/chat` - one conversational turn
//! - `POST /api/design` - one-shot design synthesis
//! - `GET /health` - liveness + credential state

pub mod chat;
pub mod design;
pub mod health;

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use serde::Serialize;

use aria_llm::ConsoleProvider;

pub use chat::chat_routes;
pub use design::design_routes;
pub use health::health_routes;

/// Shared gateway state.
#[derive(Clone)]
pub struct ApiState {
    /// Configured provider, or `None` when the credential is missing.
    pub provider: Option<Arc<dyn ConsoleProvider>>,
}

impl ApiState {
    /// Create the shared state.
    #[must_use]
    pub fn new(provider: Option<Arc<dyn ConsoleProvider>>) -> Self {
        Self { provider }
    }
}

/// Error body without detail (validation/configuration failures).
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Error body with upstream detail attached.
#[derive(Debug, Serialize)]
pub struct UpstreamErrorBody {
    pub error: String,
    pub detail: String,
}

/// Map a gateway error onto the wire contract.
///
/// Upstream failures pass the upstream status code through; transport
/// failures surface as 502.
pub fn gateway_error_response(err: aria_llm::Error) -> Response {
    match err {
        aria_llm::Error::Upstream { status, body } => {
            let status =
                StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            (
                status,
                Json(UpstreamErrorBody {
                    error: "Gemini request failed.".to_string(),
                    detail: body,
                }),
            )
                .into_response()
        }
        aria_llm::Error::NotConfigured(message) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody { error: message }),
        )
            .into_response(),
        other => (
            StatusCode::BAD_GATEWAY,
            Json(UpstreamErrorBody {
                error: "Gemini request failed.".to_string(),
                detail: other.to_string(),
            }),
        )
            .into_response(),
    }
}

/// Response when no credential was configured at startup.
pub fn missing_credential_response() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody {
            error: "GEMINI_API_KEY is not configured.".to_string(),
        }),
    )
        .into_response()
}

/// Create the API router with all endpoints.
pub fn api_router(state: ApiState) -> Router {
    Router::new()
        .merge(health_routes(state.clone()))
        .merge(chat_routes(state.clone()))
        .merge(design_routes(state))
}
