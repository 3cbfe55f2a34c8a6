//! Health check endpoint.

use axum::extract::State;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;

use super::ApiState;

/// Health response with gateway credential state.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub gateway: &'static str,
}

/// Simple health check (for load balancers and the console splash screen).
async fn health_check(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        gateway: if state.provider.is_some() {
            "configured"
        } else {
            "missing-credential"
        },
    })
}

/// Create health routes.
pub fn health_routes(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .with_state(state)
}
