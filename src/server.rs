//! Server module for Aria
//!
//! Builds the gateway provider from the environment, assembles the router,
//! and serves it with graceful shutdown. A missing credential is logged and
//! tolerated: the server still runs and every gateway call answers with a
//! configuration error until a key is provided.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use aria_llm::{ConsoleProvider, GeminiClient};

use crate::api;

/// Server configuration, environment-driven.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// Read `ARIA_HOST` / `ARIA_PORT`, defaulting to `127.0.0.1:8787`.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("ARIA_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match std::env::var("ARIA_PORT") {
            Ok(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("invalid ARIA_PORT value: {raw}"))?,
            Err(_) => 8787,
        };
        Ok(Self { host, port })
    }
}

/// Build the gateway provider from the environment.
///
/// Returns `None` when no credential is configured; the endpoints then
/// answer 500 without attempting any upstream call.
pub fn provider_from_env() -> Option<Arc<dyn ConsoleProvider>> {
    match GeminiClient::from_env() {
        Ok(client) => {
            info!(model = client.model(), "Gemini gateway configured");
            Some(Arc::new(client))
        }
        Err(err) => {
            warn!("Gemini gateway not configured: {err}");
            None
        }
    }
}

/// Assemble the application router.
pub fn build_router(state: api::ApiState) -> Router {
    api::api_router(state)
        // The console front-end is served from a different origin.
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server until ctrl-c.
pub async fn run(config: ServerConfig) -> Result<()> {
    let state = api::ApiState::new(provider_from_env());
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .with_context(|| format!("invalid listen address {}:{}", config.host, config.port))?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Aria console gateway listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to install ctrl-c handler: {err}");
        return;
    }
    info!("shutdown signal received");
}
