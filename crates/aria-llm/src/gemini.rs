//! Gemini - Google Gemini API client
//!
//! Thin single-shot client for the `generateContent` endpoint. Every call is
//! one POST with the assembled prompt as the sole text part; any non-success
//! status is terminal for that request (no retry, no backoff).

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::interpreter::interpret;
use crate::prompt::{self, GenerationParams, CHAT_GENERATION, DESIGN_GENERATION};
use crate::provider::{ChatOutcome, ChatRequest, ConsoleProvider, DesignOutcome, DesignRequest};
use crate::util::mask_api_key;

/// Default API base URL
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
    max_output_tokens: u32,
}

impl From<&GenerationParams> for GenerationConfig {
    fn from(params: &GenerationParams) -> Self {
        Self {
            temperature: params.temperature,
            top_p: params.top_p,
            top_k: params.top_k,
            max_output_tokens: params.max_output_tokens,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

/// Concatenate the first candidate's text parts in order.
///
/// Absent candidates or parts yield an empty string rather than an error;
/// the interpreter substitutes its placeholder downstream.
fn extract_text(response: &GeminiResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect::<Vec<_>>()
                .concat()
        })
        .unwrap_or_default()
}

// ============================================================================
// Client
// ============================================================================

/// Gemini client configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key (required)
    pub api_key: String,
    /// Base URL
    pub base_url: String,
    /// Model identifier
    pub model: String,
    /// Request timeout
    pub timeout: Duration,
}

// Custom Debug implementation to mask the credential
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &mask_api_key(&self.api_key))
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a new configuration with an API key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads `GEMINI_API_KEY` (or `GOOGLE_API_KEY`) plus the optional
    /// `GEMINI_MODEL` and `GEMINI_BASE_URL` overrides. A missing credential
    /// is a configuration error; no client is built and nothing is sent.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("GOOGLE_API_KEY"))
            .map_err(|_| {
                Error::NotConfigured("GEMINI_API_KEY is not configured.".to_string())
            })?;

        let mut config = Self::new(api_key);
        if let Ok(base_url) = std::env::var("GEMINI_BASE_URL") {
            config.base_url = base_url;
        }
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config.model = model;
        }
        Ok(config)
    }

    /// Set the base URL.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Google Gemini client
pub struct GeminiClient {
    client: Client,
    config: GeminiConfig,
}

impl GeminiClient {
    /// Create a new client.
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env()?)
    }

    /// The configured model identifier.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Send one prompt and return the extracted candidate text.
    async fn generate(&self, prompt: String, params: &GenerationParams) -> Result<String> {
        // The key travels in the query string; never log the full URL.
        debug!(model = %self.config.model, "sending generateContent request");

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts: vec![GeminiPart { text: Some(prompt) }],
            }],
            generation_config: params.into(),
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url, self.config.model, self.config.api_key
        );

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            tracing::warn!(status = %status, "Gemini API error response");
            return Err(Error::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| Error::InvalidResponse(e.to_string()))?;

        Ok(extract_text(&parsed))
    }
}

#[async_trait]
impl ConsoleProvider for GeminiClient {
    async fn chat(&self, request: ChatRequest) -> Result<ChatOutcome> {
        let prompt = prompt::chat_prompt(
            request.system_prompt.as_deref().unwrap_or_default(),
            &request.conversation,
            &request.message,
        );

        let raw = self.generate(prompt, &CHAT_GENERATION).await?;
        let reply = interpret(&raw);

        Ok(ChatOutcome {
            reply: reply.reply,
            plan: reply.plan,
        })
    }

    async fn design(&self, request: DesignRequest) -> Result<DesignOutcome> {
        let prompt = prompt::design_prompt(
            request.notes.as_deref().unwrap_or_default(),
            &request.transcript,
        );

        let raw = self.generate(prompt, &DESIGN_GENERATION).await?;

        Ok(DesignOutcome {
            proposal: raw.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_concatenates_first_candidate_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"role":"model","parts":[
                {"text":"Hello, "},{"text":"world"}
            ]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response), "Hello, world");
    }

    #[test]
    fn extract_ignores_later_candidates() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[
                {"content":{"parts":[{"text":"first"}]}},
                {"content":{"parts":[{"text":"second"}]}}
            ]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response), "first");
    }

    #[test]
    fn extract_of_empty_candidates_is_empty_string() {
        let response: GeminiResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(extract_text(&response), "");

        let response: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(extract_text(&response), "");
    }

    #[test]
    fn extract_skips_textless_parts() {
        let response: GeminiResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{},{"text":"only"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(&response), "only");
    }

    #[test]
    fn generation_config_serializes_camel_case() {
        let config: GenerationConfig = (&CHAT_GENERATION).into();
        let json = serde_json::to_value(&config).unwrap();
        assert_eq!(json["topP"], serde_json::json!(0.95f32));
        assert_eq!(json["topK"], 40);
        assert_eq!(json["maxOutputTokens"], 1024);
    }

    #[test]
    fn config_builders_override_defaults() {
        let config = GeminiConfig::new("test-key-12345")
            .with_model("gemini-2.5-pro")
            .with_base_url("http://localhost:9999/v1beta")
            .with_timeout(Duration::from_secs(5));
        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.base_url, "http://localhost:9999/v1beta");
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn debug_output_masks_credential() {
        let config = GeminiConfig::new("AIzaSySecretSecret1234");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("SecretSecret"));
        assert!(rendered.contains("AIza...1234"));
    }
}
