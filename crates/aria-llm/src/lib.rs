//! Aria LLM - Upstream model gateway
//!
//! This crate owns everything that touches the hosted generative API:
//! - Gemini client (single-shot `generateContent` calls via reqwest)
//! - Prompt assembly for the chat and design-synthesis variants
//! - Response interpretation (`{reply, plan}` shape with raw-text fallback)
//! - The `ConsoleProvider` trait that the session layer programs against

#![forbid(unsafe_code)]

pub mod error;
pub mod gemini;
pub mod interpreter;
pub mod prompt;
pub mod provider;

mod util;

pub use error::{Error, Result};
pub use gemini::{GeminiClient, GeminiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use interpreter::{interpret, ModelReply, EMPTY_REPLY_PLACEHOLDER};
pub use prompt::{render_transcript, GenerationParams, Turn, CHAT_GENERATION, DESIGN_GENERATION};
pub use provider::{
    ChatOutcome, ChatRequest, ConsoleProvider, DesignOutcome, DesignRequest,
};
