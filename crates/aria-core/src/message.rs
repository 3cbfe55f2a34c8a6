//! Message log entries.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Speaker role of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Typed or transcribed user input
    User,
    /// Model reply
    Assistant,
    /// Plans, error notices, and other console-generated entries
    System,
}

impl Role {
    /// Wire-form label (`user` / `assistant` / `system`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
        }
    }
}

/// One entry in the session log. Immutable once created; lives for the
/// session (messages are never destroyed, only filtered for display).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Globally unique identifier
    pub id: Uuid,
    /// Speaker role
    pub role: Role,
    /// Text content
    pub text: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Owning mode (must reference an existing mode at creation time)
    pub mode_id: String,
}

impl Message {
    /// Create a message stamped with the current time.
    #[must_use]
    pub fn new(role: Role, text: impl Into<String>, mode_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            created_at: Utc::now(),
            mode_id: mode_id.into(),
        }
    }
}
