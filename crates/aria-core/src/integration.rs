//! External connector descriptors.
//!
//! Integrations describe automation endpoints shown in the console; they are
//! never invoked by this system.

use serde::Serialize;

/// Lifecycle status of a connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IntegrationStatus {
    /// Sketched at runtime, endpoint pending
    Draft,
    /// Configured and reachable
    Ready,
    /// Configured but failing
    Error,
}

impl IntegrationStatus {
    /// Wire-form label (`draft` / `ready` / `error`).
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            IntegrationStatus::Draft => "draft",
            IntegrationStatus::Ready => "ready",
            IntegrationStatus::Error => "error",
        }
    }
}

/// A connector/automation endpoint descriptor.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Integration {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Endpoint URL (empty for drafts until promoted)
    pub endpoint: String,
    /// Description
    pub description: String,
    /// Lifecycle status
    pub status: IntegrationStatus,
    /// Optional operator notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Built-in connectors seeded at session start.
#[must_use]
pub fn seed_integrations() -> Vec<Integration> {
    vec![
        Integration {
            id: "calendar-sync".to_string(),
            name: "Calendar sync".to_string(),
            endpoint: "https://hooks.aria.dev/calendar".to_string(),
            description: "Pushes confirmed plans onto the shared calendar.".to_string(),
            status: IntegrationStatus::Ready,
            notes: None,
        },
        Integration {
            id: "ticket-bridge".to_string(),
            name: "Ticket bridge".to_string(),
            endpoint: "https://hooks.aria.dev/tickets".to_string(),
            description: "Files engineering follow-ups from design proposals.".to_string(),
            status: IntegrationStatus::Error,
            notes: Some("Webhook secret rotated upstream; needs re-auth.".to_string()),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_ids_are_unique() {
        let seeds = seed_integrations();
        let mut ids: Vec<_> = seeds.iter().map(|i| i.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), seeds.len());
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(IntegrationStatus::Draft).unwrap();
        assert_eq!(json, "draft");
    }
}
