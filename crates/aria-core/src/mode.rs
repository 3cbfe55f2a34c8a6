//! Persona modes and their display capabilities.

use serde::Serialize;

/// A descriptive, non-executable tag shown under a mode.
#[derive(Debug, Clone, Serialize)]
pub struct Capability {
    /// Stable identifier
    pub id: String,
    /// Short label
    pub label: String,
    /// Detail text
    pub detail: String,
}

impl Capability {
    fn new(id: &str, label: &str, detail: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            detail: detail.to_string(),
        }
    }
}

/// A named persona configuration. Scopes which messages are displayed,
/// which system instructions steer the model, and which voice speaks the
/// replies. Modes are appended at runtime but never removed.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mode {
    /// Unique identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Visual accent (CSS color)
    pub accent: String,
    /// Short description
    pub description: String,
    /// System-instruction text sent with every turn in this mode
    pub system_prompt: String,
    /// Ordered capability descriptors
    pub capabilities: Vec<Capability>,
    /// Preferred voice name substring for playback
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_hint: Option<String>,
}

/// Built-in modes seeded at session start.
#[must_use]
pub fn seed_modes() -> Vec<Mode> {
    vec![
        Mode {
            id: "concierge".to_string(),
            name: "Concierge".to_string(),
            accent: "#38bdf8".to_string(),
            description: "Warm generalist that keeps answers short and actionable.".to_string(),
            system_prompt: "You are Aria, a warm and efficient voice concierge. \
                            Keep replies under three sentences and offer a plan \
                            only when the user asks how to do something."
                .to_string(),
            capabilities: vec![
                Capability::new("quick-answers", "Quick answers", "Concise conversational replies"),
                Capability::new("task-plans", "Task plans", "Step lists for how-to questions"),
            ],
            voice_hint: Some("Samantha".to_string()),
        },
        Mode {
            id: "engineer".to_string(),
            name: "Engineer".to_string(),
            accent: "#34d399".to_string(),
            description: "Technical copilot for architecture and debugging talk.".to_string(),
            system_prompt: "You are Aria in engineer mode: a pragmatic software \
                            architect. Prefer precise terminology, cite trade-offs, \
                            and attach a build plan when proposing designs."
                .to_string(),
            capabilities: vec![
                Capability::new("design-review", "Design review", "Architecture trade-off analysis"),
                Capability::new("debug-help", "Debug help", "Hypothesis-driven troubleshooting"),
                Capability::new("roadmaps", "Roadmaps", "Milestone plans for builds"),
            ],
            voice_hint: Some("Daniel".to_string()),
        },
        Mode {
            id: "muse".to_string(),
            name: "Muse".to_string(),
            accent: "#f472b6".to_string(),
            description: "Exploratory brainstorming partner for open-ended ideas.".to_string(),
            system_prompt: "You are Aria in muse mode: a playful brainstorming \
                            partner. Offer unexpected angles and keep the energy \
                            high; plans are optional sketches, not checklists."
                .to_string(),
            capabilities: vec![
                Capability::new("ideation", "Ideation", "Divergent idea generation"),
                Capability::new("naming", "Naming", "Names and taglines on demand"),
            ],
            voice_hint: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_mode_ids_are_unique() {
        let modes = seed_modes();
        let mut ids: Vec<_> = modes.iter().map(|m| m.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), modes.len());
    }

    #[test]
    fn seed_modes_carry_instructions_and_capabilities() {
        for mode in seed_modes() {
            assert!(!mode.system_prompt.is_empty(), "mode {} lacks prompt", mode.id);
            assert!(!mode.capabilities.is_empty(), "mode {} lacks capabilities", mode.id);
        }
    }
}
