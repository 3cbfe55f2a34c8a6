//! Prompt assembly for the two gateway variants.
//!
//! Both variants flatten the structured request into one natural-language
//! prompt: the conversation is rendered as `role: content` lines in original
//! order, then embedded alongside the mode instructions and the new input.
//! Generation parameters are fixed per variant and not user-configurable.

use serde::{Deserialize, Serialize};

/// A role/content pair in wire form. Used only for transmission to the
/// gateway; never persisted beyond the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Speaker role (`user`, `assistant`, `system`)
    pub role: String,
    /// Utterance text
    pub content: String,
}

impl Turn {
    /// Convenience constructor.
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Fixed sampling parameters for one prompt variant.
#[derive(Debug, Clone, Copy)]
pub struct GenerationParams {
    /// Sampling temperature
    pub temperature: f32,
    /// Nucleus sampling bound
    pub top_p: f32,
    /// Top-k sampling bound
    pub top_k: u32,
    /// Output token cap
    pub max_output_tokens: u32,
}

/// Parameters for conversational turns.
pub const CHAT_GENERATION: GenerationParams = GenerationParams {
    temperature: 0.7,
    top_p: 0.95,
    top_k: 40,
    max_output_tokens: 1024,
};

/// Parameters for design-synthesis calls.
pub const DESIGN_GENERATION: GenerationParams = GenerationParams {
    temperature: 0.6,
    top_p: 0.9,
    top_k: 32,
    max_output_tokens: 768,
};

/// Maximum roadmap length requested from the design variant.
const DESIGN_MAX_LINES: usize = 12;

/// Render conversation turns as `role: content` lines, preserving order and
/// role labels verbatim.
#[must_use]
pub fn render_transcript(turns: &[Turn]) -> String {
    turns
        .iter()
        .map(|t| format!("{}: {}", t.role, t.content))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Assemble the chat prompt.
///
/// Instructs the model to answer with strict JSON of shape
/// `{"reply": string, "plan": string?}` so the interpreter can recover the
/// structured fields, with the raw-text fallback covering everything else.
#[must_use]
pub fn chat_prompt(system_prompt: &str, conversation: &[Turn], message: &str) -> String {
    let mut prompt = String::new();

    if !system_prompt.trim().is_empty() {
        prompt.push_str(system_prompt.trim());
        prompt.push_str("\n\n");
    }

    if !conversation.is_empty() {
        prompt.push_str("Conversation so far:\n");
        prompt.push_str(&render_transcript(conversation));
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!("The user now says: {message}\n\n"));
    prompt.push_str(
        "Answer with strict JSON only, no markdown fences, shaped exactly as \
         {\"reply\": string} or {\"reply\": string, \"plan\": string}. \
         Put the conversational answer in \"reply\" and, only when a concrete \
         next-steps list is warranted, a short markdown checklist in \"plan\".",
    );

    prompt
}

/// Assemble the design-synthesis prompt.
///
/// Asks for a bounded-length markdown roadmap rather than JSON.
#[must_use]
pub fn design_prompt(notes: &str, transcript: &[Turn]) -> String {
    let mut prompt = String::from(
        "You are a product design partner. Synthesize the material below into \
         a concise markdown roadmap proposal.\n\n",
    );

    if !notes.trim().is_empty() {
        prompt.push_str("Operator notes:\n");
        prompt.push_str(notes.trim());
        prompt.push_str("\n\n");
    }

    if !transcript.is_empty() {
        prompt.push_str("Session transcript:\n");
        prompt.push_str(&render_transcript(transcript));
        prompt.push_str("\n\n");
    }

    prompt.push_str(&format!(
        "Reply with at most {DESIGN_MAX_LINES} lines of markdown: a one-line \
         vision statement followed by a dashed list of build steps."
    ));

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transcript_preserves_order_and_labels() {
        let turns = vec![
            Turn::new("user", "first"),
            Turn::new("assistant", "second"),
            Turn::new("user", "third"),
        ];
        assert_eq!(
            render_transcript(&turns),
            "user: first\nassistant: second\nuser: third"
        );
    }

    #[test]
    fn transcript_keeps_custom_role_labels_unaltered() {
        let turns = vec![Turn::new("Narrator", "scene one")];
        assert_eq!(render_transcript(&turns), "Narrator: scene one");
    }

    #[test]
    fn transcript_of_nothing_is_empty() {
        assert_eq!(render_transcript(&[]), "");
    }

    #[test]
    fn chat_prompt_embeds_all_sections() {
        let turns = vec![Turn::new("user", "earlier question")];
        let prompt = chat_prompt("You are a concierge.", &turns, "new question");
        assert!(prompt.starts_with("You are a concierge."));
        assert!(prompt.contains("user: earlier question"));
        assert!(prompt.contains("The user now says: new question"));
        assert!(prompt.contains("\"reply\""));
    }

    #[test]
    fn chat_prompt_skips_empty_sections() {
        let prompt = chat_prompt("  ", &[], "hello");
        assert!(!prompt.contains("Conversation so far"));
        assert!(prompt.starts_with("The user now says: hello"));
    }

    #[test]
    fn design_prompt_bounds_roadmap_length() {
        let prompt = design_prompt("ship a voice console", &[]);
        assert!(prompt.contains("Operator notes:\nship a voice console"));
        assert!(prompt.contains("at most 12 lines"));
    }

    #[test]
    fn design_prompt_includes_transcript() {
        let turns = vec![Turn::new("assistant", "noted")];
        let prompt = design_prompt("", &turns);
        assert!(!prompt.contains("Operator notes"));
        assert!(prompt.contains("assistant: noted"));
    }
}
