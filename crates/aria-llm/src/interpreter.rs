//! Response interpreter.
//!
//! The upstream model is asked for strict JSON but treated as untrusted
//! input: the extracted text is probed structurally and anything that does
//! not match the expected shape degrades silently to a raw-text reply.

use serde_json::Value;
use tracing::debug;

/// Substituted when the upstream returns no text at all.
pub const EMPTY_REPLY_PLACEHOLDER: &str = "Gemini did not return a message.";

/// Normalized model reply. `reply` is guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelReply {
    /// Conversational answer
    pub reply: String,
    /// Optional plan, present only when the structured reply carried one
    pub plan: Option<String>,
}

/// Interpret raw upstream text as a `{reply, plan}` object, falling back to
/// the verbatim text when the shape does not match.
#[must_use]
pub fn interpret(raw: &str) -> ModelReply {
    if raw.trim().is_empty() {
        return ModelReply {
            reply: EMPTY_REPLY_PLACEHOLDER.to_string(),
            plan: None,
        };
    }

    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(raw) {
        if let Some(reply) = map.get("reply").and_then(Value::as_str) {
            let plan = map
                .get("plan")
                .and_then(Value::as_str)
                .map(ToString::to_string);
            return ModelReply {
                reply: reply.to_string(),
                plan,
            };
        }
        debug!("structured reply missing string `reply` field, using raw text");
    }

    ModelReply {
        reply: raw.to_string(),
        plan: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn structured_reply_with_plan() {
        let out = interpret(r#"{"reply":"Hello","plan":"- step one"}"#);
        assert_eq!(out.reply, "Hello");
        assert_eq!(out.plan.as_deref(), Some("- step one"));
    }

    #[test]
    fn structured_reply_without_plan() {
        let out = interpret(r#"{"reply":"Hello"}"#);
        assert_eq!(out.reply, "Hello");
        assert!(out.plan.is_none());
    }

    #[test]
    fn non_string_plan_is_dropped() {
        let out = interpret(r#"{"reply":"Hello","plan":["a","b"]}"#);
        assert_eq!(out.reply, "Hello");
        assert!(out.plan.is_none());
    }

    #[test]
    fn plain_text_falls_back_verbatim() {
        let out = interpret("Just a plain sentence.");
        assert_eq!(out.reply, "Just a plain sentence.");
        assert!(out.plan.is_none());
    }

    #[test]
    fn json_without_reply_falls_back_verbatim() {
        let raw = r#"{"message":"wrong shape"}"#;
        let out = interpret(raw);
        assert_eq!(out.reply, raw);
        assert!(out.plan.is_none());
    }

    #[test]
    fn json_array_falls_back_verbatim() {
        let raw = r#"["not","an","object"]"#;
        assert_eq!(interpret(raw).reply, raw);
    }

    #[test]
    fn empty_text_yields_placeholder() {
        let out = interpret("");
        assert_eq!(out.reply, EMPTY_REPLY_PLACEHOLDER);
        assert!(out.plan.is_none());

        assert_eq!(interpret("   \n ").reply, EMPTY_REPLY_PLACEHOLDER);
    }

    #[test]
    fn fenced_json_is_not_unwrapped() {
        // The contract is literal: anything that is not a matching JSON
        // object is returned verbatim, markdown fences included.
        let raw = "```json\n{\"reply\":\"hi\"}\n```";
        assert_eq!(interpret(raw).reply, raw);
    }
}
