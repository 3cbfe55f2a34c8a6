//! Shared helpers for the gateway.

/// Mask an API key for safe display in logs.
///
/// Shows the first and last 4 characters for keys longer than 8 characters,
/// otherwise "****" so short keys are never exposed. Counts characters, not
/// bytes, so a credential with multi-byte characters cannot panic here.
#[must_use]
pub(crate) fn mask_api_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{head}...{tail}")
}
