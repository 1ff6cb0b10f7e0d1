//! Post text: extraction from provider responses, truncation and fallback.

use crate::Topic;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const ELLIPSIS: char = '…';

/// Post text that is non-empty and at most the configured length in chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct GeneratedText(String);

impl GeneratedText {
    /// Trim and bound `raw` to `max_chars`; `None` if nothing remains.
    pub fn new(raw: impl AsRef<str>, max_chars: usize) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() || max_chars == 0 {
            return None;
        }
        Some(Self(truncate_chars(trimmed, max_chars)))
    }

    /// Borrow the text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Length in chars.
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }
}

/// Shorten `text` to at most `max_chars` chars, ending with `…` when cut.
///
/// # Examples
///
/// ```
/// use jester_core::truncate_chars;
///
/// assert_eq!(truncate_chars("hello", 10), "hello");
/// assert_eq!(truncate_chars("hello world", 6), "hello…");
/// ```
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(max_chars - 1).collect();
    let trimmed_len = cut.trim_end().len();
    cut.truncate(trimmed_len);
    cut.push(ELLIPSIS);
    cut
}

/// Deterministic text used when generation fails.
///
/// # Examples
///
/// ```
/// use jester_core::{Topic, fallback_text};
///
/// let topic = Topic::new("#Taxes").unwrap();
/// let first = fallback_text(&topic, 280);
/// assert!(first.as_str().contains("#Taxes"));
/// assert_eq!(first, fallback_text(&topic, 280));
/// ```
pub fn fallback_text(topic: &Topic, max_chars: usize) -> GeneratedText {
    let text = format!("Can't even make a meme for {} 😂", topic.as_str());
    GeneratedText(truncate_chars(&text, max_chars.max(1)))
}

/// Pull post text out of a raw text-generation response.
///
/// Accepts `[{"generated_text": ..}]` and `{"generated_text": ..}`. An echoed
/// prompt at the start of the text is removed, as are surrounding quotes.
/// Returns the reason on failure so callers can log it.
pub fn extract_generated_text(
    raw: &str,
    prompt: &str,
    max_chars: usize,
) -> Result<GeneratedText, String> {
    let parsed: Value =
        serde_json::from_str(raw).map_err(|e| format!("response is not JSON: {}", e))?;

    let field = match &parsed {
        Value::Array(items) => items.first().and_then(|item| item.get("generated_text")),
        Value::Object(_) => parsed.get("generated_text"),
        _ => None,
    }
    .ok_or_else(|| "response has no generated_text field".to_string())?;

    let text = field
        .as_str()
        .ok_or_else(|| "generated_text is not a string".to_string())?;

    let without_prompt = text
        .trim_start()
        .strip_prefix(prompt.trim())
        .unwrap_or(text);
    let cleaned = without_prompt
        .trim()
        .trim_matches(|c| c == '"' || c == '“' || c == '”')
        .trim();

    GeneratedText::new(cleaned, max_chars).ok_or_else(|| "generated_text is empty".to_string())
}
