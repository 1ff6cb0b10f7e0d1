//! The subject of a post.

use serde::{Deserialize, Serialize};

/// A non-empty, trimmed topic string such as `#Taxes` or `Super Bowl`.
///
/// # Examples
///
/// ```
/// use jester_core::Topic;
///
/// let topic = Topic::new("  Super Bowl ").unwrap();
/// assert_eq!(topic.as_str(), "Super Bowl");
/// assert_eq!(topic.hashtag().as_deref(), Some("#SuperBowl"));
/// assert!(Topic::new("   ").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
#[serde(try_from = "String", into = "String")]
pub struct Topic(String);

impl Topic {
    /// Create a topic, returning `None` for blank input.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Borrow the topic text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Hashtag form of the topic: `#` followed by its letters, digits and
    /// underscores. `None` when nothing taggable remains.
    pub fn hashtag(&self) -> Option<String> {
        let body: String = self
            .0
            .chars()
            .filter(|c| c.is_alphanumeric() || *c == '_')
            .collect();
        if body.is_empty() {
            None
        } else {
            Some(format!("#{}", body))
        }
    }
}

impl TryFrom<String> for Topic {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Topic::new(&value).ok_or_else(|| "topic must not be blank".to_string())
    }
}

impl From<Topic> for String {
    fn from(topic: Topic) -> Self {
        topic.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hashtag_keeps_existing_prefix_once() {
        let topic = Topic::new("#Taxes").unwrap();
        assert_eq!(topic.hashtag().as_deref(), Some("#Taxes"));
    }

    #[test]
    fn test_hashtag_strips_punctuation() {
        let topic = Topic::new("Valentine's Day").unwrap();
        assert_eq!(topic.hashtag().as_deref(), Some("#ValentinesDay"));
    }

    #[test]
    fn test_hashtag_absent_for_symbols_only() {
        let topic = Topic::new("!!!").unwrap();
        assert!(topic.hashtag().is_none());
    }

    #[test]
    fn test_blank_topic_rejected_by_serde() {
        let parsed: Result<Topic, _> = serde_json::from_str("\"  \"");
        assert!(parsed.is_err());
    }
}
