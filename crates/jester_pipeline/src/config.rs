//! Pipeline tunables.

use crate::prompts::TOPIC_PLACEHOLDER;
use derive_getters::Getters;
use derive_setters::Setters;
use jester_core::{HostedImageUrl, Topic};
use jester_error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to put in the post when the image sub-pipeline fails.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFallbackPolicy {
    /// Post without an image
    #[default]
    Omit,
    /// Post with this fixed image URL instead
    Placeholder(String),
}

/// Settings for one pipeline, fixed for the life of the process.
#[derive(Debug, Clone, Serialize, Deserialize, Getters, Setters)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct PipelineConfig {
    /// Topic used when the trend source fails or returns nothing.
    default_topic: String,

    /// Character cap of the publishing medium.
    max_text_length: usize,

    /// Generated images smaller than this are treated as failures.
    min_image_bytes: usize,

    /// Time budget for each of the first four stages.
    stage_timeout_secs: u64,

    /// Time budget for each publish attempt.
    publish_timeout_secs: u64,

    /// Extra publish attempts for transient failures.
    publish_retries: u32,

    /// Hashtags appended after the topic hashtag.
    extra_hashtags: Vec<String>,

    /// Behaviour when image generation or upload fails.
    image_fallback: ImageFallbackPolicy,

    /// Prompt for the joke; `{topic}` is replaced.
    text_prompt_template: String,

    /// Prompt for the picture; `{topic}` is replaced.
    image_prompt_template: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_topic: "#Trending".to_string(),
            max_text_length: 280,
            min_image_bytes: 1024,
            stage_timeout_secs: 20,
            publish_timeout_secs: 30,
            publish_retries: 0,
            extra_hashtags: Vec::new(),
            image_fallback: ImageFallbackPolicy::Omit,
            text_prompt_template:
                "Write a super funny, sarcastic viral tweet using US Gen Z slang about {topic}"
                    .to_string(),
            image_prompt_template:
                "A cartoon meme in the style of Simpsons or South Park, about {topic}".to_string(),
        }
    }
}

impl PipelineConfig {
    /// Check the settings and return the parsed default topic.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The default topic is blank
    /// - A length, size or timeout is zero
    /// - A prompt template lacks `{topic}`
    /// - The placeholder image URL is not an http(s) URL
    pub fn validate(&self) -> Result<Topic, ConfigError> {
        let topic = Topic::new(&self.default_topic)
            .ok_or_else(|| ConfigError::new("pipeline.default_topic must not be blank"))?;

        if self.max_text_length == 0 {
            return Err(ConfigError::new("pipeline.max_text_length must be positive"));
        }
        if self.min_image_bytes == 0 {
            return Err(ConfigError::new("pipeline.min_image_bytes must be positive"));
        }
        if self.stage_timeout_secs == 0 || self.publish_timeout_secs == 0 {
            return Err(ConfigError::new("pipeline timeouts must be positive"));
        }
        for (name, template) in [
            ("text_prompt_template", &self.text_prompt_template),
            ("image_prompt_template", &self.image_prompt_template),
        ] {
            if !template.contains(TOPIC_PLACEHOLDER) {
                return Err(ConfigError::new(format!(
                    "pipeline.{} must contain {}",
                    name, TOPIC_PLACEHOLDER
                )));
            }
        }
        if let ImageFallbackPolicy::Placeholder(url) = &self.image_fallback
            && HostedImageUrl::parse(url).is_none()
        {
            return Err(ConfigError::new(format!(
                "pipeline.image_fallback placeholder is not an http(s) URL: {}",
                url
            )));
        }

        Ok(topic)
    }

    /// Stage time budget as a duration.
    pub fn stage_timeout(&self) -> Duration {
        Duration::from_secs(self.stage_timeout_secs)
    }

    /// Publish time budget as a duration.
    pub fn publish_timeout(&self) -> Duration {
        Duration::from_secs(self.publish_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let topic = PipelineConfig::default().validate().unwrap();
        assert_eq!(topic.as_str(), "#Trending");
    }

    #[test]
    fn test_blank_default_topic_rejected() {
        let config = PipelineConfig::default().with_default_topic("  ".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_template_without_placeholder_rejected() {
        let config = PipelineConfig::default().with_text_prompt_template("tell a joke".to_string());
        let err = config.validate().unwrap_err();
        assert!(err.message.contains("text_prompt_template"));
    }

    #[test]
    fn test_bad_placeholder_url_rejected() {
        let config = PipelineConfig::default()
            .with_image_fallback(ImageFallbackPolicy::Placeholder("not a url".to_string()));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_image_fallback_deserializes_both_forms() {
        let omit: ImageFallbackPolicy = serde_json::from_str("\"omit\"").unwrap();
        assert_eq!(omit, ImageFallbackPolicy::Omit);

        let placeholder: ImageFallbackPolicy =
            serde_json::from_str(r#"{"placeholder": "https://host/p.png"}"#).unwrap();
        assert_eq!(
            placeholder,
            ImageFallbackPolicy::Placeholder("https://host/p.png".to_string())
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"min_image_bytes": 4096}"#).unwrap();
        assert_eq!(*config.min_image_bytes(), 4096);
        assert_eq!(*config.max_text_length(), 280);
    }
}
