//! The message handed to the publisher.

use crate::{GeneratedText, HostedImageUrl, Topic, truncate_chars};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Final post: text, optional image link, hashtags.
///
/// Built once, after the text and the image sub-pipeline have both resolved.
///
/// # Examples
///
/// ```
/// use jester_core::{GeneratedText, HostedImageUrl, PublishPayload, Topic};
///
/// let topic = Topic::new("#Weather").unwrap();
/// let text = GeneratedText::new("It's raining cats", 280).unwrap();
/// let url = HostedImageUrl::parse("https://host/x.png").unwrap();
///
/// let payload = PublishPayload::compose(&text, Some(&url), &topic, &[], 280);
/// assert_eq!(payload.render(), "It's raining cats\n\nhttps://host/x.png\n\n#Weather");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct PublishPayload {
    /// Post body, possibly shortened to fit.
    text: String,
    /// Hosted image link, present only when the image sub-pipeline succeeded.
    image_url: Option<HostedImageUrl>,
    /// Topic hashtag followed by configured extras.
    hashtags: Vec<String>,
}

impl PublishPayload {
    /// Compose a payload that fits in `max_chars` by shortening only the text.
    ///
    /// When the image link and hashtags alone leave no room for text, hashtags
    /// are dropped from the end (configured extras first, the topic tag last)
    /// until at least one character of text fits. Only an image link longer
    /// than the cap can still push the post over it.
    pub fn compose(
        text: &GeneratedText,
        image_url: Option<&HostedImageUrl>,
        topic: &Topic,
        extra_hashtags: &[String],
        max_chars: usize,
    ) -> Self {
        let hashtags = collect_hashtags(topic, extra_hashtags);
        let mut payload = Self {
            text: String::new(),
            image_url: image_url.cloned(),
            hashtags,
        };

        while payload.text_budget(max_chars).is_none() && payload.hashtags.pop().is_some() {}
        let budget = payload.text_budget(max_chars).unwrap_or(1);
        payload.text = truncate_chars(text.as_str(), budget);
        payload
    }

    /// Characters left for text beside the link and hashtags, if any.
    fn text_budget(&self, max_chars: usize) -> Option<usize> {
        let fixed = self.render().chars().count() - self.text.chars().count();
        max_chars.checked_sub(fixed).filter(|budget| *budget > 0)
    }

    /// Render the post body as the publisher receives it.
    pub fn render(&self) -> String {
        let mut out = self.text.clone();
        if let Some(url) = &self.image_url {
            out.push_str("\n\n");
            out.push_str(url.as_str());
        }
        if !self.hashtags.is_empty() {
            out.push_str("\n\n");
            out.push_str(&self.hashtags.join(" "));
        }
        out
    }
}

impl std::fmt::Display for PublishPayload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.render())
    }
}

fn collect_hashtags(topic: &Topic, extra: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    topic
        .hashtag()
        .into_iter()
        .chain(extra.iter().filter_map(|tag| normalize_tag(tag)))
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect()
}

fn normalize_tag(raw: &str) -> Option<String> {
    Topic::new(raw).and_then(|topic| topic.hashtag())
}
