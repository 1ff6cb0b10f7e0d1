//! Trending hashtags scraped from trends24.

use crate::http::{HttpClient, ensure_success};
use async_trait::async_trait;
use jester_core::Topic;
use jester_error::{ProviderError, ProviderErrorKind, ProviderResult};
use jester_interface::TrendSource;
use percent_encoding::percent_decode_str;
use regex::Regex;
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Default trends page.
pub const DEFAULT_TRENDS_URL: &str = "https://trends24.in/united-states/";

/// Trend source reading the hashtag links on a trends24 page.
#[derive(Debug, Clone)]
pub struct Trends24Source {
    http: HttpClient,
    url: String,
    hashtag_link: Regex,
}

impl Trends24Source {
    /// Create a source for `url`.
    ///
    /// # Errors
    ///
    /// Returns error if the link pattern fails to compile.
    pub fn new(http: HttpClient, url: impl Into<String>) -> ProviderResult<Self> {
        Ok(Self {
            http,
            url: url.into(),
            hashtag_link: hashtag_link_pattern()?,
        })
    }
}

fn hashtag_link_pattern() -> ProviderResult<Regex> {
    Regex::new(r#"/hashtag/([^"'<>\s?#&]+)"#).map_err(|e| {
        ProviderError::new(ProviderErrorKind::InvalidConfiguration(format!(
            "Invalid hashtag pattern: {}",
            e
        )))
    })
}

/// Extract the hashtags linked from a trends page, best first.
///
/// `+` is read as a space, percent escapes are decoded, and each name gets a
/// `#` prefix. Duplicates keep their first position.
pub fn parse_trending_hashtags(html: &str, pattern: &Regex) -> Vec<Topic> {
    let mut seen = HashSet::new();
    pattern
        .captures_iter(html)
        .filter_map(|caps| caps.get(1))
        .map(|m| {
            let spaced = m.as_str().replace('+', " ");
            let decoded = percent_decode_str(&spaced).decode_utf8_lossy();
            let name = decoded.trim().trim_start_matches('#').to_string();
            format!("#{}", name)
        })
        .filter_map(Topic::new)
        .filter(|topic| topic.as_str().len() > 1)
        .filter(|topic| seen.insert(topic.as_str().to_string()))
        .collect()
}

#[async_trait]
impl TrendSource for Trends24Source {
    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_topics(&self) -> ProviderResult<Vec<Topic>> {
        let response = self
            .http
            .client()
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.http.send_error(e))?;
        let html = ensure_success(response)
            .await?
            .text()
            .await
            .map_err(|e| self.http.send_error(e))?;

        let topics = parse_trending_hashtags(&html, &self.hashtag_link);
        debug!(count = topics.len(), "Parsed trending hashtags");
        Ok(topics)
    }

    fn source_name(&self) -> &str {
        "trends24"
    }
}
