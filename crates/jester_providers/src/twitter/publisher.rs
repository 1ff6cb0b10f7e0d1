//! Tweet creation over the v2 API.

use crate::http::{HttpClient, clip};
use async_trait::async_trait;
use jester_core::{PublishConfirmation, PublishPayload};
use jester_error::{PublishError, PublishErrorKind, PublishResult};
use jester_interface::{Publisher, RequestSigner, SignableRequest};
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{debug, error, instrument};

/// Tweet creation endpoint.
pub const DEFAULT_TWEETS_URL: &str = "https://api.twitter.com/2/tweets";

/// Turn a tweet creation response into a confirmation.
///
/// # Errors
///
/// Returns error if:
/// - The status is 401 or 403 (`Authentication`)
/// - The status is any other non-2xx (`Rejected`)
/// - The body is not JSON (`UnparseableResponse`)
/// - `data.id` is absent or empty (`MissingConfirmation`)
pub fn parse_tweet_response(status: u16, body: &str) -> PublishResult<PublishConfirmation> {
    match status {
        401 | 403 => {
            return Err(PublishError::new(PublishErrorKind::Authentication(format!(
                "HTTP {}: {}",
                status,
                clip(body)
            ))));
        }
        200..=299 => {}
        _ => {
            return Err(PublishError::new(PublishErrorKind::Rejected {
                status,
                message: clip(body),
            }));
        }
    }

    let value: Value = serde_json::from_str(body).map_err(|e| {
        PublishError::new(PublishErrorKind::UnparseableResponse(format!(
            "{} ({})",
            e,
            clip(body)
        )))
    })?;

    match value.pointer("/data/id").and_then(Value::as_str) {
        Some(id) if !id.trim().is_empty() => Ok(PublishConfirmation::new(id)),
        _ => {
            let detail = value
                .get("errors")
                .map(|errors| errors.to_string())
                .unwrap_or_else(|| "data.id absent".to_string());
            Err(PublishError::new(PublishErrorKind::MissingConfirmation(
                clip(&detail),
            )))
        }
    }
}

/// Publisher posting the rendered payload as a single tweet.
#[derive(Clone)]
pub struct TwitterPublisher {
    http: HttpClient,
    url: String,
    signer: Arc<dyn RequestSigner>,
}

impl std::fmt::Debug for TwitterPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterPublisher")
            .field("url", &self.url)
            .field("scheme", &self.signer.scheme())
            .finish()
    }
}

impl TwitterPublisher {
    /// Create a publisher for `url` authorized by `signer`.
    pub fn new(http: HttpClient, url: impl Into<String>, signer: Arc<dyn RequestSigner>) -> Self {
        Self {
            http,
            url: url.into(),
            signer,
        }
    }

    fn send_error(&self, err: reqwest::Error) -> PublishError {
        error!(error = ?err, "Tweet request failed");
        if err.is_timeout() {
            PublishError::new(PublishErrorKind::Timeout(self.http.timeout_ms()))
        } else {
            PublishError::new(PublishErrorKind::Transport(err.to_string()))
        }
    }
}

#[async_trait]
impl Publisher for TwitterPublisher {
    #[instrument(skip(self, payload), fields(scheme = self.signer.scheme()))]
    async fn publish(&self, payload: &PublishPayload) -> PublishResult<PublishConfirmation> {
        let text = payload.render();
        let headers = self.signer.sign(&SignableRequest::new("POST", &self.url))?;

        let mut request = self
            .http
            .client()
            .post(&self.url)
            .json(&json!({ "text": text }));
        for (name, value) in headers {
            request = request.header(name, value);
        }

        debug!(chars = text.chars().count(), "Posting tweet");
        let response = request.send().await.map_err(|e| self.send_error(e))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| self.send_error(e))?;

        let confirmation = parse_tweet_response(status, &body)?;
        debug!(id = %confirmation, "Tweet created");
        Ok(confirmation)
    }

    fn platform_name(&self) -> &str {
        "twitter"
    }
}
