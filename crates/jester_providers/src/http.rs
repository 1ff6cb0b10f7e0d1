//! Shared HTTP plumbing.

use jester_error::{ProviderError, ProviderErrorKind, ProviderResult};
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::error;

/// Longest response body quoted in an error message.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// The reqwest client shared by every collaborator, with the per-request
/// limit it enforces.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
    timeout: Duration,
}

impl HttpClient {
    /// Underlying reqwest client.
    pub fn client(&self) -> &Client {
        &self.inner
    }

    /// Limit applied to each request.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Limit in milliseconds, as reported by timeout errors.
    pub(crate) fn timeout_ms(&self) -> u64 {
        u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX)
    }

    /// Classify a reqwest failure that happened before a status was received.
    pub(crate) fn send_error(&self, err: reqwest::Error) -> ProviderError {
        error!(error = ?err, "HTTP request failed");
        if err.is_timeout() {
            ProviderError::new(ProviderErrorKind::Timeout(self.timeout_ms()))
        } else {
            ProviderError::new(ProviderErrorKind::Transport(format!(
                "Request failed: {}",
                err
            )))
        }
    }
}

/// Build the HTTP client shared by every collaborator.
///
/// # Errors
///
/// Returns error if the TLS backend cannot be initialized.
pub fn build_client(timeout: Duration) -> ProviderResult<HttpClient> {
    let inner = Client::builder()
        .timeout(timeout)
        .user_agent(concat!("jester/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| {
            ProviderError::new(ProviderErrorKind::InvalidConfiguration(format!(
                "Failed to build HTTP client: {}",
                e
            )))
        })?;
    Ok(HttpClient { inner, timeout })
}

/// Pass 2xx responses through; turn anything else into a `Status` error.
pub(crate) async fn ensure_success(response: Response) -> ProviderResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    error!(status = %status, body = %clip(&body), "Collaborator returned an error status");
    Err(ProviderError::new(ProviderErrorKind::Status {
        status: status.as_u16(),
        message: clip(&body),
    }))
}

/// Cut a body down to something fit for a log line.
pub(crate) fn clip(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.chars().count() <= MAX_ERROR_BODY_CHARS {
        trimmed.to_string()
    } else {
        let head: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", head)
    }
}
