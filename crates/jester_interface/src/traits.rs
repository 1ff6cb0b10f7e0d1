//! Trait definitions for external collaborators.

use async_trait::async_trait;
use jester_core::{GeneratedImage, HostedImageUrl, PublishConfirmation, PublishPayload, Topic};
use jester_error::{ProviderResult, PublishResult};

/// Source of candidate topics, best first.
#[async_trait]
pub trait TrendSource: Send + Sync {
    /// Fetch the current topics. An empty list is a valid answer.
    async fn fetch_topics(&self) -> ProviderResult<Vec<Topic>>;

    /// Short name used in logs.
    fn source_name(&self) -> &str;
}

/// Text and image generation backend.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Generate text for `prompt`, returning the raw response body.
    ///
    /// The body is parsed by the caller; implementations should not try to
    /// interpret it beyond checking the HTTP status.
    async fn generate_text(&self, prompt: &str) -> ProviderResult<String>;

    /// Generate an image for `prompt`, returning the raw bytes.
    async fn generate_image(&self, prompt: &str) -> ProviderResult<Vec<u8>>;

    /// Provider name (e.g., "huggingface").
    fn provider_name(&self) -> &str;
}

/// Image hosting service.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload `image` and return its public URL.
    async fn upload(&self, image: &GeneratedImage) -> ProviderResult<HostedImageUrl>;

    /// Host name used in logs.
    fn host_name(&self) -> &str;
}

/// Social media publisher.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `payload` and return the platform's confirmation id.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Authentication fails
    /// - The platform answers with a non-success status
    /// - The response cannot be parsed or lacks a confirmation id
    async fn publish(&self, payload: &PublishPayload) -> PublishResult<PublishConfirmation>;

    /// Platform name used in logs.
    fn platform_name(&self) -> &str;
}

/// A request as seen by a signer: method, URL without query, and the
/// query/form parameters that take part in the signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignableRequest {
    /// HTTP method, upper case
    pub method: String,
    /// Scheme, host and path
    pub url: String,
    /// Query string and form parameters (not JSON body fields)
    pub params: Vec<(String, String)>,
}

impl SignableRequest {
    /// Create a request description with no parameters.
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            params: Vec::new(),
        }
    }

    /// Add a parameter that takes part in the signature.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }
}

/// Produces the headers that authorize a publisher request.
pub trait RequestSigner: Send + Sync {
    /// Headers to attach to `request`.
    fn sign(&self, request: &SignableRequest) -> PublishResult<Vec<(String, String)>>;

    /// Scheme name used in logs (e.g., "bearer", "oauth1").
    fn scheme(&self) -> &'static str;
}
