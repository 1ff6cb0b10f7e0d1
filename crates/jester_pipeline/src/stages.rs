//! The five concrete pipeline stages.

use crate::{Stage, StagePolicy};
use async_trait::async_trait;
use jester_core::{
    GeneratedImage, GeneratedText, HostedImageUrl, PublishConfirmation, PublishPayload, Topic,
    extract_generated_text, fallback_text,
};
use jester_error::{StageError, StageErrorKind};
use jester_interface::{GenerationProvider, ImageHost, Publisher, TrendSource};
use std::time::Duration;
use tracing::debug;

/// Picks the first topic from the trend source, else the default topic.
pub struct ResolveTopicStage<'a> {
    source: &'a dyn TrendSource,
    default_topic: &'a Topic,
    timeout: Duration,
}

impl<'a> ResolveTopicStage<'a> {
    /// Stage name.
    pub const NAME: &'static str = "resolve_topic";

    /// Create the stage.
    pub fn new(source: &'a dyn TrendSource, default_topic: &'a Topic, timeout: Duration) -> Self {
        Self {
            source,
            default_topic,
            timeout,
        }
    }
}

#[async_trait]
impl Stage for ResolveTopicStage<'_> {
    type Output = Topic;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self) -> Result<Topic, StageError> {
        let topics = self
            .source
            .fetch_topics()
            .await
            .map_err(|e| StageError::from_provider(Self::NAME, &e))?;
        debug!(source = self.source.source_name(), count = topics.len(), "Fetched topics");

        topics.into_iter().next().ok_or_else(|| {
            StageError::new(
                Self::NAME,
                StageErrorKind::Invalid("trend source returned no topics".to_string()),
            )
        })
    }

    fn policy(&self) -> StagePolicy<Topic> {
        StagePolicy::Absorb(self.default_topic.clone())
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Asks the provider for a joke and parses it defensively.
pub struct GenerateTextStage<'a> {
    provider: &'a dyn GenerationProvider,
    topic: &'a Topic,
    prompt: String,
    max_chars: usize,
    timeout: Duration,
}

impl<'a> GenerateTextStage<'a> {
    /// Stage name.
    pub const NAME: &'static str = "generate_text";

    /// Create the stage.
    pub fn new(
        provider: &'a dyn GenerationProvider,
        topic: &'a Topic,
        prompt: String,
        max_chars: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            topic,
            prompt,
            max_chars,
            timeout,
        }
    }
}

#[async_trait]
impl Stage for GenerateTextStage<'_> {
    type Output = GeneratedText;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self) -> Result<GeneratedText, StageError> {
        let raw = self
            .provider
            .generate_text(&self.prompt)
            .await
            .map_err(|e| StageError::from_provider(Self::NAME, &e))?;

        extract_generated_text(&raw, &self.prompt, self.max_chars)
            .map_err(|reason| StageError::new(Self::NAME, StageErrorKind::Invalid(reason)))
    }

    fn policy(&self) -> StagePolicy<GeneratedText> {
        StagePolicy::Absorb(fallback_text(self.topic, self.max_chars))
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Asks the provider for a picture and rejects undersized results.
pub struct GenerateImageStage<'a> {
    provider: &'a dyn GenerationProvider,
    prompt: String,
    min_bytes: usize,
    timeout: Duration,
}

impl<'a> GenerateImageStage<'a> {
    /// Stage name.
    pub const NAME: &'static str = "generate_image";

    /// Create the stage.
    pub fn new(
        provider: &'a dyn GenerationProvider,
        prompt: String,
        min_bytes: usize,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            prompt,
            min_bytes,
            timeout,
        }
    }
}

#[async_trait]
impl Stage for GenerateImageStage<'_> {
    type Output = Option<GeneratedImage>;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self) -> Result<Option<GeneratedImage>, StageError> {
        let bytes = self
            .provider
            .generate_image(&self.prompt)
            .await
            .map_err(|e| StageError::from_provider(Self::NAME, &e))?;

        let image = GeneratedImage::validate(bytes, self.min_bytes)
            .map_err(|reason| StageError::new(Self::NAME, StageErrorKind::Invalid(reason)))?;
        debug!(bytes = image.len(), media_type = image.media_type(), "Image accepted");
        Ok(Some(image))
    }

    fn policy(&self) -> StagePolicy<Option<GeneratedImage>> {
        StagePolicy::Absorb(None)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Uploads a validated image to the host.
pub struct UploadImageStage<'a> {
    host: &'a dyn ImageHost,
    image: &'a GeneratedImage,
    timeout: Duration,
}

impl<'a> UploadImageStage<'a> {
    /// Stage name.
    pub const NAME: &'static str = "upload_image";

    /// Create the stage.
    pub fn new(host: &'a dyn ImageHost, image: &'a GeneratedImage, timeout: Duration) -> Self {
        Self {
            host,
            image,
            timeout,
        }
    }
}

#[async_trait]
impl Stage for UploadImageStage<'_> {
    type Output = Option<HostedImageUrl>;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self) -> Result<Option<HostedImageUrl>, StageError> {
        let url = self
            .host
            .upload(self.image)
            .await
            .map_err(|e| StageError::from_provider(Self::NAME, &e))?;
        debug!(host = self.host.host_name(), url = %url, "Image uploaded");
        Ok(Some(url))
    }

    fn policy(&self) -> StagePolicy<Option<HostedImageUrl>> {
        StagePolicy::Absorb(None)
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }
}

/// Publishes the final payload. The only fatal stage.
pub struct PublishStage<'a> {
    publisher: &'a dyn Publisher,
    payload: &'a PublishPayload,
    timeout: Duration,
    retries: u32,
}

impl<'a> PublishStage<'a> {
    /// Stage name.
    pub const NAME: &'static str = "publish";

    /// Create the stage.
    pub fn new(
        publisher: &'a dyn Publisher,
        payload: &'a PublishPayload,
        timeout: Duration,
        retries: u32,
    ) -> Self {
        Self {
            publisher,
            payload,
            timeout,
            retries,
        }
    }
}

#[async_trait]
impl Stage for PublishStage<'_> {
    type Output = PublishConfirmation;

    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn attempt(&self) -> Result<PublishConfirmation, StageError> {
        self.publisher
            .publish(self.payload)
            .await
            .map_err(|e| StageError::from_publish(Self::NAME, &e))
    }

    fn policy(&self) -> StagePolicy<PublishConfirmation> {
        StagePolicy::Fatal
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    fn max_attempts(&self) -> u32 {
        self.retries.saturating_add(1)
    }
}
