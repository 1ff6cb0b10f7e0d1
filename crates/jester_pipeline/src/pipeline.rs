//! The degrade-don't-abort orchestrator.

use crate::{
    GenerateImageStage, GenerateTextStage, ImageFallbackPolicy, PipelineConfig, PublishStage,
    ResolveTopicStage, Stage, StageResolution, UploadImageStage, render_prompt, run_stage,
};
use jester_core::{
    FallbackValue, GeneratedText, HostedImageUrl, ImageSource, PublishPayload, ResultReport,
    RunOutcome, Topic, fallback_text,
};
use jester_error::{ConfigError, JesterResult};
use jester_interface::{GenerationProvider, ImageHost, Publisher, TrendSource};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// States of a single run, in the only order they can occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, derive_more::Display)]
pub enum PipelineState {
    /// Choosing the topic
    #[display("resolve_topic")]
    ResolveTopic,
    /// Generating the joke
    #[display("generate_text")]
    GenerateText,
    /// Generating the picture
    #[display("generate_image")]
    GenerateImage,
    /// Uploading the picture
    #[display("upload_image")]
    UploadImage,
    /// Posting
    #[display("publish")]
    Publish,
    /// Published
    #[display("done")]
    Done,
    /// Publish failed or the run was cancelled
    #[display("aborted")]
    Aborted,
}

/// Per-run bookkeeping: current state and which stages fell back.
struct RunTrail {
    state: PipelineState,
    degraded: Vec<&'static str>,
}

impl RunTrail {
    fn new() -> Self {
        Self {
            state: PipelineState::ResolveTopic,
            degraded: Vec::new(),
        }
    }

    fn advance(&mut self, next: PipelineState) {
        debug_assert!(next > self.state, "pipeline states only move forward");
        debug!(from = %self.state, to = %next, "Pipeline transition");
        self.state = next;
    }

    /// Turn a resolution into a fallback-aware value; `None` means cancelled.
    fn absorb<T>(&mut self, resolution: StageResolution<T>) -> Option<FallbackValue<T>> {
        match resolution {
            StageResolution::Produced(value) => Some(FallbackValue::generated(value)),
            StageResolution::FellBack { value, error } => {
                self.degraded.push(error.stage);
                Some(FallbackValue::fallback(value))
            }
            StageResolution::Aborted(_) => None,
        }
    }
}

/// Single-pass pipeline: topic → text → image → upload → publish.
///
/// Only publish can fail the run. Every earlier stage resolves to a
/// fallback, and the payload is composed only after the image sub-pipeline
/// has resolved. No state is shared between runs.
pub struct DegradingPipeline {
    config: PipelineConfig,
    default_topic: Topic,
    trends: Arc<dyn TrendSource>,
    generator: Arc<dyn GenerationProvider>,
    host: Arc<dyn ImageHost>,
    publisher: Arc<dyn Publisher>,
}

impl DegradingPipeline {
    /// Create a new pipeline with the builder pattern.
    pub fn builder() -> DegradingPipelineBuilder {
        DegradingPipelineBuilder::default()
    }

    /// Pipeline settings.
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Execute one run.
    ///
    /// Never returns an error: fatal publish failures and cancellation are
    /// reported through [`ResultReport::outcome`] along with everything the
    /// run had resolved up to that point.
    #[instrument(skip_all, fields(publisher = self.publisher.platform_name()))]
    pub async fn run(&self, cancel: &CancellationToken) -> ResultReport {
        info!("Starting pipeline run");
        let mut trail = RunTrail::new();
        let stage_timeout = self.config.stage_timeout();
        let max_chars = *self.config.max_text_length();

        let topic_stage =
            ResolveTopicStage::new(self.trends.as_ref(), &self.default_topic, stage_timeout);
        let Some(topic) = trail.absorb(run_stage(&topic_stage, cancel).await) else {
            return self.cancelled(trail, self.default_topic.clone(), None);
        };
        let topic = topic.into_value();
        info!(topic = %topic, "Topic resolved");

        trail.advance(PipelineState::GenerateText);
        let text_prompt = render_prompt(self.config.text_prompt_template(), &topic);
        let text_stage = GenerateTextStage::new(
            self.generator.as_ref(),
            &topic,
            text_prompt,
            max_chars,
            stage_timeout,
        );
        let Some(text) = trail.absorb(run_stage(&text_stage, cancel).await) else {
            return self.cancelled(trail, topic, None);
        };

        trail.advance(PipelineState::GenerateImage);
        let image_prompt = render_prompt(self.config.image_prompt_template(), &topic);
        let image_stage = GenerateImageStage::new(
            self.generator.as_ref(),
            image_prompt,
            *self.config.min_image_bytes(),
            stage_timeout,
        );
        let Some(image) = trail.absorb(run_stage(&image_stage, cancel).await) else {
            return self.cancelled(trail, topic, Some(text));
        };

        trail.advance(PipelineState::UploadImage);
        let uploaded = match image.value() {
            Some(image) => {
                let upload_stage = UploadImageStage::new(self.host.as_ref(), image, stage_timeout);
                let Some(url) = trail.absorb(run_stage(&upload_stage, cancel).await) else {
                    return self.cancelled(trail, topic, Some(text));
                };
                url.into_value()
            }
            None => {
                debug!("No image to upload");
                None
            }
        };
        let (image_url, image_source) = self.resolve_image(uploaded);

        trail.advance(PipelineState::Publish);
        let payload = PublishPayload::compose(
            text.value(),
            image_url.as_ref(),
            &topic,
            self.config.extra_hashtags(),
            max_chars,
        );
        let publish_stage = PublishStage::new(
            self.publisher.as_ref(),
            &payload,
            self.config.publish_timeout(),
            *self.config.publish_retries(),
        );
        let resolution = run_stage(&publish_stage, cancel).await;

        let outcome = match resolution {
            StageResolution::Produced(confirmation) => {
                trail.advance(PipelineState::Done);
                info!(
                    id = %confirmation,
                    degraded = ?trail.degraded,
                    "Run published"
                );
                RunOutcome::Published(confirmation)
            }
            StageResolution::Aborted(err) if err.is_cancelled() => {
                trail.advance(PipelineState::Aborted);
                warn!("Run cancelled during publish");
                RunOutcome::Cancelled
            }
            StageResolution::Aborted(err) => {
                trail.advance(PipelineState::Aborted);
                error!(error = %err, "Run aborted: publish failed");
                RunOutcome::Failed(format!("Publish failed: {}", err.kind))
            }
            StageResolution::FellBack { error, .. } => {
                // Publish has no fallback; treat as fatal regardless of policy.
                trail.advance(PipelineState::Aborted);
                RunOutcome::Failed(format!("Publish failed: {}", error.kind))
            }
        };

        ResultReport::new(
            topic,
            payload.text().clone(),
            text.source(),
            image_url,
            image_source,
            trail.degraded,
            Some(payload),
            outcome,
        )
    }

    /// Apply the image fallback policy to the upload result.
    fn resolve_image(
        &self,
        uploaded: Option<HostedImageUrl>,
    ) -> (Option<HostedImageUrl>, ImageSource) {
        match (uploaded, self.config.image_fallback()) {
            (Some(url), _) => (Some(url), ImageSource::Generated),
            (None, ImageFallbackPolicy::Omit) => (None, ImageSource::None),
            (None, ImageFallbackPolicy::Placeholder(raw)) => match HostedImageUrl::parse(raw) {
                Some(url) => {
                    info!(url = %url, "Using placeholder image");
                    (Some(url), ImageSource::Placeholder)
                }
                None => (None, ImageSource::None),
            },
        }
    }

    fn cancelled(
        &self,
        mut trail: RunTrail,
        topic: Topic,
        text: Option<FallbackValue<GeneratedText>>,
    ) -> ResultReport {
        warn!(state = %trail.state, "Run cancelled before publish");
        trail.advance(PipelineState::Aborted);
        let text = text.unwrap_or_else(|| {
            FallbackValue::fallback(fallback_text(&topic, *self.config.max_text_length()))
        });
        ResultReport::new(
            topic,
            text.value().as_str().to_string(),
            text.source(),
            None,
            ImageSource::None,
            trail.degraded,
            None,
            RunOutcome::Cancelled,
        )
    }
}

/// Builder for [`DegradingPipeline`].
#[derive(Default)]
pub struct DegradingPipelineBuilder {
    config: Option<PipelineConfig>,
    trends: Option<Arc<dyn TrendSource>>,
    generator: Option<Arc<dyn GenerationProvider>>,
    host: Option<Arc<dyn ImageHost>>,
    publisher: Option<Arc<dyn Publisher>>,
}

impl DegradingPipelineBuilder {
    /// Set pipeline settings (defaults are used otherwise).
    pub fn config(mut self, config: PipelineConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the trend source.
    pub fn trends(mut self, trends: Arc<dyn TrendSource>) -> Self {
        self.trends = Some(trends);
        self
    }

    /// Set the generation provider.
    pub fn generator(mut self, generator: Arc<dyn GenerationProvider>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Set the image host.
    pub fn host(mut self, host: Arc<dyn ImageHost>) -> Self {
        self.host = Some(host);
        self
    }

    /// Set the publisher.
    pub fn publisher(mut self, publisher: Arc<dyn Publisher>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    /// Build the pipeline.
    ///
    /// # Errors
    ///
    /// Returns error if a collaborator is missing or the settings are invalid.
    pub fn build(self) -> JesterResult<DegradingPipeline> {
        let config = self.config.unwrap_or_default();
        let default_topic = config.validate()?;

        let trends = self
            .trends
            .ok_or_else(|| ConfigError::new("Trend source is required"))?;
        let generator = self
            .generator
            .ok_or_else(|| ConfigError::new("Generation provider is required"))?;
        let host = self
            .host
            .ok_or_else(|| ConfigError::new("Image host is required"))?;
        let publisher = self
            .publisher
            .ok_or_else(|| ConfigError::new("Publisher is required"))?;

        Ok(DegradingPipeline {
            config,
            default_topic,
            trends,
            generator,
            host,
            publisher,
        })
    }
}
