//! Scripted collaborators and router construction for API tests.

#![allow(dead_code)]

use async_trait::async_trait;
use jester_core::{GeneratedImage, HostedImageUrl, PublishConfirmation, PublishPayload, Topic};
use jester_error::{
    ProviderError, ProviderErrorKind, ProviderResult, PublishError, PublishErrorKind,
    PublishResult,
};
use jester_interface::{GenerationProvider, ImageHost, Publisher, TrendSource};
use jester_pipeline::{DegradingPipeline, PipelineConfig};
use jester_server::{AppState, BearerGate, create_router};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

pub struct FixedTrends(pub Vec<&'static str>);

#[async_trait]
impl TrendSource for FixedTrends {
    async fn fetch_topics(&self) -> ProviderResult<Vec<Topic>> {
        Ok(self.0.iter().filter_map(|t| Topic::new(t)).collect())
    }

    fn source_name(&self) -> &str {
        "fixed"
    }
}

/// Generator whose text and image can each be made to fail.
pub struct FixedGenerator {
    pub text: Option<&'static str>,
    pub image_bytes: Option<usize>,
}

#[async_trait]
impl GenerationProvider for FixedGenerator {
    async fn generate_text(&self, _prompt: &str) -> ProviderResult<String> {
        self.text
            .map(|t| serde_json::json!([{ "generated_text": t }]).to_string())
            .ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::Status {
                    status: 503,
                    message: "loading".to_string(),
                })
            })
    }

    async fn generate_image(&self, _prompt: &str) -> ProviderResult<Vec<u8>> {
        self.image_bytes
            .map(|n| vec![0x89; n])
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::Transport("reset".to_string())))
    }

    fn provider_name(&self) -> &str {
        "fixed"
    }
}

pub struct FixedHost;

#[async_trait]
impl ImageHost for FixedHost {
    async fn upload(&self, _image: &GeneratedImage) -> ProviderResult<HostedImageUrl> {
        HostedImageUrl::parse("https://i.imgur.com/x.png")
            .ok_or_else(|| ProviderError::new(ProviderErrorKind::MissingField("link".into())))
    }

    fn host_name(&self) -> &str {
        "fixed"
    }
}

/// Publisher that confirms or always fails, counting calls.
pub struct CountingPublisher {
    pub error: Option<PublishErrorKind>,
    pub calls: AtomicUsize,
}

impl CountingPublisher {
    pub fn confirming() -> Arc<Self> {
        Arc::new(Self {
            error: None,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn failing(kind: PublishErrorKind) -> Arc<Self> {
        Arc::new(Self {
            error: Some(kind),
            calls: AtomicUsize::new(0),
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Publisher for CountingPublisher {
    async fn publish(&self, _payload: &PublishPayload) -> PublishResult<PublishConfirmation> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        match &self.error {
            Some(kind) => Err(PublishError::new(kind.clone())),
            None => Ok(PublishConfirmation::new(format!("tweet-{}", n))),
        }
    }

    fn platform_name(&self) -> &str {
        "counting"
    }
}

pub fn pipeline(generator: FixedGenerator, publisher: Arc<CountingPublisher>) -> DegradingPipeline {
    DegradingPipeline::builder()
        .config(PipelineConfig::default())
        .trends(Arc::new(FixedTrends(vec!["#Weather"])))
        .generator(Arc::new(generator))
        .host(Arc::new(FixedHost))
        .publisher(publisher)
        .build()
        .expect("valid pipeline")
}

pub fn router(
    generator: FixedGenerator,
    publisher: Arc<CountingPublisher>,
    secret: Option<&str>,
) -> axum::Router {
    router_with_shutdown(generator, publisher, secret, CancellationToken::new())
}

pub fn router_with_shutdown(
    generator: FixedGenerator,
    publisher: Arc<CountingPublisher>,
    secret: Option<&str>,
    shutdown: CancellationToken,
) -> axum::Router {
    let state = AppState::new(
        Arc::new(pipeline(generator, publisher)),
        secret.map(BearerGate::new),
        shutdown,
    );
    create_router(state)
}
