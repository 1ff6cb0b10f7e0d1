//! Mock collaborators for pipeline tests.
//!
//! Each mock records its calls so tests can check which stages ran and what
//! they were given.

#![allow(dead_code)]

use async_trait::async_trait;
use jester_core::{GeneratedImage, HostedImageUrl, PublishConfirmation, PublishPayload, Topic};
use jester_error::{
    ProviderError, ProviderErrorKind, ProviderResult, PublishError, PublishErrorKind,
    PublishResult,
};
use jester_interface::{GenerationProvider, ImageHost, Publisher, TrendSource};
use jester_pipeline::{DegradingPipeline, PipelineConfig};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Trend source returning a fixed list or an error.
pub struct MockTrendSource {
    result: Result<Vec<String>, ProviderErrorKind>,
    calls: Mutex<usize>,
}

impl MockTrendSource {
    pub fn topics(topics: &[&str]) -> Self {
        Self {
            result: Ok(topics.iter().map(|t| t.to_string()).collect()),
            calls: Mutex::new(0),
        }
    }

    pub fn failing(kind: ProviderErrorKind) -> Self {
        Self {
            result: Err(kind),
            calls: Mutex::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl TrendSource for MockTrendSource {
    async fn fetch_topics(&self) -> ProviderResult<Vec<Topic>> {
        *self.calls.lock().unwrap() += 1;
        match &self.result {
            Ok(topics) => Ok(topics.iter().filter_map(Topic::new).collect()),
            Err(kind) => Err(ProviderError::new(kind.clone())),
        }
    }

    fn source_name(&self) -> &str {
        "mock-trends"
    }
}

/// Scripted text response.
#[derive(Debug, Clone)]
pub enum TextBehavior {
    /// Return this raw body
    Raw(String),
    /// Fail with this error
    Error(ProviderErrorKind),
    /// Never answer
    Hang,
    /// Cancel the token, then never answer
    CancelAndHang(CancellationToken),
}

/// Scripted image response.
#[derive(Debug, Clone)]
pub enum ImageBehavior {
    /// Return this many bytes
    Bytes(usize),
    /// Fail with this error
    Error(ProviderErrorKind),
}

/// Generation provider with scripted behaviours that records prompts.
pub struct MockGenerator {
    text: TextBehavior,
    image: ImageBehavior,
    text_prompts: Mutex<Vec<String>>,
    image_prompts: Mutex<Vec<String>>,
}

impl MockGenerator {
    pub fn new(text: TextBehavior, image: ImageBehavior) -> Self {
        Self {
            text,
            image,
            text_prompts: Mutex::new(Vec::new()),
            image_prompts: Mutex::new(Vec::new()),
        }
    }

    /// Generator answering in the HuggingFace array shape.
    pub fn joke(text: &str, image_bytes: usize) -> Self {
        Self::new(
            TextBehavior::Raw(serde_json::json!([{ "generated_text": text }]).to_string()),
            ImageBehavior::Bytes(image_bytes),
        )
    }

    pub fn text_prompts(&self) -> Vec<String> {
        self.text_prompts.lock().unwrap().clone()
    }

    pub fn image_prompts(&self) -> Vec<String> {
        self.image_prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationProvider for MockGenerator {
    async fn generate_text(&self, prompt: &str) -> ProviderResult<String> {
        self.text_prompts.lock().unwrap().push(prompt.to_string());
        match &self.text {
            TextBehavior::Raw(body) => Ok(body.clone()),
            TextBehavior::Error(kind) => Err(ProviderError::new(kind.clone())),
            TextBehavior::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
            TextBehavior::CancelAndHang(token) => {
                token.cancel();
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(String::new())
            }
        }
    }

    async fn generate_image(&self, prompt: &str) -> ProviderResult<Vec<u8>> {
        self.image_prompts.lock().unwrap().push(prompt.to_string());
        match &self.image {
            ImageBehavior::Bytes(len) => Ok(vec![0x42; *len]),
            ImageBehavior::Error(kind) => Err(ProviderError::new(kind.clone())),
        }
    }

    fn provider_name(&self) -> &str {
        "mock-generator"
    }
}

/// Image host returning a fixed URL or an error.
pub struct MockHost {
    result: Result<String, ProviderErrorKind>,
    uploaded_sizes: Mutex<Vec<usize>>,
}

impl MockHost {
    pub fn url(url: &str) -> Self {
        Self {
            result: Ok(url.to_string()),
            uploaded_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(kind: ProviderErrorKind) -> Self {
        Self {
            result: Err(kind),
            uploaded_sizes: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.uploaded_sizes.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageHost for MockHost {
    async fn upload(&self, image: &GeneratedImage) -> ProviderResult<HostedImageUrl> {
        self.uploaded_sizes.lock().unwrap().push(image.len());
        match &self.result {
            Ok(url) => HostedImageUrl::parse(url).ok_or_else(|| {
                ProviderError::new(ProviderErrorKind::MissingField("data.link".to_string()))
            }),
            Err(kind) => Err(ProviderError::new(kind.clone())),
        }
    }

    fn host_name(&self) -> &str {
        "mock-host"
    }
}

/// Publisher that fails `fail_count` times, then confirms (or always fails).
pub struct MockPublisher {
    fail_count: usize,
    error: Option<PublishErrorKind>,
    id: String,
    payloads: Mutex<Vec<PublishPayload>>,
}

impl MockPublisher {
    pub fn confirming(id: &str) -> Self {
        Self {
            fail_count: 0,
            error: None,
            id: id.to_string(),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(kind: PublishErrorKind) -> Self {
        Self {
            fail_count: usize::MAX,
            error: Some(kind),
            id: String::new(),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn fail_then_confirm(fail_count: usize, kind: PublishErrorKind, id: &str) -> Self {
        Self {
            fail_count,
            error: Some(kind),
            id: id.to_string(),
            payloads: Mutex::new(Vec::new()),
        }
    }

    pub fn call_count(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    pub fn payloads(&self) -> Vec<PublishPayload> {
        self.payloads.lock().unwrap().clone()
    }
}

#[async_trait]
impl Publisher for MockPublisher {
    async fn publish(&self, payload: &PublishPayload) -> PublishResult<PublishConfirmation> {
        let mut payloads = self.payloads.lock().unwrap();
        payloads.push(payload.clone());
        let call = payloads.len();
        match &self.error {
            Some(kind) if call <= self.fail_count => Err(PublishError::new(kind.clone())),
            _ => Ok(PublishConfirmation::new(self.id.clone())),
        }
    }

    fn platform_name(&self) -> &str {
        "mock-publisher"
    }
}

/// All four mocks, kept so tests can inspect them after a run.
pub struct Harness {
    pub trends: Arc<MockTrendSource>,
    pub generator: Arc<MockGenerator>,
    pub host: Arc<MockHost>,
    pub publisher: Arc<MockPublisher>,
}

impl Harness {
    pub fn new(
        trends: MockTrendSource,
        generator: MockGenerator,
        host: MockHost,
        publisher: MockPublisher,
    ) -> Self {
        Self {
            trends: Arc::new(trends),
            generator: Arc::new(generator),
            host: Arc::new(host),
            publisher: Arc::new(publisher),
        }
    }

    pub fn pipeline(&self, config: PipelineConfig) -> DegradingPipeline {
        DegradingPipeline::builder()
            .config(config)
            .trends(self.trends.clone())
            .generator(self.generator.clone())
            .host(self.host.clone())
            .publisher(self.publisher.clone())
            .build()
            .expect("valid pipeline")
    }
}
