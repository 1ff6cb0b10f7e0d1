//! Shared handler state and collaborator wiring.

use crate::{BearerGate, Credentials, JesterConfig};
use jester_error::JesterResult;
use jester_pipeline::DegradingPipeline;
use jester_providers::{
    HuggingFaceProvider, ImgurHost, Trends24Source, TwitterPublisher, build_client,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::instrument;

/// State shared by every request.
///
/// Runs share only the pipeline's immutable configuration and collaborator
/// handles; each request gets a child of `shutdown` as its cancellation token.
#[derive(Clone)]
pub struct AppState {
    pipeline: Arc<DegradingPipeline>,
    gate: Option<BearerGate>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Create state for `pipeline`, gated when `gate` is set.
    pub fn new(
        pipeline: Arc<DegradingPipeline>,
        gate: Option<BearerGate>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            pipeline,
            gate,
            shutdown,
        }
    }

    /// The pipeline every trigger runs.
    pub fn pipeline(&self) -> &DegradingPipeline {
        &self.pipeline
    }

    /// The bearer gate, if enabled.
    pub fn gate(&self) -> Option<&BearerGate> {
        self.gate.as_ref()
    }

    /// Token for a single run, cancelled on shutdown.
    pub fn run_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

/// Wire the HTTP collaborators into a pipeline.
///
/// # Errors
///
/// Returns error if a required credential is missing or a collaborator
/// rejects its settings. No external call is made.
#[instrument(skip_all)]
pub fn build_pipeline(
    config: &JesterConfig,
    credentials: &Credentials,
) -> JesterResult<DegradingPipeline> {
    let providers = config.providers();
    let client = build_client(providers.request_timeout())?;

    let trends = Trends24Source::new(client.clone(), providers.trends_url())?;
    let generator = HuggingFaceProvider::new(
        client.clone(),
        credentials.require_hf_key()?,
        providers.huggingface_url(),
        providers.text_model(),
        providers.image_model(),
    )?;
    let host = ImgurHost::new(
        client.clone(),
        credentials.require_imgur_client_id()?,
        providers.imgur_url(),
    )?;
    let signer = credentials.signer(*config.publisher().auth())?;
    let publisher = TwitterPublisher::new(client, config.publisher().tweets_url(), signer);

    DegradingPipeline::builder()
        .config(config.pipeline().clone())
        .trends(Arc::new(trends))
        .generator(Arc::new(generator))
        .host(Arc::new(host))
        .publisher(Arc::new(publisher))
        .build()
}

/// Build handler state from configuration: pipeline plus gate.
///
/// # Errors
///
/// Returns error if the pipeline cannot be wired or the gate is enabled
/// without a secret.
pub fn build_state(
    config: &JesterConfig,
    credentials: &Credentials,
    shutdown: CancellationToken,
) -> JesterResult<AppState> {
    let gate = credentials
        .gate_secret(*config.server().require_auth())?
        .map(BearerGate::new);
    let pipeline = build_pipeline(config, credentials)?;
    Ok(AppState::new(Arc::new(pipeline), gate, shutdown))
}
