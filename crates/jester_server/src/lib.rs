//! HTTP trigger, configuration and CLI support for the Jester pipeline.
//!
//! The binary (`jester`) wires the HTTP collaborators from
//! `jester_providers` into a `DegradingPipeline` and exposes it through an
//! axum router:
//!
//! - `GET|POST /api/cron`, `GET|POST /api/daily-run`: one run per request,
//!   200 when published (even degraded), 500 on fatal failure, 401 when the
//!   bearer gate rejects the caller
//! - `GET /health`: liveness, never gated

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod app;
mod auth;
mod config;
mod credentials;
mod observability;
mod response;

pub use api::create_router;
pub use app::{AppState, build_pipeline, build_state};
pub use auth::{BearerGate, require_bearer};
pub use config::{JesterConfig, ProviderSettings, PublisherAuth, PublisherSettings, ServerSettings};
pub use credentials::Credentials;
pub use observability::{ObservabilityConfig, init_observability};
pub use response::RunResponse;
