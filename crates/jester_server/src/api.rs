//! HTTP routes.

use crate::{AppState, RunResponse, require_bearer};
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::get,
};
use serde_json::json;
use tracing::{info, instrument};

/// Creates the router.
///
/// `/api/cron` and `/api/daily-run` run the pipeline once per request and
/// sit behind the bearer gate; `/health` is always open. Trigger routes
/// accept GET (schedulers) and POST.
pub fn create_router(state: AppState) -> Router {
    let triggers = Router::new()
        .route("/api/cron", get(trigger_run).post(trigger_run))
        .route("/api/daily-run", get(trigger_run).post(trigger_run))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_bearer));

    Router::new()
        .route("/health", get(health_check))
        .merge(triggers)
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

/// Execute one pipeline run and report it.
#[instrument(skip_all)]
async fn trigger_run(State(state): State<AppState>) -> impl IntoResponse {
    let report = state.pipeline().run(&state.run_token()).await;
    let response = RunResponse::from(&report);
    info!(
        success = response.success,
        topic = %response.topic,
        degraded = ?response.degraded,
        "Trigger handled"
    );
    (response.status_code(), Json(response))
}
