//! Router tests: status codes, gate behaviour and the report body.

mod test_utils;

use axum::{
    body::Body,
    http::{Request, StatusCode, header::AUTHORIZATION},
};
use http_body_util::BodyExt;
use jester_error::PublishErrorKind;
use serde_json::Value;
use test_utils::{CountingPublisher, FixedGenerator, router, router_with_shutdown};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

fn healthy() -> FixedGenerator {
    FixedGenerator {
        text: Some("It's raining cats"),
        image_bytes: Some(4096),
    }
}

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_is_not_gated() {
    let app = router(healthy(), CountingPublisher::confirming(), Some("s3cret"));
    let (status, body) = send(app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_gate_rejects_missing_token() {
    let publisher = CountingPublisher::confirming();
    let app = router(healthy(), publisher.clone(), Some("s3cret"));

    let (status, body) = send(app, get("/api/cron", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Unauthorized");
    assert_eq!(publisher.calls(), 0);
}

#[tokio::test]
async fn test_gate_rejects_wrong_token() {
    let publisher = CountingPublisher::confirming();
    let app = router(healthy(), publisher.clone(), Some("s3cret"));

    let (status, _) = send(app, get("/api/daily-run", Some("guess"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(publisher.calls(), 0);
}

#[tokio::test]
async fn test_authorized_run_reports_success() {
    let publisher = CountingPublisher::confirming();
    let app = router(healthy(), publisher.clone(), Some("s3cret"));

    let (status, body) = send(app, get("/api/cron", Some("s3cret"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["topic"], "#Weather");
    assert_eq!(body["textUsed"], "It's raining cats");
    assert_eq!(body["textSource"], "generated");
    assert_eq!(body["imageURL"], "https://i.imgur.com/x.png");
    assert_eq!(body["imageSource"], "generated");
    assert_eq!(body["publishResult"]["id"], "tweet-1");
    assert!(body.get("errorMessage").is_none());
    assert_eq!(body["degraded"], serde_json::json!([]));
    assert_eq!(publisher.calls(), 1);
}

#[tokio::test]
async fn test_gate_disabled_allows_anonymous_post() {
    let publisher = CountingPublisher::confirming();
    let app = router(healthy(), publisher.clone(), None);
    let request = Request::builder()
        .method("POST")
        .uri("/api/daily-run")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(publisher.calls(), 1);
}

#[tokio::test]
async fn test_degraded_run_is_still_ok() {
    let publisher = CountingPublisher::confirming();
    let generator = FixedGenerator {
        text: None,
        image_bytes: Some(50),
    };
    let app = router(generator, publisher.clone(), None);

    let (status, body) = send(app, get("/api/cron", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["textSource"], "fallback");
    assert!(body["textUsed"].as_str().unwrap().contains("#Weather"));
    assert_eq!(body["imageURL"], Value::Null);
    assert_eq!(body["imageSource"], "none");
    assert_eq!(
        body["degraded"],
        serde_json::json!(["generate_text", "generate_image"])
    );
}

#[tokio::test]
async fn test_publish_failure_is_500_with_upstream_results() {
    let publisher = CountingPublisher::failing(PublishErrorKind::Authentication(
        "HTTP 401: Unauthorized".to_string(),
    ));
    let app = router(healthy(), publisher.clone(), None);

    let (status, body) = send(app, get("/api/cron", None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(
        body["errorMessage"]
            .as_str()
            .unwrap()
            .starts_with("Publish failed")
    );
    assert!(body.get("publishResult").is_none());
    assert_eq!(body["textUsed"], "It's raining cats");
    assert_eq!(body["imageURL"], "https://i.imgur.com/x.png");
}

#[tokio::test]
async fn test_shutdown_cancels_run_before_publish() {
    let publisher = CountingPublisher::confirming();
    let shutdown = CancellationToken::new();
    shutdown.cancel();
    let app = router_with_shutdown(healthy(), publisher.clone(), None, shutdown);

    let (status, body) = send(app, get("/api/cron", None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert_eq!(body["errorMessage"], "Run cancelled before publish");
    assert_eq!(publisher.calls(), 0);
}

#[tokio::test]
async fn test_each_request_is_an_independent_run() {
    let publisher = CountingPublisher::confirming();
    let app = router(healthy(), publisher.clone(), None);

    let (_, first) = send(app.clone(), get("/api/cron", None)).await;
    let (_, second) = send(app, get("/api/cron", None)).await;

    assert_eq!(first["publishResult"]["id"], "tweet-1");
    assert_eq!(second["publishResult"]["id"], "tweet-2");
}
