//! Bearer-token gate for the trigger routes.

use crate::AppState;
use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use sha2::{Digest, Sha256};
use tracing::warn;

/// Accepts requests carrying `Authorization: Bearer <secret>`.
///
/// Only a digest of the secret is kept. Presented tokens are hashed before
/// comparison so the check does not short-circuit on the secret's bytes.
#[derive(Clone)]
pub struct BearerGate {
    digest: [u8; 32],
}

impl std::fmt::Debug for BearerGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerGate").finish_non_exhaustive()
    }
}

impl BearerGate {
    /// Gate for `secret`.
    pub fn new(secret: &str) -> Self {
        Self {
            digest: Sha256::digest(secret.as_bytes()).into(),
        }
    }

    /// Check an `Authorization` header value.
    pub fn allows(&self, header: Option<&str>) -> bool {
        let Some(token) = header.and_then(|h| h.strip_prefix("Bearer ")) else {
            return false;
        };
        let presented: [u8; 32] = Sha256::digest(token.as_bytes()).into();
        presented
            .iter()
            .zip(self.digest.iter())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
    }
}

/// Reject trigger requests that fail the gate. A no-op when the gate is off.
pub async fn require_bearer(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if let Some(gate) = state.gate() {
        let header = request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        if !gate.allows(header) {
            warn!(path = %request.uri().path(), "Rejected unauthorized trigger");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Unauthorized" })),
            )
                .into_response();
        }
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matching_token_allowed() {
        let gate = BearerGate::new("s3cret");
        assert!(gate.allows(Some("Bearer s3cret")));
    }

    #[test]
    fn test_wrong_or_missing_token_rejected() {
        let gate = BearerGate::new("s3cret");
        assert!(!gate.allows(Some("Bearer s3cre")));
        assert!(!gate.allows(Some("s3cret")));
        assert!(!gate.allows(Some("Basic s3cret")));
        assert!(!gate.allows(None));
    }
}
