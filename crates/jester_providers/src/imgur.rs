//! Anonymous image hosting on Imgur.

use crate::http::{HttpClient, clip, ensure_success};
use async_trait::async_trait;
use jester_core::{GeneratedImage, HostedImageUrl};
use jester_error::{ProviderError, ProviderErrorKind, ProviderResult};
use jester_interface::ImageHost;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Imgur upload endpoint.
pub const DEFAULT_IMGUR_URL: &str = "https://api.imgur.com/3/image";

#[derive(Debug, Deserialize)]
struct ImgurEnvelope {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    data: Option<ImgurData>,
}

#[derive(Debug, Deserialize)]
struct ImgurData {
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

/// Read the public link out of an Imgur upload response.
///
/// # Errors
///
/// Returns error if:
/// - The body is not JSON
/// - `success` is false
/// - `data.link` is absent or not an http(s) URL
pub fn parse_imgur_response(body: &str) -> ProviderResult<HostedImageUrl> {
    let envelope: ImgurEnvelope = serde_json::from_str(body).map_err(|e| {
        ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
            "Imgur response is not JSON: {} ({})",
            e,
            clip(body)
        )))
    })?;

    if envelope.success == Some(false) {
        let reason = envelope
            .data
            .as_ref()
            .and_then(|d| d.error.as_ref())
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(ProviderError::new(ProviderErrorKind::MalformedResponse(
            format!("Imgur reported failure: {}", reason),
        )));
    }

    let link = envelope
        .data
        .and_then(|d| d.link)
        .ok_or_else(|| ProviderError::new(ProviderErrorKind::MissingField("data.link".into())))?;

    HostedImageUrl::parse(&link).ok_or_else(|| {
        ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
            "Imgur link is not an http(s) URL: {}",
            link
        )))
    })
}

/// Image host uploading base64 form data with an application client id.
#[derive(Clone)]
pub struct ImgurHost {
    http: HttpClient,
    client_id: String,
    url: String,
}

impl std::fmt::Debug for ImgurHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImgurHost")
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

impl ImgurHost {
    /// Create a host posting to `url` as `client_id`.
    ///
    /// # Errors
    ///
    /// Returns error if the client id is blank.
    pub fn new(
        http: HttpClient,
        client_id: impl Into<String>,
        url: impl Into<String>,
    ) -> ProviderResult<Self> {
        let client_id = client_id.into();
        if client_id.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::InvalidConfiguration(
                "Imgur client id is empty".to_string(),
            )));
        }
        Ok(Self {
            http,
            client_id,
            url: url.into(),
        })
    }
}

#[async_trait]
impl ImageHost for ImgurHost {
    #[instrument(skip(self, image), fields(bytes = image.len(), media_type = image.media_type()))]
    async fn upload(&self, image: &GeneratedImage) -> ProviderResult<HostedImageUrl> {
        let encoded = image.encoded();
        let response = self
            .http
            .client()
            .post(&self.url)
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .form(&[("image", encoded.as_str()), ("type", "base64")])
            .send()
            .await
            .map_err(|e| self.http.send_error(e))?;

        let body = ensure_success(response)
            .await?
            .text()
            .await
            .map_err(|e| self.http.send_error(e))?;

        let url = parse_imgur_response(&body)?;
        debug!(url = %url, "Image uploaded");
        Ok(url)
    }

    fn host_name(&self) -> &str {
        "imgur"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_client;
    use crate::http::test_server::respond_once;
    use std::time::Duration;

    #[test]
    fn test_link_extracted() {
        let body = r#"{"data":{"id":"abc","link":"https://i.imgur.com/abc.png"},"success":true,"status":200}"#;
        let url = parse_imgur_response(body).unwrap();
        assert_eq!(url.as_str(), "https://i.imgur.com/abc.png");
    }

    #[test]
    fn test_reported_failure_is_error() {
        let body = r#"{"data":{"error":"Bad Request"},"success":false,"status":400}"#;
        let err = parse_imgur_response(body).unwrap_err();
        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn test_missing_link_is_missing_field() {
        let err = parse_imgur_response(r#"{"data":{},"success":true}"#).unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::MissingField("data.link".into()));
    }

    #[test]
    fn test_non_json_is_malformed() {
        let err = parse_imgur_response("<html>over capacity</html>").unwrap_err();
        assert!(matches!(err.kind, ProviderErrorKind::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_upload_sends_base64_form_with_client_id() -> anyhow::Result<()> {
        let (url, server) =
            respond_once(200, r#"{"data":{"link":"https://i.imgur.com/abc.png"},"success":true}"#)
                .await?;
        let host = ImgurHost::new(build_client(Duration::from_secs(5))?, "client-123", url)?;
        let image = GeneratedImage::validate(vec![7u8; 2048], 1024)
            .map_err(anyhow::Error::msg)?;

        let hosted = host.upload(&image).await?;

        assert_eq!(hosted.as_str(), "https://i.imgur.com/abc.png");
        let request = server.await??;
        assert!(request.starts_with("POST / "));
        assert!(request.to_lowercase().contains("authorization: client-id client-123"));
        assert!(request.contains("type=base64"));
        Ok(())
    }

    #[tokio::test]
    async fn test_upload_error_status_is_retryable() -> anyhow::Result<()> {
        let (url, server) = respond_once(503, r#"{"success":false}"#).await?;
        let host = ImgurHost::new(build_client(Duration::from_secs(5))?, "client-123", url)?;
        let image = GeneratedImage::validate(vec![7u8; 2048], 1024)
            .map_err(anyhow::Error::msg)?;

        let err = host.upload(&image).await.err();

        let err = err.ok_or_else(|| anyhow::anyhow!("503 should fail the upload"))?;
        assert!(matches!(err.kind, ProviderErrorKind::Status { status: 503, .. }));
        assert!(err.kind.is_retryable());
        server.await??;
        Ok(())
    }
}
