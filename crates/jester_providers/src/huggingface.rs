//! HuggingFace Inference API for both joke text and meme images.

use crate::http::{HttpClient, ensure_success};
use async_trait::async_trait;
use derive_getters::Getters;
use jester_error::{ProviderError, ProviderErrorKind, ProviderResult};
use jester_interface::GenerationProvider;
use serde_json::json;
use tracing::{debug, error, instrument};

/// Inference API root; the model id is appended as a path.
pub const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co/models";

/// Default text model.
pub const DEFAULT_TEXT_MODEL: &str = "mistralai/Mistral-7B-Instruct-v0.2";

/// Default image model.
pub const DEFAULT_IMAGE_MODEL: &str = "CompVis/stable-diffusion-v1-4";

/// HuggingFace inference client.
///
/// Both capabilities send `{"inputs": prompt}` to `{base_url}/{model}`.
/// Text calls return the body untouched so the pipeline can apply its own
/// extraction; image calls return the raw bytes.
#[derive(Clone, Getters)]
pub struct HuggingFaceProvider {
    #[getter(skip)]
    http: HttpClient,
    #[getter(skip)]
    api_token: String,
    base_url: String,
    text_model: String,
    image_model: String,
}

impl std::fmt::Debug for HuggingFaceProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HuggingFaceProvider")
            .field("base_url", &self.base_url)
            .field("text_model", &self.text_model)
            .field("image_model", &self.image_model)
            .finish_non_exhaustive()
    }
}

impl HuggingFaceProvider {
    /// Creates a provider with explicit API token and models.
    ///
    /// # Errors
    ///
    /// Returns error if the token or a model id is blank.
    #[instrument(skip_all)]
    pub fn new(
        http: HttpClient,
        api_token: impl Into<String>,
        base_url: impl Into<String>,
        text_model: impl Into<String>,
        image_model: impl Into<String>,
    ) -> ProviderResult<Self> {
        let api_token = api_token.into();
        let text_model = text_model.into();
        let image_model = image_model.into();
        if api_token.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::InvalidConfiguration(
                "HuggingFace API token is empty".to_string(),
            )));
        }
        if text_model.trim().is_empty() || image_model.trim().is_empty() {
            return Err(ProviderError::new(ProviderErrorKind::InvalidConfiguration(
                "HuggingFace model id is empty".to_string(),
            )));
        }

        debug!(
            text_model = %text_model,
            image_model = %image_model,
            "Created HuggingFace provider"
        );

        Ok(Self {
            http,
            api_token,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            text_model,
            image_model,
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model)
    }

    async fn infer(&self, model: &str, prompt: &str) -> ProviderResult<reqwest::Response> {
        let url = self.model_url(model);
        debug!(url = %url, prompt_len = prompt.len(), "Sending request to HuggingFace");

        let response = self
            .http
            .client()
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_token))
            .json(&json!({ "inputs": prompt }))
            .send()
            .await
            .map_err(|e| self.http.send_error(e))?;

        ensure_success(response).await
    }
}

#[async_trait]
impl GenerationProvider for HuggingFaceProvider {
    #[instrument(skip(self, prompt), fields(model = %self.text_model))]
    async fn generate_text(&self, prompt: &str) -> ProviderResult<String> {
        let body = self
            .infer(&self.text_model, prompt)
            .await?
            .text()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to read response");
                ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
                    "Failed to read response: {}",
                    e
                )))
            })?;
        debug!(response_len = body.len(), "Received text response");
        Ok(body)
    }

    #[instrument(skip(self, prompt), fields(model = %self.image_model))]
    async fn generate_image(&self, prompt: &str) -> ProviderResult<Vec<u8>> {
        let bytes = self
            .infer(&self.image_model, prompt)
            .await?
            .bytes()
            .await
            .map_err(|e| {
                error!(error = ?e, "Failed to read image bytes");
                ProviderError::new(ProviderErrorKind::MalformedResponse(format!(
                    "Failed to read image bytes: {}",
                    e
                )))
            })?;
        debug!(bytes = bytes.len(), "Received image response");
        Ok(bytes.to_vec())
    }

    fn provider_name(&self) -> &str {
        "huggingface"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_client;
    use std::time::Duration;

    fn http() -> HttpClient {
        build_client(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_model_url_joins_without_double_slash() {
        let provider = HuggingFaceProvider::new(
            http(),
            "hf_token",
            "https://api-inference.huggingface.co/models/",
            DEFAULT_TEXT_MODEL,
            DEFAULT_IMAGE_MODEL,
        )
        .unwrap();
        assert_eq!(
            provider.model_url(provider.text_model()),
            "https://api-inference.huggingface.co/models/mistralai/Mistral-7B-Instruct-v0.2"
        );
    }

    #[test]
    fn test_blank_token_rejected() {
        let result = HuggingFaceProvider::new(
            http(),
            "  ",
            DEFAULT_HF_BASE_URL,
            DEFAULT_TEXT_MODEL,
            DEFAULT_IMAGE_MODEL,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_debug_hides_token() {
        let provider = HuggingFaceProvider::new(
            http(),
            "hf_secret_value",
            DEFAULT_HF_BASE_URL,
            DEFAULT_TEXT_MODEL,
            DEFAULT_IMAGE_MODEL,
        )
        .unwrap();
        assert!(!format!("{:?}", provider).contains("hf_secret_value"));
    }
}
