//! Layered configuration loading.
//!
//! Sources, later overriding earlier:
//! 1. Bundled defaults (`include_str!` from `jester.toml`)
//! 2. `./jester.toml`, or the file given with `--config`
//! 3. Environment variables prefixed `JESTER_`, nested with `__`
//!    (e.g. `JESTER_PIPELINE__MIN_IMAGE_BYTES=2048`)
//!
//! Credentials are handled separately by [`Credentials`](crate::Credentials).

use config::{Config, Environment, File, FileFormat};
use derive_getters::Getters;
use jester_error::{ConfigError, JesterResult};
use jester_pipeline::PipelineConfig;
use jester_providers::{
    DEFAULT_HF_BASE_URL, DEFAULT_IMAGE_MODEL, DEFAULT_IMGUR_URL, DEFAULT_TEXT_MODEL,
    DEFAULT_TRENDS_URL, DEFAULT_TWEETS_URL,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, instrument};

const DEFAULT_CONFIG: &str = include_str!("../jester.toml");

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ServerSettings {
    /// Listen address.
    bind: String,
    /// Require `Authorization: Bearer <CRON_SECRET>` on trigger routes.
    require_auth: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:3000".to_string(),
            require_auth: true,
        }
    }
}

impl ServerSettings {
    /// Parse the bind address.
    ///
    /// # Errors
    ///
    /// Returns error if `bind` is not a socket address.
    pub fn socket_addr(&self) -> JesterResult<SocketAddr> {
        self.bind.parse().map_err(|e| {
            ConfigError::new(format!("server.bind is not an address ({}): {}", self.bind, e))
                .into()
        })
    }

    /// Copy with a different listen address.
    pub fn with_bind(mut self, bind: impl Into<String>) -> Self {
        self.bind = bind.into();
        self
    }

    /// Copy with the gate switched on or off.
    pub fn with_require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = require_auth;
        self
    }
}

/// Endpoints and models of the HTTP collaborators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct ProviderSettings {
    trends_url: String,
    huggingface_url: String,
    text_model: String,
    image_model: String,
    imgur_url: String,
    /// Transport-level cap for any single HTTP request.
    request_timeout_secs: u64,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            trends_url: DEFAULT_TRENDS_URL.to_string(),
            huggingface_url: DEFAULT_HF_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
            imgur_url: DEFAULT_IMGUR_URL.to_string(),
            request_timeout_secs: 60,
        }
    }
}

impl ProviderSettings {
    /// Transport timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// How publish requests are authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublisherAuth {
    /// OAuth 1.0a quadruple when complete, else bearer token
    #[default]
    Auto,
    /// OAuth 1.0a user context only
    OAuth1,
    /// App-only bearer token only
    Bearer,
}

/// Publisher settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct PublisherSettings {
    auth: PublisherAuth,
    tweets_url: String,
}

impl Default for PublisherSettings {
    fn default() -> Self {
        Self {
            auth: PublisherAuth::Auto,
            tweets_url: DEFAULT_TWEETS_URL.to_string(),
        }
    }
}

/// Complete non-secret configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Getters)]
#[serde(default)]
pub struct JesterConfig {
    server: ServerSettings,
    pipeline: PipelineConfig,
    providers: ProviderSettings,
    publisher: PublisherSettings,
}

impl JesterConfig {
    /// Load bundled defaults, a local or explicit file, then the environment.
    ///
    /// # Errors
    ///
    /// Returns error if an explicit file is missing or any source fails to
    /// parse into the expected shape.
    #[instrument]
    pub fn load(path: Option<&Path>) -> JesterResult<Self> {
        debug!("Loading configuration: env > file > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name("jester").required(false)),
        };

        builder = builder.add_source(
            Environment::with_prefix("JESTER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("pipeline.extra_hashtags"),
        );

        Self::finish(builder)
    }

    /// Bundled defaults overlaid with a TOML document. No environment.
    ///
    /// # Errors
    ///
    /// Returns error if the document does not parse.
    pub fn from_toml(overlay: &str) -> JesterResult<Self> {
        let builder = Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .add_source(File::from_str(overlay, FileFormat::Toml));
        Self::finish(builder)
    }

    fn finish(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> JesterResult<Self> {
        let config: Self = builder
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build configuration: {}", e)))?
            .try_deserialize()
            .map_err(|e| ConfigError::new(format!("Failed to parse configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that do not depend on credentials.
    ///
    /// # Errors
    ///
    /// Returns error if the pipeline settings are invalid, the bind address
    /// does not parse, or the transport timeout is zero.
    pub fn validate(&self) -> JesterResult<()> {
        self.pipeline.validate()?;
        self.server.socket_addr()?;
        if self.providers.request_timeout_secs == 0 {
            return Err(ConfigError::new("providers.request_timeout_secs must be positive").into());
        }
        Ok(())
    }

    /// Copy with different server settings.
    pub fn with_server(mut self, server: ServerSettings) -> Self {
        self.server = server;
        self
    }

    /// Copy with different pipeline settings.
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }
}
