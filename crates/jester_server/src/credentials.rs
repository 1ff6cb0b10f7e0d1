//! Secrets, read once from the process environment.

use crate::PublisherAuth;
use jester_error::{ConfigError, JesterResult};
use jester_interface::RequestSigner;
use jester_providers::{BearerSigner, OAuth1Credentials, OAuth1Signer};
use std::sync::Arc;
use tracing::info;

/// Every secret the binary needs. Blank variables count as unset.
#[derive(Clone, Default)]
pub struct Credentials {
    /// HuggingFace API token (`HF_KEY`)
    pub hf_key: Option<String>,
    /// Imgur application client id (`IMGUR_CLIENT_ID`)
    pub imgur_client_id: Option<String>,
    /// Twitter app-only bearer token (`TWITTER_BEARER`)
    pub twitter_bearer: Option<String>,
    /// Twitter OAuth 1.0a quadruple, present only when all four are set
    pub twitter_oauth1: Option<OAuth1Credentials>,
    /// Shared secret for the trigger gate (`CRON_SECRET`)
    pub cron_secret: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("hf_key", &self.hf_key.is_some())
            .field("imgur_client_id", &self.imgur_client_id.is_some())
            .field("twitter_bearer", &self.twitter_bearer.is_some())
            .field("twitter_oauth1", &self.twitter_oauth1.is_some())
            .field("cron_secret", &self.cron_secret.is_some())
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read credentials through `lookup`, keyed by environment variable name.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let twitter_oauth1 = match (
            get("TWITTER_KEY"),
            get("TWITTER_SECRET"),
            get("TWITTER_ACCESS"),
            get("TWITTER_ACCESS_SECRET"),
        ) {
            (
                Some(consumer_key),
                Some(consumer_secret),
                Some(access_token),
                Some(access_secret),
            ) => Some(OAuth1Credentials {
                consumer_key,
                consumer_secret,
                access_token,
                access_secret,
            }),
            _ => None,
        };

        Self {
            hf_key: get("HF_KEY"),
            imgur_client_id: get("IMGUR_CLIENT_ID"),
            twitter_bearer: get("TWITTER_BEARER"),
            twitter_oauth1,
            cron_secret: get("CRON_SECRET"),
        }
    }

    /// HuggingFace token.
    ///
    /// # Errors
    ///
    /// Returns error if `HF_KEY` is unset.
    pub fn require_hf_key(&self) -> JesterResult<&str> {
        self.hf_key
            .as_deref()
            .ok_or_else(|| ConfigError::new("HF_KEY is not set").into())
    }

    /// Imgur client id.
    ///
    /// # Errors
    ///
    /// Returns error if `IMGUR_CLIENT_ID` is unset.
    pub fn require_imgur_client_id(&self) -> JesterResult<&str> {
        self.imgur_client_id
            .as_deref()
            .ok_or_else(|| ConfigError::new("IMGUR_CLIENT_ID is not set").into())
    }

    /// Gate secret, required only while the gate is enabled.
    ///
    /// # Errors
    ///
    /// Returns error if `require_auth` is set and `CRON_SECRET` is unset.
    pub fn gate_secret(&self, require_auth: bool) -> JesterResult<Option<&str>> {
        match (require_auth, self.cron_secret.as_deref()) {
            (false, _) => Ok(None),
            (true, Some(secret)) => Ok(Some(secret)),
            (true, None) => Err(ConfigError::new(
                "server.require_auth is enabled but CRON_SECRET is not set",
            )
            .into()),
        }
    }

    /// Build the request signer selected by `auth`.
    ///
    /// # Errors
    ///
    /// Returns error if the credentials `auth` needs are incomplete.
    pub fn signer(&self, auth: PublisherAuth) -> JesterResult<Arc<dyn RequestSigner>> {
        let signer: Arc<dyn RequestSigner> =
            match (auth, &self.twitter_oauth1, &self.twitter_bearer) {
                (PublisherAuth::OAuth1 | PublisherAuth::Auto, Some(keys), _) => {
                    Arc::new(OAuth1Signer::new(keys.clone())?)
                }
                (PublisherAuth::Bearer | PublisherAuth::Auto, _, Some(token)) => {
                    Arc::new(BearerSigner::new(token.clone())?)
                }
                (PublisherAuth::OAuth1, None, _) => {
                    return Err(ConfigError::new(
                        "publisher.auth = oauth1 requires TWITTER_KEY, TWITTER_SECRET, \
                         TWITTER_ACCESS and TWITTER_ACCESS_SECRET",
                    )
                    .into());
                }
                (PublisherAuth::Bearer, _, None) => {
                    return Err(ConfigError::new(
                        "publisher.auth = bearer requires TWITTER_BEARER",
                    )
                    .into());
                }
                (PublisherAuth::Auto, None, None) => {
                    return Err(ConfigError::new(
                        "No Twitter credentials: set TWITTER_BEARER or the four OAuth1 keys",
                    )
                    .into());
                }
            };
        info!(scheme = signer.scheme(), "Publisher authorization selected");
        Ok(signer)
    }
}
