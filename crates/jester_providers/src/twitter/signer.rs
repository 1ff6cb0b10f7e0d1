//! Authorization header producers for the Twitter API.

use base64::{Engine, engine::general_purpose::STANDARD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use jester_error::{PublishError, PublishErrorKind, PublishResult};
use jester_interface::{RequestSigner, SignableRequest};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use rand::{Rng, distributions::Alphanumeric};
use sha1::Sha1;

type HmacSha1 = Hmac<Sha1>;

/// RFC 3986 unreserved characters pass through; everything else is escaped.
const RFC3986: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

const NONCE_LEN: usize = 32;

fn encode(raw: &str) -> String {
    utf8_percent_encode(raw, RFC3986).to_string()
}

/// App-only bearer token authorization.
#[derive(Clone)]
pub struct BearerSigner {
    token: String,
}

impl BearerSigner {
    /// Create a signer for `token`.
    ///
    /// # Errors
    ///
    /// Returns error if the token is blank.
    pub fn new(token: impl Into<String>) -> PublishResult<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(PublishError::new(PublishErrorKind::Authentication(
                "Bearer token is empty".to_string(),
            )));
        }
        Ok(Self { token })
    }
}

impl std::fmt::Debug for BearerSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BearerSigner").finish_non_exhaustive()
    }
}

impl RequestSigner for BearerSigner {
    fn sign(&self, _request: &SignableRequest) -> PublishResult<Vec<(String, String)>> {
        Ok(vec![(
            "Authorization".to_string(),
            format!("Bearer {}", self.token),
        )])
    }

    fn scheme(&self) -> &'static str {
        "bearer"
    }
}

/// The four keys of a user-context OAuth 1.0a grant.
#[derive(Clone, PartialEq, Eq)]
pub struct OAuth1Credentials {
    /// Consumer (API) key
    pub consumer_key: String,
    /// Consumer (API) secret
    pub consumer_secret: String,
    /// Access token
    pub access_token: String,
    /// Access token secret
    pub access_secret: String,
}

impl std::fmt::Debug for OAuth1Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OAuth1Credentials")
            .field("consumer_key", &self.consumer_key)
            .finish_non_exhaustive()
    }
}

/// HMAC-SHA1 OAuth 1.0a signer.
///
/// Only query and form parameters are signed; a JSON body never takes part
/// in the signature base string.
#[derive(Debug, Clone)]
pub struct OAuth1Signer {
    credentials: OAuth1Credentials,
}

impl OAuth1Signer {
    /// Create a signer for a complete credential set.
    ///
    /// # Errors
    ///
    /// Returns error if any of the four keys is blank.
    pub fn new(credentials: OAuth1Credentials) -> PublishResult<Self> {
        let fields = [
            ("consumer key", &credentials.consumer_key),
            ("consumer secret", &credentials.consumer_secret),
            ("access token", &credentials.access_token),
            ("access secret", &credentials.access_secret),
        ];
        if let Some((name, _)) = fields.iter().find(|(_, v)| v.trim().is_empty()) {
            return Err(PublishError::new(PublishErrorKind::Authentication(format!(
                "OAuth1 {} is empty",
                name
            ))));
        }
        Ok(Self { credentials })
    }

    /// Build the `Authorization` header value for a fixed nonce and timestamp.
    pub fn authorization(
        &self,
        request: &SignableRequest,
        nonce: &str,
        timestamp: i64,
    ) -> PublishResult<String> {
        let timestamp = timestamp.to_string();
        let mut oauth_params = vec![
            ("oauth_consumer_key", self.credentials.consumer_key.as_str()),
            ("oauth_nonce", nonce),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", timestamp.as_str()),
            ("oauth_token", self.credentials.access_token.as_str()),
            ("oauth_version", "1.0"),
        ];

        let signature = self.signature(request, &oauth_params)?;
        oauth_params.push(("oauth_signature", signature.as_str()));
        oauth_params.sort_unstable();

        let fields: Vec<String> = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", encode(k), encode(v)))
            .collect();
        Ok(format!("OAuth {}", fields.join(", ")))
    }

    fn signature(
        &self,
        request: &SignableRequest,
        oauth_params: &[(&str, &str)],
    ) -> PublishResult<String> {
        let mut pairs: Vec<(String, String)> = request
            .params
            .iter()
            .map(|(k, v)| (encode(k), encode(v)))
            .chain(oauth_params.iter().map(|(k, v)| (encode(k), encode(v))))
            .collect();
        pairs.sort();

        let parameter_string = pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");

        let base = format!(
            "{}&{}&{}",
            request.method.to_uppercase(),
            encode(&request.url),
            encode(&parameter_string)
        );
        let key = format!(
            "{}&{}",
            encode(&self.credentials.consumer_secret),
            encode(&self.credentials.access_secret)
        );

        let mut mac = HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| {
            PublishError::new(PublishErrorKind::Authentication(format!(
                "Invalid signing key: {}",
                e
            )))
        })?;
        mac.update(base.as_bytes());
        Ok(STANDARD.encode(mac.finalize().into_bytes()))
    }
}

fn nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(NONCE_LEN)
        .map(char::from)
        .collect()
}

impl RequestSigner for OAuth1Signer {
    fn sign(&self, request: &SignableRequest) -> PublishResult<Vec<(String, String)>> {
        let header = self.authorization(request, &nonce(), Utc::now().timestamp())?;
        Ok(vec![("Authorization".to_string(), header)])
    }

    fn scheme(&self) -> &'static str {
        "oauth1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Worked example from the Twitter "Creating a signature" guide.
    fn documented_signer() -> OAuth1Signer {
        OAuth1Signer::new(OAuth1Credentials {
            consumer_key: "xvz1evFS4wEEPTGEFPHBog".to_string(),
            consumer_secret: "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw".to_string(),
            access_token: "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb".to_string(),
            access_secret: "LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE".to_string(),
        })
        .unwrap()
    }

    fn documented_request() -> SignableRequest {
        SignableRequest::new("post", "https://api.twitter.com/1.1/statuses/update.json")
            .with_param("include_entities", "true")
            .with_param("status", "Hello Ladies + Gentlemen, a signed OAuth request!")
    }

    #[test]
    fn test_documented_signature() {
        let header = documented_signer()
            .authorization(
                &documented_request(),
                "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg",
                1318622958,
            )
            .unwrap();

        assert!(header.starts_with("OAuth "));
        assert!(header.contains(r#"oauth_signature="hCtSmYh%2BiHYCEqBWrE7C7hYmtUk%3D""#));
        assert!(header.contains(r#"oauth_consumer_key="xvz1evFS4wEEPTGEFPHBog""#));
        assert!(!header.contains("include_entities"));
    }

    #[test]
    fn test_encode_reserved_characters() {
        assert_eq!(encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(encode("a-b.c_d~e"), "a-b.c_d~e");
        assert_eq!(encode("💩"), "%F0%9F%92%A9");
    }

    #[test]
    fn test_sign_uses_fresh_nonce() {
        let signer = documented_signer();
        let first = signer.sign(&documented_request()).unwrap();
        let second = signer.sign(&documented_request()).unwrap();
        assert_eq!(first[0].0, "Authorization");
        assert_ne!(first[0].1, second[0].1);
    }

    #[test]
    fn test_blank_credential_rejected() {
        let err = OAuth1Signer::new(OAuth1Credentials {
            consumer_key: "key".to_string(),
            consumer_secret: "secret".to_string(),
            access_token: "".to_string(),
            access_secret: "access".to_string(),
        })
        .unwrap_err();
        assert!(err.to_string().contains("access token"));
    }

    #[test]
    fn test_bearer_header() {
        let signer = BearerSigner::new("AAAA").unwrap();
        let headers = signer
            .sign(&SignableRequest::new("POST", "https://api.twitter.com/2/tweets"))
            .unwrap();
        assert_eq!(
            headers,
            vec![("Authorization".to_string(), "Bearer AAAA".to_string())]
        );
        assert!(BearerSigner::new(" ").is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let rendered = format!("{:?}", documented_signer());
        assert!(!rendered.contains("kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw"));
        assert!(!rendered.contains("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"));
    }
}
