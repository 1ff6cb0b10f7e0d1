//! Generated image bytes and the URL they are hosted at.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

/// Image bytes that passed the minimum-size check.
///
/// # Examples
///
/// ```
/// use jester_core::GeneratedImage;
///
/// assert!(GeneratedImage::validate(vec![0u8; 50], 1024).is_err());
/// let image = GeneratedImage::validate(vec![0u8; 2048], 1024).unwrap();
/// assert_eq!(image.len(), 2048);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    bytes: Vec<u8>,
}

impl GeneratedImage {
    /// Accept `bytes` only if there are at least `min_bytes` of them.
    ///
    /// Undersized payloads are usually error bodies or blank renders, so they
    /// are rejected rather than treated as images.
    pub fn validate(bytes: Vec<u8>, min_bytes: usize) -> Result<Self, String> {
        if bytes.len() < min_bytes {
            return Err(format!(
                "image is {} bytes, below the {} byte minimum",
                bytes.len(),
                min_bytes
            ));
        }
        Ok(Self { bytes })
    }

    /// Raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if there are no bytes (never the case after validation with a
    /// positive minimum).
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Standard base64 encoding of the bytes.
    pub fn encoded(&self) -> String {
        STANDARD.encode(&self.bytes)
    }

    /// MIME type guessed from the leading magic bytes.
    pub fn media_type(&self) -> &'static str {
        match self.bytes.as_slice() {
            [0x89, b'P', b'N', b'G', ..] => "image/png",
            [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
            [b'G', b'I', b'F', b'8', ..] => "image/gif",
            [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
            _ => "application/octet-stream",
        }
    }
}

/// An absolute http(s) URL returned by an image host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct HostedImageUrl(String);

impl HostedImageUrl {
    /// Accept `raw` if it is an absolute http or https URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use jester_core::HostedImageUrl;
    ///
    /// assert!(HostedImageUrl::parse("https://host/x.png").is_some());
    /// assert!(HostedImageUrl::parse("").is_none());
    /// assert!(HostedImageUrl::parse("ftp://host/x.png").is_none());
    /// ```
    pub fn parse(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        let rest = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))?;
        if rest.is_empty() || rest.chars().any(char::is_whitespace) {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    /// Borrow the URL.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
