//! Top-level error wrapper types.

use crate::{ConfigError, ProviderError, PublishError, StageError};

/// Every error the workspace can surface.
///
/// # Examples
///
/// ```
/// use jester_error::{JesterError, ConfigError};
///
/// let err: JesterError = ConfigError::new("CRON_SECRET not set").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum JesterErrorKind {
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Collaborator error
    #[from(ProviderError)]
    Provider(ProviderError),
    /// Pipeline stage error
    #[from(StageError)]
    Stage(StageError),
    /// Publish error
    #[from(PublishError)]
    Publish(PublishError),
}

/// Jester error with kind discrimination.
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Jester Error: {}", _0)]
pub struct JesterError(Box<JesterErrorKind>);

impl JesterError {
    /// Create a new error from a kind.
    pub fn new(kind: JesterErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &JesterErrorKind {
        &self.0
    }
}

impl<T> From<T> for JesterError
where
    T: Into<JesterErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Jester operations.
pub type JesterResult<T> = std::result::Result<T, JesterError>;
