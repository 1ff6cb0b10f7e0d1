//! Collaborator (external API) error types and retry classification.

/// Result type for collaborator calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Failure conditions of an external collaborator call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Network-level failure (DNS, connect, reset)
    #[display("Transport failure: {}", _0)]
    Transport(String),
    /// The call did not complete in time
    #[display("Timed out after {}ms", _0)]
    Timeout(u64),
    /// Non-success HTTP status
    #[display("HTTP {} error: {}", status, message)]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Body could not be decoded into the expected shape
    #[display("Malformed response: {}", _0)]
    MalformedResponse(String),
    /// Body decoded but the expected field was absent
    #[display("Missing field in response: {}", _0)]
    MissingField(String),
    /// Client was constructed with unusable settings
    #[display("Invalid configuration: {}", _0)]
    InvalidConfiguration(String),
}

impl ProviderErrorKind {
    /// Check if this error type is transient.
    pub fn is_retryable(&self) -> bool {
        match self {
            ProviderErrorKind::Status { status, .. } => {
                matches!(*status, 408 | 429 | 500 | 502 | 503 | 504)
            }
            ProviderErrorKind::Transport(_) | ProviderErrorKind::Timeout(_) => true,
            _ => false,
        }
    }
}

/// Collaborator error with source location tracking.
///
/// # Examples
///
/// ```
/// use jester_error::{ProviderError, ProviderErrorKind, RetryableError};
///
/// let err = ProviderError::new(ProviderErrorKind::Status {
///     status: 503,
///     message: "Model is loading".to_string(),
/// });
/// assert!(err.is_retryable());
/// assert!(format!("{}", err).contains("503"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error: {} at line {} in {}", kind, line, file)]
pub struct ProviderError {
    /// The kind of error that occurred
    pub kind: ProviderErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ProviderError {
    /// Create a new ProviderError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

/// Errors that can tell whether another attempt might succeed.
pub trait RetryableError {
    /// Returns true if this error should trigger a retry.
    ///
    /// Transient errors like 503, 429 or network timeouts return true.
    /// Permanent errors like 401 or 400 return false.
    fn is_retryable(&self) -> bool;
}

impl RetryableError for ProviderError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
