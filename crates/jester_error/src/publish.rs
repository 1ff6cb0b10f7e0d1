//! Publish errors. Unlike every other collaborator failure these abort the run.

use crate::RetryableError;

/// Result type for publish operations.
pub type PublishResult<T> = std::result::Result<T, PublishError>;

/// Ways a publish attempt can fail.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PublishErrorKind {
    /// Credentials were rejected (401/403) or could not be applied
    #[display("Authentication failed: {}", _0)]
    Authentication(String),
    /// Publisher answered with a non-success status
    #[display("Publish rejected with HTTP {}: {}", status, message)]
    Rejected {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },
    /// Response parsed but carried no confirmation identifier
    #[display("Publish response missing confirmation: {}", _0)]
    MissingConfirmation(String),
    /// Response body was not in the expected format
    #[display("Unparseable publish response: {}", _0)]
    UnparseableResponse(String),
    /// Network-level failure
    #[display("Publish transport failure: {}", _0)]
    Transport(String),
    /// Publish did not complete in time
    #[display("Publish timed out after {}ms", _0)]
    Timeout(u64),
}

impl PublishErrorKind {
    /// Check if this error is worth another attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            PublishErrorKind::Rejected { status, .. } => {
                matches!(*status, 429 | 500 | 502 | 503 | 504)
            }
            PublishErrorKind::Transport(_) | PublishErrorKind::Timeout(_) => true,
            _ => false,
        }
    }
}

/// Publish error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Publish Error: {} at line {} in {}", kind, line, file)]
pub struct PublishError {
    /// Error kind
    pub kind: PublishErrorKind,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl PublishError {
    /// Create a new publish error.
    #[track_caller]
    pub fn new(kind: PublishErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}

impl RetryableError for PublishError {
    fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
