//! Pipeline stage errors.

use crate::{ProviderError, ProviderErrorKind, PublishError, RetryableError};

/// Why a stage attempt did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum StageErrorKind {
    /// The collaborator call failed
    #[display("Collaborator failed: {}", _0)]
    Collaborator(String),
    /// The attempt exceeded its time budget
    #[display("Timed out after {}ms", _0)]
    Timeout(u64),
    /// The collaborator answered but the result failed validation
    #[display("Invalid result: {}", _0)]
    Invalid(String),
    /// The run was cancelled before the stage finished
    #[display("Cancelled")]
    Cancelled,
}

/// Stage error tagged with the stage that raised it.
///
/// # Examples
///
/// ```
/// use jester_error::{StageError, StageErrorKind};
///
/// let err = StageError::new("generate_image", StageErrorKind::Invalid("50 bytes".into()));
/// assert!(format!("{}", err).contains("generate_image"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Stage '{}' failed: {} at line {} in {}", stage, kind, line, file)]
pub struct StageError {
    /// Name of the stage
    pub stage: &'static str,
    /// What went wrong
    pub kind: StageErrorKind,
    /// Whether another attempt might succeed
    pub retryable: bool,
    /// Line number where error occurred
    pub line: u32,
    /// File where error occurred
    pub file: &'static str,
}

impl StageError {
    /// Create a new stage error.
    #[track_caller]
    pub fn new(stage: &'static str, kind: StageErrorKind) -> Self {
        let location = std::panic::Location::caller();
        let retryable = matches!(kind, StageErrorKind::Timeout(_));
        Self {
            stage,
            kind,
            retryable,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Wrap a collaborator failure, keeping timeouts distinguishable.
    #[track_caller]
    pub fn from_provider(stage: &'static str, err: &ProviderError) -> Self {
        let kind = match &err.kind {
            ProviderErrorKind::Timeout(ms) => StageErrorKind::Timeout(*ms),
            other => StageErrorKind::Collaborator(other.to_string()),
        };
        let mut error = Self::new(stage, kind);
        error.retryable = err.is_retryable();
        error
    }

    /// Wrap a publish failure.
    #[track_caller]
    pub fn from_publish(stage: &'static str, err: &PublishError) -> Self {
        let mut error = Self::new(stage, StageErrorKind::Collaborator(err.kind.to_string()));
        error.retryable = err.is_retryable();
        error
    }

    /// True when the run was cancelled.
    pub fn is_cancelled(&self) -> bool {
        matches!(self.kind, StageErrorKind::Cancelled)
    }
}
