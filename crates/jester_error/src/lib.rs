//! Error types for the Jester pipeline.
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use jester_error::{ConfigError, JesterResult};
//!
//! fn require_key(key: Option<&str>) -> JesterResult<&str> {
//!     Ok(key.ok_or_else(|| ConfigError::new("HF_KEY is not set"))?)
//! }
//!
//! assert!(require_key(None).is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod provider;
mod publish;
mod stage;

pub use config::ConfigError;
pub use error::{JesterError, JesterErrorKind, JesterResult};
pub use provider::{ProviderError, ProviderErrorKind, ProviderResult, RetryableError};
pub use publish::{PublishError, PublishErrorKind, PublishResult};
pub use stage::{StageError, StageErrorKind};
