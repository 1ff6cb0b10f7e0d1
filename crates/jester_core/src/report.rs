//! Outcome of one pipeline run.

use crate::{HostedImageUrl, PublishPayload, Topic, ValueSource};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Identifier the publisher returned for a successful post.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", id)]
pub struct PublishConfirmation {
    /// Platform post id
    pub id: String,
}

impl PublishConfirmation {
    /// Create a confirmation from a post id.
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// How the image reference in the payload was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSource {
    /// Generated, validated and uploaded this run
    Generated,
    /// Configured placeholder used after an image failure
    Placeholder,
    /// No image in the post
    None,
}

/// Terminal state of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// Publish succeeded
    Published(PublishConfirmation),
    /// Publish failed; the run is aborted
    Failed(String),
    /// The invoking context went away before publish was attempted
    Cancelled,
}

/// What a run used and what happened to it. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Getters, derive_new::new)]
pub struct ResultReport {
    /// Topic the run was about
    topic: Topic,
    /// Text sent (or prepared) for publishing
    text_used: String,
    /// Whether the text was generated or the fallback
    text_source: ValueSource,
    /// Image link in the payload, if any
    image_url: Option<HostedImageUrl>,
    /// Where the image link came from
    image_source: ImageSource,
    /// Stages that fell back instead of producing a value
    degraded: Vec<&'static str>,
    /// Payload handed to the publisher, absent when the run stopped earlier
    payload: Option<PublishPayload>,
    /// Terminal state
    outcome: RunOutcome,
}

impl ResultReport {
    /// True when the post was published, degraded or not.
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, RunOutcome::Published(_))
    }

    /// Publish confirmation, if the run succeeded.
    pub fn confirmation(&self) -> Option<&PublishConfirmation> {
        match &self.outcome {
            RunOutcome::Published(confirmation) => Some(confirmation),
            _ => None,
        }
    }

    /// Error message for unsuccessful runs.
    pub fn error_message(&self) -> Option<String> {
        match &self.outcome {
            RunOutcome::Published(_) => None,
            RunOutcome::Failed(message) => Some(message.clone()),
            RunOutcome::Cancelled => Some("Run cancelled before publish".to_string()),
        }
    }
}
