//! JSON body returned by the trigger routes.

use axum::http::StatusCode;
use jester_core::{ImageSource, PublishConfirmation, ResultReport, RunOutcome, ValueSource};
use serde::{Deserialize, Serialize};

/// Wire form of a [`ResultReport`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunResponse {
    /// Published, degraded or not
    pub success: bool,
    /// Topic the run was about
    pub topic: String,
    /// Text sent (or prepared) for publishing
    pub text_used: String,
    /// Generated or fallback
    pub text_source: ValueSource,
    /// Image link in the post
    #[serde(rename = "imageURL")]
    pub image_url: Option<String>,
    /// Where the image link came from
    pub image_source: ImageSource,
    /// Platform confirmation
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub publish_result: Option<PublishConfirmation>,
    /// Why the run failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_message: Option<String>,
    /// Stages that fell back
    pub degraded: Vec<String>,
}

impl RunResponse {
    /// 200 when published, degraded or not; 500 otherwise.
    pub fn status_code(&self) -> StatusCode {
        if self.success {
            StatusCode::OK
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl From<&ResultReport> for RunResponse {
    fn from(report: &ResultReport) -> Self {
        Self {
            success: report.is_success(),
            topic: report.topic().as_str().to_string(),
            text_used: report.text_used().clone(),
            text_source: *report.text_source(),
            image_url: report.image_url().as_ref().map(|u| u.as_str().to_string()),
            image_source: *report.image_source(),
            publish_result: match report.outcome() {
                RunOutcome::Published(confirmation) => Some(confirmation.clone()),
                _ => None,
            },
            error_message: report.error_message(),
            degraded: report.degraded().iter().map(|s| s.to_string()).collect(),
        }
    }
}
