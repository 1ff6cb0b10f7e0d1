//! Uniform stage abstraction and the single rule that resolves every stage.

use async_trait::async_trait;
use jester_error::{StageError, StageErrorKind};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// How a stage's failure is handled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StagePolicy<T> {
    /// Substitute this value and keep going
    Absorb(T),
    /// Abort the run
    Fatal,
}

/// How a stage resolved.
#[derive(Debug)]
pub enum StageResolution<T> {
    /// The collaborator produced a valid value
    Produced(T),
    /// The stage failed and its fallback was used
    FellBack {
        /// The fallback value
        value: T,
        /// The failure that was absorbed
        error: StageError,
    },
    /// Fatal failure, or the run was cancelled
    Aborted(StageError),
}

/// One unit of pipeline work calling exactly one collaborator capability.
#[async_trait]
pub trait Stage: Send + Sync {
    /// Value the stage resolves to.
    type Output: Send;

    /// Stage name used in logs and reports.
    fn name(&self) -> &'static str;

    /// Call the collaborator and validate the result.
    async fn attempt(&self) -> Result<Self::Output, StageError>;

    /// Failure handling, consulted only after `attempt` has failed.
    fn policy(&self) -> StagePolicy<Self::Output>;

    /// Time budget for a single attempt.
    fn timeout(&self) -> Duration;

    /// Total attempts allowed for retryable failures.
    fn max_attempts(&self) -> u32 {
        1
    }
}

/// Run `stage` to resolution.
///
/// Each attempt is bounded by the stage timeout and raced against `cancel`.
/// Retryable failures are retried up to `max_attempts`; what remains is
/// resolved by the stage policy. Cancellation always aborts, even for
/// absorbable stages, so no further collaborator is called.
#[instrument(skip_all, fields(stage = stage.name()))]
pub async fn run_stage<S>(stage: &S, cancel: &CancellationToken) -> StageResolution<S::Output>
where
    S: Stage + ?Sized,
{
    let max_attempts = stage.max_attempts().max(1);
    let mut attempt = 1;

    let failure = loop {
        match attempt_once(stage, cancel).await {
            Ok(value) => {
                debug!(attempt, "Stage produced a value");
                return StageResolution::Produced(value);
            }
            Err(err) if err.is_cancelled() => {
                info!("Run cancelled, stage abandoned");
                return StageResolution::Aborted(err);
            }
            Err(err) if err.retryable && attempt < max_attempts => {
                warn!(attempt, max_attempts, error = %err, "Transient stage failure, retrying");
                attempt += 1;
            }
            Err(err) => break err,
        }
    };

    match stage.policy() {
        StagePolicy::Absorb(value) => {
            warn!(error = %failure, "Stage failed, using fallback");
            StageResolution::FellBack {
                value,
                error: failure,
            }
        }
        StagePolicy::Fatal => {
            error!(error = %failure, attempts = attempt, "Stage failed fatally");
            StageResolution::Aborted(failure)
        }
    }
}

async fn attempt_once<S>(stage: &S, cancel: &CancellationToken) -> Result<S::Output, StageError>
where
    S: Stage + ?Sized,
{
    if cancel.is_cancelled() {
        return Err(StageError::new(stage.name(), StageErrorKind::Cancelled));
    }

    let limit = stage.timeout();
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StageError::new(stage.name(), StageErrorKind::Cancelled)),
        outcome = tokio::time::timeout(limit, stage.attempt()) => match outcome {
            Ok(result) => result,
            Err(_) => Err(StageError::new(
                stage.name(),
                StageErrorKind::Timeout(u64::try_from(limit.as_millis()).unwrap_or(u64::MAX)),
            )),
        },
    }
}
