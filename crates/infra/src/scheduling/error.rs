//! Scheduler error types

use std::time::Duration;

use brief_domain::BriefError;
use thiserror::Error;
use tokio::task::JoinError;
use tokio::time::error::Elapsed;
use tokio_cron_scheduler::JobSchedulerError;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler already running")]
    AlreadyRunning,

    #[error("Scheduler not running")]
    NotRunning,

    #[error("Failed to create scheduler: {source}")]
    CreationFailed { source: JobSchedulerError },

    #[error("Failed to start scheduler: {source}")]
    StartFailed { source: JobSchedulerError },

    #[error("Failed to stop scheduler: {source}")]
    StopFailed { source: JobSchedulerError },

    /// Usually an unparseable cron expression.
    #[error("Failed to register job '{cron}': {source}")]
    JobRegistrationFailed { cron: String, source: JobSchedulerError },

    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration, source: Elapsed },

    #[error("Task join failed: {0}")]
    TaskJoinFailed(#[from] JoinError),

    /// The scheduled task itself returned an error.
    #[error("Task failed: {0}")]
    Task(#[from] BriefError),
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let brief = match err {
            SchedulerError::Task(inner) => inner,
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                BriefError::InvalidInput(err.to_string())
            }
            SchedulerError::JobRegistrationFailed { .. } => BriefError::Config(err.to_string()),
            _ => BriefError::Internal(err.to_string()),
        };
        InfraError(brief)
    }
}

impl From<SchedulerError> for BriefError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
