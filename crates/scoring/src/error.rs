use chrono::{DateTime, Utc};
use importer::ImporterError;
use storage::error::StorageError;
use thiserror::Error;
use tokio_cron_scheduler::JobSchedulerError;

pub type Result<T> = std::result::Result<T, ScoringError>;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("Predictions for event {event_id} locked at {locked_at}")]
    Locked {
        event_id: String,
        locked_at: DateTime<Utc>,
    },

    #[error("Results not yet available for event {0}")]
    ResultsUnavailable(String),

    #[error("Upstream rate limit exhausted: {0}")]
    UpstreamRateLimited(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Upstream error: {0}")]
    Upstream(ImporterError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] JobSchedulerError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ScoringError {
    /// Transient failures: retrying later may succeed without operator action.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ResultsUnavailable(_)
                | Self::UpstreamRateLimited(_)
                | Self::Upstream(ImporterError::RequestError(_))
        )
    }

    pub(crate) fn not_found(what: impl Into<String>) -> impl FnOnce(StorageError) -> Self {
        let what = what.into();
        move |e| match e {
            StorageError::NotFound => Self::NotFound(what),
            other => Self::Storage(other),
        }
    }
}

impl From<StorageError> for ScoringError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound => Self::NotFound("Resource".to_string()),
            other => Self::Storage(other),
        }
    }
}

impl From<ImporterError> for ScoringError {
    fn from(error: ImporterError) -> Self {
        match error {
            ImporterError::RateLimited { url, attempts } => {
                Self::UpstreamRateLimited(format!("{} after {} attempts", url, attempts))
            }
            ImporterError::ResultsUnavailable(event_id) => Self::ResultsUnavailable(event_id),
            ImporterError::StorageError(e) => Self::from(e),
            other => Self::Upstream(other),
        }
    }
}
