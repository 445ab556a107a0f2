use std::time::Duration;

use thiserror::Error;

use crate::domain::common::CoreError;

/// Schedule for when a job should run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobSchedule {
    /// Run at fixed intervals, first run one interval after start
    Interval(Duration),
}

#[derive(Debug, Error)]
pub enum JobError {
    #[error("Execution failed: {0}")]
    ExecutionFailed(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Trait for background jobs.
///
/// Jobs run on the tokio runtime; a failing run is logged and the job is tried
/// again on its next tick.
#[async_trait::async_trait]
pub trait BackgroundJob: Send + Sync {
    /// Unique identifier for this job.
    fn id(&self) -> &'static str;

    /// When this job should be scheduled to run.
    fn schedule(&self) -> JobSchedule;

    /// Execute the job once.
    async fn execute(&self) -> Result<(), JobError>;
}
