use std::time::Duration;

use chrono::Utc;
use tracing::info;

use crate::{
    domain::notification::ports::NotificationRepository,
    jobs::job::{BackgroundJob, JobError, JobSchedule},
};

/// Deletes read notifications once they are older than the retention window.
/// Unread notifications are never touched.
pub struct NotificationRetentionJob<N: NotificationRepository> {
    notification_repository: N,
    retention: chrono::Duration,
    interval: Duration,
}

impl<N: NotificationRepository> NotificationRetentionJob<N> {
    pub fn new(notification_repository: N, retention_days: u32, interval: Duration) -> Self {
        Self {
            notification_repository,
            retention: chrono::Duration::days(i64::from(retention_days)),
            interval,
        }
    }
}

#[async_trait::async_trait]
impl<N: NotificationRepository> BackgroundJob for NotificationRetentionJob<N> {
    fn id(&self) -> &'static str {
        "notification_retention"
    }

    fn schedule(&self) -> JobSchedule {
        JobSchedule::Interval(self.interval)
    }

    async fn execute(&self) -> Result<(), JobError> {
        let cutoff = Utc::now()
            .checked_sub_signed(self.retention)
            .ok_or_else(|| {
                JobError::ExecutionFailed(format!(
                    "retention of {} days is out of range",
                    self.retention.num_days()
                ))
            })?;
        let removed = self
            .notification_repository
            .delete_read_before(cutoff)
            .await?;

        info!(%cutoff, removed, "Pruned read notifications");
        Ok(())
    }
}
