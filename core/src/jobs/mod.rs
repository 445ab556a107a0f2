//! Background jobs run by the notification service.

mod job;
mod notification_retention;
mod scheduler;

pub use job::{BackgroundJob, JobError, JobSchedule};
pub use notification_retention::NotificationRetentionJob;
pub use scheduler::Scheduler;
