pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod jobs;

// Re-export commonly used types for convenience
pub use application::{
    JobOptions, NotificationRepositories, NotificationServices, NotificationsPushService,
    NotificationsService, PushOptions, create_repositories, create_scheduler,
};
pub use domain::common::services::Service;
pub use infrastructure::health::repositories::postgres::PostgresHealthRepository;
pub use infrastructure::notification::repositories::postgres::PostgresNotificationRepository;
pub use infrastructure::notification_settings::repositories::postgres::PostgresNotificationSettingsRepository;
