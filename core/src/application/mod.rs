use std::{sync::Arc, time::Duration};

use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions},
};
use tracing::info;

use crate::{
    domain::common::{CoreError, services::Service},
    infrastructure::{
        health::repositories::postgres::PostgresHealthRepository,
        notification::repositories::postgres::PostgresNotificationRepository,
        notification_settings::repositories::postgres::PostgresNotificationSettingsRepository,
        push::repositories::{
            postgres::PostgresPushSubscriptionRepository, reqwest::ReqwestPushGateway,
        },
    },
    jobs::{NotificationRetentionJob, Scheduler},
};

/// Push service backed by PostgreSQL subscriptions and HTTP delivery.
pub type NotificationsPushService =
    crate::domain::push::services::PushService<PostgresPushSubscriptionRepository, ReqwestPushGateway>;

/// Concrete engine type with PostgreSQL repositories
pub type NotificationsService = Service<
    PostgresNotificationRepository,
    PostgresNotificationSettingsRepository,
    PostgresHealthRepository,
    NotificationsPushService,
>;

#[derive(Clone)]
pub struct NotificationRepositories {
    pub notification_repository: PostgresNotificationRepository,
    pub settings_repository: PostgresNotificationSettingsRepository,
    pub health_repository: PostgresHealthRepository,
    pub push_subscription_repository: PostgresPushSubscriptionRepository,
}

/// Options for the push collaborator.
#[derive(Clone, Debug)]
pub struct PushOptions {
    pub enabled: bool,
    pub timeout: Duration,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout: Duration::from_secs(5),
        }
    }
}

/// Options for the background jobs.
#[derive(Clone, Debug)]
pub struct JobOptions {
    /// Read notifications older than this are pruned; 0 disables pruning.
    pub retention_days: u32,
    pub retention_interval: Duration,
}

impl Default for JobOptions {
    fn default() -> Self {
        Self {
            retention_days: 90,
            retention_interval: Duration::from_secs(3600),
        }
    }
}

/// Every long-lived component the HTTP layer needs.
#[derive(Clone)]
pub struct NotificationServices {
    pub notification_service: NotificationsService,
    pub push_service: NotificationsPushService,
}

pub async fn create_repositories(
    pg_connection_options: PgConnectOptions,
    max_connections: u32,
) -> Result<NotificationRepositories, CoreError> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect_with(pg_connection_options)
        .await
        .map_err(|e| CoreError::ServiceUnavailable(e.to_string()))?;
    info!("Database connected");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .map_err(|e| CoreError::DatabaseError { msg: e.to_string() })?;
    info!("Database migrated");

    Ok(NotificationRepositories::from_pool(pool))
}

impl NotificationRepositories {
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            notification_repository: PostgresNotificationRepository::new(pool.clone()),
            settings_repository: PostgresNotificationSettingsRepository::new(pool.clone()),
            health_repository: PostgresHealthRepository::new(pool.clone()),
            push_subscription_repository: PostgresPushSubscriptionRepository::new(pool),
        }
    }

    /// Builds the engine and the push service, then binds push into the engine.
    ///
    /// Both are constructed from their own dependencies first; the engine only
    /// receives the push collaborator once it exists. With push disabled the
    /// engine simply has no collaborator and skips delivery.
    pub fn into_services(self, push_options: PushOptions) -> Result<NotificationServices, CoreError> {
        let notification_service = Service::new(
            self.notification_repository,
            self.settings_repository,
            self.health_repository,
        );

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| CoreError::ServiceUnavailable(e.to_string()))?;
        let push_service = NotificationsPushService::new(
            self.push_subscription_repository,
            ReqwestPushGateway::new(client, push_options.timeout),
        );

        if push_options.enabled {
            notification_service.set_push_delivery(push_service.clone());
            info!("Push delivery bound to notification engine");
        } else {
            info!("Push delivery disabled");
        }

        Ok(NotificationServices {
            notification_service,
            push_service,
        })
    }
}

pub fn create_scheduler(
    repositories: &NotificationRepositories,
    job_options: &JobOptions,
) -> Scheduler {
    let mut scheduler = Scheduler::new();

    if job_options.retention_days > 0 {
        scheduler.register_job(Arc::new(NotificationRetentionJob::new(
            repositories.notification_repository.clone(),
            job_options.retention_days,
            job_options.retention_interval,
        )));
    } else {
        info!("Notification retention disabled");
    }

    scheduler
}

impl NotificationsService {
    pub async fn shutdown_pool(&self) {
        self.notification_repository.pool.close().await;
    }
}
