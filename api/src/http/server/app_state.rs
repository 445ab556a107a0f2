use notifications_core::{NotificationServices, NotificationsPushService, NotificationsService};

use crate::http::server::middleware::auth::entities::{AuthValidator, ServiceKeyValidator};

/// Application state shared across request handlers
#[derive(Clone)]
pub struct AppState {
    pub service: NotificationsService,
    pub push_service: NotificationsPushService,
    pub auth: AuthValidator,
    pub service_key: ServiceKeyValidator,
}

impl AppState {
    pub fn new(
        services: NotificationServices,
        auth: AuthValidator,
        service_key: ServiceKeyValidator,
    ) -> Self {
        Self {
            service: services.notification_service,
            push_service: services.push_service,
            auth,
            service_key,
        }
    }

    /// Shutdown the underlying database pool
    pub async fn shutdown(&self) {
        self.service.shutdown_pool().await
    }
}
