use crate::domain::{
    common::{CoreError, services::Service},
    health::{
        entities::IsHealthy,
        port::{HealthRepository, HealthService},
    },
    notification::ports::NotificationRepository,
    notification_settings::ports::NotificationSettingsRepository,
    push::ports::PushDelivery,
};

impl<N, S, H, P> HealthService for Service<N, S, H, P>
where
    N: NotificationRepository,
    S: NotificationSettingsRepository,
    H: HealthRepository,
    P: PushDelivery,
{
    async fn check_health(&self) -> Result<IsHealthy, CoreError> {
        self.health_repository.ping().await.to_result()
    }
}
