use tracing::{debug, info};

use crate::domain::{
    common::{CoreError, services::Service},
    health::port::HealthRepository,
    notification::{entities::UserId, ports::NotificationRepository},
    notification_settings::{
        entities::{NotificationSettings, UpdateNotificationSettingsInput},
        ports::{NotificationSettingsRepository, NotificationSettingsService},
    },
    push::ports::PushDelivery,
};

impl<N, S, H, P> NotificationSettingsService for Service<N, S, H, P>
where
    N: NotificationRepository,
    S: NotificationSettingsRepository,
    H: HealthRepository,
    P: PushDelivery,
{
    async fn get_settings(&self, user_id: &UserId) -> Result<NotificationSettings, CoreError> {
        if let Some(settings) = self.settings_repository.find_by_user(user_id).await? {
            return Ok(settings);
        }

        let defaults = NotificationSettings::defaults_for(*user_id);
        match self.settings_repository.create(&defaults).await {
            Ok(()) => {
                info!(%user_id, "Created default notification settings");
                Ok(defaults)
            }
            // A concurrent request created the record first: read the winner.
            Err(CoreError::SettingsAlreadyExist { .. }) => {
                debug!(%user_id, "Lost settings creation race, fetching stored record");
                self.settings_repository
                    .find_by_user(user_id)
                    .await?
                    .ok_or_else(|| CoreError::DatabaseError {
                        msg: format!("settings for user {user_id} vanished after conflict"),
                    })
            }
            Err(e) => Err(e),
        }
    }

    async fn update_settings(
        &self,
        user_id: &UserId,
        changes: UpdateNotificationSettingsInput,
    ) -> Result<NotificationSettings, CoreError> {
        let mut settings = self
            .settings_repository
            .find_by_user(user_id)
            .await?
            .unwrap_or_else(|| NotificationSettings::defaults_for(*user_id));

        settings.apply(&changes);

        self.settings_repository.update(user_id, &settings).await?;

        Ok(settings)
    }
}
