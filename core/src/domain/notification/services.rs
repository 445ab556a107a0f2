use tracing::{debug, warn};

use crate::domain::{
    common::{CoreError, GetPaginated, PaginationMeta, services::Service},
    health::port::HealthRepository,
    notification::{
        entities::{CreateNotificationInput, Notification, NotificationId, NotificationPage, UserId},
        ports::{NotificationRepository, NotificationService},
    },
    notification_settings::ports::{NotificationSettingsRepository, NotificationSettingsService},
    push::ports::PushDelivery,
};

impl<N, S, H, P> Service<N, S, H, P>
where
    N: NotificationRepository,
    S: NotificationSettingsRepository,
    H: HealthRepository,
    P: PushDelivery,
{
    /// Loads a notification and checks that `user_id` is its recipient.
    async fn find_owned(
        &self,
        id: &NotificationId,
        user_id: &UserId,
    ) -> Result<Notification, CoreError> {
        let notification = self
            .notification_repository
            .find_by_id(id)
            .await?
            .ok_or(CoreError::NotificationNotFound { id: *id })?;

        if !notification.is_owned_by(user_id) {
            return Err(CoreError::NotNotificationOwner { id: *id });
        }

        Ok(notification)
    }

    fn spawn_push(&self, notification: &Notification) {
        let Some(push_delivery) = self.push_delivery.get() else {
            debug!(id = %notification.id, "No push delivery configured");
            return;
        };

        let push_delivery = push_delivery.clone();
        let notification = notification.clone();
        tokio::spawn(async move {
            if let Err(e) = push_delivery.deliver(&notification).await {
                warn!(id = %notification.id, "Push delivery failed: {}", e);
            }
        });
    }
}

impl<N, S, H, P> NotificationService for Service<N, S, H, P>
where
    N: NotificationRepository,
    S: NotificationSettingsRepository,
    H: HealthRepository,
    P: PushDelivery,
{
    async fn list_notifications(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<NotificationPage, CoreError> {
        let notifications = self
            .notification_repository
            .list_by_user(user_id, pagination)
            .await?;
        let unread_count = self
            .notification_repository
            .count_unread_by_user(user_id)
            .await?;
        let total = self.notification_repository.count_by_user(user_id).await?;

        Ok(NotificationPage {
            notifications,
            unread_count,
            meta: PaginationMeta::new(total, pagination),
        })
    }

    async fn list_unread_notifications(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<NotificationPage, CoreError> {
        let notifications = self
            .notification_repository
            .list_unread_by_user(user_id, pagination)
            .await?;
        let unread_count = self
            .notification_repository
            .count_unread_by_user(user_id)
            .await?;

        Ok(NotificationPage {
            notifications,
            unread_count,
            meta: PaginationMeta::new(unread_count, pagination),
        })
    }

    async fn get_notification(
        &self,
        id: &NotificationId,
        user_id: &UserId,
    ) -> Result<Notification, CoreError> {
        self.find_owned(id, user_id).await
    }

    async fn mark_as_read(&self, id: &NotificationId, user_id: &UserId) -> Result<(), CoreError> {
        self.find_owned(id, user_id).await?;
        self.notification_repository.mark_as_read(id).await
    }

    async fn mark_all_as_read(&self, user_id: &UserId) -> Result<(), CoreError> {
        self.notification_repository.mark_all_as_read(user_id).await
    }

    async fn delete_notification(
        &self,
        id: &NotificationId,
        user_id: &UserId,
    ) -> Result<(), CoreError> {
        self.find_owned(id, user_id).await?;
        self.notification_repository.delete(id).await
    }

    async fn delete_all_notifications(&self, user_id: &UserId) -> Result<(), CoreError> {
        self.notification_repository.delete_all_by_user(user_id).await
    }

    async fn get_unread_count(&self, user_id: &UserId) -> Result<u64, CoreError> {
        self.notification_repository
            .count_unread_by_user(user_id)
            .await
    }

    async fn create_notification(&self, input: CreateNotificationInput) -> Result<(), CoreError> {
        let settings = self.get_settings(&input.recipient_id).await?;

        if !settings.allows(&input.notification_type) {
            debug!(
                recipient = %input.recipient_id,
                notification_type = %input.notification_type,
                "Notification type disabled by recipient, skipping"
            );
            return Ok(());
        }

        let notification = input.into_notification();
        self.notification_repository.create(&notification).await?;

        self.spawn_push(&notification);

        Ok(())
    }
}
