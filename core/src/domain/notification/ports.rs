use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};

use crate::domain::{
    common::{CoreError, GetPaginated},
    notification::entities::{
        CreateNotificationInput, Notification, NotificationId, NotificationPage, UserId,
    },
};

pub trait NotificationRepository: Send + Sync {
    fn create(
        &self,
        notification: &Notification,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn find_by_id(
        &self,
        id: &NotificationId,
    ) -> impl Future<Output = Result<Option<Notification>, CoreError>> + Send;

    /// Newest first.
    fn list_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<Vec<Notification>, CoreError>> + Send;

    /// Newest first, unread only.
    fn list_unread_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<Vec<Notification>, CoreError>> + Send;

    fn count_by_user(&self, user_id: &UserId)
    -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn count_unread_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn mark_as_read(&self, id: &NotificationId)
    -> impl Future<Output = Result<(), CoreError>> + Send;

    fn mark_all_as_read(&self, user_id: &UserId)
    -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete(&self, id: &NotificationId) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete_all_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Removes read notifications created before `cutoff`, returning how many were removed.
    fn delete_read_before(
        &self,
        cutoff: DateTime<Utc>,
    ) -> impl Future<Output = Result<u64, CoreError>> + Send;
}

/// The notification engine as seen by the HTTP layer and by upstream services
/// (comments, votes, follows) that raise notifications.
///
/// Every single-item operation loads the notification first and refuses to go on
/// when the caller is not its recipient, so ownership is checked before any
/// mutation happens.
pub trait NotificationService: Send + Sync {
    /// Returns a page of the user's notifications together with the unread and total counts.
    ///
    /// All three storage reads must succeed; no partial page is returned.
    fn list_notifications(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<NotificationPage, CoreError>> + Send;

    /// Same as [`NotificationService::list_notifications`] restricted to unread items.
    /// The pagination total is the unread count.
    fn list_unread_notifications(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> impl Future<Output = Result<NotificationPage, CoreError>> + Send;

    /// # Errors
    ///
    /// - `CoreError::NotificationNotFound` - No notification exists with the given ID
    /// - `CoreError::NotNotificationOwner` - The notification belongs to another user
    fn get_notification(
        &self,
        id: &NotificationId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Notification, CoreError>> + Send;

    /// Flips the read flag. Marking an already read notification succeeds.
    fn mark_as_read(
        &self,
        id: &NotificationId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn mark_all_as_read(&self, user_id: &UserId)
    -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete_notification(
        &self,
        id: &NotificationId,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete_all_notifications(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn get_unread_count(&self, user_id: &UserId)
    -> impl Future<Output = Result<u64, CoreError>> + Send;

    /// Raises a notification for `input.recipient_id`.
    ///
    /// Returns `Ok(())` without writing anything when the recipient disabled this
    /// kind of notification. When a push collaborator is bound, delivery is
    /// spawned in the background and its outcome never reaches the caller.
    fn create_notification(
        &self,
        input: CreateNotificationInput,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

#[derive(Clone, Default)]
pub struct MockNotificationRepository {
    notifications: Arc<Mutex<Vec<Notification>>>,
}

impl MockNotificationRepository {
    pub fn new() -> Self {
        Self {
            notifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Snapshot of every stored notification, for assertions.
    pub fn all(&self) -> Vec<Notification> {
        self.notifications.lock().unwrap().clone()
    }

    fn page<F>(&self, pagination: &GetPaginated, filter: F) -> Vec<Notification>
    where
        F: Fn(&Notification) -> bool,
    {
        let notifications = self.notifications.lock().unwrap();

        let mut filtered: Vec<Notification> =
            notifications.iter().filter(|n| filter(n)).cloned().collect();
        filtered.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        filtered
            .into_iter()
            .skip(pagination.offset as usize)
            .take(pagination.limit as usize)
            .collect()
    }
}

impl NotificationRepository for MockNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<(), CoreError> {
        let mut notifications = self.notifications.lock().unwrap();
        notifications.push(notification.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &NotificationId) -> Result<Option<Notification>, CoreError> {
        let notifications = self.notifications.lock().unwrap();
        Ok(notifications.iter().find(|n| &n.id == id).cloned())
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<Vec<Notification>, CoreError> {
        Ok(self.page(pagination, |n| &n.user_id == user_id))
    }

    async fn list_unread_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<Vec<Notification>, CoreError> {
        Ok(self.page(pagination, |n| &n.user_id == user_id && !n.is_read))
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, CoreError> {
        let notifications = self.notifications.lock().unwrap();
        Ok(notifications.iter().filter(|n| &n.user_id == user_id).count() as u64)
    }

    async fn count_unread_by_user(&self, user_id: &UserId) -> Result<u64, CoreError> {
        let notifications = self.notifications.lock().unwrap();
        Ok(notifications
            .iter()
            .filter(|n| &n.user_id == user_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_as_read(&self, id: &NotificationId) -> Result<(), CoreError> {
        let mut notifications = self.notifications.lock().unwrap();

        match notifications.iter_mut().find(|n| &n.id == id) {
            Some(notification) => {
                notification.is_read = true;
                Ok(())
            }
            None => Err(CoreError::NotificationNotFound { id: *id }),
        }
    }

    async fn mark_all_as_read(&self, user_id: &UserId) -> Result<(), CoreError> {
        let mut notifications = self.notifications.lock().unwrap();
        notifications
            .iter_mut()
            .filter(|n| &n.user_id == user_id)
            .for_each(|n| n.is_read = true);
        Ok(())
    }

    async fn delete(&self, id: &NotificationId) -> Result<(), CoreError> {
        let mut notifications = self.notifications.lock().unwrap();

        let count_before = notifications.len();
        notifications.retain(|n| &n.id != id);

        if notifications.len() == count_before {
            return Err(CoreError::NotificationNotFound { id: *id });
        }

        Ok(())
    }

    async fn delete_all_by_user(&self, user_id: &UserId) -> Result<(), CoreError> {
        let mut notifications = self.notifications.lock().unwrap();
        notifications.retain(|n| &n.user_id != user_id);
        Ok(())
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> Result<u64, CoreError> {
        let mut notifications = self.notifications.lock().unwrap();

        let count_before = notifications.len();
        notifications.retain(|n| !(n.is_read && n.created_at < cutoff));

        Ok((count_before - notifications.len()) as u64)
    }
}
