use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::domain::{
    common::CoreError,
    notification::entities::UserId,
    notification_settings::entities::{NotificationSettings, UpdateNotificationSettingsInput},
};

pub trait NotificationSettingsRepository: Send + Sync {
    fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<Option<NotificationSettings>, CoreError>> + Send;

    /// Inserts a new record. Fails with `CoreError::SettingsAlreadyExist` when the
    /// user already has one; an existing record is never overwritten.
    fn create(
        &self,
        settings: &NotificationSettings,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Stores `settings` for `user_id`, inserting the record if it is missing.
    fn update(
        &self,
        user_id: &UserId,
        settings: &NotificationSettings,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

pub trait NotificationSettingsService: Send + Sync {
    /// Returns the user's settings, persisting the defaults on first access.
    fn get_settings(
        &self,
        user_id: &UserId,
    ) -> impl Future<Output = Result<NotificationSettings, CoreError>> + Send;

    /// Applies a partial update and returns the fully resolved settings.
    ///
    /// A missing record starts from the defaults. Unlike
    /// [`NotificationSettingsService::get_settings`], that fallback is only
    /// persisted together with the update itself.
    fn update_settings(
        &self,
        user_id: &UserId,
        changes: UpdateNotificationSettingsInput,
    ) -> impl Future<Output = Result<NotificationSettings, CoreError>> + Send;
}

#[derive(Clone, Default)]
pub struct MockNotificationSettingsRepository {
    settings: Arc<Mutex<HashMap<UserId, NotificationSettings>>>,
    create_calls: Arc<Mutex<usize>>,
}

impl MockNotificationSettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `create` calls that reached the store, including rejected ones.
    pub fn create_calls(&self) -> usize {
        *self.create_calls.lock().unwrap()
    }

    pub fn len(&self) -> usize {
        self.settings.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl NotificationSettingsRepository for MockNotificationSettingsRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationSettings>, CoreError> {
        let settings = self.settings.lock().unwrap();
        Ok(settings.get(user_id).cloned())
    }

    async fn create(&self, settings: &NotificationSettings) -> Result<(), CoreError> {
        *self.create_calls.lock().unwrap() += 1;

        let mut store = self.settings.lock().unwrap();
        if store.contains_key(&settings.user_id) {
            return Err(CoreError::SettingsAlreadyExist {
                user_id: settings.user_id,
            });
        }
        store.insert(settings.user_id, settings.clone());
        Ok(())
    }

    async fn update(
        &self,
        user_id: &UserId,
        settings: &NotificationSettings,
    ) -> Result<(), CoreError> {
        let mut store = self.settings.lock().unwrap();
        store.insert(*user_id, settings.clone());
        Ok(())
    }
}
