use sqlx::{PgPool, query, query_as};

use crate::domain::{
    common::CoreError,
    notification::entities::UserId,
    notification_settings::{
        entities::{NotificationSettings, NotificationSettingsRow},
        ports::NotificationSettingsRepository,
    },
};

#[derive(Clone)]
pub struct PostgresNotificationSettingsRepository {
    pool: PgPool,
}

impl PostgresNotificationSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl NotificationSettingsRepository for PostgresNotificationSettingsRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<NotificationSettings>, CoreError> {
        let row = query_as::<_, NotificationSettingsRow>(
            r#"
            SELECT user_id, replies, mentions, votes, follows, email_notifications, updated_at
            FROM notification_settings
            WHERE user_id = $1
            "#,
        )
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(NotificationSettings::from))
    }

    async fn create(&self, settings: &NotificationSettings) -> Result<(), CoreError> {
        // Zero rows affected means the user already has settings.
        let result = query(
            r#"
            INSERT INTO notification_settings
                (user_id, replies, mentions, votes, follows, email_notifications, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO NOTHING
            "#,
        )
        .bind(settings.user_id.0)
        .bind(settings.replies)
        .bind(settings.mentions)
        .bind(settings.votes)
        .bind(settings.follows)
        .bind(settings.email_notifications)
        .bind(settings.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::SettingsAlreadyExist {
                user_id: settings.user_id,
            });
        }

        Ok(())
    }

    async fn update(
        &self,
        user_id: &UserId,
        settings: &NotificationSettings,
    ) -> Result<(), CoreError> {
        query(
            r#"
            INSERT INTO notification_settings
                (user_id, replies, mentions, votes, follows, email_notifications, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (user_id) DO UPDATE SET
                replies = EXCLUDED.replies,
                mentions = EXCLUDED.mentions,
                votes = EXCLUDED.votes,
                follows = EXCLUDED.follows,
                email_notifications = EXCLUDED.email_notifications,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(user_id.0)
        .bind(settings.replies)
        .bind(settings.mentions)
        .bind(settings.votes)
        .bind(settings.follows)
        .bind(settings.email_notifications)
        .bind(settings.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
