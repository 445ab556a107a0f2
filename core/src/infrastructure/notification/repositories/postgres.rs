use chrono::{DateTime, Utc};
use sqlx::{PgPool, query, query_as, query_scalar};

use crate::domain::{
    common::{CoreError, GetPaginated},
    notification::{
        entities::{Notification, NotificationId, NotificationRow, UserId},
        ports::NotificationRepository,
    },
};

const SELECT_COLUMNS: &str =
    "id, user_id, sender_id, type, message, post_id, comment_id, is_read, created_at";

#[derive(Clone)]
pub struct PostgresNotificationRepository {
    pub(crate) pool: PgPool,
}

impl PostgresNotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn list_where(
        &self,
        condition: &str,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<Vec<Notification>, CoreError> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM notifications WHERE {condition} \
             ORDER BY created_at DESC LIMIT $2 OFFSET $3"
        );

        let rows = query_as::<_, NotificationRow>(&sql)
            .bind(user_id.0)
            .bind(pagination.limit as i64)
            .bind(pagination.offset as i64)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Notification::from).collect())
    }
}

impl NotificationRepository for PostgresNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<(), CoreError> {
        query(
            r#"
            INSERT INTO notifications
                (id, user_id, sender_id, type, message, post_id, comment_id, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(notification.id.0)
        .bind(notification.user_id.0)
        .bind(notification.sender_id.0)
        .bind(notification.notification_type.as_str())
        .bind(&notification.message)
        .bind(notification.post_id.map(|id| id.0))
        .bind(notification.comment_id.map(|id| id.0))
        .bind(notification.is_read)
        .bind(notification.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, id: &NotificationId) -> Result<Option<Notification>, CoreError> {
        let sql = format!("SELECT {SELECT_COLUMNS} FROM notifications WHERE id = $1");

        let row = query_as::<_, NotificationRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(Notification::from))
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<Vec<Notification>, CoreError> {
        self.list_where("user_id = $1", user_id, pagination).await
    }

    async fn list_unread_by_user(
        &self,
        user_id: &UserId,
        pagination: &GetPaginated,
    ) -> Result<Vec<Notification>, CoreError> {
        self.list_where("user_id = $1 AND is_read = FALSE", user_id, pagination)
            .await
    }

    async fn count_by_user(&self, user_id: &UserId) -> Result<u64, CoreError> {
        let count = query_scalar::<_, i64>("SELECT COUNT(*) FROM notifications WHERE user_id = $1")
            .bind(user_id.0)
            .fetch_one(&self.pool)
            .await?;

        Ok(count as u64)
    }

    async fn count_unread_by_user(&self, user_id: &UserId) -> Result<u64, CoreError> {
        let count = query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications WHERE user_id = $1 AND is_read = FALSE",
        )
        .bind(user_id.0)
        .fetch_one(&self.pool)
        .await?;

        Ok(count as u64)
    }

    async fn mark_as_read(&self, id: &NotificationId) -> Result<(), CoreError> {
        let result = query("UPDATE notifications SET is_read = TRUE WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotificationNotFound { id: *id });
        }

        Ok(())
    }

    async fn mark_all_as_read(&self, user_id: &UserId) -> Result<(), CoreError> {
        query("UPDATE notifications SET is_read = TRUE WHERE user_id = $1 AND is_read = FALSE")
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete(&self, id: &NotificationId) -> Result<(), CoreError> {
        let result = query("DELETE FROM notifications WHERE id = $1")
            .bind(id.0)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::NotificationNotFound { id: *id });
        }

        Ok(())
    }

    async fn delete_all_by_user(&self, user_id: &UserId) -> Result<(), CoreError> {
        query("DELETE FROM notifications WHERE user_id = $1")
            .bind(user_id.0)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn delete_read_before(&self, cutoff: DateTime<Utc>) -> Result<u64, CoreError> {
        let result = query("DELETE FROM notifications WHERE is_read = TRUE AND created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
