use sqlx::{PgPool, query, query_as};
use uuid::Uuid;

use crate::domain::{
    common::CoreError,
    notification::entities::UserId,
    push::{
        entities::{PushSubscription, PushSubscriptionRow},
        ports::PushSubscriptionRepository,
    },
};

#[derive(Clone)]
pub struct PostgresPushSubscriptionRepository {
    pool: PgPool,
}

impl PostgresPushSubscriptionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl PushSubscriptionRepository for PostgresPushSubscriptionRepository {
    async fn upsert(&self, user_id: &UserId, endpoint: &str) -> Result<PushSubscription, CoreError> {
        // The no-op update makes RETURNING yield the existing row on conflict.
        let row = query_as::<_, PushSubscriptionRow>(
            r#"
            INSERT INTO push_subscriptions (id, user_id, endpoint)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, endpoint) DO UPDATE SET endpoint = EXCLUDED.endpoint
            RETURNING id, user_id, endpoint, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id.0)
        .bind(endpoint)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<PushSubscription>, CoreError> {
        let rows = query_as::<_, PushSubscriptionRow>(
            r#"
            SELECT id, user_id, endpoint, created_at
            FROM push_subscriptions
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PushSubscription::from).collect())
    }

    async fn delete(&self, user_id: &UserId, endpoint: &str) -> Result<(), CoreError> {
        let result = query("DELETE FROM push_subscriptions WHERE user_id = $1 AND endpoint = $2")
            .bind(user_id.0)
            .bind(endpoint)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::PushSubscriptionNotFound {
                endpoint: endpoint.to_string(),
            });
        }

        Ok(())
    }
}
