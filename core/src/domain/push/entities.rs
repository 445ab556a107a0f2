use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::notification::entities::{
    CommentId, Notification, NotificationId, PostId, UserId,
};

// Is used to map database rows to domain entities
#[derive(Debug, sqlx::FromRow)]
pub struct PushSubscriptionRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub endpoint: String,
    pub created_at: DateTime<Utc>,
}

impl From<PushSubscriptionRow> for PushSubscription {
    fn from(row: PushSubscriptionRow) -> Self {
        PushSubscription {
            id: row.id,
            user_id: UserId(row.user_id),
            endpoint: row.endpoint,
            created_at: row.created_at,
        }
    }
}

/// A device endpoint that receives push payloads for a user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct PushSubscription {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub user_id: UserId,
    pub endpoint: String,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct SubscribePushInput {
    pub endpoint: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct UnsubscribePushInput {
    pub endpoint: String,
}

/// Body posted to every subscribed endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PushPayload {
    pub notification_id: NotificationId,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub message: String,
    pub sender_id: UserId,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
    pub created_at: DateTime<Utc>,
}

impl From<&Notification> for PushPayload {
    fn from(notification: &Notification) -> Self {
        PushPayload {
            notification_id: notification.id,
            notification_type: notification.notification_type.to_string(),
            message: notification.message.clone(),
            sender_id: notification.sender_id,
            post_id: notification.post_id,
            comment_id: notification.comment_id,
            created_at: notification.created_at,
        }
    }
}

/// Outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub pruned: usize,
    pub failed: usize,
}
