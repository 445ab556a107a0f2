use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::common::PaginationMeta;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[schema(value_type = String)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    pub fn new() -> Self {
        NotificationId(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for NotificationId {
    fn from(uuid: Uuid) -> Self {
        NotificationId(uuid)
    }
}

impl From<NotificationId> for Uuid {
    fn from(id: NotificationId) -> Self {
        id.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[schema(value_type = String)]
pub struct UserId(pub Uuid);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for UserId {
    fn from(uuid: Uuid) -> Self {
        UserId(uuid)
    }
}

impl From<UserId> for Uuid {
    fn from(user_id: UserId) -> Self {
        user_id.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[schema(value_type = String)]
pub struct PostId(pub Uuid);

impl From<Uuid> for PostId {
    fn from(uuid: Uuid) -> Self {
        PostId(uuid)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[schema(value_type = String)]
pub struct CommentId(pub Uuid);

impl From<Uuid> for CommentId {
    fn from(uuid: Uuid) -> Self {
        CommentId(uuid)
    }
}

/// Kind of event a notification reports.
///
/// The set is open: tags outside the four known kinds are kept verbatim in
/// `Other` so that new producers do not need a schema change.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NotificationType {
    Reply,
    Mention,
    Vote,
    Follow,
    Other(String),
}

impl NotificationType {
    pub fn as_str(&self) -> &str {
        match self {
            NotificationType::Reply => "reply",
            NotificationType::Mention => "mention",
            NotificationType::Vote => "vote",
            NotificationType::Follow => "follow",
            NotificationType::Other(tag) => tag,
        }
    }
}

impl From<&str> for NotificationType {
    fn from(tag: &str) -> Self {
        match tag {
            "reply" => NotificationType::Reply,
            "mention" => NotificationType::Mention,
            "vote" => NotificationType::Vote,
            "follow" => NotificationType::Follow,
            other => NotificationType::Other(other.to_string()),
        }
    }
}

impl From<String> for NotificationType {
    fn from(tag: String) -> Self {
        NotificationType::from(tag.as_str())
    }
}

impl From<NotificationType> for String {
    fn from(notification_type: NotificationType) -> Self {
        notification_type.as_str().to_string()
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// Is used to map database rows to domain entities
#[derive(Debug, sqlx::FromRow)]
pub struct NotificationRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub sender_id: Uuid,
    #[sqlx(rename = "type")]
    pub notification_type: String,
    pub message: String,
    pub post_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl From<NotificationRow> for Notification {
    fn from(row: NotificationRow) -> Self {
        Notification {
            id: NotificationId(row.id),
            user_id: UserId(row.user_id),
            sender_id: UserId(row.sender_id),
            notification_type: NotificationType::from(row.notification_type),
            message: row.message,
            post_id: row.post_id.map(PostId),
            comment_id: row.comment_id.map(CommentId),
            is_read: row.is_read,
            created_at: row.created_at,
        }
    }
}

// Is used in API responses
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, ToSchema)]
pub struct Notification {
    pub id: NotificationId,
    /// Recipient and owner of the notification.
    pub user_id: UserId,
    pub sender_id: UserId,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "reply")]
    pub notification_type: NotificationType,
    pub message: String,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
    pub is_read: bool,

    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

/// Raised by upstream services (comments, votes, follows).
#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct CreateNotificationInput {
    pub recipient_id: UserId,
    pub sender_id: UserId,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "reply")]
    pub notification_type: NotificationType,
    pub message: String,
    pub post_id: Option<PostId>,
    pub comment_id: Option<CommentId>,
}

impl CreateNotificationInput {
    /// Builds the unread row persisted for this input.
    pub fn into_notification(self) -> Notification {
        Notification {
            id: NotificationId::new(),
            user_id: self.recipient_id,
            sender_id: self.sender_id,
            notification_type: self.notification_type,
            message: self.message,
            post_id: self.post_id,
            comment_id: self.comment_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, ToSchema)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub unread_count: u64,
    pub meta: PaginationMeta,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, ToSchema)]
pub struct UnreadCount {
    pub unread_count: u64,
}
