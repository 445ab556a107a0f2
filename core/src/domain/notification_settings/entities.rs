use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::notification::entities::{NotificationType, UserId};

// Is used to map database rows to domain entities
#[derive(Debug, sqlx::FromRow)]
pub struct NotificationSettingsRow {
    pub user_id: Uuid,
    pub replies: bool,
    pub mentions: bool,
    pub votes: bool,
    pub follows: bool,
    pub email_notifications: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<NotificationSettingsRow> for NotificationSettings {
    fn from(row: NotificationSettingsRow) -> Self {
        NotificationSettings {
            user_id: UserId(row.user_id),
            replies: row.replies,
            mentions: row.mentions,
            votes: row.votes,
            follows: row.follows,
            email_notifications: row.email_notifications,
            updated_at: row.updated_at,
        }
    }
}

/// Per-user notification preferences. At most one record exists per user.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, ToSchema)]
pub struct NotificationSettings {
    pub user_id: UserId,
    pub replies: bool,
    pub mentions: bool,
    pub votes: bool,
    pub follows: bool,
    pub email_notifications: bool,

    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTime<Utc>,
}

impl NotificationSettings {
    /// Replies, mentions and follows are on; votes and email are off.
    pub fn defaults_for(user_id: UserId) -> Self {
        Self {
            user_id,
            replies: true,
            mentions: true,
            votes: false,
            follows: true,
            email_notifications: false,
            updated_at: Utc::now(),
        }
    }

    /// Whether a notification of this type may be raised for the user.
    ///
    /// Types without a dedicated toggle are always allowed.
    pub fn allows(&self, notification_type: &NotificationType) -> bool {
        match notification_type {
            NotificationType::Reply => self.replies,
            NotificationType::Mention => self.mentions,
            NotificationType::Vote => self.votes,
            NotificationType::Follow => self.follows,
            NotificationType::Other(_) => true,
        }
    }

    /// Overwrites only the fields present in `changes` and stamps the update time.
    pub fn apply(&mut self, changes: &UpdateNotificationSettingsInput) {
        if let Some(replies) = changes.replies {
            self.replies = replies;
        }
        if let Some(mentions) = changes.mentions {
            self.mentions = mentions;
        }
        if let Some(votes) = changes.votes {
            self.votes = votes;
        }
        if let Some(follows) = changes.follows {
            self.follows = follows;
        }
        if let Some(email_notifications) = changes.email_notifications {
            self.email_notifications = email_notifications;
        }
        self.updated_at = Utc::now();
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, ToSchema)]
pub struct UpdateNotificationSettingsInput {
    pub replies: Option<bool>,
    pub mentions: Option<bool>,
    pub votes: Option<bool>,
    pub follows: Option<bool>,
    pub email_notifications: Option<bool>,
}
