use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};

use crate::domain::notification::entities::{NotificationId, UserId};

pub mod services;

#[derive(Error, Debug, Clone)]
pub enum CoreError {
    #[error("Service is currently unavailable")]
    ServiceUnavailable(String),

    #[error("Notification with id {id} not found")]
    NotificationNotFound { id: NotificationId },

    #[error("Unauthorized: not the owner of notification {id}")]
    NotNotificationOwner { id: NotificationId },

    #[error("Notification settings already exist for user {user_id}")]
    SettingsAlreadyExist { user_id: UserId },

    #[error("Push subscription for endpoint {endpoint} not found")]
    PushSubscriptionNotFound { endpoint: String },

    #[error("Invalid push endpoint: {endpoint}")]
    InvalidPushEndpoint { endpoint: String },

    #[error("Push endpoint {endpoint} is no longer reachable")]
    PushEndpointGone { endpoint: String },

    #[error("Push delivery failed: {msg}")]
    PushDeliveryFailed { msg: String },

    #[error("Health check failed")]
    Unhealthy,

    #[error("Database error: {msg}")]
    DatabaseError { msg: String },
}

impl From<sqlx::Error> for CoreError {
    fn from(e: sqlx::Error) -> Self {
        CoreError::DatabaseError { msg: e.to_string() }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GetPaginated {
    #[serde(default)]
    pub offset: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    20
}

impl Default for GetPaginated {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: default_limit(),
        }
    }
}

pub type TotalPaginatedElements = u64;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct PaginationMeta {
    pub total: TotalPaginatedElements,
    pub offset: u32,
    pub limit: u32,
}

impl PaginationMeta {
    pub fn new(total: TotalPaginatedElements, pagination: &GetPaginated) -> Self {
        Self {
            total,
            offset: pagination.offset,
            limit: pagination.limit,
        }
    }
}
