use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response as AxumResponse},
};
use notifications_core::domain::common::CoreError;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),

    #[error("Startup error: {0}")]
    StartupError(String),
}

#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    /// Status reason, e.g. "Not Found".
    pub error: String,
    pub message: String,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::InternalServerError(_) | ApiError::StartupError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> AxumResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        // Storage details stay in the logs
        let message = match &self {
            ApiError::InternalServerError(_) => "Internal server error".to_string(),
            other => other.to_string(),
        };

        let body = ErrorBody {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

impl From<CoreError> for ApiError {
    fn from(error: CoreError) -> Self {
        match error {
            CoreError::NotificationNotFound { .. } | CoreError::PushSubscriptionNotFound { .. } => {
                ApiError::NotFound(error.to_string())
            }
            CoreError::NotNotificationOwner { .. } => ApiError::Forbidden(error.to_string()),
            CoreError::InvalidPushEndpoint { .. } => ApiError::BadRequest(error.to_string()),
            CoreError::Unhealthy => ApiError::ServiceUnavailable(error.to_string()),
            CoreError::ServiceUnavailable(_)
            | CoreError::SettingsAlreadyExist { .. }
            | CoreError::PushEndpointGone { .. }
            | CoreError::PushDeliveryFailed { .. }
            | CoreError::DatabaseError { .. } => ApiError::InternalServerError(error.to_string()),
        }
    }
}
