use axum::{Extension, Json, extract::State};
use notifications_core::domain::{
    notification::entities::UserId,
    notification_settings::{
        entities::{NotificationSettings, UpdateNotificationSettingsInput},
        ports::NotificationSettingsService,
    },
};

use crate::http::server::{ApiError, AppState, Response, middleware::auth::entities::UserIdentity};

#[utoipa::path(
    get,
    path = "/notifications/settings",
    tag = "notification-settings",
    responses(
        (status = 200, description = "Settings retrieved, defaults are created on first access", body = NotificationSettings),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_settings(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<NotificationSettings>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    let settings = state.service.get_settings(&user_id).await?;

    Ok(Response::ok(settings))
}

#[utoipa::path(
    put,
    path = "/notifications/settings",
    tag = "notification-settings",
    request_body = UpdateNotificationSettingsInput,
    responses(
        (status = 200, description = "Settings updated", body = NotificationSettings),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn update_settings(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(input): Json<UpdateNotificationSettingsInput>,
) -> Result<Response<NotificationSettings>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    let settings = state.service.update_settings(&user_id, input).await?;

    Ok(Response::ok(settings))
}
