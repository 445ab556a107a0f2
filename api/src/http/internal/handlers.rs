use axum::{Json, extract::State};
use notifications_core::domain::notification::{
    entities::CreateNotificationInput, ports::NotificationService,
};

use crate::http::server::{ApiError, AppState, Response, response::MessageResponse};

#[utoipa::path(
    post,
    path = "/internal/notifications",
    tag = "internal",
    request_body = CreateNotificationInput,
    params(
        ("x-internal-api-key" = String, Header, description = "Shared key of the calling service")
    ),
    responses(
        (status = 202, description = "Accepted; stored unless the recipient disabled this type", body = MessageResponse),
        (status = 400, description = "Bad request"),
        (status = 401, description = "Missing or wrong service key"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state, input))]
pub async fn create_notification(
    State(state): State<AppState>,
    Json(input): Json<CreateNotificationInput>,
) -> Result<Response<MessageResponse>, ApiError> {
    tracing::debug!(
        recipient = %input.recipient_id,
        notification_type = %input.notification_type,
        "Notification raised by upstream service"
    );
    state.service.create_notification(input).await?;

    Ok(Response::accepted(MessageResponse::new("Notification accepted")))
}
