use axum::{Extension, Json, extract::State};
use notifications_core::domain::{
    notification::entities::UserId,
    push::{
        entities::{PushSubscription, SubscribePushInput, UnsubscribePushInput},
        ports::PushSubscriptionService,
    },
};

use crate::http::server::{
    ApiError, AppState, Response, middleware::auth::entities::UserIdentity,
    response::MessageResponse,
};

#[utoipa::path(
    get,
    path = "/push/subscriptions",
    tag = "push",
    responses(
        (status = 200, description = "Push subscriptions of the caller", body = Vec<PushSubscription>),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_subscriptions(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<Vec<PushSubscription>>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    let subscriptions = state.push_service.list_subscriptions(&user_id).await?;

    Ok(Response::ok(subscriptions))
}

#[utoipa::path(
    post,
    path = "/push/subscriptions",
    tag = "push",
    request_body = SubscribePushInput,
    responses(
        (status = 201, description = "Endpoint registered", body = PushSubscription),
        (status = 400, description = "Endpoint is not an absolute http(s) URL"),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(input): Json<SubscribePushInput>,
) -> Result<Response<PushSubscription>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    let subscription = state.push_service.subscribe(&user_id, input).await?;

    Ok(Response::created(subscription))
}

#[utoipa::path(
    delete,
    path = "/push/subscriptions",
    tag = "push",
    request_body = UnsubscribePushInput,
    responses(
        (status = 200, description = "Endpoint removed", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No subscription for this endpoint"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Json(input): Json<UnsubscribePushInput>,
) -> Result<Response<MessageResponse>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    state
        .push_service
        .unsubscribe(&user_id, &input.endpoint)
        .await?;

    Ok(Response::deleted(MessageResponse::new("Push subscription removed")))
}
