use axum::{
    Extension,
    extract::{Path, Query, State},
};
use notifications_core::domain::{
    common::GetPaginated,
    notification::{
        entities::{Notification, NotificationId, UnreadCount, UserId},
        ports::NotificationService,
    },
};
use uuid::Uuid;

use crate::http::server::{
    ApiError, AppState, Response,
    middleware::auth::entities::UserIdentity,
    response::{MessageResponse, PaginatedResponse},
};

pub const MAX_PAGE_LIMIT: u32 = 100;

fn bounded(pagination: GetPaginated) -> GetPaginated {
    GetPaginated {
        offset: pagination.offset,
        limit: pagination.limit.min(MAX_PAGE_LIMIT),
    }
}

#[utoipa::path(
    get,
    path = "/notifications",
    tag = "notifications",
    params(
        GetPaginated
    ),
    responses(
        (status = 200, description = "Notifications retrieved successfully", body = PaginatedResponse<Notification>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Query(pagination): Query<GetPaginated>,
) -> Result<Response<PaginatedResponse<Notification>>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    let page = state
        .service
        .list_notifications(&user_id, &bounded(pagination))
        .await?;

    Ok(Response::ok(PaginatedResponse {
        data: page.notifications,
        unread_count: page.unread_count,
        meta: page.meta,
    }))
}

#[utoipa::path(
    get,
    path = "/notifications/unread",
    tag = "notifications",
    params(
        GetPaginated
    ),
    responses(
        (status = 200, description = "Unread notifications retrieved successfully", body = PaginatedResponse<Notification>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
#[tracing::instrument(skip(state))]
pub async fn list_unread_notifications(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Query(pagination): Query<GetPaginated>,
) -> Result<Response<PaginatedResponse<Notification>>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    let page = state
        .service
        .list_unread_notifications(&user_id, &bounded(pagination))
        .await?;

    Ok(Response::ok(PaginatedResponse {
        data: page.notifications,
        unread_count: page.unread_count,
        meta: page.meta,
    }))
}

#[utoipa::path(
    get,
    path = "/notifications/unread-count",
    tag = "notifications",
    responses(
        (status = 200, description = "Unread count retrieved successfully", body = UnreadCount),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_unread_count(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<UnreadCount>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    let unread_count = state.service.get_unread_count(&user_id).await?;

    Ok(Response::ok(UnreadCount { unread_count }))
}

#[utoipa::path(
    get,
    path = "/notifications/{id}",
    tag = "notifications",
    params(
        ("id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification retrieved successfully", body = Notification),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Notification belongs to another user"),
        (status = 404, description = "Notification not found"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn get_notification(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Response<Notification>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    let notification = state
        .service
        .get_notification(&NotificationId::from(id), &user_id)
        .await?;

    Ok(Response::ok(notification))
}

#[utoipa::path(
    put,
    path = "/notifications/{id}/read",
    tag = "notifications",
    params(
        ("id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Notification belongs to another user"),
        (status = 404, description = "Notification not found"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn mark_as_read(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Response<MessageResponse>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    state
        .service
        .mark_as_read(&NotificationId::from(id), &user_id)
        .await?;

    Ok(Response::ok(MessageResponse::new("Notification marked as read")))
}

#[utoipa::path(
    put,
    path = "/notifications/read-all",
    tag = "notifications",
    responses(
        (status = 200, description = "All notifications marked as read", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn mark_all_as_read(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<MessageResponse>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    state.service.mark_all_as_read(&user_id).await?;

    Ok(Response::ok(MessageResponse::new(
        "All notifications marked as read",
    )))
}

#[utoipa::path(
    delete,
    path = "/notifications/{id}",
    tag = "notifications",
    params(
        ("id" = String, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification deleted successfully", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Notification belongs to another user"),
        (status = 404, description = "Notification not found"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_notification(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
    Path(id): Path<Uuid>,
) -> Result<Response<MessageResponse>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    state
        .service
        .delete_notification(&NotificationId::from(id), &user_id)
        .await?;

    Ok(Response::deleted(MessageResponse::new("Notification deleted")))
}

#[utoipa::path(
    delete,
    path = "/notifications",
    tag = "notifications",
    responses(
        (status = 200, description = "All notifications deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized"),
    )
)]
#[tracing::instrument(skip(state))]
pub async fn delete_all_notifications(
    State(state): State<AppState>,
    Extension(user_identity): Extension<UserIdentity>,
) -> Result<Response<MessageResponse>, ApiError> {
    let user_id = UserId::from(user_identity.user_id);
    state.service.delete_all_notifications(&user_id).await?;

    Ok(Response::deleted(MessageResponse::new(
        "All notifications deleted",
    )))
}
