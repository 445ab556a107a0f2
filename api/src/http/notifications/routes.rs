use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    notifications::handlers::{
        __path_delete_all_notifications, __path_delete_notification, __path_get_notification,
        __path_get_unread_count, __path_list_notifications, __path_list_unread_notifications,
        __path_mark_all_as_read, __path_mark_as_read, delete_all_notifications,
        delete_notification, get_notification, get_unread_count, list_notifications,
        list_unread_notifications, mark_all_as_read, mark_as_read,
    },
    server::AppState,
};

pub fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_notifications))
        .routes(routes!(delete_all_notifications))
        .routes(routes!(list_unread_notifications))
        .routes(routes!(get_unread_count))
        .routes(routes!(mark_all_as_read))
        .routes(routes!(get_notification))
        .routes(routes!(delete_notification))
        .routes(routes!(mark_as_read))
}
