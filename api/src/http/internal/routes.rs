use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    internal::handlers::{__path_create_notification, create_notification},
    server::AppState,
};

pub fn internal_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(create_notification))
}
