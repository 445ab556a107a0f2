use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    server::AppState,
    settings::handlers::{__path_get_settings, __path_update_settings, get_settings, update_settings},
};

pub fn settings_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(get_settings, update_settings))
}
