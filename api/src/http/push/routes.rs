use utoipa_axum::{router::OpenApiRouter, routes};

use crate::http::{
    push::handlers::{
        __path_list_subscriptions, __path_subscribe, __path_unsubscribe, list_subscriptions,
        subscribe, unsubscribe,
    },
    server::AppState,
};

pub fn push_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(list_subscriptions, subscribe, unsubscribe))
}
