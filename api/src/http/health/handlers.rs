use axum::{Json, extract::State};
use notifications_core::domain::health::{entities::IsHealthy, port::HealthService};

use crate::http::server::{ApiError, AppState};

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Database reachable", body = IsHealthy),
        (status = 503, description = "Database unreachable"),
    )
)]
pub async fn health_check(State(state): State<AppState>) -> Result<Json<IsHealthy>, ApiError> {
    let healthy = state.service.check_health().await?;
    Ok(Json(healthy))
}
