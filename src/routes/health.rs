use axum::{Json, Router, extract::State, routing::get};

use crate::{dto::health::HealthResponse, services::health_service, state::SharedState};

/// Health probe route.
pub fn router() -> Router<SharedState> {
    Router::new().route("/healthcheck", get(healthcheck))
}

/// Report service health, probing the storage backend.
#[utoipa::path(
    get,
    path = "/healthcheck",
    responses(
        (status = 200, description = "Current health", body = HealthResponse),
    ),
    tag = "health"
)]
pub async fn healthcheck(State(state): State<SharedState>) -> Json<HealthResponse> {
    Json(health_service::probe(&state).await)
}
