use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::session::{CreateSessionRequest, SessionResponse, SessionStateUpdateRequest},
    error::AppError,
    services::session_service,
    state::SharedState,
};

/// Session lifecycle routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/game/session", post(create_session))
        .route("/game/session/{team_id}", get(latest_session))
        .route("/game/session/{session_id}/start", post(start_session))
        .route("/game/session/{session_id}/state", post(update_state))
}

/// Create a session for a team and start its countdown.
#[utoipa::path(
    post,
    path = "/game/session",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created in countdown", body = SessionResponse),
        (status = 404, description = "Team not found"),
        (status = 409, description = "A non-finished session already exists for the team"),
    ),
    tag = "game"
)]
pub async fn create_session(
    State(state): State<SharedState>,
    Json(payload): Json<CreateSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(session_service::create_session(&state, payload).await?))
}

/// Latest session for a team.
#[utoipa::path(
    get,
    path = "/game/session/{team_id}",
    params(("team_id" = Uuid, Path, description = "Team id")),
    responses(
        (status = 200, description = "Most recent session", body = SessionResponse),
        (status = 404, description = "Team has no session"),
    ),
    tag = "game"
)]
pub async fn latest_session(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(session_service::latest_session(&state, team_id).await?))
}

/// Activate a counting-down session immediately.
#[utoipa::path(
    post,
    path = "/game/session/{session_id}/start",
    params(("session_id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session activated", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session is not in countdown"),
    ),
    tag = "game"
)]
pub async fn start_session(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(
        session_service::activate_session(&state, session_id).await?,
    ))
}

/// Drive a validated status change.
#[utoipa::path(
    post,
    path = "/game/session/{session_id}/state",
    params(("session_id" = Uuid, Path, description = "Session id")),
    request_body = SessionStateUpdateRequest,
    responses(
        (status = 200, description = "Status changed", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Requested transition is not legal"),
    ),
    tag = "game"
)]
pub async fn update_state(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
    Json(payload): Json<SessionStateUpdateRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    Ok(Json(
        session_service::update_state(&state, session_id, payload.status).await?,
    ))
}
