use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::color::{
        AssignColorRequest, ColorAssignmentResponse, ColorValidationResponse,
        ResolveColorsResponse,
    },
    error::AppError,
    services::color_service,
    state::SharedState,
};

/// Cursor color assignment routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/color/assign", post(assign_color))
        .route("/color/validate/{team_id}", get(validate_colors))
        .route("/color/resolve/{team_id}", post(resolve_colors))
}

/// Assign a team-unique cursor color to a player.
#[utoipa::path(
    post,
    path = "/color/assign",
    request_body = AssignColorRequest,
    responses(
        (status = 200, description = "Assignment outcome", body = ColorAssignmentResponse),
        (status = 400, description = "Player is not on the team"),
        (status = 404, description = "Player or team not found"),
    ),
    tag = "color"
)]
pub async fn assign_color(
    State(state): State<SharedState>,
    Json(payload): Json<AssignColorRequest>,
) -> Result<Json<ColorAssignmentResponse>, AppError> {
    Ok(Json(color_service::assign(&state, payload).await?))
}

/// Audit a team's colors for duplicates.
#[utoipa::path(
    get,
    path = "/color/validate/{team_id}",
    params(("team_id" = Uuid, Path, description = "Team id")),
    responses(
        (status = 200, description = "Audit result", body = ColorValidationResponse),
        (status = 404, description = "Team not found"),
    ),
    tag = "color"
)]
pub async fn validate_colors(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ColorValidationResponse>, AppError> {
    Ok(Json(color_service::validate(&state, team_id).await?))
}

/// Deterministically reassign a team's colors.
#[utoipa::path(
    post,
    path = "/color/resolve/{team_id}",
    params(("team_id" = Uuid, Path, description = "Team id")),
    responses(
        (status = 200, description = "Resolution outcome", body = ResolveColorsResponse),
        (status = 404, description = "Team not found"),
    ),
    tag = "color"
)]
pub async fn resolve_colors(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<ResolveColorsResponse>, AppError> {
    Ok(Json(color_service::resolve_conflicts(&state, team_id).await?))
}
