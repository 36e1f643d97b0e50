use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::puzzle::{
        AnswerRequest, AnswerResponse, CreatePuzzleRequest, DecayResponse, PuzzleStateResponse,
        TeamPoints,
    },
    error::AppError,
    services::{points, puzzle_service},
    state::SharedState,
};

/// Puzzle rotation and point economy routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/puzzle/create", post(create_puzzle))
        .route("/puzzle/current/{user_id}", get(current_puzzle))
        .route("/puzzle/answer", post(submit_answer))
        .route("/puzzle/points/{team_id}", get(team_points))
        .route("/puzzle/decay/{team_id}", post(decay_team))
}

/// Create a puzzle of an explicit family for a player.
#[utoipa::path(
    post,
    path = "/puzzle/create",
    request_body = CreatePuzzleRequest,
    responses(
        (status = 200, description = "Puzzle created", body = PuzzleStateResponse),
        (status = 404, description = "Session or player not found"),
    ),
    tag = "puzzle"
)]
pub async fn create_puzzle(
    State(state): State<SharedState>,
    Json(payload): Json<CreatePuzzleRequest>,
) -> Result<Json<PuzzleStateResponse>, AppError> {
    Ok(Json(puzzle_service::create_puzzle(&state, payload).await?))
}

/// The player's current active puzzle.
#[utoipa::path(
    get,
    path = "/puzzle/current/{user_id}",
    params(("user_id" = Uuid, Path, description = "Player id")),
    responses(
        (status = 200, description = "Active puzzle", body = PuzzleStateResponse),
        (status = 404, description = "No active puzzle for the player"),
    ),
    tag = "puzzle"
)]
pub async fn current_puzzle(
    State(state): State<SharedState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<PuzzleStateResponse>, AppError> {
    Ok(Json(puzzle_service::current_puzzle(&state, user_id).await?))
}

/// Resolve an answer submission and deal the replacement puzzle.
#[utoipa::path(
    post,
    path = "/puzzle/answer",
    request_body = AnswerRequest,
    responses(
        (status = 200, description = "Answer resolved", body = AnswerResponse),
        (status = 404, description = "Puzzle or player not found"),
        (status = 412, description = "Puzzle inactive or player eliminated"),
    ),
    tag = "puzzle"
)]
pub async fn submit_answer(
    State(state): State<SharedState>,
    Json(payload): Json<AnswerRequest>,
) -> Result<Json<AnswerResponse>, AppError> {
    Ok(Json(puzzle_service::submit_answer(&state, payload).await?))
}

/// Point totals for a team in roster order.
#[utoipa::path(
    get,
    path = "/puzzle/points/{team_id}",
    params(("team_id" = Uuid, Path, description = "Team id")),
    responses(
        (status = 200, description = "Team point report", body = TeamPoints),
        (status = 404, description = "Team not found"),
    ),
    tag = "puzzle"
)]
pub async fn team_points(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<TeamPoints>, AppError> {
    Ok(Json(puzzle_service::team_points(&state, team_id).await?))
}

/// Apply one decay step to a team manually.
#[utoipa::path(
    post,
    path = "/puzzle/decay/{team_id}",
    params(("team_id" = Uuid, Path, description = "Team id")),
    responses(
        (status = 200, description = "Decay applied", body = DecayResponse),
        (status = 404, description = "Team not found"),
    ),
    tag = "puzzle"
)]
pub async fn decay_team(
    State(state): State<SharedState>,
    Path(team_id): Path<Uuid>,
) -> Result<Json<DecayResponse>, AppError> {
    Ok(Json(points::decay_team(&state, team_id).await?))
}
