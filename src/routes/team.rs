use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::team::{
        CreateTeamRequest, JoinTeamRequest, PlayerResponse, RegisterPlayerRequest, TeamResponse,
        TeamWithMembersResponse,
    },
    error::AppError,
    services::team_service,
    state::SharedState,
};

/// Team and player registration routes.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/team/register", post(register_player))
        .route("/team/create", post(create_team))
        .route("/team/join", post(join_team))
        .route("/team", get(list_teams))
}

/// Register a new player.
#[utoipa::path(
    post,
    path = "/team/register",
    request_body = RegisterPlayerRequest,
    responses(
        (status = 200, description = "Player registered", body = PlayerResponse),
        (status = 400, description = "Invalid username"),
        (status = 409, description = "Username already registered"),
    ),
    tag = "team"
)]
pub async fn register_player(
    State(state): State<SharedState>,
    Json(payload): Json<RegisterPlayerRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    payload.validate()?;
    Ok(Json(team_service::register_player(&state, payload).await?))
}

/// Create a new team.
#[utoipa::path(
    post,
    path = "/team/create",
    request_body = CreateTeamRequest,
    responses(
        (status = 200, description = "Team created", body = TeamResponse),
        (status = 400, description = "Invalid team name"),
        (status = 409, description = "Team name already taken"),
    ),
    tag = "team"
)]
pub async fn create_team(
    State(state): State<SharedState>,
    Json(payload): Json<CreateTeamRequest>,
) -> Result<Json<TeamResponse>, AppError> {
    payload.validate()?;
    Ok(Json(team_service::create_team(&state, payload).await?))
}

/// Attach a registered player to a team.
#[utoipa::path(
    post,
    path = "/team/join",
    request_body = JoinTeamRequest,
    responses(
        (status = 200, description = "Player joined", body = PlayerResponse),
        (status = 404, description = "Player or team not found"),
    ),
    tag = "team"
)]
pub async fn join_team(
    State(state): State<SharedState>,
    Json(payload): Json<JoinTeamRequest>,
) -> Result<Json<PlayerResponse>, AppError> {
    payload.validate()?;
    Ok(Json(team_service::join_team(&state, payload).await?))
}

/// List all teams with their rosters.
#[utoipa::path(
    get,
    path = "/team",
    responses(
        (status = 200, description = "All teams", body = [TeamWithMembersResponse]),
    ),
    tag = "team"
)]
pub async fn list_teams(
    State(state): State<SharedState>,
) -> Result<Json<Vec<TeamWithMembersResponse>>, AppError> {
    Ok(Json(team_service::list_teams(&state).await?))
}
