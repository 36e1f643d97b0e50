use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{PlayerEntity, TeamEntity},
    dto::team::{
        CreateTeamRequest, JoinTeamRequest, PlayerResponse, RegisterPlayerRequest, TeamResponse,
        TeamWithMembersResponse,
    },
    error::ServiceError,
    state::SharedState,
};

/// Register a new player with a unique username.
pub async fn register_player(
    state: &SharedState,
    req: RegisterPlayerRequest,
) -> Result<PlayerResponse, ServiceError> {
    let store = state.require_store().await?;

    if store
        .find_player_by_username(req.username.clone())
        .await?
        .is_some()
    {
        return Err(ServiceError::Conflict(format!(
            "username `{}` already registered",
            req.username
        )));
    }

    let player = store
        .insert_player(PlayerEntity {
            id: Uuid::new_v4(),
            username: req.username,
            team_id: None,
            points: state.config().starting_points(),
            color: None,
            seq: 0,
        })
        .await?;
    info!(user_id = %player.id, username = %player.username, "player registered");
    Ok(player.into())
}

/// Create a new team with a unique name.
pub async fn create_team(
    state: &SharedState,
    req: CreateTeamRequest,
) -> Result<TeamResponse, ServiceError> {
    let store = state.require_store().await?;

    if store.find_team_by_name(req.name.clone()).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "team name `{}` already taken",
            req.name
        )));
    }

    let team = TeamEntity {
        id: Uuid::new_v4(),
        name: req.name,
    };
    store.insert_team(team.clone()).await?;
    info!(team_id = %team.id, name = %team.name, "team created");
    Ok(team.into())
}

/// Attach a registered player to a team.
pub async fn join_team(
    state: &SharedState,
    req: JoinTeamRequest,
) -> Result<PlayerResponse, ServiceError> {
    let store = state.require_store().await?;

    let mut player = store
        .find_player_by_username(req.username.clone())
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{}` not found", req.username)))?;
    store
        .find_team(req.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", req.team_id)))?;

    if player.team_id == Some(req.team_id) {
        return Ok(player.into());
    }

    player.team_id = Some(req.team_id);
    store.update_player(player.clone()).await?;
    info!(user_id = %player.id, team_id = %req.team_id, "player joined team");
    Ok(player.into())
}

/// All teams with their current rosters.
pub async fn list_teams(
    state: &SharedState,
) -> Result<Vec<TeamWithMembersResponse>, ServiceError> {
    let store = state.require_store().await?;

    let mut teams = Vec::new();
    for team in store.list_teams().await? {
        let members = store
            .players_by_team(team.id)
            .await?
            .into_iter()
            .map(PlayerResponse::from)
            .collect();
        teams.push(TeamWithMembersResponse {
            id: team.id,
            name: team.name,
            members,
        });
    }
    Ok(teams)
}
