//! Shared fixtures for integration tests.

use std::sync::Arc;

use puzzle_rush_back::{
    config::AppConfig,
    dao::memory::MemoryStore,
    dto::{
        session::CreateSessionRequest,
        team::{CreateTeamRequest, JoinTeamRequest, RegisterPlayerRequest},
    },
    services::{session_service, team_service},
    state::{AppState, SharedState},
};
use uuid::Uuid;

/// Fresh engine instance backed by an empty in-memory store.
pub async fn engine() -> SharedState {
    let state = AppState::new(AppConfig::default());
    state.install_store(Arc::new(MemoryStore::new())).await;
    state
}

/// Create a team with `count` registered and joined players.
///
/// Returns the team id and the player ids in roster order.
pub async fn team_with_players(state: &SharedState, count: usize) -> (Uuid, Vec<Uuid>) {
    let team = team_service::create_team(
        state,
        CreateTeamRequest {
            name: format!("team-{}", Uuid::new_v4()),
        },
    )
    .await
    .expect("create team");

    let mut players = Vec::with_capacity(count);
    for i in 0..count {
        let username = format!("player-{i}-{}", Uuid::new_v4());
        let player = team_service::register_player(
            state,
            RegisterPlayerRequest {
                username: username.clone(),
            },
        )
        .await
        .expect("register player");
        team_service::join_team(
            state,
            JoinTeamRequest {
                username,
                team_id: team.id,
            },
        )
        .await
        .expect("join team");
        players.push(player.id);
    }
    (team.id, players)
}

/// Create a session for the team and activate it immediately.
pub async fn active_session(state: &SharedState, team_id: Uuid) -> Uuid {
    let session = session_service::create_session(
        state,
        CreateSessionRequest {
            team_id,
            countdown_seconds: Some(600),
        },
    )
    .await
    .expect("create session");
    session_service::activate_session(state, session.id)
        .await
        .expect("activate session");
    session.id
}
