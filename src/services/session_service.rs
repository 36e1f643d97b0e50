use std::time::Duration;

use time::OffsetDateTime;
use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{GameSessionEntity, SessionStatus},
    dto::session::{CreateSessionRequest, SessionResponse},
    error::ServiceError,
    services::{broadcast, countdown, puzzle_service},
    state::{SharedState, session_machine},
};

/// Create a new session for a team and arm its pre-game countdown.
///
/// The session is born in `countdown`; a team can hold at most one
/// non-finished session at a time.
pub async fn create_session(
    state: &SharedState,
    req: CreateSessionRequest,
) -> Result<SessionResponse, ServiceError> {
    let store = state.require_store().await?;

    let team = store
        .find_team(req.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", req.team_id)))?;

    if let Some(existing) = store.unfinished_session_for_team(team.id).await? {
        return Err(ServiceError::Conflict(format!(
            "game session `{}` already exists for this team",
            existing.id
        )));
    }

    let session = GameSessionEntity {
        id: Uuid::new_v4(),
        team_id: team.id,
        status: SessionStatus::Countdown,
        created_at: OffsetDateTime::now_utc(),
        started_at: None,
        ended_at: None,
        survival_time_seconds: None,
    };
    store.insert_session(session.clone()).await?;

    // Seed the color cache so cursor events can skip the store from frame one.
    for player in store.players_by_team(team.id).await? {
        if let Some(color) = player.color {
            state.ephemeral().cache_color(session.id, player.id, color);
        }
    }

    let duration = req
        .countdown_seconds
        .map(Duration::from_secs)
        .unwrap_or_else(|| state.config().countdown());
    countdown::start(state, session.id, duration);
    info!(
        session_id = %session.id,
        team_id = %team.id,
        countdown_seconds = duration.as_secs(),
        "session created"
    );

    broadcast::broadcast_state(state, session.id).await;
    Ok(session.into())
}

/// Move a `countdown` session to `active`.
///
/// Resets every roster member to the configured starting points and deals each
/// one a fresh random puzzle. Runs under the session's transition gate, so a
/// racing countdown timer and a manual start cannot both activate.
pub async fn activate_session(
    state: &SharedState,
    session_id: Uuid,
) -> Result<SessionResponse, ServiceError> {
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    let store = state.require_store().await?;
    let mut session = store
        .find_session(session_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game session `{session_id}` not found")))?;
    session_machine::ensure_transition(session.status, SessionStatus::Active)?;

    // A manual start supersedes a still-armed timer.
    countdown::stop(state, session_id);

    session.status = SessionStatus::Active;
    session.started_at = Some(OffsetDateTime::now_utc());

    let starting_points = state.config().starting_points();
    for mut player in store.players_by_team(session.team_id).await? {
        player.points = starting_points;
        let player_id = player.id;
        store.update_player(player).await?;
        puzzle_service::spawn_for_player(&store, session_id, player_id).await?;
    }

    store.update_session(session.clone()).await?;
    info!(session_id = %session_id, "session activated");

    broadcast::broadcast_state(state, session_id).await;
    Ok(session.into())
}

/// Move an `active` session to `finished` and persist its survival time.
pub async fn finish_session(
    state: &SharedState,
    session_id: Uuid,
) -> Result<SessionResponse, ServiceError> {
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    let store = state.require_store().await?;
    let mut session = store
        .find_session(session_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game session `{session_id}` not found")))?;
    session_machine::ensure_transition(session.status, SessionStatus::Finished)?;

    let ended_at = OffsetDateTime::now_utc();
    session.status = SessionStatus::Finished;
    session.ended_at = Some(ended_at);
    session.survival_time_seconds = session
        .started_at
        .map(|started_at| (ended_at - started_at).whole_seconds().max(0));

    store.update_session(session.clone()).await?;
    info!(
        session_id = %session_id,
        survival_time_seconds = session.survival_time_seconds,
        "session finished"
    );

    // Broadcast the terminal snapshot before dropping the ephemeral maps so
    // clients receive final cursor/activity data exactly once.
    broadcast::broadcast_state(state, session_id).await;
    state.ephemeral().clear_session(session_id);
    Ok(session.into())
}

/// Move a `lobby` session to `countdown` and arm the timer.
pub async fn enter_countdown(
    state: &SharedState,
    session_id: Uuid,
) -> Result<SessionResponse, ServiceError> {
    let gate = state.session_gate(session_id);
    let _guard = gate.lock().await;

    let store = state.require_store().await?;
    let mut session = store
        .find_session(session_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game session `{session_id}` not found")))?;
    session_machine::ensure_transition(session.status, SessionStatus::Countdown)?;

    session.status = SessionStatus::Countdown;
    store.update_session(session.clone()).await?;
    countdown::start(state, session_id, state.config().countdown());
    info!(session_id = %session_id, "countdown started");

    broadcast::broadcast_state(state, session_id).await;
    Ok(session.into())
}

/// Generic validated status change, dispatched to the dedicated mutators.
pub async fn update_state(
    state: &SharedState,
    session_id: Uuid,
    target: SessionStatus,
) -> Result<SessionResponse, ServiceError> {
    match target {
        SessionStatus::Countdown => enter_countdown(state, session_id).await,
        SessionStatus::Active => activate_session(state, session_id).await,
        SessionStatus::Finished => finish_session(state, session_id).await,
        SessionStatus::Lobby => {
            // No edge leads back into `lobby`; surface the uniform error.
            let store = state.require_store().await?;
            let session = store.find_session(session_id).await?.ok_or_else(|| {
                ServiceError::NotFound(format!("game session `{session_id}` not found"))
            })?;
            session_machine::ensure_transition(session.status, SessionStatus::Lobby)?;
            Ok(session.into())
        }
    }
}

/// Most recently created session for a team.
pub async fn latest_session(
    state: &SharedState,
    team_id: Uuid,
) -> Result<SessionResponse, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}` not found")))?;
    store
        .latest_session_for_team(team_id)
        .await?
        .map(SessionResponse::from)
        .ok_or_else(|| ServiceError::NotFound(format!("no session for team `{team_id}`")))
}
