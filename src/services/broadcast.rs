use std::collections::HashMap;

use axum::extract::ws::Message;
use serde::Serialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dto::{
        snapshot::{ActivityView, CursorView, PlayerView, PuzzleView, SessionView, StateSnapshot, TeamView},
        ws::{
            AchievementEvent, Envelope, ErrorEvent, InteractionType, MouseCursorEvent,
            PuzzleInteractionEvent, TeamCommunicationEvent,
        },
    },
    error::ServiceError,
    state::SharedState,
};

/// Envelope type for the full session snapshot.
pub const EVENT_STATE_UPDATE: &str = "state_update";
/// Envelope type for lightweight cursor movement.
pub const EVENT_MOUSE_CURSOR: &str = "mouse_cursor";
/// Envelope type for lightweight puzzle interaction relays.
pub const EVENT_PUZZLE_INTERACTION: &str = "puzzle_interaction";
/// Envelope type for lightweight team communication relays.
pub const EVENT_TEAM_COMMUNICATION: &str = "team_communication";
/// Envelope type for lightweight achievement relays.
pub const EVENT_ACHIEVEMENT: &str = "achievement";
/// Envelope type for per-sender error feedback.
pub const EVENT_ERROR: &str = "error";

/// Assemble the canonical state snapshot for a session.
///
/// Reads the persistent entities through the store and merges in the ephemeral
/// cursor/activity maps; slightly stale ephemeral data is acceptable.
pub async fn snapshot(
    state: &SharedState,
    session_id: Uuid,
) -> Result<StateSnapshot, ServiceError> {
    let store = state.require_store().await?;

    let session = store
        .find_session(session_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("game session `{session_id}` not found")))?;
    let team = store
        .find_team(session.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", session.team_id)))?;
    let roster = store.players_by_team(team.id).await?;
    let puzzles = store.active_puzzles_for_session(session_id).await?;

    let players = roster
        .iter()
        .map(|player| {
            let puzzle = puzzles.iter().find(|p| p.user_id == player.id);
            PlayerView::new(player, puzzle)
        })
        .collect();

    let mouse_positions: HashMap<Uuid, CursorView> = state
        .ephemeral()
        .cursors(session_id)
        .into_iter()
        .map(|(user_id, sample)| (user_id, sample.into()))
        .collect();
    let player_activity: HashMap<Uuid, ActivityView> = state
        .ephemeral()
        .activity(session_id)
        .into_iter()
        .map(|(user_id, sample)| (user_id, sample.into()))
        .collect();

    Ok(StateSnapshot {
        session: SessionView::from(&session),
        team: TeamView::from(&team),
        players,
        puzzles: puzzles.iter().map(PuzzleView::from).collect(),
        mouse_positions,
        player_activity,
    })
}

/// Serialize an envelope once and write it to every registered connection.
///
/// Fan-out is best-effort: a failed write never propagates to the caller, it
/// just unregisters the dead connection. With zero connections this is a
/// no-op.
pub fn publish<T: Serialize>(state: &SharedState, session_id: Uuid, kind: &'static str, data: T) {
    if !state.registry().has_connections(session_id) {
        return;
    }

    let payload = match serde_json::to_string(&Envelope::new(kind, data)) {
        Ok(payload) => payload,
        Err(err) => {
            warn!(session_id = %session_id, event = kind, error = %err, "failed to serialize envelope");
            return;
        }
    };

    for conn in state.registry().members(session_id) {
        if conn.tx.send(Message::Text(payload.clone().into())).is_err() {
            warn!(
                session_id = %session_id,
                connection_id = %conn.id,
                "connection write failed, unregistering"
            );
            state.registry().unregister(session_id, conn.id);
        }
    }
}

/// Recompute the session snapshot and fan it out as a `state_update`.
///
/// Callers invoke this after committing their persistent writes, so the
/// snapshot always reflects the transition that triggered it. Failures are
/// logged, never surfaced.
pub async fn broadcast_state(state: &SharedState, session_id: Uuid) {
    if !state.registry().has_connections(session_id) {
        return;
    }

    match snapshot(state, session_id).await {
        Ok(snapshot) => publish(state, session_id, EVENT_STATE_UPDATE, snapshot),
        Err(err) => {
            debug!(session_id = %session_id, error = %err, "skipping state broadcast");
        }
    }
}

/// Lightweight cursor event; color comes from the ephemeral cache so no store
/// round trip happens on the mouse-move hot path.
pub fn broadcast_mouse_cursor(
    state: &SharedState,
    session_id: Uuid,
    user_id: Uuid,
    x: f64,
    y: f64,
    viewport: Option<serde_json::Value>,
) {
    let color = state.ephemeral().color_of(session_id, user_id);
    publish(
        state,
        session_id,
        EVENT_MOUSE_CURSOR,
        MouseCursorEvent {
            user_id,
            x,
            y,
            color,
            viewport,
        },
    );
}

/// Lightweight puzzle interaction relay.
pub fn broadcast_puzzle_interaction(
    state: &SharedState,
    session_id: Uuid,
    user_id: Uuid,
    puzzle_id: Uuid,
    interaction_type: InteractionType,
    interaction_data: serde_json::Value,
) {
    publish(
        state,
        session_id,
        EVENT_PUZZLE_INTERACTION,
        PuzzleInteractionEvent {
            user_id,
            puzzle_id,
            interaction_type,
            interaction_data,
        },
    );
}

/// Lightweight team communication relay.
pub fn broadcast_team_communication(
    state: &SharedState,
    session_id: Uuid,
    user_id: Uuid,
    message_type: String,
    message_data: serde_json::Value,
) {
    publish(
        state,
        session_id,
        EVENT_TEAM_COMMUNICATION,
        TeamCommunicationEvent {
            user_id,
            message_type,
            message_data,
        },
    );
}

/// Lightweight achievement relay.
pub fn broadcast_achievement(
    state: &SharedState,
    session_id: Uuid,
    user_id: Uuid,
    achievement_type: String,
    achievement_data: serde_json::Value,
) {
    publish(
        state,
        session_id,
        EVENT_ACHIEVEMENT,
        AchievementEvent {
            user_id,
            achievement_type,
            achievement_data,
        },
    );
}

/// Send an error envelope to a single sender; peers never see it.
pub fn send_error(
    tx: &tokio::sync::mpsc::UnboundedSender<Message>,
    message: impl Into<String>,
    details: Vec<String>,
) {
    let event = ErrorEvent {
        message: message.into(),
        details,
    };
    match serde_json::to_string(&Envelope::new(EVENT_ERROR, event)) {
        Ok(payload) => {
            let _ = tx.send(Message::Text(payload.into()));
        }
        Err(err) => warn!(error = %err, "failed to serialize error envelope"),
    }
}
