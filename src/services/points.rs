use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dao::{
        models::{GameSessionEntity, PlayerEntity, SessionStatus},
        store::GameStore,
    },
    dto::puzzle::DecayResponse,
    error::ServiceError,
    services::{broadcast, session_service},
    state::SharedState,
};

/// The roster member who receives the reward for a correct answer.
///
/// The solver never pays themselves: the reward goes to the next player in
/// stable roster order, wrapping around. `None` when the solver plays alone or
/// the would-be recipient is eliminated (the reward is never redirected
/// further down the roster).
pub fn next_in_rotation<'a>(
    roster: &'a [PlayerEntity],
    solver_id: Uuid,
) -> Option<&'a PlayerEntity> {
    if roster.len() < 2 {
        return None;
    }
    let solver_index = roster.iter().position(|player| player.id == solver_id)?;
    let target = &roster[(solver_index + 1) % roster.len()];
    (!target.is_eliminated()).then_some(target)
}

/// Apply the round-robin reward for a correct answer by `solver`.
///
/// Returns the recipient and the amount actually credited (zero when nobody
/// qualified).
pub async fn award_round_robin(
    state: &SharedState,
    store: &Arc<dyn GameStore>,
    solver: &PlayerEntity,
) -> Result<(Option<Uuid>, i32), ServiceError> {
    let Some(team_id) = solver.team_id else {
        return Ok((None, 0));
    };
    let roster = store.players_by_team(team_id).await?;

    let Some(target) = next_in_rotation(&roster, solver.id) else {
        return Ok((None, 0));
    };
    let award = state.config().points_award();
    let mut target = target.clone();
    target.points += award;
    let target_id = target.id;
    store.update_player(target).await?;
    info!(
        solver_id = %solver.id,
        target_id = %target_id,
        award,
        "round-robin reward credited"
    );
    Ok((Some(target_id), award))
}

/// One pass of the global decay clock.
///
/// Every player with points left loses the configured amount, floored at
/// zero. Each active session whose team was touched gets exactly one fresh
/// snapshot broadcast no matter how many of its players decayed, then the
/// game-end watcher finishes sessions whose whole roster is out. Returns the
/// number of players decayed.
pub async fn decay_tick(state: &SharedState) -> Result<usize, ServiceError> {
    let store = state.require_store().await?;
    let decay = state.config().decay_amount();
    let mut decayed = 0usize;
    let mut touched_teams: HashSet<Uuid> = HashSet::new();

    for mut player in store.list_players().await? {
        if player.points > 0 {
            player.points = (player.points - decay).max(0);
            if let Some(team_id) = player.team_id {
                touched_teams.insert(team_id);
            }
            store.update_player(player).await?;
            decayed += 1;
        }
    }

    let active = store.sessions_by_status(SessionStatus::Active).await?;
    for session in &active {
        if touched_teams.contains(&session.team_id) {
            broadcast::broadcast_state(state, session.id).await;
        }
    }

    finish_dead_sessions(state, &store, active).await?;
    Ok(decayed)
}

/// Game-end watcher: finish every active session with no surviving players.
///
/// A session with an empty roster counts as dead too.
async fn finish_dead_sessions(
    state: &SharedState,
    store: &Arc<dyn GameStore>,
    sessions: Vec<GameSessionEntity>,
) -> Result<(), ServiceError> {
    for session in sessions {
        let roster = store.players_by_team(session.team_id).await?;
        if !roster.iter().any(|player| !player.is_eliminated()) {
            match session_service::finish_session(state, session.id).await {
                Ok(finished) => debug!(
                    session_id = %session.id,
                    survival_time_seconds = finished.survival_time_seconds,
                    "team eliminated, session finished"
                ),
                // Another driver finished it first.
                Err(ServiceError::InvalidTransition(invalid)) => {
                    debug!(session_id = %session.id, error = %invalid, "finish raced");
                }
                Err(err) => {
                    warn!(session_id = %session.id, error = %err, "failed to finish dead session");
                }
            }
        }
    }
    Ok(())
}

/// Manually triggered decay for one team.
pub async fn decay_team(
    state: &SharedState,
    team_id: Uuid,
) -> Result<DecayResponse, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}` not found")))?;

    let decay = state.config().decay_amount();
    let mut decayed = 0usize;
    for mut player in store.players_by_team(team_id).await? {
        if player.points > 0 {
            player.points = (player.points - decay).max(0);
            decayed += 1;
            store.update_player(player).await?;
        }
    }

    if let Some(session) = store.unfinished_session_for_team(team_id).await? {
        broadcast::broadcast_state(state, session.id).await;
    }
    Ok(DecayResponse {
        decayed_players: decayed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(points: i32) -> PlayerEntity {
        PlayerEntity {
            id: Uuid::new_v4(),
            username: format!("player-{points}"),
            team_id: Some(Uuid::new_v4()),
            points,
            color: None,
            seq: 0,
        }
    }

    #[test]
    fn rotation_targets_next_and_wraps() {
        let roster = vec![player(10), player(10), player(10)];
        let next = next_in_rotation(&roster, roster[0].id).map(|p| p.id);
        assert_eq!(next, Some(roster[1].id));
        let wrapped = next_in_rotation(&roster, roster[2].id).map(|p| p.id);
        assert_eq!(wrapped, Some(roster[0].id));
    }

    #[test]
    fn eliminated_target_gets_nothing() {
        let roster = vec![player(10), player(0), player(10)];
        assert!(next_in_rotation(&roster, roster[0].id).is_none());
        // The eliminated player's own answer still pays their successor.
        assert_eq!(
            next_in_rotation(&roster, roster[1].id).map(|p| p.id),
            Some(roster[2].id)
        );
    }

    #[test]
    fn solo_player_gets_nothing() {
        let roster = vec![player(10)];
        assert!(next_in_rotation(&roster, roster[0].id).is_none());
    }

    #[test]
    fn unknown_solver_gets_nothing() {
        let roster = vec![player(10), player(10)];
        assert!(next_in_rotation(&roster, Uuid::new_v4()).is_none());
    }
}
