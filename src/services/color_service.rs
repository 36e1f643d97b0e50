use std::collections::HashMap;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    dto::color::{
        AssignColorRequest, ColorAssignmentResponse, ColorConflict, ColorValidationResponse,
        ResolveColorsResponse,
    },
    error::ServiceError,
    services::broadcast,
    state::SharedState,
};

/// Assign a team-unique cursor color to a player.
///
/// Idempotent for already-colored players. Under contention the write is
/// re-checked after commit; losing a race releases the color and retries with
/// the next free one, up to one attempt per palette entry. When the palette is
/// exhausted the player receives the shared overflow color and the response
/// reports failure.
pub async fn assign(
    state: &SharedState,
    req: AssignColorRequest,
) -> Result<ColorAssignmentResponse, ServiceError> {
    let store = state.require_store().await?;

    let mut player = store
        .find_player(req.user_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("player `{}` not found", req.user_id)))?;
    store
        .find_team(req.team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{}` not found", req.team_id)))?;
    if player.team_id != Some(req.team_id) {
        return Err(ServiceError::InvalidInput(
            "player is not a member of this team".into(),
        ));
    }

    if let Some(color) = player.color.clone() {
        return Ok(ColorAssignmentResponse {
            success: true,
            color,
            message: "color already assigned".into(),
        });
    }

    for attempt in 0..state.config().palette().len() {
        let used: Vec<String> = store
            .players_by_team(req.team_id)
            .await?
            .into_iter()
            .filter(|member| member.id != player.id)
            .filter_map(|member| member.color)
            .collect();
        let Some(candidate) = state.config().first_unused_color(&used) else {
            break;
        };

        player.color = Some(candidate.clone());
        store.update_player(player.clone()).await?;

        // Re-read after commit: a concurrent assignment may have taken the
        // same color between our read and our write.
        let holders = store
            .players_by_team(req.team_id)
            .await?
            .into_iter()
            .filter(|member| member.id != player.id)
            .filter(|member| member.color.as_deref() == Some(candidate.as_str()))
            .count();
        if holders > 0 {
            warn!(
                user_id = %player.id,
                color = %candidate,
                attempt,
                "color taken concurrently, retrying"
            );
            player.color = None;
            store.update_player(player.clone()).await?;
            continue;
        }

        info!(user_id = %player.id, color = %candidate, attempt, "color assigned");
        cache_for_session(state, req.team_id, player.id, &candidate).await?;
        return Ok(ColorAssignmentResponse {
            success: true,
            color: candidate,
            message: "color assigned".into(),
        });
    }

    let fallback = state.config().fallback_color().to_string();
    player.color = Some(fallback.clone());
    store.update_player(player.clone()).await?;
    warn!(user_id = %player.id, "palette exhausted, overflow color assigned");
    cache_for_session(state, req.team_id, player.id, &fallback).await?;
    Ok(ColorAssignmentResponse {
        success: false,
        color: fallback,
        message: "no available colors in team after retries".into(),
    })
}

/// Audit a team's colors for duplicates.
///
/// Only assigned colors participate; the shared overflow color is reported
/// like any other duplicate so operators can see crowded teams.
pub async fn validate(
    state: &SharedState,
    team_id: Uuid,
) -> Result<ColorValidationResponse, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}` not found")))?;

    let mut holders: HashMap<String, Vec<Uuid>> = HashMap::new();
    for player in store.players_by_team(team_id).await? {
        if let Some(color) = player.color {
            holders.entry(color).or_default().push(player.id);
        }
    }

    let mut conflicts: Vec<ColorConflict> = holders
        .into_iter()
        .filter(|(_, user_ids)| user_ids.len() > 1)
        .map(|(color, user_ids)| ColorConflict {
            color,
            count: user_ids.len(),
            user_ids,
        })
        .collect();
    conflicts.sort_by(|a, b| a.color.cmp(&b.color));

    Ok(ColorValidationResponse {
        is_valid: conflicts.is_empty(),
        conflicts,
    })
}

/// Deterministically reassign colors across a team.
///
/// Walks the roster in stable join order handing out palette colors in
/// palette order, with the overflow color for everyone past the palette.
/// Reports only the players whose color actually changed.
pub async fn resolve_conflicts(
    state: &SharedState,
    team_id: Uuid,
) -> Result<ResolveColorsResponse, ServiceError> {
    let store = state.require_store().await?;
    store
        .find_team(team_id)
        .await?
        .ok_or_else(|| ServiceError::NotFound(format!("team `{team_id}` not found")))?;

    let mut reassignments = HashMap::new();
    for (index, mut player) in store.players_by_team(team_id).await?.into_iter().enumerate() {
        let desired = state
            .config()
            .palette()
            .get(index)
            .cloned()
            .unwrap_or_else(|| state.config().fallback_color().to_string());
        if player.color.as_deref() != Some(desired.as_str()) {
            player.color = Some(desired.clone());
            let player_id = player.id;
            store.update_player(player).await?;
            cache_for_session(state, team_id, player_id, &desired).await?;
            reassignments.insert(player_id, desired);
        }
    }

    info!(team_id = %team_id, reassigned = reassignments.len(), "colors resolved");
    if let Some(session) = store.unfinished_session_for_team(team_id).await? {
        broadcast::broadcast_state(state, session.id).await;
    }
    Ok(ResolveColorsResponse {
        success: true,
        message: format!("reassigned {} player(s)", reassignments.len()),
        reassignments,
    })
}

/// Refresh the ephemeral color cache when the team has a live session.
async fn cache_for_session(
    state: &SharedState,
    team_id: Uuid,
    user_id: Uuid,
    color: &str,
) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if let Some(session) = store.unfinished_session_for_team(team_id).await? {
        state
            .ephemeral()
            .cache_color(session.id, user_id, color.to_string());
    }
    Ok(())
}
