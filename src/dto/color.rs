use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Payload to request a color for a player.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignColorRequest {
    /// Player to color.
    pub user_id: Uuid,
    /// Team the uniqueness constraint applies within.
    pub team_id: Uuid,
}

/// Outcome of a color assignment attempt.
#[derive(Debug, Serialize, ToSchema)]
pub struct ColorAssignmentResponse {
    /// False when the palette was exhausted and the overflow color was used.
    pub success: bool,
    /// Color now held by the player.
    pub color: String,
    /// Human-readable outcome summary.
    pub message: String,
}

/// One color held by more than one teammate.
#[derive(Debug, Serialize, ToSchema)]
pub struct ColorConflict {
    /// The duplicated color.
    pub color: String,
    /// Players currently holding it.
    pub user_ids: Vec<Uuid>,
    /// Holder count.
    pub count: usize,
}

/// Result of a team color audit.
#[derive(Debug, Serialize, ToSchema)]
pub struct ColorValidationResponse {
    /// True when no palette color is duplicated within the team.
    pub is_valid: bool,
    /// Detected duplicates.
    pub conflicts: Vec<ColorConflict>,
}

/// Result of deterministic conflict resolution.
#[derive(Debug, Serialize, ToSchema)]
pub struct ResolveColorsResponse {
    /// Whether resolution completed.
    pub success: bool,
    /// New color for every player whose color changed.
    pub reassignments: HashMap<Uuid, String>,
    /// Human-readable outcome summary.
    pub message: String,
}
