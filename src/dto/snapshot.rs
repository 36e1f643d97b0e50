use std::collections::HashMap;

use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{
        GameSessionEntity, PlayerEntity, PuzzleData, PuzzleEntity, PuzzleStatus, PuzzleType,
        SessionStatus, TeamEntity,
    },
    dto::format_timestamp,
    state::ephemeral::{ActivitySample, CursorSample},
};

/// Canonical view of one session, assembled by the broadcast hub and sent as
/// the data of every `state_update` envelope.
#[derive(Debug, Serialize, ToSchema)]
pub struct StateSnapshot {
    /// Session status and timestamps.
    pub session: SessionView,
    /// Owning team identity.
    pub team: TeamView,
    /// Roster with points, colors, and each player's current puzzle.
    pub players: Vec<PlayerView>,
    /// Every currently active puzzle of the session.
    pub puzzles: Vec<PuzzleView>,
    /// Last known cursor positions keyed by player id.
    pub mouse_positions: HashMap<Uuid, CursorView>,
    /// Last known activity descriptors keyed by player id.
    pub player_activity: HashMap<Uuid, ActivityView>,
}

/// Session slice of the snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    /// Session id.
    pub id: Uuid,
    /// Current status.
    pub status: SessionStatus,
    /// Activation timestamp, if reached.
    pub started_at: Option<String>,
    /// Finish timestamp, if reached.
    pub ended_at: Option<String>,
    /// Persisted survival duration in whole seconds.
    pub survival_time_seconds: Option<i64>,
}

impl From<&GameSessionEntity> for SessionView {
    fn from(session: &GameSessionEntity) -> Self {
        Self {
            id: session.id,
            status: session.status,
            started_at: session.started_at.map(format_timestamp),
            ended_at: session.ended_at.map(format_timestamp),
            survival_time_seconds: session.survival_time_seconds,
        }
    }
}

/// Team slice of the snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamView {
    /// Team id.
    pub id: Uuid,
    /// Team name.
    pub name: String,
}

impl From<&TeamEntity> for TeamView {
    fn from(team: &TeamEntity) -> Self {
        Self {
            id: team.id,
            name: team.name.clone(),
        }
    }
}

/// Per-player slice of the snapshot.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerView {
    /// Player id.
    pub id: Uuid,
    /// Username.
    pub username: String,
    /// Current points.
    pub points: i32,
    /// Assigned color, if any.
    pub color: Option<String>,
    /// The player's current active puzzle, if one exists.
    pub puzzle: Option<PuzzleSummary>,
}

/// Compact puzzle view embedded in a player entry.
#[derive(Debug, Serialize, ToSchema)]
pub struct PuzzleSummary {
    /// Puzzle id.
    pub id: Uuid,
    /// Puzzle family.
    #[serde(rename = "type")]
    pub kind: PuzzleType,
    /// Type-specific payload.
    pub data: PuzzleData,
    /// Current status.
    pub status: PuzzleStatus,
}

impl From<&PuzzleEntity> for PuzzleSummary {
    fn from(puzzle: &PuzzleEntity) -> Self {
        Self {
            id: puzzle.id,
            kind: puzzle.kind,
            data: puzzle.data.clone(),
            status: puzzle.status,
        }
    }
}

/// Standalone puzzle view in the snapshot's puzzle list.
#[derive(Debug, Serialize, ToSchema)]
pub struct PuzzleView {
    /// Puzzle id.
    pub id: Uuid,
    /// Puzzle family.
    #[serde(rename = "type")]
    pub kind: PuzzleType,
    /// Type-specific payload.
    pub data: PuzzleData,
    /// Current status.
    pub status: PuzzleStatus,
    /// Owning player.
    pub user_id: Uuid,
}

impl From<&PuzzleEntity> for PuzzleView {
    fn from(puzzle: &PuzzleEntity) -> Self {
        Self {
            id: puzzle.id,
            kind: puzzle.kind,
            data: puzzle.data.clone(),
            status: puzzle.status,
            user_id: puzzle.user_id,
        }
    }
}

/// Cursor entry of the snapshot's ephemeral map.
#[derive(Debug, Serialize, ToSchema)]
pub struct CursorView {
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Puzzle area the cursor hovers over, if reported.
    pub puzzle_area: Option<String>,
    /// When the sample was recorded.
    pub timestamp: String,
}

impl From<CursorSample> for CursorView {
    fn from(sample: CursorSample) -> Self {
        Self {
            x: sample.x,
            y: sample.y,
            puzzle_area: sample.puzzle_area,
            timestamp: format_timestamp(sample.updated_at),
        }
    }
}

/// Activity entry of the snapshot's ephemeral map.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityView {
    /// Opaque client-supplied descriptor.
    #[schema(value_type = Object)]
    pub data: serde_json::Value,
    /// When the sample was recorded.
    pub timestamp: String,
}

impl From<ActivitySample> for ActivityView {
    fn from(sample: ActivitySample) -> Self {
        Self {
            data: sample.data,
            timestamp: format_timestamp(sample.updated_at),
        }
    }
}

impl PlayerView {
    /// Build the per-player view, attaching the player's active puzzle.
    pub fn new(player: &PlayerEntity, puzzle: Option<&PuzzleEntity>) -> Self {
        Self {
            id: player.id,
            username: player.username.clone(),
            points: player.points,
            color: player.color.clone(),
            puzzle: puzzle.map(PuzzleSummary::from),
        }
    }
}
