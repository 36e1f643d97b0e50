use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dao::models::{GameSessionEntity, SessionStatus},
    dto::format_timestamp,
};

/// Payload to create a session for a team.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    /// Owning team.
    pub team_id: Uuid,
    /// Countdown duration override in seconds; configured default when omitted.
    #[serde(default)]
    pub countdown_seconds: Option<u64>,
}

/// Payload for a generic validated status change.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SessionStateUpdateRequest {
    /// Requested new status.
    pub status: SessionStatus,
}

/// Session representation returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SessionResponse {
    /// Session id.
    pub id: Uuid,
    /// Owning team.
    pub team_id: Uuid,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// Creation timestamp (RFC 3339).
    pub created_at: String,
    /// Activation timestamp (RFC 3339), if reached.
    pub started_at: Option<String>,
    /// Finish timestamp (RFC 3339), if reached.
    pub ended_at: Option<String>,
    /// Persisted survival duration in whole seconds.
    pub survival_time_seconds: Option<i64>,
}

impl From<GameSessionEntity> for SessionResponse {
    fn from(session: GameSessionEntity) -> Self {
        Self {
            id: session.id,
            team_id: session.team_id,
            status: session.status,
            created_at: format_timestamp(session.created_at),
            started_at: session.started_at.map(format_timestamp),
            ended_at: session.ended_at.map(format_timestamp),
            survival_time_seconds: session.survival_time_seconds,
        }
    }
}
