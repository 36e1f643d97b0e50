use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dao::models::{PlayerEntity, TeamEntity},
    dto::validation::{validate_team_name, validate_username},
};

/// Payload to register a new player.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct RegisterPlayerRequest {
    /// Unique username for the new player.
    #[validate(custom(function = validate_username))]
    pub username: String,
}

/// Payload to create a new team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct CreateTeamRequest {
    /// Unique display name for the new team.
    #[validate(custom(function = validate_team_name))]
    pub name: String,
}

/// Payload to attach an existing player to a team.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct JoinTeamRequest {
    /// Username of the joining player.
    #[validate(custom(function = validate_username))]
    pub username: String,
    /// Target team.
    pub team_id: Uuid,
}

/// Player representation returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlayerResponse {
    /// Player id.
    pub id: Uuid,
    /// Unique username.
    pub username: String,
    /// Team membership, if any.
    pub team_id: Option<Uuid>,
    /// Current points.
    pub points: i32,
    /// Assigned cursor color, if any.
    pub color: Option<String>,
}

impl From<PlayerEntity> for PlayerResponse {
    fn from(player: PlayerEntity) -> Self {
        Self {
            id: player.id,
            username: player.username,
            team_id: player.team_id,
            points: player.points,
            color: player.color,
        }
    }
}

/// Team representation returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct TeamResponse {
    /// Team id.
    pub id: Uuid,
    /// Unique team name.
    pub name: String,
}

impl From<TeamEntity> for TeamResponse {
    fn from(team: TeamEntity) -> Self {
        Self {
            id: team.id,
            name: team.name,
        }
    }
}

/// Team plus its current roster.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamWithMembersResponse {
    /// Team id.
    pub id: Uuid,
    /// Unique team name.
    pub name: String,
    /// Roster in stable join order.
    pub members: Vec<PlayerResponse>,
}
