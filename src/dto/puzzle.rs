use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dao::models::{PuzzleData, PuzzleEntity, PuzzleStatus, PuzzleType};

/// Payload to create a puzzle of a specific type for a player.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePuzzleRequest {
    /// Puzzle family to generate.
    #[serde(rename = "type")]
    pub kind: PuzzleType,
    /// Session the puzzle belongs to.
    pub game_session_id: Uuid,
    /// Player the puzzle is generated for.
    pub user_id: Uuid,
}

/// Payload to answer a puzzle.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AnswerRequest {
    /// Puzzle being answered.
    pub puzzle_id: Uuid,
    /// Answering player.
    pub user_id: Uuid,
    /// Submitted answer, compared verbatim against the stored one.
    pub answer: String,
}

/// Puzzle state returned by the API.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PuzzleStateResponse {
    /// Puzzle id.
    pub id: Uuid,
    /// Puzzle family.
    #[serde(rename = "type")]
    pub kind: PuzzleType,
    /// Type-specific payload.
    pub data: PuzzleData,
    /// Current status.
    pub status: PuzzleStatus,
    /// Expected answer (clients of this endpoint are the game's own views).
    pub correct_answer: String,
    /// Owning player.
    pub user_id: Uuid,
    /// Owning session.
    pub game_session_id: Uuid,
}

impl From<PuzzleEntity> for PuzzleStateResponse {
    fn from(puzzle: PuzzleEntity) -> Self {
        Self {
            id: puzzle.id,
            kind: puzzle.kind,
            data: puzzle.data,
            status: puzzle.status,
            correct_answer: puzzle.correct_answer,
            user_id: puzzle.user_id,
            game_session_id: puzzle.game_session_id,
        }
    }
}

/// Outcome of an answer submission.
#[derive(Debug, Serialize, ToSchema)]
pub struct AnswerResponse {
    /// Whether the submitted answer matched.
    pub correct: bool,
    /// Player who received the round-robin bonus, if anyone.
    pub awarded_to_user_id: Option<Uuid>,
    /// Bonus size actually awarded (zero when nobody qualified).
    pub points_awarded: i32,
    /// Human-readable outcome summary.
    pub message: String,
    /// Id of the replacement puzzle.
    pub next_puzzle_id: Uuid,
    /// The freshly generated replacement puzzle.
    pub next_puzzle: PuzzleStateResponse,
}

/// Point total for one player inside a team report.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerPoints {
    /// Player id.
    pub user_id: Uuid,
    /// Username.
    pub username: String,
    /// Current points.
    pub points: i32,
}

/// Point report for a whole team.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamPoints {
    /// Team id.
    pub team_id: Uuid,
    /// Per-player totals in roster order.
    pub players: Vec<PlayerPoints>,
}

/// Outcome of a manual decay request.
#[derive(Debug, Serialize, ToSchema)]
pub struct DecayResponse {
    /// Players whose points were reduced.
    pub decayed_players: usize,
}
