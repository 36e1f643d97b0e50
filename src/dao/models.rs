use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    /// Team assembled, game not yet started.
    Lobby,
    /// Pre-game countdown is running.
    Countdown,
    /// Players are solving puzzles and the survival clock is ticking.
    Active,
    /// Terminal state; the session is part of the team history.
    Finished,
}

impl SessionStatus {
    /// Whether the session can never change status again.
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionStatus::Finished)
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::Lobby => "lobby",
            SessionStatus::Countdown => "countdown",
            SessionStatus::Active => "active",
            SessionStatus::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Status of an individual puzzle instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleStatus {
    /// Waiting for the owning player to answer.
    Active,
    /// Answered correctly.
    Solved,
    /// Answered incorrectly.
    Failed,
}

/// Supported puzzle families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PuzzleType {
    /// Number-to-color mapping recall.
    Memory,
    /// Client-side spatial challenge; the server only records the outcome.
    Spatial,
    /// Color-word / circle-color matching under time pressure.
    Concentration,
    /// Client-side multitasking challenge; the server only records the outcome.
    Multitasking,
}

impl PuzzleType {
    /// All puzzle families, used for uniform random selection.
    pub const ALL: [PuzzleType; 4] = [
        PuzzleType::Memory,
        PuzzleType::Spatial,
        PuzzleType::Concentration,
        PuzzleType::Multitasking,
    ];
}

impl fmt::Display for PuzzleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PuzzleType::Memory => "memory",
            PuzzleType::Spatial => "spatial",
            PuzzleType::Concentration => "concentration",
            PuzzleType::Multitasking => "multitasking",
        };
        f.write_str(name)
    }
}

/// One color-word/circle-color pair of a concentration puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ConcentrationPair {
    /// The word shown to the player (a color name).
    pub color_word: String,
    /// The fill color of the circle next to the word.
    pub circle_color: String,
    /// Whether word and circle agree.
    pub is_match: bool,
}

/// Type-specific puzzle payload, opaque to the transport layer.
///
/// Serialized untagged so clients receive a plain object shaped by the puzzle
/// type; the `Blank` variant covers puzzle families that carry no server-side
/// payload and serializes as `{}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum PuzzleData {
    /// Payload for `memory` puzzles.
    Memory {
        /// Number (as string) to color mapping the player must memorize.
        mapping: IndexMap<String, String>,
        /// The number being asked about, rendered as a string.
        question_number: String,
        /// Colors offered as answer choices.
        choices: Vec<String>,
    },
    /// Payload for `concentration` puzzles.
    Concentration {
        /// Pair sequence; exactly one entry is a true match.
        pairs: Vec<ConcentrationPair>,
        /// Seconds each pair is visible.
        duration: u8,
    },
    /// Empty payload for fully client-driven puzzles.
    Blank {},
}

/// A registered team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamEntity {
    /// Stable identifier for the team.
    pub id: Uuid,
    /// Unique display name.
    pub name: String,
}

/// A registered player, optionally attached to a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerEntity {
    /// Stable identifier for the player.
    pub id: Uuid,
    /// Unique login/display name.
    pub username: String,
    /// Team the player belongs to, if any.
    pub team_id: Option<Uuid>,
    /// Current point total; zero means eliminated.
    pub points: i32,
    /// Assigned cursor color, unique within the team.
    pub color: Option<String>,
    /// Monotonic creation sequence assigned by the store; defines the stable
    /// roster order used by the round-robin reward and conflict resolution.
    pub seq: u64,
}

impl PlayerEntity {
    /// Derived elimination flag (never stored).
    pub fn is_eliminated(&self) -> bool {
        self.points <= 0
    }
}

/// A game session owned by a team.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSessionEntity {
    /// Stable identifier for the session.
    pub id: Uuid,
    /// Owning team.
    pub team_id: Uuid,
    /// Current lifecycle status.
    pub status: SessionStatus,
    /// When the session row was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When the session entered `active`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    /// When the session entered `finished`.
    #[serde(with = "time::serde::rfc3339::option")]
    pub ended_at: Option<OffsetDateTime>,
    /// `floor(ended_at - started_at)` persisted for historical queries.
    pub survival_time_seconds: Option<i64>,
}

/// A puzzle instance assigned to one player within one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleEntity {
    /// Stable identifier for the puzzle.
    pub id: Uuid,
    /// Puzzle family.
    #[serde(rename = "type")]
    pub kind: PuzzleType,
    /// Type-specific payload sent verbatim to clients.
    pub data: PuzzleData,
    /// Expected answer; correctness at submit time is plain string equality.
    pub correct_answer: String,
    /// Current puzzle status.
    pub status: PuzzleStatus,
    /// Session this puzzle belongs to.
    pub game_session_id: Uuid,
    /// Player this puzzle was generated for.
    pub user_id: Uuid,
    /// Creation timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// When an answer (correct or not) was recorded.
    #[serde(with = "time::serde::rfc3339::option")]
    pub solved_at: Option<OffsetDateTime>,
}
