use futures::future::BoxFuture;
use uuid::Uuid;

use crate::dao::models::{
    GameSessionEntity, PlayerEntity, PuzzleEntity, SessionStatus, TeamEntity,
};
use crate::dao::storage::StorageResult;

/// Abstraction over the persistence layer for teams, players, sessions, and
/// puzzles.
///
/// The synchronization engine only ever talks to this trait; the concrete
/// backend (a relational store in production, [`MemoryStore`] in tests and the
/// reference deployment) is installed into the shared state at startup.
///
/// [`MemoryStore`]: crate::dao::memory::MemoryStore
pub trait GameStore: Send + Sync {
    /// Persist a new team.
    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a team by id.
    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// Look up a team by its unique name.
    fn find_team_by_name(&self, name: String)
    -> BoxFuture<'static, StorageResult<Option<TeamEntity>>>;
    /// List all registered teams.
    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>>;

    /// Persist a new player, returning it with its roster sequence assigned.
    fn insert_player(&self, player: PlayerEntity)
    -> BoxFuture<'static, StorageResult<PlayerEntity>>;
    /// Look up a player by id.
    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// Look up a player by unique username.
    fn find_player_by_username(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>>;
    /// All players of a team in stable roster order (creation sequence).
    fn players_by_team(&self, team_id: Uuid)
    -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Every registered player, regardless of team.
    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>>;
    /// Overwrite an existing player row.
    fn update_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>>;

    /// Persist a new game session.
    fn insert_session(&self, session: GameSessionEntity)
    -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a session by id.
    fn find_session(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>>;
    /// Most recently created session for a team, if any.
    fn latest_session_for_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>>;
    /// The team's non-finished session, if one exists (at most one by invariant).
    fn unfinished_session_for_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>>;
    /// All sessions currently in the given status.
    fn sessions_by_status(
        &self,
        status: SessionStatus,
    ) -> BoxFuture<'static, StorageResult<Vec<GameSessionEntity>>>;
    /// Overwrite an existing session row.
    fn update_session(&self, session: GameSessionEntity)
    -> BoxFuture<'static, StorageResult<()>>;

    /// Persist a new puzzle.
    fn insert_puzzle(&self, puzzle: PuzzleEntity) -> BoxFuture<'static, StorageResult<()>>;
    /// Look up a puzzle by id.
    fn find_puzzle(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PuzzleEntity>>>;
    /// The player's currently active puzzle, if any.
    fn active_puzzle_for_player(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PuzzleEntity>>>;
    /// Every active puzzle of a session.
    fn active_puzzles_for_session(
        &self,
        session_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PuzzleEntity>>>;
    /// Overwrite an existing puzzle row.
    fn update_puzzle(&self, puzzle: PuzzleEntity) -> BoxFuture<'static, StorageResult<()>>;

    /// Cheap connectivity probe.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;
}
