use std::sync::Arc;

use futures::future::BoxFuture;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::dao::models::{
    GameSessionEntity, PlayerEntity, PuzzleEntity, PuzzleStatus, SessionStatus, TeamEntity,
};
use crate::dao::storage::StorageResult;
use crate::dao::store::GameStore;

/// In-memory reference implementation of [`GameStore`].
///
/// Tables are insertion-ordered maps behind a single async lock, which gives
/// the same visibility guarantees a transactional backend would: a write
/// completes fully before any subsequent read observes it. Player roster order
/// is a monotonic sequence stamped at insert.
#[derive(Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<Tables>>,
}

#[derive(Default)]
struct Tables {
    teams: IndexMap<Uuid, TeamEntity>,
    players: IndexMap<Uuid, PlayerEntity>,
    sessions: IndexMap<Uuid, GameSessionEntity>,
    puzzles: IndexMap<Uuid, PuzzleEntity>,
    player_seq: u64,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameStore for MemoryStore {
    fn insert_team(&self, team: TeamEntity) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            tables.write().await.teams.insert(team.id, team);
            Ok(())
        })
    }

    fn find_team(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move { Ok(tables.read().await.teams.get(&id).cloned()) })
    }

    fn find_team_by_name(
        &self,
        name: String,
    ) -> BoxFuture<'static, StorageResult<Option<TeamEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let guard = tables.read().await;
            Ok(guard.teams.values().find(|t| t.name == name).cloned())
        })
    }

    fn list_teams(&self) -> BoxFuture<'static, StorageResult<Vec<TeamEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move { Ok(tables.read().await.teams.values().cloned().collect()) })
    }

    fn insert_player(
        &self,
        mut player: PlayerEntity,
    ) -> BoxFuture<'static, StorageResult<PlayerEntity>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let mut guard = tables.write().await;
            guard.player_seq += 1;
            player.seq = guard.player_seq;
            guard.players.insert(player.id, player.clone());
            Ok(player)
        })
    }

    fn find_player(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move { Ok(tables.read().await.players.get(&id).cloned()) })
    }

    fn find_player_by_username(
        &self,
        username: String,
    ) -> BoxFuture<'static, StorageResult<Option<PlayerEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let guard = tables.read().await;
            Ok(guard
                .players
                .values()
                .find(|p| p.username == username)
                .cloned())
        })
    }

    fn players_by_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let guard = tables.read().await;
            let mut roster: Vec<PlayerEntity> = guard
                .players
                .values()
                .filter(|p| p.team_id == Some(team_id))
                .cloned()
                .collect();
            roster.sort_by_key(|p| p.seq);
            Ok(roster)
        })
    }

    fn list_players(&self) -> BoxFuture<'static, StorageResult<Vec<PlayerEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move { Ok(tables.read().await.players.values().cloned().collect()) })
    }

    fn update_player(&self, player: PlayerEntity) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            tables.write().await.players.insert(player.id, player);
            Ok(())
        })
    }

    fn insert_session(
        &self,
        session: GameSessionEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            tables.write().await.sessions.insert(session.id, session);
            Ok(())
        })
    }

    fn find_session(
        &self,
        id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move { Ok(tables.read().await.sessions.get(&id).cloned()) })
    }

    fn latest_session_for_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let guard = tables.read().await;
            Ok(guard
                .sessions
                .values()
                .filter(|s| s.team_id == team_id)
                .next_back()
                .cloned())
        })
    }

    fn unfinished_session_for_team(
        &self,
        team_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<GameSessionEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let guard = tables.read().await;
            Ok(guard
                .sessions
                .values()
                .find(|s| s.team_id == team_id && !s.status.is_terminal())
                .cloned())
        })
    }

    fn sessions_by_status(
        &self,
        status: SessionStatus,
    ) -> BoxFuture<'static, StorageResult<Vec<GameSessionEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let guard = tables.read().await;
            Ok(guard
                .sessions
                .values()
                .filter(|s| s.status == status)
                .cloned()
                .collect())
        })
    }

    fn update_session(
        &self,
        session: GameSessionEntity,
    ) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            tables.write().await.sessions.insert(session.id, session);
            Ok(())
        })
    }

    fn insert_puzzle(&self, puzzle: PuzzleEntity) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            tables.write().await.puzzles.insert(puzzle.id, puzzle);
            Ok(())
        })
    }

    fn find_puzzle(&self, id: Uuid) -> BoxFuture<'static, StorageResult<Option<PuzzleEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move { Ok(tables.read().await.puzzles.get(&id).cloned()) })
    }

    fn active_puzzle_for_player(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<PuzzleEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let guard = tables.read().await;
            Ok(guard
                .puzzles
                .values()
                .find(|p| p.user_id == user_id && p.status == PuzzleStatus::Active)
                .cloned())
        })
    }

    fn active_puzzles_for_session(
        &self,
        session_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<PuzzleEntity>>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            let guard = tables.read().await;
            Ok(guard
                .puzzles
                .values()
                .filter(|p| p.game_session_id == session_id && p.status == PuzzleStatus::Active)
                .cloned()
                .collect())
        })
    }

    fn update_puzzle(&self, puzzle: PuzzleEntity) -> BoxFuture<'static, StorageResult<()>> {
        let tables = self.tables.clone();
        Box::pin(async move {
            tables.write().await.puzzles.insert(puzzle.id, puzzle);
            Ok(())
        })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async { Ok(()) })
    }
}
