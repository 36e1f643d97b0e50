use axum::extract::ws::Message;
use dashmap::DashMap;
use tokio::sync::mpsc;
use uuid::Uuid;

/// Handle used to push messages to one connected client.
#[derive(Clone)]
pub struct ClientConnection {
    /// Identifier of this connection (not the player; one player may hold
    /// several tabs).
    pub id: Uuid,
    /// Writer-task channel owned by the connection's socket handler.
    pub tx: mpsc::UnboundedSender<Message>,
}

/// Registry of live client connections keyed by session id.
///
/// Registered from connection lifecycle events and iterated concurrently by
/// the broadcaster; membership order is not guaranteed. When the last
/// connection of a session goes away the session entry is dropped so the map
/// never accumulates empty sets.
#[derive(Default)]
pub struct ConnectionRegistry {
    sessions: DashMap<Uuid, Vec<ClientConnection>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a session's member set.
    pub fn register(&self, session_id: Uuid, conn: ClientConnection) {
        self.sessions.entry(session_id).or_default().push(conn);
    }

    /// Remove a connection; drops the session entry if it was the last one.
    pub fn unregister(&self, session_id: Uuid, conn_id: Uuid) {
        if let Some(mut members) = self.sessions.get_mut(&session_id) {
            members.retain(|c| c.id != conn_id);
            let empty = members.is_empty();
            drop(members);
            if empty {
                self.sessions.remove_if(&session_id, |_, v| v.is_empty());
            }
        }
    }

    /// Snapshot of a session's current members.
    pub fn members(&self, session_id: Uuid) -> Vec<ClientConnection> {
        self.sessions
            .get(&session_id)
            .map(|members| members.clone())
            .unwrap_or_default()
    }

    /// Whether any client is connected to the session.
    pub fn has_connections(&self, session_id: Uuid) -> bool {
        self.sessions.contains_key(&session_id)
    }

    /// Number of connections for a session.
    pub fn connection_count(&self, session_id: Uuid) -> usize {
        self.sessions
            .get(&session_id)
            .map(|members| members.len())
            .unwrap_or(0)
    }
}
