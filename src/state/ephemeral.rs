use std::collections::HashMap;
use std::time::Duration;

use dashmap::DashMap;
use time::OffsetDateTime;
use uuid::Uuid;

/// Last known cursor position reported by a player.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorSample {
    /// Horizontal position in client coordinates.
    pub x: f64,
    /// Vertical position in client coordinates.
    pub y: f64,
    /// Puzzle area the cursor hovers over, if the client reports one.
    pub puzzle_area: Option<String>,
    /// When the sample was recorded.
    pub updated_at: OffsetDateTime,
}

/// Last known activity descriptor reported by a player.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivitySample {
    /// Opaque activity payload forwarded to the snapshot.
    pub data: serde_json::Value,
    /// When the sample was recorded.
    pub updated_at: OffsetDateTime,
}

/// Ephemeral per-session state owned exclusively by the engine.
///
/// None of this survives a process restart, which is acceptable: it only
/// affects display freshness. Entries older than the staleness window are
/// pruned opportunistically on write rather than by a sweeper task.
pub struct EphemeralState {
    cursors: DashMap<Uuid, HashMap<Uuid, CursorSample>>,
    activity: DashMap<Uuid, HashMap<Uuid, ActivitySample>>,
    colors: DashMap<Uuid, HashMap<Uuid, String>>,
    staleness: Duration,
}

impl EphemeralState {
    /// Create empty maps with the given staleness window.
    pub fn new(staleness: Duration) -> Self {
        Self {
            cursors: DashMap::new(),
            activity: DashMap::new(),
            colors: DashMap::new(),
            staleness,
        }
    }

    /// Record a cursor position, pruning stale siblings in the same session.
    pub fn update_cursor(
        &self,
        session_id: Uuid,
        user_id: Uuid,
        x: f64,
        y: f64,
        puzzle_area: Option<String>,
    ) {
        let now = OffsetDateTime::now_utc();
        self.cursors.entry(session_id).or_default().insert(
            user_id,
            CursorSample {
                x,
                y,
                puzzle_area,
                updated_at: now,
            },
        );
        self.prune(session_id, now);
    }

    /// Record an activity descriptor, pruning stale siblings in the same session.
    pub fn update_activity(&self, session_id: Uuid, user_id: Uuid, data: serde_json::Value) {
        let now = OffsetDateTime::now_utc();
        self.activity.entry(session_id).or_default().insert(
            user_id,
            ActivitySample {
                data,
                updated_at: now,
            },
        );
        self.prune(session_id, now);
    }

    /// Cache a player's color for cursor events, avoiding a store round trip.
    pub fn cache_color(&self, session_id: Uuid, user_id: Uuid, color: String) {
        self.colors
            .entry(session_id)
            .or_default()
            .insert(user_id, color);
    }

    /// Cached color for a player, if known.
    pub fn color_of(&self, session_id: Uuid, user_id: Uuid) -> Option<String> {
        self.colors
            .get(&session_id)
            .and_then(|map| map.get(&user_id).cloned())
    }

    /// Current cursor samples for a session.
    pub fn cursors(&self, session_id: Uuid) -> HashMap<Uuid, CursorSample> {
        self.cursors
            .get(&session_id)
            .map(|map| map.clone())
            .unwrap_or_default()
    }

    /// Current activity samples for a session.
    pub fn activity(&self, session_id: Uuid) -> HashMap<Uuid, ActivitySample> {
        self.activity
            .get(&session_id)
            .map(|map| map.clone())
            .unwrap_or_default()
    }

    /// Drop everything tracked for a session (called when it finishes).
    pub fn clear_session(&self, session_id: Uuid) {
        self.cursors.remove(&session_id);
        self.activity.remove(&session_id);
        self.colors.remove(&session_id);
    }

    /// Remove cursor/activity entries older than the staleness window.
    pub(crate) fn prune(&self, session_id: Uuid, now: OffsetDateTime) {
        let cutoff = now - self.staleness;
        if let Some(mut map) = self.cursors.get_mut(&session_id) {
            map.retain(|_, sample| sample.updated_at >= cutoff);
        }
        if let Some(mut map) = self.activity.get_mut(&session_id) {
            map.retain(|_, sample| sample.updated_at >= cutoff);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ephemeral() -> EphemeralState {
        EphemeralState::new(Duration::from_secs(30))
    }

    #[test]
    fn cursor_updates_are_visible() {
        let state = ephemeral();
        let (session, user) = (Uuid::new_v4(), Uuid::new_v4());
        state.update_cursor(session, user, 10.0, 20.0, Some("memory".into()));

        let cursors = state.cursors(session);
        let sample = cursors.get(&user).expect("cursor recorded");
        assert_eq!(sample.x, 10.0);
        assert_eq!(sample.y, 20.0);
        assert_eq!(sample.puzzle_area.as_deref(), Some("memory"));
    }

    #[test]
    fn stale_entries_are_pruned_on_write() {
        let state = ephemeral();
        let session = Uuid::new_v4();
        let (old, fresh) = (Uuid::new_v4(), Uuid::new_v4());
        state.update_cursor(session, old, 1.0, 1.0, None);
        state.update_activity(session, old, json!({"status": "solving"}));

        // Prune as if the staleness window elapsed.
        state.prune(session, OffsetDateTime::now_utc() + Duration::from_secs(60));
        assert!(state.cursors(session).is_empty());
        assert!(state.activity(session).is_empty());

        state.update_cursor(session, fresh, 2.0, 2.0, None);
        assert_eq!(state.cursors(session).len(), 1);
    }

    #[test]
    fn color_cache_roundtrip_and_clear() {
        let state = ephemeral();
        let (session, user) = (Uuid::new_v4(), Uuid::new_v4());
        state.cache_color(session, user, "red".into());
        assert_eq!(state.color_of(session, user).as_deref(), Some("red"));

        state.clear_session(session);
        assert_eq!(state.color_of(session, user), None);
        assert!(state.cursors(session).is_empty());
    }
}
