/// Ephemeral cursor/activity/color tracking.
pub mod ephemeral;
/// Live WebSocket connection registry.
pub mod registry;
/// Session status transition table.
pub mod session_machine;

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::dao::store::GameStore;
use crate::error::ServiceError;

pub use self::ephemeral::EphemeralState;
pub use self::registry::{ClientConnection, ConnectionRegistry};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state owned by the engine instance.
///
/// Everything the synchronization engine shares between request handlers,
/// socket tasks, and timers lives here; there are no process-wide singletons,
/// so tests can spin up fully isolated instances.
pub struct AppState {
    config: AppConfig,
    store: RwLock<Option<Arc<dyn GameStore>>>,
    registry: ConnectionRegistry,
    ephemeral: EphemeralState,
    countdowns: DashMap<Uuid, JoinHandle<()>>,
    transition_gates: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned
    /// cheaply. The application starts degraded until a store is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let ephemeral = EphemeralState::new(config.staleness_window());
        Arc::new(Self {
            config,
            store: RwLock::new(None),
            registry: ConnectionRegistry::new(),
            ephemeral,
            countdowns: DashMap::new(),
            transition_gates: DashMap::new(),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn store(&self) -> Option<Arc<dyn GameStore>> {
        let guard = self.store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the store or fail with [`ServiceError::Degraded`].
    pub async fn require_store(&self) -> Result<Arc<dyn GameStore>, ServiceError> {
        self.store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a store implementation and leave degraded mode.
    pub async fn install_store(&self, store: Arc<dyn GameStore>) {
        let mut guard = self.store.write().await;
        *guard = Some(store);
    }

    /// Remove the current store and enter degraded mode.
    pub async fn clear_store(&self) {
        let mut guard = self.store.write().await;
        guard.take();
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.store.read().await;
        guard.is_none()
    }

    /// Registry of live client sockets keyed by session.
    pub fn registry(&self) -> &ConnectionRegistry {
        &self.registry
    }

    /// Ephemeral cursor/activity/color maps.
    pub fn ephemeral(&self) -> &EphemeralState {
        &self.ephemeral
    }

    /// Armed countdown timers keyed by session; the entry itself is the
    /// per-session idempotency guard.
    pub fn countdowns(&self) -> &DashMap<Uuid, JoinHandle<()>> {
        &self.countdowns
    }

    /// Per-session lock serializing status transitions. Two sessions never
    /// share a gate, so they cannot block each other.
    pub fn session_gate(&self, session_id: Uuid) -> Arc<Mutex<()>> {
        self.transition_gates
            .entry(session_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
