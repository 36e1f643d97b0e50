use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Probe the storage backend and report overall service health.
///
/// The engine keeps serving read-only surfaces in degraded mode, so a failed
/// probe yields a degraded report rather than an error.
pub async fn probe(state: &SharedState) -> HealthResponse {
    match state.store().await {
        Some(store) => match store.health_check().await {
            Ok(()) => HealthResponse::ok(),
            Err(err) => {
                warn!(error = %err, "storage health check failed");
                HealthResponse::degraded()
            }
        },
        None => HealthResponse::degraded(),
    }
}
