use std::time::Duration;

use dashmap::mapref::entry::Entry;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    dao::models::SessionStatus,
    error::ServiceError,
    services::session_service,
    state::SharedState,
};

/// Arm the pre-game countdown for a session.
///
/// Returns `false` when a timer is already armed for the session; the armed
/// entry in the shared map is the idempotency guard, so two racing arms cannot
/// both spawn a task.
pub fn start(state: &SharedState, session_id: Uuid, duration: Duration) -> bool {
    match state.countdowns().entry(session_id) {
        Entry::Occupied(_) => {
            debug!(session_id = %session_id, "countdown already armed");
            false
        }
        Entry::Vacant(slot) => {
            let state = state.clone();
            slot.insert(tokio::spawn(async move {
                tokio::time::sleep(duration).await;
                fire(state, session_id).await;
            }));
            true
        }
    }
}

/// Disarm the countdown timer, if one is armed.
pub fn stop(state: &SharedState, session_id: Uuid) -> bool {
    match state.countdowns().remove(&session_id) {
        Some((_, handle)) => {
            handle.abort();
            debug!(session_id = %session_id, "countdown disarmed");
            true
        }
        None => false,
    }
}

/// Whether a countdown timer is currently armed for the session.
pub fn is_running(state: &SharedState, session_id: Uuid) -> bool {
    state.countdowns().contains_key(&session_id)
}

/// Timer expiry: re-validate and activate.
///
/// The session may have been finished or manually activated while the timer
/// slept, so expiry revalidates the status before driving the transition.
async fn fire(state: SharedState, session_id: Uuid) {
    state.countdowns().remove(&session_id);

    let session = match state.require_store().await {
        Ok(store) => match store.find_session(session_id).await {
            Ok(Some(session)) => session,
            Ok(None) => {
                debug!(session_id = %session_id, "countdown fired for unknown session");
                return;
            }
            Err(err) => {
                warn!(session_id = %session_id, error = %err, "countdown expiry lookup failed");
                return;
            }
        },
        Err(err) => {
            warn!(session_id = %session_id, error = %err, "countdown fired in degraded mode");
            return;
        }
    };

    if session.status != SessionStatus::Countdown {
        debug!(
            session_id = %session_id,
            status = %session.status,
            "countdown fired on a session no longer counting down"
        );
        return;
    }

    match session_service::activate_session(&state, session_id).await {
        Ok(_) => {}
        // Lost the race against a manual start; nothing to do.
        Err(ServiceError::InvalidTransition(invalid)) => {
            debug!(session_id = %session_id, error = %invalid, "activation raced");
        }
        Err(err) => {
            warn!(session_id = %session_id, error = %err, "countdown activation failed");
        }
    }
}
