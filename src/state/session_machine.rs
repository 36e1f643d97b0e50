use thiserror::Error;

use crate::dao::models::SessionStatus;

/// Error returned when a status change not present in the transition table is
/// requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid state transition from {from} to {to}")]
pub struct InvalidTransition {
    /// Status the session was in when the change was requested.
    pub from: SessionStatus,
    /// Status the caller asked for.
    pub to: SessionStatus,
}

/// Validate a requested session status change against the strict transition
/// table:
///
/// ```text
/// lobby     -> countdown
/// countdown -> active
/// active    -> finished
/// finished  -> (none)
/// ```
///
/// Every mutator that touches `status` goes through this check while holding
/// the session's transition gate, so concurrent drivers (request handlers, the
/// countdown timer, the game-end watcher) cannot race a session into an
/// illegal state.
pub fn ensure_transition(from: SessionStatus, to: SessionStatus) -> Result<(), InvalidTransition> {
    match (from, to) {
        (SessionStatus::Lobby, SessionStatus::Countdown)
        | (SessionStatus::Countdown, SessionStatus::Active)
        | (SessionStatus::Active, SessionStatus::Finished) => Ok(()),
        (from, to) => Err(InvalidTransition { from, to }),
    }
}

/// The single legal successor of a status, if any.
pub fn successor(status: SessionStatus) -> Option<SessionStatus> {
    match status {
        SessionStatus::Lobby => Some(SessionStatus::Countdown),
        SessionStatus::Countdown => Some(SessionStatus::Active),
        SessionStatus::Active => Some(SessionStatus::Finished),
        SessionStatus::Finished => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [SessionStatus; 4] = [
        SessionStatus::Lobby,
        SessionStatus::Countdown,
        SessionStatus::Active,
        SessionStatus::Finished,
    ];

    #[test]
    fn happy_path_edges_are_legal() {
        assert!(ensure_transition(SessionStatus::Lobby, SessionStatus::Countdown).is_ok());
        assert!(ensure_transition(SessionStatus::Countdown, SessionStatus::Active).is_ok());
        assert!(ensure_transition(SessionStatus::Active, SessionStatus::Finished).is_ok());
    }

    #[test]
    fn every_other_edge_is_rejected() {
        for from in ALL {
            for to in ALL {
                let legal = successor(from) == Some(to);
                let result = ensure_transition(from, to);
                assert_eq!(result.is_ok(), legal, "edge {from} -> {to}");
                if let Err(err) = result {
                    assert_eq!(err.from, from);
                    assert_eq!(err.to, to);
                }
            }
        }
    }

    #[test]
    fn finished_is_terminal() {
        assert_eq!(successor(SessionStatus::Finished), None);
        for to in ALL {
            assert!(ensure_transition(SessionStatus::Finished, to).is_err());
        }
    }

    #[test]
    fn error_names_both_statuses() {
        let err = ensure_transition(SessionStatus::Lobby, SessionStatus::Active).unwrap_err();
        assert_eq!(err.to_string(), "invalid state transition from lobby to active");
    }
}
