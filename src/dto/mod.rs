use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Color assignment DTOs.
pub mod color;
/// Health response payload.
pub mod health;
/// Puzzle create/answer DTOs.
pub mod puzzle;
/// Session lifecycle DTOs.
pub mod session;
/// Canonical session snapshot sent to clients.
pub mod snapshot;
/// Team and player registration DTOs.
pub mod team;
/// Request validation helpers.
pub mod validation;
/// WebSocket message envelopes.
pub mod ws;

/// Render a timestamp the way every outbound payload does.
pub fn format_timestamp(time: OffsetDateTime) -> String {
    time.format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}

/// Current UTC time rendered for an outbound envelope.
pub fn now_rfc3339() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}
