//! Business logic of the synchronization engine, free of transport concerns.

/// Snapshot assembly and fan-out to connected clients.
pub mod broadcast;
/// Cursor color assignment, auditing, and conflict resolution.
pub mod color_service;
/// Pre-game countdown timers.
pub mod countdown;
/// OpenAPI document.
pub mod documentation;
/// Storage health probe.
pub mod health_service;
/// Point decay and the round-robin reward.
pub mod points;
/// Puzzle generation, rotation, and answer resolution.
pub mod puzzle_service;
/// Session lifecycle mutators.
pub mod session_service;
/// Player and team registration.
pub mod team_service;
/// Per-connection WebSocket handling.
pub mod websocket_service;
