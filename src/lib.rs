//! Realtime session synchronization engine for timed cooperative puzzle games.
//!
//! Teams of players race a shared survival clock: every few seconds each
//! surviving player loses a point, and a correct puzzle answer pays the next
//! teammate in roster order. The engine owns the session state machine
//! (`lobby -> countdown -> active -> finished`), the puzzle rotation, the
//! cursor color assignment, and the WebSocket fan-out that keeps every
//! connected client on one consistent snapshot.

/// Runtime configuration with baked defaults.
pub mod config;
/// Persistence boundary: models, store trait, reference backend.
pub mod dao;
/// Request, response, and WebSocket payload types.
pub mod dto;
/// Service and HTTP error model.
pub mod error;
/// HTTP and WebSocket surface.
pub mod routes;
/// Business logic.
pub mod services;
/// Shared application state.
pub mod state;
