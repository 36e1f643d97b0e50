//! HTTP and WebSocket surface of the synchronization engine.

use axum::Router;

use crate::state::SharedState;

/// Cursor color assignment routes.
pub mod color;
/// Swagger UI wiring.
pub mod docs;
/// Session lifecycle routes.
pub mod game;
/// Health probe route.
pub mod health;
/// Puzzle rotation and point economy routes.
pub mod puzzle;
/// Team and player registration routes.
pub mod team;
/// Game WebSocket route.
pub mod websocket;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    Router::new()
        .merge(team::router())
        .merge(game::router())
        .merge(puzzle::router())
        .merge(color::router())
        .merge(health::router())
        .merge(websocket::router())
        .merge(docs::swagger_ui())
        .with_state(state)
}
