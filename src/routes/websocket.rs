use axum::{
    Router,
    extract::{Path, State, WebSocketUpgrade},
    response::Response,
    routing::get,
};
use uuid::Uuid;

use crate::{services::websocket_service, state::SharedState};

/// Game WebSocket route.
pub fn router() -> Router<SharedState> {
    Router::new().route("/ws/game/{session_id}", get(upgrade))
}

/// Upgrade the connection and hand the socket to the session handler.
///
/// The session is not validated before the upgrade: a socket on an unknown
/// session simply never receives a snapshot, and the first valid one after a
/// restart does.
pub async fn upgrade(
    State(state): State<SharedState>,
    Path(session_id): Path<Uuid>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| websocket_service::handle_socket(state, session_id, socket))
}
