use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::ws::ClientMessage,
    services::broadcast,
    state::{ClientConnection, SharedState},
};

/// Drive one game WebSocket connection to completion.
///
/// The socket is split; a dedicated writer task owns the sink so the
/// broadcaster can push frames without blocking the read loop. Every new
/// connection immediately receives a full state snapshot.
pub async fn handle_socket(state: SharedState, session_id: Uuid, socket: WebSocket) {
    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();

    let writer: JoinHandle<()> = tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
    });

    let conn_id = Uuid::new_v4();
    state.registry().register(
        session_id,
        ClientConnection {
            id: conn_id,
            tx: tx.clone(),
        },
    );
    info!(
        session_id = %session_id,
        connection_id = %conn_id,
        connections = state.registry().connection_count(session_id),
        "client connected"
    );

    broadcast::broadcast_state(&state, session_id).await;

    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => match ClientMessage::from_json_str(&text) {
                Ok(message) => dispatch(&state, session_id, message, &tx).await,
                Err(err) => {
                    broadcast::send_error(&tx, "malformed message", vec![err.to_string()]);
                }
            },
            Ok(Message::Ping(payload)) => {
                let _ = tx.send(Message::Pong(payload));
            }
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(err) => {
                debug!(
                    session_id = %session_id,
                    connection_id = %conn_id,
                    error = %err,
                    "socket read failed"
                );
                break;
            }
        }
    }

    state.registry().unregister(session_id, conn_id);
    info!(
        session_id = %session_id,
        connection_id = %conn_id,
        "client disconnected"
    );
    finalize(writer, tx).await;
}

/// Route one parsed client message.
async fn dispatch(
    state: &SharedState,
    session_id: Uuid,
    message: ClientMessage,
    tx: &mpsc::UnboundedSender<Message>,
) {
    match message {
        ClientMessage::Ping => {
            broadcast::broadcast_state(state, session_id).await;
        }
        ClientMessage::MousePosition {
            user_id,
            x,
            y,
            puzzle_area,
            viewport,
        } => {
            state
                .ephemeral()
                .update_cursor(session_id, user_id, x, y, puzzle_area);
            // Hot path: peers fold the event into their local state without
            // a full snapshot.
            broadcast::broadcast_mouse_cursor(state, session_id, user_id, x, y, viewport);
        }
        ClientMessage::PuzzleInteraction {
            user_id,
            puzzle_id,
            interaction_type,
            interaction_data,
        } => {
            broadcast::broadcast_puzzle_interaction(
                state,
                session_id,
                user_id,
                puzzle_id,
                interaction_type,
                interaction_data,
            );
        }
        ClientMessage::TeamCommunication {
            user_id,
            message_type,
            message_data,
        } => {
            broadcast::broadcast_team_communication(
                state,
                session_id,
                user_id,
                message_type,
                message_data,
            );
        }
        ClientMessage::PlayerActivity {
            user_id,
            activity_data,
        } => {
            state
                .ephemeral()
                .update_activity(session_id, user_id, activity_data);
            broadcast::broadcast_state(state, session_id).await;
        }
        ClientMessage::Achievement {
            user_id,
            achievement_type,
            achievement_data,
        } => {
            broadcast::broadcast_achievement(
                state,
                session_id,
                user_id,
                achievement_type,
                achievement_data,
            );
        }
        ClientMessage::Unknown => {
            broadcast::send_error(tx, "unrecognized message type", Vec::new());
        }
    }
}

/// Close out the writer task after the read loop ends.
///
/// Dropping the last sender ends the writer's receive loop; awaiting the
/// handle ensures buffered frames are flushed before the connection is gone.
async fn finalize(writer: JoinHandle<()>, tx: mpsc::UnboundedSender<Message>) {
    drop(tx);
    if let Err(err) = writer.await {
        warn!(error = %err, "websocket writer task failed");
    }
}
