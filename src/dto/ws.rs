use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::now_rfc3339;

/// Interaction verbs clients may attach to a puzzle interaction event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InteractionType {
    /// Single click inside the puzzle.
    Click,
    /// Drag gesture.
    Drag,
    /// Answer submission gesture.
    Submit,
    /// The puzzle timed out client-side.
    Timeout,
    /// The player started engaging with the puzzle.
    Start,
    /// The player finished the puzzle client-side.
    Complete,
}

/// Messages accepted from game WebSocket clients.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Request a fresh full-state broadcast.
    #[serde(rename = "ping")]
    Ping,
    /// Cursor moved; updates the cursor map and emits a lightweight event.
    #[serde(rename = "mouse_position")]
    MousePosition {
        /// Reporting player.
        user_id: Uuid,
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
        /// Puzzle area under the cursor, if any.
        #[serde(default)]
        puzzle_area: Option<String>,
        /// Optional client viewport descriptor echoed to peers.
        #[serde(default)]
        #[schema(value_type = Option<Object>)]
        viewport: Option<serde_json::Value>,
    },
    /// Relayed puzzle interaction signal.
    #[serde(rename = "puzzle_interaction")]
    PuzzleInteraction {
        /// Interacting player.
        user_id: Uuid,
        /// Puzzle being interacted with.
        puzzle_id: Uuid,
        /// Interaction verb.
        interaction_type: InteractionType,
        /// Opaque interaction detail.
        #[serde(default)]
        #[schema(value_type = Object)]
        interaction_data: serde_json::Value,
    },
    /// Relayed team communication signal.
    #[serde(rename = "team_communication")]
    TeamCommunication {
        /// Sending player.
        user_id: Uuid,
        /// Application-defined message kind.
        message_type: String,
        /// Opaque message detail.
        #[serde(default)]
        #[schema(value_type = Object)]
        message_data: serde_json::Value,
    },
    /// Activity descriptor update; triggers a full-state broadcast.
    #[serde(rename = "player_activity")]
    PlayerActivity {
        /// Reporting player.
        user_id: Uuid,
        /// Opaque activity descriptor stored in the activity map.
        #[schema(value_type = Object)]
        activity_data: serde_json::Value,
    },
    /// Relayed achievement signal.
    #[serde(rename = "achievement")]
    Achievement {
        /// Achieving player.
        user_id: Uuid,
        /// Application-defined achievement kind.
        achievement_type: String,
        /// Opaque achievement detail.
        #[serde(default)]
        #[schema(value_type = Object)]
        achievement_data: serde_json::Value,
    },
    /// Any unrecognized `type` value; answered with an error envelope.
    #[serde(other)]
    Unknown,
}

impl ClientMessage {
    /// Parse an inbound text frame.
    pub fn from_json_str(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// Outbound message wrapper: every frame a client receives has this shape.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    /// Discriminator (`state_update`, `mouse_cursor`, `error`, ...).
    #[serde(rename = "type")]
    pub kind: &'static str,
    /// Event-specific payload.
    pub data: T,
    /// Server-side emission time (RFC 3339).
    pub timestamp: String,
}

impl<T: Serialize> Envelope<T> {
    /// Wrap a payload, stamping the current time.
    pub fn new(kind: &'static str, data: T) -> Self {
        Self {
            kind,
            data,
            timestamp: now_rfc3339(),
        }
    }
}

/// Lightweight cursor movement event.
#[derive(Debug, Serialize, ToSchema)]
pub struct MouseCursorEvent {
    /// Moving player.
    pub user_id: Uuid,
    /// Horizontal position.
    pub x: f64,
    /// Vertical position.
    pub y: f64,
    /// Cached cursor color, if one was assigned.
    pub color: Option<String>,
    /// Client viewport descriptor, echoed verbatim.
    #[schema(value_type = Option<Object>)]
    pub viewport: Option<serde_json::Value>,
}

/// Lightweight puzzle interaction event.
#[derive(Debug, Serialize, ToSchema)]
pub struct PuzzleInteractionEvent {
    /// Interacting player.
    pub user_id: Uuid,
    /// Target puzzle.
    pub puzzle_id: Uuid,
    /// Interaction verb.
    pub interaction_type: InteractionType,
    /// Opaque interaction detail.
    #[schema(value_type = Object)]
    pub interaction_data: serde_json::Value,
}

/// Lightweight team communication event.
#[derive(Debug, Serialize, ToSchema)]
pub struct TeamCommunicationEvent {
    /// Sending player.
    pub user_id: Uuid,
    /// Application-defined message kind.
    pub message_type: String,
    /// Opaque message detail.
    #[schema(value_type = Object)]
    pub message_data: serde_json::Value,
}

/// Lightweight achievement event.
#[derive(Debug, Serialize, ToSchema)]
pub struct AchievementEvent {
    /// Achieving player.
    pub user_id: Uuid,
    /// Application-defined achievement kind.
    pub achievement_type: String,
    /// Opaque achievement detail.
    #[schema(value_type = Object)]
    pub achievement_data: serde_json::Value,
}

/// Error payload sent to the offending sender only; the connection stays open.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEvent {
    /// Human-readable description of what was wrong.
    pub message: String,
    /// Validation detail lines, when available.
    pub details: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tagged_parse_dispatches_on_type() {
        let msg = ClientMessage::from_json_str(
            r#"{"type":"mouse_position","user_id":"7f4df4c2-9c3c-4cbc-b0d8-0ff0ba5ff6a2","x":1.5,"y":2.5}"#,
        )
        .unwrap();
        match msg {
            ClientMessage::MousePosition { x, y, puzzle_area, .. } => {
                assert_eq!(x, 1.5);
                assert_eq!(y, 2.5);
                assert_eq!(puzzle_area, None);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn unknown_type_parses_to_unknown() {
        let msg = ClientMessage::from_json_str(r#"{"type":"selfdestruct"}"#).unwrap();
        assert!(matches!(msg, ClientMessage::Unknown));
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(ClientMessage::from_json_str("not json").is_err());
        assert!(ClientMessage::from_json_str(r#"{"type":"ping","#).is_err());
    }

    #[test]
    fn envelope_carries_type_data_timestamp() {
        let envelope = Envelope::new("error", ErrorEvent {
            message: "bad".into(),
            details: vec![],
        });
        let json: serde_json::Value =
            serde_json::from_str(&serde_json::to_string(&envelope).unwrap()).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["data"]["message"], "bad");
        assert!(json["timestamp"].is_string());
    }
}
