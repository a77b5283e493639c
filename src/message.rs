//! Message protocol definitions
//!
//! JSON-based bidirectional event protocol using Serde's tagged enum
//! for type-safe serialization/deserialization.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::store::ChatMessage;

/// Client → Server message
///
/// All events from client to server. Uses tagged enum with snake_case naming.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Submit a chat message
    ///
    /// `request_id` opts into an `ack` reply for this submission.
    Send {
        #[serde(default)]
        author: String,
        #[serde(default)]
        text: String,
        #[serde(default)]
        request_id: Option<u64>,
    },
    /// Signal that `author` is composing a message
    Typing {
        #[serde(default)]
        author: String,
    },
}

/// Server → Client message
///
/// All events from server to client. Uses tagged enum with snake_case naming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Full history, sent once to a new connection
    HistoryInit { messages: Vec<ChatMessage> },
    /// Newly accepted message, sent to every connection
    MessageNew { message: ChatMessage },
    /// Rejection of a send that carried no `request_id`
    MessageError { message: String },
    /// Another connection is typing
    TypingBroadcast { author: String },
    /// Number of open connections
    PresenceCount { count: usize },
    /// Outcome of a send that carried a `request_id`
    Ack {
        request_id: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
    },
}

impl ServerMessage {
    /// Reply owed to the sender of a `send` event, if any
    ///
    /// With a `request_id` the sender always gets an `ack`. Without one,
    /// only a rejection is reported, as `message_error`.
    pub fn send_reply(
        outcome: &Result<ChatMessage, ValidationError>,
        request_id: Option<u64>,
    ) -> Option<Self> {
        match (outcome, request_id) {
            (Ok(_), Some(request_id)) => Some(ServerMessage::Ack {
                request_id,
                error: None,
            }),
            (Ok(_), None) => None,
            (Err(e), Some(request_id)) => Some(ServerMessage::Ack {
                request_id,
                error: Some(e.to_string()),
            }),
            (Err(e), None) => Some(ServerMessage::MessageError {
                message: e.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessageId;

    fn sample() -> ChatMessage {
        ChatMessage {
            id: MessageId(3),
            author: "Ann".to_string(),
            text: "Hi".to_string(),
            timestamp: 10,
        }
    }

    #[test]
    fn test_client_send_deserialize() {
        let json = r#"{"type": "send", "author": "Alice", "text": "hello", "request_id": 7}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Send {
                author: "Alice".to_string(),
                text: "hello".to_string(),
                request_id: Some(7),
            }
        );
    }

    #[test]
    fn test_client_send_defaults() {
        let json = r#"{"type": "send", "text": "hello"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        match msg {
            ClientMessage::Send {
                author, request_id, ..
            } => {
                assert!(author.is_empty());
                assert!(request_id.is_none());
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_client_typing_deserialize() {
        let json = r#"{"type": "typing", "author": "Bob"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Typing {
                author: "Bob".to_string()
            }
        );
    }

    #[test]
    fn test_unknown_type_rejected() {
        let json = r#"{"type": "edit", "id": 1}"#;
        assert!(serde_json::from_str::<ClientMessage>(json).is_err());
    }

    #[test]
    fn test_server_message_serialize() {
        let msg = ServerMessage::MessageNew { message: sample() };
        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["type"], "message_new");
        assert_eq!(value["message"]["id"], 3);

        let msg = ServerMessage::PresenceCount { count: 2 };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"presence_count","count":2}"#);
    }

    #[test]
    fn test_ack_omits_missing_error() {
        let msg = ServerMessage::Ack {
            request_id: 1,
            error: None,
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert_eq!(json, r#"{"type":"ack","request_id":1}"#);
    }

    #[test]
    fn test_send_reply_paths() {
        let ok = Ok(sample());
        let rejected = Err(ValidationError::EmptyText);

        assert_eq!(ServerMessage::send_reply(&ok, None), None);
        assert_eq!(
            ServerMessage::send_reply(&ok, Some(4)),
            Some(ServerMessage::Ack {
                request_id: 4,
                error: None
            })
        );
        assert_eq!(
            ServerMessage::send_reply(&rejected, Some(5)),
            Some(ServerMessage::Ack {
                request_id: 5,
                error: Some("message text is empty".to_string())
            })
        );
        assert_eq!(
            ServerMessage::send_reply(&rejected, None),
            Some(ServerMessage::MessageError {
                message: "message text is empty".to_string()
            })
        );
    }
}
