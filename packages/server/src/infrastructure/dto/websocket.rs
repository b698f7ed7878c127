//! WebSocket message DTOs.

use serde::{Deserialize, Serialize};

/// Message type identifier for hub-to-client frames
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum MessageType {
    Chat,
}

/// Hub-to-client frame carrying one timestamped chat message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerMessage {
    pub r#type: MessageType,
    /// Sender display name ("Server" for join/leave notices)
    pub name: String,
    pub text: String,
    /// Lamport timestamp assigned by the hub
    pub lamport: u64,
}

/// Client-to-hub frame
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    /// SendMessage on behalf of the connection's participant
    Chat { text: String, lamport: u64 },
    /// Leave on behalf of the connection's participant
    Leave { lamport: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message_wire_format() {
        // テスト項目: ServerMessage が期待する JSON 形式で出力される
        // given (前提条件):
        let message = ServerMessage {
            r#type: MessageType::Chat,
            name: "alice".to_string(),
            text: "hi".to_string(),
            lamport: 3,
        };

        // when (操作):
        let json = serde_json::to_value(&message).unwrap();

        // then (期待する結果):
        assert_eq!(
            json,
            serde_json::json!({"type": "chat", "name": "alice", "text": "hi", "lamport": 3})
        );
    }

    #[test]
    fn test_client_frame_chat_parses() {
        // テスト項目: chat フレームがパースできる
        // given (前提条件):
        let raw = r#"{"type":"chat","text":"hello","lamport":1}"#;

        // when (操作):
        let frame: ClientFrame = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(
            frame,
            ClientFrame::Chat {
                text: "hello".to_string(),
                lamport: 1
            }
        );
    }

    #[test]
    fn test_client_frame_leave_parses() {
        // テスト項目: leave フレームがパースできる
        // given (前提条件):
        let raw = r#"{"type":"leave","lamport":7}"#;

        // when (操作):
        let frame: ClientFrame = serde_json::from_str(raw).unwrap();

        // then (期待する結果):
        assert_eq!(frame, ClientFrame::Leave { lamport: 7 });
    }

    #[test]
    fn test_client_frame_unknown_type_is_rejected() {
        // テスト項目: 未知の type はパースエラーになる
        // given (前提条件):
        let raw = r#"{"type":"join","lamport":0}"#;

        // when (操作):
        let result = serde_json::from_str::<ClientFrame>(raw);

        // then (期待する結果):
        assert!(result.is_err());
    }
}
