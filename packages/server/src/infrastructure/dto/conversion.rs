//! Conversion logic between DTOs and domain entities.

use crate::domain::{ChatMessage, LamportTimestamp, Participant};
use crate::infrastructure::dto::{http, websocket};

// ========================================
// DTO → Domain Entity
// ========================================

impl From<websocket::ServerMessage> for ChatMessage {
    fn from(dto: websocket::ServerMessage) -> Self {
        Self {
            sender_name: dto.name,
            text: dto.text,
            timestamp: LamportTimestamp::new(dto.lamport),
        }
    }
}

// ========================================
// Domain Entity → DTO
// ========================================

impl From<ChatMessage> for websocket::ServerMessage {
    fn from(model: ChatMessage) -> Self {
        Self {
            r#type: websocket::MessageType::Chat,
            name: model.sender_name,
            text: model.text,
            lamport: model.timestamp.value(),
        }
    }
}

impl From<Participant> for http::ParticipantDto {
    fn from(model: Participant) -> Self {
        Self {
            id: model.id.value(),
            name: model.display_name.into_string(),
        }
    }
}
