//! Infrastructure layer: concrete outbound channels and wire DTOs.

pub mod dto;
pub mod message_pusher;
