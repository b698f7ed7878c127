//! Data Transfer Objects (DTOs) for the chat hub.
//!
//! DTOs are organized by protocol:
//! - `websocket`: frames exchanged on the Join stream
//! - `http`: HTTP API request/response bodies

pub mod conversion;
pub mod http;
pub mod websocket;
