//! Request handlers.

mod http;
mod websocket;

pub use http::{get_hub_state, health_check, leave, send_message};
pub use websocket::websocket_handler;
