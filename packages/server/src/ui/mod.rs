//! Axum transport for the chat hub.

mod handler;
mod server;
mod signal;
pub mod state;

pub use server::Server;
pub use signal::shutdown_signal;
