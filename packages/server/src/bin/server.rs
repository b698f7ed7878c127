//! Lamport-ordered broadcast chat hub.
//!
//! Participants join over WebSocket and receive every message with the
//! Lamport timestamp the hub assigned to it.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chitchat-server
//! cargo run --bin chitchat-server -- --host 0.0.0.0 --port 5678
//! ```

use std::{sync::Arc, time::Duration};

use chitchat_server::{
    config::{DEFAULT_CHANNEL_CAPACITY, HubConfig},
    ui::Server,
    usecase::ChatHub,
};
use chitchat_shared::logger::setup_logger;
use clap::{Parser, builder::TypedValueParser};

#[derive(Parser, Debug)]
#[command(name = "chitchat-server")]
#[command(about = "Chat hub with Lamport-ordered broadcast", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "5678")]
    port: u16,

    /// Messages buffered per participant before delivery to it fails
    #[arg(long, default_value_t = DEFAULT_CHANNEL_CAPACITY, value_parser = clap::value_parser!(u16).range(1..).map(usize::from))]
    channel_capacity: usize,

    /// Milliseconds one delivery may wait for buffer space (0 = never wait)
    #[arg(long, default_value = "50")]
    delivery_timeout_ms: u64,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    let hub_config = HubConfig {
        channel_capacity: args.channel_capacity,
        delivery_timeout: Duration::from_millis(args.delivery_timeout_ms),
    };
    tracing::info!("Hub config: {:?}", hub_config);

    let hub = Arc::new(ChatHub::new());
    let server = Server::new(hub, hub_config);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
