//! Terminal chat client with Lamport timestamps and reconnection support.
//!
//! Joins the hub over WebSocket, prints every message with the Lamport time
//! the hub assigned to it, and sends typed lines as chat messages.
//! `/disconnect` (or Ctrl+C) leaves the chat. Automatically reconnects on
//! disconnection (max 5 attempts with 5 second interval); a participant id
//! that is already joined is rejected by the hub.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin chitchat-client -- --name Alice
//! cargo run --bin chitchat-client -- -n Bob --id 2
//! ```

use clap::Parser;

use chitchat_client::{Identity, domain::generate_participant_id, prompt_for_name, run_client};
use chitchat_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "chitchat-client")]
#[command(about = "Chat client with Lamport-ordered broadcast", long_about = None)]
struct Args {
    /// Display name shown to other participants (prompted for if omitted)
    #[arg(short = 'n', long)]
    name: Option<String>,

    /// Participant id (must be unique; random if omitted)
    #[arg(short = 'i', long)]
    id: Option<u32>,

    /// WebSocket URL of the hub's join endpoint
    #[arg(short = 'u', long, default_value = "ws://127.0.0.1:5678/ws")]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    let name = match args.name {
        Some(name) => name,
        None => match prompt_for_name() {
            Ok(name) => name,
            Err(e) => {
                tracing::error!("Failed to read username: {}", e);
                std::process::exit(1);
            }
        },
    };
    let identity = Identity {
        id: args.id.unwrap_or_else(generate_participant_id),
        name,
    };

    // Run the client
    if let Err(e) = run_client(args.url, identity).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
