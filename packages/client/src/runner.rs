//! Client execution logic with reconnection support.

use std::{sync::Arc, time::Duration};

use chitchat_server::domain::LogicalClock;
use tokio::sync::Mutex;

use crate::{
    domain::{should_attempt_reconnect, should_exit_immediately},
    session::{Identity, run_client_session},
    ui::spawn_input_thread,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the chat client with reconnection logic
///
/// The Lamport clock lives for the whole process, so a reconnect rejoins with
/// the time observed before the connection was lost.
pub async fn run_client(url: String, identity: Identity) -> Result<(), Box<dyn std::error::Error>> {
    let clock = Arc::new(Mutex::new(LogicalClock::new()));
    let mut input_rx = spawn_input_thread(&identity.name);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to join {} as '{}' (id {}, attempt {}/{})",
            url,
            identity.name,
            identity.id,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &identity, clock.clone(), &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If the user left, don't reconnect
                break;
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    tracing::error!("{}", e);
                    tracing::error!(
                        "Cannot join as participant {}. Exiting.",
                        identity.id
                    );
                    return Err(Box::new(e));
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(Box::new(e));
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
