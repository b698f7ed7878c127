//! WebSocket client session management.
//!
//! One session is one Join: connect with the participant's id, name and
//! Lamport time, print every message the hub pushes, and send typed lines
//! until `/disconnect`, Ctrl+C or a lost connection.

use std::sync::Arc;

use chitchat_server::{
    domain::{LamportTimestamp, LogicalClock, value_object::MAX_MESSAGE_CHARS},
    infrastructure::dto::websocket::{ClientFrame, ServerMessage},
};
use chitchat_shared::time::now_for_display;
use futures_util::{SinkExt, StreamExt};
use tokio::sync::{Mutex, mpsc};
use tokio_tungstenite::{
    connect_async,
    tungstenite::{Error as WsError, protocol::Message},
};

use crate::{
    domain::{InputAction, parse_input},
    error::ClientError,
    formatter::MessageFormatter,
    ui::{InputEvent, redisplay_prompt},
};

/// Who this client joins as
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: u32,
    pub name: String,
}

/// Join URL carrying the participant and the Lamport time it has observed
///
/// Joining claims the clock's current value without ticking; the hub's join
/// notice advances it once received.
pub fn join_url(base: &str, identity: &Identity, clock: &LogicalClock) -> String {
    format!(
        "{}?id={}&name={}&lamport={}",
        base,
        identity.id,
        urlencoding::encode(&identity.name),
        clock.current()
    )
}

/// Map a failed WebSocket handshake to a client error
fn join_error(error: WsError, identity: &Identity) -> ClientError {
    match error {
        WsError::Http(response) => match response.status().as_u16() {
            409 => ClientError::DuplicateParticipant(identity.id),
            400 => ClientError::JoinRejected(response.status().to_string()),
            _ => ClientError::ConnectionError(response.status().to_string()),
        },
        other => ClientError::ConnectionError(other.to_string()),
    }
}

/// Run one WebSocket session
///
/// Returns `Ok(())` when the user left, and an error when the connection was
/// refused or lost.
pub async fn run_client_session(
    url: &str,
    identity: &Identity,
    clock: Arc<Mutex<LogicalClock>>,
    input_rx: &mut mpsc::UnboundedReceiver<InputEvent>,
) -> Result<(), ClientError> {
    let url = join_url(url, identity, &*clock.lock().await);

    let (ws_stream, _response) = connect_async(&url)
        .await
        .map_err(|e| join_error(e, identity))?;

    tracing::info!("Connected to chat hub!");
    print!("{}", MessageFormatter::format_welcome(&identity.name));

    let (mut write, mut read) = ws_stream.split();

    // Spawn a task to handle incoming messages
    let name_for_read = identity.name.clone();
    let clock_for_read = clock.clone();
    let mut read_task = tokio::spawn(async move {
        while let Some(message) = read.next().await {
            match message {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ServerMessage>(text.as_str()) {
                        Ok(message) => {
                            // Receiving is an event too: merge, then display
                            if let Err(e) = clock_for_read
                                .lock()
                                .await
                                .merge_and_advance(LamportTimestamp::new(message.lamport))
                            {
                                tracing::warn!("Local clock not advanced: {}", e);
                            }
                            let formatted = MessageFormatter::format_chat_message(
                                &message,
                                &now_for_display(),
                            );
                            print!("{}", formatted);
                        }
                        Err(_) => print!("{}", MessageFormatter::format_raw_message(text.as_str())),
                    }
                    redisplay_prompt(&name_for_read);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!("Hub closed the connection");
                    break;
                }
                Err(e) => {
                    tracing::warn!("WebSocket read error: {}", e);
                    break;
                }
                _ => {}
            }
        }
    });

    // Forward typed lines until the user leaves or the socket fails
    let write_loop = async {
        while let Some(event) = input_rx.recv().await {
            let action = match event {
                InputEvent::Line(line) => parse_input(&line),
                InputEvent::Closed => InputAction::Disconnect,
            };

            let frame = match action {
                InputAction::Send(text) => ClientFrame::Chat {
                    text: text.into_string(),
                    lamport: clock.lock().await.tick().value(),
                },
                InputAction::Disconnect => ClientFrame::Leave {
                    lamport: clock.lock().await.tick().value(),
                },
                InputAction::TooLong { chars } => {
                    print!(
                        "{}",
                        MessageFormatter::format_too_long(MAX_MESSAGE_CHARS, chars)
                    );
                    redisplay_prompt(&identity.name);
                    continue;
                }
                InputAction::Empty => {
                    redisplay_prompt(&identity.name);
                    continue;
                }
            };

            let json = match serde_json::to_string(&frame) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize frame: {}", e);
                    continue;
                }
            };

            if let Err(e) = write.send(Message::Text(json.into())).await {
                return Err(ClientError::ConnectionError(e.to_string()));
            }

            if let ClientFrame::Leave { .. } = frame {
                write.close().await.ok();
                println!("You have left the chat!");
                return Ok(());
            }
        }

        // Input thread is gone; nothing more can be typed
        Ok(())
    };

    // If any one of the tasks completes, stop the other
    tokio::select! {
        _ = &mut read_task => {
            Err(ClientError::ConnectionError("Connection lost".to_string()))
        }
        result = write_loop => {
            read_task.abort();
            result
        }
    }
}
