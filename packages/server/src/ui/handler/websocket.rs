//! WebSocket connection handlers.
//!
//! A WebSocket connection is one Join: the upgrade request carries the
//! participant, the socket's outbound half streams every broadcast, and the
//! inbound half carries SendMessage / Leave frames. The connection closing is
//! treated as a Leave.

use std::{sync::Arc, time::Duration};

use axum::{
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::StatusCode,
    response::IntoResponse,
};
use futures_util::{
    sink::SinkExt,
    stream::{SplitSink, StreamExt},
};
use serde::Deserialize;

use crate::{
    domain::{
        ConnectionId, DisplayName, LamportTimestamp, MessageText, Participant, ParticipantId,
    },
    infrastructure::{
        dto::websocket::{ClientFrame, ServerMessage},
        message_pusher::{ChannelPusher, JoinSession},
    },
    ui::state::AppState,
    usecase::HubError,
};

use super::http::status_for;

/// How long the outbound half may keep flushing queued messages after the
/// participant has left.
const FLUSH_TIMEOUT: Duration = Duration::from_secs(1);

/// How long one write to the socket may take before the connection is dropped.
const SOCKET_WRITE_TIMEOUT: Duration = Duration::from_secs(10);

/// Query parameters for the Join stream
#[derive(Debug, Deserialize)]
pub struct JoinQuery {
    pub id: u32,
    pub name: String,
    /// Lamport time the participant has observed so far
    #[serde(default)]
    pub lamport: u64,
}

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    Query(query): Query<JoinQuery>,
) -> Result<impl IntoResponse, StatusCode> {
    // Convert String -> DisplayName (Domain Model)
    let display_name = match DisplayName::try_from(query.name) {
        Ok(name) => name,
        Err(e) => {
            tracing::warn!("Invalid display name for participant {}: {}", query.id, e);
            return Err(StatusCode::BAD_REQUEST);
        }
    };
    let participant = Participant::new(ParticipantId::new(query.id), display_name);

    // Outbound channel for this participant; the registry keeps the pusher
    let (pusher, session) = ChannelPusher::channel(
        state.hub_config.channel_capacity,
        state.hub_config.delivery_timeout,
    );

    match state
        .join_participant_usecase
        .execute(
            participant.clone(),
            LamportTimestamp::new(query.lamport),
            Arc::new(pusher),
        )
        .await
    {
        Ok(joined) => {
            tracing::info!(
                "Participant {} ('{}') joined via WebSocket at Lamport time {} (connection {})",
                participant.id,
                participant.display_name,
                joined.timestamp,
                joined.connection_id
            );

            let leave_usecase = state.leave_participant_usecase.clone();
            let participant_id = participant.id;
            let connection_id = joined.connection_id;
            Ok(ws
                .on_failed_upgrade(move |e| {
                    tracing::warn!(
                        "WebSocket upgrade for participant {} failed: {}",
                        participant_id,
                        e
                    );
                    tokio::spawn(async move {
                        if let Err(e) = leave_usecase
                            .execute_for_connection(
                                participant_id,
                                connection_id,
                                LamportTimestamp::ZERO,
                            )
                            .await
                        {
                            tracing::warn!("Leave of participant {} failed: {}", participant_id, e);
                        }
                    });
                })
                .on_upgrade(move |socket| {
                    handle_socket(socket, state, participant, connection_id, session)
                }))
        }
        Err(e) => {
            tracing::warn!(
                "Rejecting join for participant {} ('{}'): {}",
                participant.id,
                participant.display_name,
                e
            );
            Err(status_for(&e))
        }
    }
}

/// Spawns a task that forwards the participant's Join stream to the socket.
///
/// Ends when the session ends (the registry dropped the participant) or the
/// socket stops accepting writes.
fn pusher_loop(
    mut session: JoinSession,
    mut sender: SplitSink<WebSocket, Message>,
    participant_id: ParticipantId,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = session.recv().await {
            let json = match serde_json::to_string(&ServerMessage::from(message)) {
                Ok(json) => json,
                Err(e) => {
                    tracing::error!("Failed to serialize message: {}", e);
                    continue;
                }
            };

            let write = tokio::time::timeout(
                SOCKET_WRITE_TIMEOUT,
                sender.send(Message::Text(json.into())),
            )
            .await;
            let error = match write {
                Ok(Ok(())) => continue,
                Ok(Err(e)) => HubError::TransportTerminated(e.to_string()),
                Err(_) => HubError::TransportTerminated("socket write timed out".to_string()),
            };
            tracing::warn!("Participant {}: {}", participant_id, error);
            return;
        }

        tracing::debug!(
            "Join stream for participant {} ended, closing socket",
            participant_id
        );
        sender.close().await.ok();
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    participant: Participant,
    connection_id: ConnectionId,
    session: JoinSession,
) {
    let (sender, mut receiver) = socket.split();
    let participant_id = participant.id;

    let mut send_task = pusher_loop(session, sender, participant_id);

    // Spawn a task to receive frames from this participant
    let state_clone = state.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    let error = HubError::TransportTerminated(e.to_string());
                    tracing::warn!("Participant {}: {}", participant_id, error);
                    break;
                }
            };

            match msg {
                Message::Text(raw) => match serde_json::from_str::<ClientFrame>(raw.as_str()) {
                    Ok(ClientFrame::Chat { text, lamport }) => {
                        handle_chat(&state_clone, participant_id, text, lamport).await;
                    }
                    Ok(ClientFrame::Leave { lamport }) => {
                        if let Err(e) = state_clone
                            .leave_participant_usecase
                            .execute_for_connection(
                                participant_id,
                                connection_id,
                                LamportTimestamp::new(lamport),
                            )
                            .await
                        {
                            tracing::warn!("Leave of participant {} failed: {}", participant_id, e);
                        }
                        break;
                    }
                    Err(e) => {
                        tracing::warn!(
                            "Ignoring malformed frame from participant {}: {}",
                            participant_id,
                            e
                        );
                    }
                },
                Message::Ping(_) => {
                    tracing::debug!("Received ping");
                    // Ping/pong is handled automatically by the WebSocket protocol
                }
                Message::Close(_) => {
                    tracing::info!("Participant {} requested close", participant_id);
                    break;
                }
                _ => {}
            }
        }
    });

    tokio::select! {
        _ = &mut recv_task => {
            // Leave closes the Join stream; let the pusher flush what is queued
            leave_on_disconnect(&state, participant_id, connection_id).await;
            if tokio::time::timeout(FLUSH_TIMEOUT, &mut send_task).await.is_err() {
                send_task.abort();
            }
        }
        _ = &mut send_task => {
            recv_task.abort();
            leave_on_disconnect(&state, participant_id, connection_id).await;
        }
    };
}

async fn handle_chat(state: &AppState, participant_id: ParticipantId, text: String, lamport: u64) {
    // Convert String -> MessageText (Domain Model)
    let text = match MessageText::try_from(text) {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                "Rejecting message from participant {}: {}",
                participant_id,
                e
            );
            return;
        }
    };

    if let Err(e) = state
        .send_message_usecase
        .execute(participant_id, text, LamportTimestamp::new(lamport))
        .await
    {
        tracing::warn!("Failed to send message: {}", e);
    }
}

/// Leave triggered by the connection going away
///
/// A no-op if this connection already left or was evicted, including when the
/// participant has since joined again on another connection.
async fn leave_on_disconnect(
    state: &AppState,
    participant_id: ParticipantId,
    connection_id: ConnectionId,
) {
    match state
        .leave_participant_usecase
        .execute_for_connection(participant_id, connection_id, LamportTimestamp::ZERO)
        .await
    {
        Ok(outcome) => tracing::info!(
            "Participant {} disconnected from connection {} ({:?})",
            participant_id,
            connection_id,
            outcome
        ),
        Err(e) => tracing::warn!("Leave of participant {} failed: {}", participant_id, e),
    }
}
