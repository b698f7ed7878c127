//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};

use crate::{
    domain::{LamportTimestamp, MessageText, ParticipantId},
    infrastructure::dto::http::{
        AcknowledgementDto, HubStateDto, LeaveRequestDto, SendMessageRequestDto,
    },
    ui::state::AppState,
    usecase::{HubError, LeaveOutcome},
};

/// Map a hub error to the status code returned to the caller
pub(crate) fn status_for(error: &HubError) -> StatusCode {
    match error {
        HubError::DuplicateParticipant(_) => StatusCode::CONFLICT,
        HubError::UnknownParticipant(_) => StatusCode::NOT_FOUND,
        HubError::ClockOverflow(_) => StatusCode::BAD_REQUEST,
        HubError::DeliveryFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
        HubError::TransportTerminated(_) => StatusCode::BAD_GATEWAY,
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Current Lamport clock and registered participants
pub async fn get_hub_state(State(state): State<Arc<AppState>>) -> Json<HubStateDto> {
    let snapshot = state.get_hub_state_usecase.execute().await;

    // Domain Model から DTO への変換
    Json(HubStateDto {
        lamport: snapshot.clock.value(),
        participants: snapshot.participants.into_iter().map(Into::into).collect(),
    })
}

/// SendMessage RPC
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SendMessageRequestDto>,
) -> Result<Json<AcknowledgementDto>, StatusCode> {
    let text = MessageText::try_from(request.text).map_err(|e| {
        tracing::warn!("Rejecting message from participant {}: {}", request.id, e);
        StatusCode::BAD_REQUEST
    })?;

    let ack = state
        .send_message_usecase
        .execute(
            ParticipantId::new(request.id),
            text,
            LamportTimestamp::new(request.lamport),
        )
        .await
        .map_err(|e| status_for(&e))?;

    Ok(Json(AcknowledgementDto {
        confirmation: true,
        lamport: Some(ack.timestamp.value()),
        recipients: ack.recipients,
    }))
}

/// Leave RPC (idempotent)
pub async fn leave(
    State(state): State<Arc<AppState>>,
    Json(request): Json<LeaveRequestDto>,
) -> Result<Json<AcknowledgementDto>, StatusCode> {
    let outcome = state
        .leave_participant_usecase
        .execute(
            ParticipantId::new(request.id),
            LamportTimestamp::new(request.lamport),
        )
        .await
        .map_err(|e| status_for(&e))?;

    let recipients = match outcome {
        LeaveOutcome::Left { notified, .. } => notified,
        LeaveOutcome::AlreadyLeft => 0,
    };

    Ok(Json(AcknowledgementDto {
        confirmation: true,
        lamport: outcome.timestamp().map(|t| t.value()),
        recipients,
    }))
}
