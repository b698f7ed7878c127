//! HTTP API DTOs.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/messages`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SendMessageRequestDto {
    pub id: u32,
    pub text: String,
    pub lamport: u64,
}

/// Body of `POST /api/leave`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LeaveRequestDto {
    pub id: u32,
    pub lamport: u64,
}

/// Acknowledgement returned by SendMessage and Leave
///
/// `lamport` is the hub timestamp assigned to the event, or `null` for a
/// Leave that found the participant already gone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AcknowledgementDto {
    pub confirmation: bool,
    pub lamport: Option<u64>,
    pub recipients: usize,
}

/// A registered participant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParticipantDto {
    pub id: u32,
    pub name: String,
}

/// Body of `GET /api/participants`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HubStateDto {
    /// Current value of the hub's Lamport clock
    pub lamport: u64,
    pub participants: Vec<ParticipantDto>,
}
