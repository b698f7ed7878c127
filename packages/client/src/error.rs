//! Error types for the chat client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// Participant id is already joined to the hub
    #[error("Participant id {0} is already joined")]
    DuplicateParticipant(u32),

    /// The hub refused the join for another reason (e.g. invalid name)
    #[error("Join rejected by the hub: {0}")]
    JoinRejected(String),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),
}
