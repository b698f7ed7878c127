//! UseCase 層のエラー定義

use thiserror::Error;

use crate::domain::{ClockError, DeliveryError, ParticipantId, RegistryError};

/// Errors surfaced to the caller of a hub operation
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HubError {
    /// Join with an id that is already registered
    #[error("participant {0} is already joined")]
    DuplicateParticipant(ParticipantId),

    /// SendMessage from an id that is not registered
    #[error("participant {0} has not joined")]
    UnknownParticipant(ParticipantId),

    /// Delivery to one participant failed; that participant has been evicted
    #[error("delivery to participant {participant_id} failed: {source}")]
    DeliveryFailure {
        participant_id: ParticipantId,
        #[source]
        source: DeliveryError,
    },

    /// Claimed Lamport time cannot be merged; clock and registry unchanged
    #[error(transparent)]
    ClockOverflow(#[from] ClockError),

    /// The participant's connection itself went away
    #[error("transport terminated: {0}")]
    TransportTerminated(String),
}

impl From<RegistryError> for HubError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::DuplicateParticipant(id) => Self::DuplicateParticipant(id),
        }
    }
}
