//! Broadcast fan-out over the connection registry.

use futures_util::future::join_all;

use crate::domain::{
    ChatMessage, ConnectionRegistry, DeliveryError, LamportTimestamp, ParticipantId,
};

/// Result of delivering one message to one participant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    Failed(DeliveryError),
}

/// Per-recipient entry of a [`DeliveryReport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRecord {
    pub participant_id: ParticipantId,
    pub outcome: DeliveryOutcome,
}

/// Outcome of one broadcast, one record per snapshot entry in id order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReport {
    pub timestamp: LamportTimestamp,
    pub records: Vec<DeliveryRecord>,
}

impl DeliveryReport {
    /// Number of participants the broadcast targeted
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn delivered_count(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.outcome == DeliveryOutcome::Delivered)
            .count()
    }

    pub fn failed_participants(&self) -> Vec<ParticipantId> {
        self.records
            .iter()
            .filter(|record| matches!(record.outcome, DeliveryOutcome::Failed(_)))
            .map(|record| record.participant_id)
            .collect()
    }

    /// Failure reason for `participant_id`, if its delivery failed
    pub fn failure_for(&self, participant_id: &ParticipantId) -> Option<&DeliveryError> {
        self.records
            .iter()
            .find(|record| &record.participant_id == participant_id)
            .and_then(|record| match &record.outcome {
                DeliveryOutcome::Failed(error) => Some(error),
                DeliveryOutcome::Delivered => None,
            })
    }
}

/// Pushes a timestamped message to every registered participant
///
/// Deliveries run concurrently and independently; each one is bounded by the
/// participant's `MessagePusher`. Every participant whose delivery fails is
/// evicted from the registry. Failed deliveries are logged, never retried, and
/// other recipients are not told about them.
#[derive(Debug, Default, Clone, Copy)]
pub struct BroadcastCoordinator;

impl BroadcastCoordinator {
    pub fn new() -> Self {
        Self
    }

    /// Deliver `message` to every entry of the registry
    ///
    /// Takes the registry mutably: the caller holds the hub's critical section
    /// for the whole fan-out, so the snapshot cannot change underneath it and
    /// every recipient's channel receives broadcasts in timestamp order.
    pub async fn broadcast(
        &self,
        registry: &mut ConnectionRegistry,
        message: &ChatMessage,
    ) -> DeliveryReport {
        let targets = registry.snapshot();

        let deliveries = targets.into_iter().map(|(participant_id, pusher)| {
            let message = message.clone();
            async move {
                let outcome = match pusher.push(message).await {
                    Ok(()) => DeliveryOutcome::Delivered,
                    Err(e) => DeliveryOutcome::Failed(e),
                };
                DeliveryRecord {
                    participant_id,
                    outcome,
                }
            }
        });
        let records = join_all(deliveries).await;

        let report = DeliveryReport {
            timestamp: message.timestamp,
            records,
        };

        for record in &report.records {
            if let DeliveryOutcome::Failed(e) = &record.outcome {
                registry.unregister(&record.participant_id);
                tracing::warn!(
                    "Evicted participant {} after failed delivery at Lamport time {}: {}",
                    record.participant_id,
                    message.timestamp,
                    e
                );
            }
        }

        tracing::debug!(
            "Broadcast at Lamport time {} from '{}' delivered to {}/{} participants",
            message.timestamp,
            message.sender_name,
            report.delivered_count(),
            report.len()
        );

        report
    }
}
