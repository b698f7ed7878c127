//! Connection registry: participant id -> outbound channel.

use std::{collections::BTreeMap, sync::Arc};

use super::{
    entity::Participant,
    error::RegistryError,
    pusher::MessagePusher,
    value_object::{ConnectionId, ParticipantId},
};

/// A registered participant and its outbound channel
#[derive(Clone)]
pub struct RegisteredConnection {
    pub participant: Participant,
    pub connection_id: ConnectionId,
    pub pusher: Arc<dyn MessagePusher>,
}

impl std::fmt::Debug for RegisteredConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredConnection")
            .field("participant", &self.participant)
            .field("connection_id", &self.connection_id)
            .finish_non_exhaustive()
    }
}

/// Live connections keyed by participant id
///
/// At most one entry per id. Duplicate registration is rejected; an existing
/// connection is never replaced.
///
/// Not synchronised on its own: callers hold it inside the hub's critical
/// section, so `snapshot` iteration and mutation can never interleave.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: BTreeMap<ParticipantId, RegisteredConnection>,
    next_connection_id: u64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a participant's outbound channel
    ///
    /// Returns the `ConnectionId` of the new registration.
    pub fn register(
        &mut self,
        participant: Participant,
        pusher: Arc<dyn MessagePusher>,
    ) -> Result<ConnectionId, RegistryError> {
        if self.connections.contains_key(&participant.id) {
            return Err(RegistryError::DuplicateParticipant(participant.id));
        }
        self.next_connection_id += 1;
        let connection_id = ConnectionId::new(self.next_connection_id);
        self.connections.insert(
            participant.id,
            RegisteredConnection {
                participant,
                connection_id,
                pusher,
            },
        );
        Ok(connection_id)
    }

    /// Remove a participant; absent ids are ignored
    ///
    /// Returns the removed entry. Dropping it drops the registry's handle on
    /// the participant's channel.
    pub fn unregister(&mut self, id: &ParticipantId) -> Option<RegisteredConnection> {
        self.connections.remove(id)
    }

    /// Remove a participant only if it is still registered through
    /// `connection_id`
    ///
    /// A later registration under the same id is left in place.
    pub fn unregister_connection(
        &mut self,
        id: &ParticipantId,
        connection_id: ConnectionId,
    ) -> Option<RegisteredConnection> {
        if !self.is_current(id, connection_id) {
            return None;
        }
        self.connections.remove(id)
    }

    /// Whether `id` is registered through `connection_id`
    pub fn is_current(&self, id: &ParticipantId, connection_id: ConnectionId) -> bool {
        self.connections
            .get(id)
            .is_some_and(|connection| connection.connection_id == connection_id)
    }

    /// Point-in-time view ordered by participant id
    pub fn snapshot(&self) -> Vec<(ParticipantId, Arc<dyn MessagePusher>)> {
        self.connections
            .iter()
            .map(|(id, connection)| (*id, connection.pusher.clone()))
            .collect()
    }

    pub fn get(&self, id: &ParticipantId) -> Option<&RegisteredConnection> {
        self.connections.get(id)
    }

    pub fn contains(&self, id: &ParticipantId) -> bool {
        self.connections.contains_key(id)
    }

    /// Registered participants ordered by id
    pub fn participants(&self) -> Vec<Participant> {
        self.connections
            .values()
            .map(|connection| connection.participant.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Remove every entry, returning how many were removed
    pub fn clear(&mut self) -> usize {
        let removed = self.connections.len();
        self.connections.clear();
        removed
    }
}
