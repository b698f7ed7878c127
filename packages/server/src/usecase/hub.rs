//! The hub's shared state and its single critical section.

use tokio::sync::{Mutex, MutexGuard};

use crate::domain::{ConnectionRegistry, LogicalClock};

use super::broadcast::BroadcastCoordinator;

/// Clock and registry, only ever touched together under [`ChatHub`]'s lock
#[derive(Debug, Default)]
pub(crate) struct HubState {
    pub(crate) clock: LogicalClock,
    pub(crate) registry: ConnectionRegistry,
}

/// Process-wide hub state
///
/// Owns the Lamport clock and the connection registry behind one
/// `tokio::sync::Mutex`. A use case holds the guard for the whole of one
/// event: clock merge, registry change and the fan-out of the resulting
/// message. Events are therefore ordered by arrival at the lock, and no
/// recipient can see a message for a registry state other than the one it was
/// built from.
#[derive(Debug, Default)]
pub struct ChatHub {
    state: Mutex<HubState>,
    coordinator: BroadcastCoordinator,
}

impl ChatHub {
    /// Create a hub with the clock at 0 and no participants
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the critical section
    pub(crate) async fn lock(&self) -> MutexGuard<'_, HubState> {
        self.state.lock().await
    }

    pub(crate) fn coordinator(&self) -> &BroadcastCoordinator {
        &self.coordinator
    }

    /// Drop every registered connection
    ///
    /// Each participant's `JoinSession` ends once its queued messages are
    /// drained. Returns the number of connections closed.
    pub async fn shutdown(&self) -> usize {
        let mut state = self.lock().await;
        let closed = state.registry.clear();
        tracing::info!("Hub shut down, closed {} connection(s)", closed);
        closed
    }
}
