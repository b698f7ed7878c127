//! UseCase: ハブ状態の取得

use std::sync::Arc;

use crate::domain::{LamportTimestamp, Participant};

use super::hub::ChatHub;

/// Point-in-time view of the hub
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HubSnapshot {
    pub clock: LamportTimestamp,
    /// Registered participants ordered by id
    pub participants: Vec<Participant>,
}

/// ハブ状態取得のユースケース
pub struct GetHubStateUseCase {
    hub: Arc<ChatHub>,
}

impl GetHubStateUseCase {
    pub fn new(hub: Arc<ChatHub>) -> Self {
        Self { hub }
    }

    /// 現在のクロック値と参加者一覧を取得（クロックは進めない）
    pub async fn execute(&self) -> HubSnapshot {
        let state = self.hub.lock().await;
        HubSnapshot {
            clock: state.clock.current(),
            participants: state.registry.participants(),
        }
    }
}
