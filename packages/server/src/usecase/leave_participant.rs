//! UseCase: 参加者の Leave 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - LeaveParticipantUseCase::execute() メソッド
//! - クロックの merge、registry からの削除、退出通知のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 切断シグナルは重複して届くことがあるため、Leave は冪等である必要がある
//! - 退出した参加者のセッションが終了することを保証
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加者の退出と通知
//! - エッジケース：2 回目の Leave、Join していない参加者の Leave、最後の参加者の退出、
//!   同じ ID で再参加した後に届いた古い接続の Leave

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionId, LamportTimestamp, ParticipantId};

use super::{error::HubError, hub::ChatHub};

/// Result of a Leave request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveOutcome {
    /// The participant was removed and the remaining participants notified
    Left {
        timestamp: LamportTimestamp,
        notified: usize,
    },
    /// The participant (or that connection of it) was not registered;
    /// nothing changed
    AlreadyLeft,
}

impl LeaveOutcome {
    /// Timestamp assigned to the leave notice, if one was emitted
    pub fn timestamp(&self) -> Option<LamportTimestamp> {
        match self {
            Self::Left { timestamp, .. } => Some(*timestamp),
            Self::AlreadyLeft => None,
        }
    }
}

/// 参加者 Leave のユースケース
pub struct LeaveParticipantUseCase {
    hub: Arc<ChatHub>,
}

impl LeaveParticipantUseCase {
    /// 新しい LeaveParticipantUseCase を作成
    pub fn new(hub: Arc<ChatHub>) -> Self {
        Self { hub }
    }

    /// Leave を実行
    ///
    /// 参加者が registry に存在しない場合は何もせず `AlreadyLeft` を返します
    /// （クロックも進めない）。存在する場合はクロックを merge し、registry から
    /// 削除してから残りの参加者に退出通知をブロードキャストします。
    /// 削除によって参加者の送信チャンネルが閉じ、その `JoinSession` が終了します。
    ///
    /// # Arguments
    ///
    /// * `participant_id` - 退出する参加者の ID
    /// * `claimed` - 参加者が観測済みの Lamport 時刻
    ///
    /// # Errors
    ///
    /// `HubError::ClockOverflow` - `claimed` を merge できない（参加者は登録されたまま）
    pub async fn execute(
        &self,
        participant_id: ParticipantId,
        claimed: LamportTimestamp,
    ) -> Result<LeaveOutcome, HubError> {
        self.leave(participant_id, None, claimed).await
    }

    /// 特定の接続についての Leave を実行
    ///
    /// 接続の切断を検知した側が使います。`participant_id` が `connection_id`
    /// 以外の接続で登録し直されている場合（evict 後の再参加など）は
    /// 何もせず `AlreadyLeft` を返します。
    pub async fn execute_for_connection(
        &self,
        participant_id: ParticipantId,
        connection_id: ConnectionId,
        claimed: LamportTimestamp,
    ) -> Result<LeaveOutcome, HubError> {
        self.leave(participant_id, Some(connection_id), claimed)
            .await
    }

    async fn leave(
        &self,
        participant_id: ParticipantId,
        connection_id: Option<ConnectionId>,
        claimed: LamportTimestamp,
    ) -> Result<LeaveOutcome, HubError> {
        let mut state = self.hub.lock().await;

        let registered = match connection_id {
            Some(connection_id) => state.registry.is_current(&participant_id, connection_id),
            None => state.registry.contains(&participant_id),
        };
        if !registered {
            tracing::debug!(
                "Participant {} already left, ignoring leave",
                participant_id
            );
            return Ok(LeaveOutcome::AlreadyLeft);
        }

        let timestamp = state.clock.merge_and_advance(claimed).inspect_err(|e| {
            tracing::warn!("Rejecting leave of participant {}: {}", participant_id, e);
        })?;
        let Some(removed) = state.registry.unregister(&participant_id) else {
            return Ok(LeaveOutcome::AlreadyLeft);
        };
        tracing::info!(
            "Participant {} ('{}', connection {}) left at Lamport time {}",
            participant_id,
            removed.participant.display_name,
            removed.connection_id,
            timestamp
        );

        let notice = ChatMessage::leave_notice(&removed.participant, timestamp);
        drop(removed);
        let report = self
            .hub
            .coordinator()
            .broadcast(&mut state.registry, &notice)
            .await;

        Ok(LeaveOutcome::Left {
            timestamp,
            notified: report.len(),
        })
    }
}
