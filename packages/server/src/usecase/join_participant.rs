//! UseCase: 参加者の Join 処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinParticipantUseCase::execute() メソッド
//! - クロックの merge、registry への登録、参加通知のブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 参加者は自分自身の参加通知を受け取る必要がある（登録 → ブロードキャストの順序）
//! - 重複した ID の Join はクロックも registry も変えずに拒否される必要がある
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規参加者の Join、既存参加者への通知
//! - 異常系：重複 ID、参加者自身への配送失敗

use std::sync::Arc;

use crate::domain::{ChatMessage, ConnectionId, LamportTimestamp, MessagePusher, Participant};

use super::{error::HubError, hub::ChatHub};

/// A successful Join
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joined {
    /// Lamport timestamp of the join notice
    pub timestamp: LamportTimestamp,
    /// Identifies this registration; pass it back when the connection closes
    pub connection_id: ConnectionId,
}

/// 参加者 Join のユースケース
pub struct JoinParticipantUseCase {
    hub: Arc<ChatHub>,
}

impl JoinParticipantUseCase {
    /// 新しい JoinParticipantUseCase を作成
    pub fn new(hub: Arc<ChatHub>) -> Self {
        Self { hub }
    }

    /// Join を実行
    ///
    /// 1 つのクリティカルセクション内で以下を行います：
    ///
    /// 1. 重複チェック（重複ならクロックを進めずにエラー）
    /// 2. クロックの merge
    /// 3. `pusher` を registry に登録
    /// 4. 参加通知を（参加者本人を含む）全員にブロードキャスト
    ///
    /// 登録がブロードキャストより先なので、参加者本人も自分の参加通知を受け取ります。
    ///
    /// # Arguments
    ///
    /// * `participant` - 参加者
    /// * `claimed` - 参加者が観測済みの Lamport 時刻
    /// * `pusher` - 参加者への送信チャンネル（以後のブロードキャストはここに届く）
    ///
    /// # Returns
    ///
    /// * `Ok(Joined)` - 参加通知に割り当てられた時刻と、この接続の ConnectionId
    /// * `Err(HubError::DuplicateParticipant)` - 同じ ID が登録済み
    /// * `Err(HubError::ClockOverflow)` - `claimed` を merge できない（状態は変わらない）
    /// * `Err(HubError::DeliveryFailure)` - 参加者本人への参加通知の配送に失敗（evict 済み）
    pub async fn execute(
        &self,
        participant: Participant,
        claimed: LamportTimestamp,
        pusher: Arc<dyn MessagePusher>,
    ) -> Result<Joined, HubError> {
        let mut state = self.hub.lock().await;

        // 1. 重複チェック
        if state.registry.contains(&participant.id) {
            tracing::warn!(
                "Participant {} ('{}') is already joined. Rejecting join.",
                participant.id,
                participant.display_name
            );
            return Err(HubError::DuplicateParticipant(participant.id));
        }

        // 2. クロックの merge
        let timestamp = state.clock.merge_and_advance(claimed).inspect_err(|e| {
            tracing::warn!("Rejecting join of participant {}: {}", participant.id, e);
        })?;

        // 3. registry に登録
        let connection_id = state.registry.register(participant.clone(), pusher)?;
        tracing::info!(
            "Participant {} ('{}') joined at Lamport time {}",
            participant.id,
            participant.display_name,
            timestamp
        );

        // 4. 参加通知をブロードキャスト
        let notice = ChatMessage::join_notice(&participant, timestamp);
        let report = self
            .hub
            .coordinator()
            .broadcast(&mut state.registry, &notice)
            .await;

        if let Some(e) = report.failure_for(&participant.id) {
            return Err(HubError::DeliveryFailure {
                participant_id: participant.id,
                source: e.clone(),
            });
        }

        Ok(Joined {
            timestamp,
            connection_id,
        })
    }
}
