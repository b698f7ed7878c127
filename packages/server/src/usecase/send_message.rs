//! UseCase: メッセージ送信処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - SendMessageUseCase::execute() メソッド
//! - 未参加者からの送信拒否、クロックの merge、全員へのブロードキャスト
//!
//! ### なぜこのテストが必要か
//! - 送信者本人を含む全参加者に同じタイムスタンプのメッセージが届くことを保証
//! - acknowledgement は配送結果と独立している（受信者の失敗で送信者は失敗しない）
//!
//! ### どのような状況を想定しているか
//! - 正常系：メッセージ送信とブロードキャスト
//! - 異常系：Join していない参加者からの送信
//! - エッジケース：受信者の 1 人が配送失敗（evict されるが送信は成功）

use std::sync::Arc;

use crate::domain::{ChatMessage, LamportTimestamp, MessageText, ParticipantId};

use super::{error::HubError, hub::ChatHub};

/// Hub accepted and broadcast a message
///
/// Says nothing about whether each recipient received it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendAcknowledgement {
    /// Lamport timestamp assigned to the message
    pub timestamp: LamportTimestamp,
    /// Number of participants the broadcast targeted
    pub recipients: usize,
}

/// メッセージ送信のユースケース
pub struct SendMessageUseCase {
    hub: Arc<ChatHub>,
}

impl SendMessageUseCase {
    /// 新しい SendMessageUseCase を作成
    pub fn new(hub: Arc<ChatHub>) -> Self {
        Self { hub }
    }

    /// メッセージ送信を実行
    ///
    /// # Arguments
    ///
    /// * `sender` - 送信者の参加者 ID（Join 済みである必要がある）
    /// * `text` - メッセージ本文
    /// * `claimed` - 送信者が送信時点で持っていた Lamport 時刻
    ///
    /// # Returns
    ///
    /// * `Ok(SendAcknowledgement)` - ハブが受理しブロードキャストした
    /// * `Err(HubError::UnknownParticipant)` - 送信者が registry に存在しない
    /// * `Err(HubError::ClockOverflow)` - `claimed` を merge できない（クロックは進めない）
    pub async fn execute(
        &self,
        sender: ParticipantId,
        text: MessageText,
        claimed: LamportTimestamp,
    ) -> Result<SendAcknowledgement, HubError> {
        let mut state = self.hub.lock().await;

        // 1. 送信者が Join 済みか確認（未参加ならクロックは進めない）
        let participant = match state.registry.get(&sender) {
            Some(connection) => connection.participant.clone(),
            None => {
                tracing::warn!("Rejecting message from unknown participant {}", sender);
                return Err(HubError::UnknownParticipant(sender));
            }
        };

        // 2. クロックの merge とメッセージ作成
        let timestamp = state.clock.merge_and_advance(claimed).inspect_err(|e| {
            tracing::warn!("Rejecting message from participant {}: {}", sender, e);
        })?;
        let message = ChatMessage::from_participant(&participant, text, timestamp);
        tracing::info!(
            "Message from '{}' at Lamport time {}: {}",
            message.sender_name,
            timestamp,
            message.text
        );

        // 3. 全員にブロードキャスト
        let report = self
            .hub
            .coordinator()
            .broadcast(&mut state.registry, &message)
            .await;

        Ok(SendAcknowledgement {
            timestamp,
            recipients: report.len(),
        })
    }
}
