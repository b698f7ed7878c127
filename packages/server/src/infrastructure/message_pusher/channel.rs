//! 有界 mpsc チャンネルを使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 参加者ごとの送信バッファ（有界）の管理
//! - ブロードキャスト時の配送を一定時間内で打ち切る（遅い受信者が他を止めない）
//!
//! ## 設計ノート
//!
//! `ChannelPusher` は registry に登録され、`JoinSession` は接続を保持する側
//! （UI 層の WebSocket ハンドラ）が持ちます。registry からエントリが削除されると
//! 送信側が drop され、`JoinSession::recv` が `None` を返してセッションが終わります。

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::mpsc::{
    self,
    error::{SendTimeoutError, TrySendError},
};

use crate::domain::{ChatMessage, DeliveryError, MessagePusher};

/// 有界チャンネルへの送信を行う MessagePusher
///
/// `delivery_timeout` が 0 の場合は `try_send`（待たない）、それ以外は
/// `send_timeout` でバッファに空きが出るのを最大 `delivery_timeout` だけ待ちます。
#[derive(Debug, Clone)]
pub struct ChannelPusher {
    sender: mpsc::Sender<ChatMessage>,
    delivery_timeout: Duration,
}

impl ChannelPusher {
    /// 既存の sender から ChannelPusher を作成
    pub fn new(sender: mpsc::Sender<ChatMessage>, delivery_timeout: Duration) -> Self {
        Self {
            sender,
            delivery_timeout,
        }
    }

    /// 容量 `capacity` のチャンネルを作り、送信側と受信セッションを返す
    ///
    /// # Panics
    ///
    /// `capacity` が 0 の場合（`tokio::sync::mpsc::channel` と同じ）。
    pub fn channel(capacity: usize, delivery_timeout: Duration) -> (Self, JoinSession) {
        let (sender, receiver) = mpsc::channel(capacity);
        (
            Self::new(sender, delivery_timeout),
            JoinSession { receiver },
        )
    }
}

#[async_trait]
impl MessagePusher for ChannelPusher {
    async fn push(&self, message: ChatMessage) -> Result<(), DeliveryError> {
        if self.delivery_timeout.is_zero() {
            return self.sender.try_send(message).map_err(|e| match e {
                TrySendError::Full(_) => DeliveryError::ChannelFull,
                TrySendError::Closed(_) => DeliveryError::ChannelClosed,
            });
        }

        self.sender
            .send_timeout(message, self.delivery_timeout)
            .await
            .map_err(|e| match e {
                SendTimeoutError::Timeout(_) => DeliveryError::TimedOut,
                SendTimeoutError::Closed(_) => DeliveryError::ChannelClosed,
            })
    }
}

/// Join した参加者の受信ストリーム
///
/// registry が参加者を保持している間メッセージを受け取り続け、Leave・eviction・
/// ハブのシャットダウンで registry から削除されると終了します。
#[derive(Debug)]
pub struct JoinSession {
    receiver: mpsc::Receiver<ChatMessage>,
}

impl JoinSession {
    /// 次のメッセージを待つ。セッションが終了していれば `None`
    pub async fn recv(&mut self) -> Option<ChatMessage> {
        self.receiver.recv().await
    }

    /// 待たずに取り出せるメッセージを全て取り出す
    pub fn drain(&mut self) -> Vec<ChatMessage> {
        let mut messages = Vec::new();
        while let Ok(message) = self.receiver.try_recv() {
            messages.push(message);
        }
        messages
    }
}
