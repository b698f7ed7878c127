//! MessagePusher 実装
//!
//! ## 概要
//!
//! ドメイン層の `MessagePusher` trait の具体的な実装を提供します。
//!
//! ## 実装
//!
//! - `channel`: 有界 mpsc チャンネルを使った実装（WebSocket 接続ごとに 1 つ）

pub mod channel;

pub use channel::{ChannelPusher, JoinSession};
