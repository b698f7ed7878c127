//! Outbound message delivery interface.
//!
//! The registry stores one `MessagePusher` per participant. The concrete
//! implementation lives in the infrastructure layer
//! (`infrastructure::message_pusher`).

use async_trait::async_trait;

use super::{entity::ChatMessage, error::DeliveryError};

/// A participant's outbound channel, as seen by the broadcast fan-out
///
/// `push` must be bounded: it either hands the message over or fails within a
/// short, fixed time. It must never wait on the receiving side indefinitely.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    async fn push(&self, message: ChatMessage) -> Result<(), DeliveryError>;
}
