//! UseCase 層
//!
//! `ChatHub` が論理クロックと接続 registry を 1 つのロックの内側に保持し、
//! 各ユースケース（Join / SendMessage / Leave）がそのクリティカルセクション内で
//! クロックの更新・registry の変更・ブロードキャストを行います。

mod broadcast;
mod error;
mod get_hub_state;
mod hub;
mod join_participant;
mod leave_participant;
mod send_message;

pub use broadcast::{BroadcastCoordinator, DeliveryOutcome, DeliveryRecord, DeliveryReport};
pub use error::HubError;
pub use get_hub_state::{GetHubStateUseCase, HubSnapshot};
pub use hub::ChatHub;
pub use join_participant::{JoinParticipantUseCase, Joined};
pub use leave_participant::{LeaveOutcome, LeaveParticipantUseCase};
pub use send_message::{SendAcknowledgement, SendMessageUseCase};
