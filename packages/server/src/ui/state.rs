//! Server state shared by the handlers.

use std::sync::Arc;

use crate::{
    config::HubConfig,
    usecase::{
        GetHubStateUseCase, JoinParticipantUseCase, LeaveParticipantUseCase, SendMessageUseCase,
    },
};

/// Shared application state
pub struct AppState {
    /// JoinParticipantUseCase（参加者 Join のユースケース）
    pub join_participant_usecase: Arc<JoinParticipantUseCase>,
    /// SendMessageUseCase（メッセージ送信のユースケース）
    pub send_message_usecase: Arc<SendMessageUseCase>,
    /// LeaveParticipantUseCase（参加者 Leave のユースケース）
    pub leave_participant_usecase: Arc<LeaveParticipantUseCase>,
    /// GetHubStateUseCase（ハブ状態取得のユースケース）
    pub get_hub_state_usecase: Arc<GetHubStateUseCase>,
    /// Per-connection channel settings
    pub hub_config: HubConfig,
}
