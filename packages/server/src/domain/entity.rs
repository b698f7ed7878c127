//! Domain entities.

use super::value_object::{DisplayName, LamportTimestamp, MessageText, ParticipantId};

/// Sender name used for notices generated by the hub itself.
pub const SERVER_SENDER_NAME: &str = "Server";

/// A chat participant, fixed for the lifetime of its connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub display_name: DisplayName,
}

impl Participant {
    pub fn new(id: ParticipantId, display_name: DisplayName) -> Self {
        Self { id, display_name }
    }
}

/// A timestamped message fanned out to every registered participant
///
/// Never mutated after it has been broadcast; each recipient gets its own
/// clone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender_name: String,
    pub text: String,
    pub timestamp: LamportTimestamp,
}

impl ChatMessage {
    /// Message submitted by a participant
    pub fn from_participant(
        sender: &Participant,
        text: MessageText,
        timestamp: LamportTimestamp,
    ) -> Self {
        Self {
            sender_name: sender.display_name.as_str().to_string(),
            text: text.into_string(),
            timestamp,
        }
    }

    /// Notice announcing that `participant` joined
    pub fn join_notice(participant: &Participant, timestamp: LamportTimestamp) -> Self {
        Self {
            sender_name: SERVER_SENDER_NAME.to_string(),
            text: format!(
                "Participant {} joined Chitty-Chat at Lamport time {}",
                participant.display_name, timestamp
            ),
            timestamp,
        }
    }

    /// Notice announcing that `participant` left
    pub fn leave_notice(participant: &Participant, timestamp: LamportTimestamp) -> Self {
        Self {
            sender_name: SERVER_SENDER_NAME.to_string(),
            text: format!(
                "Participant {} left Chitty-Chat at Lamport time {}",
                participant.display_name, timestamp
            ),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Participant {
        Participant::new(
            ParticipantId::new(1),
            DisplayName::new("alice".to_string()).unwrap(),
        )
    }

    #[test]
    fn test_from_participant_uses_display_name() {
        // テスト項目: 参加者のメッセージは表示名を送信者として持つ
        // given (前提条件):
        let text = MessageText::new("hi".to_string()).unwrap();

        // when (操作):
        let message = ChatMessage::from_participant(&alice(), text, LamportTimestamp::new(3));

        // then (期待する結果):
        assert_eq!(message.sender_name, "alice");
        assert_eq!(message.text, "hi");
        assert_eq!(message.timestamp, LamportTimestamp::new(3));
    }

    #[test]
    fn test_join_notice() {
        // テスト項目: 参加通知はサーバーから送られ、Lamport 時刻を含む
        // given (前提条件):

        // when (操作):
        let message = ChatMessage::join_notice(&alice(), LamportTimestamp::new(1));

        // then (期待する結果):
        assert_eq!(message.sender_name, SERVER_SENDER_NAME);
        assert_eq!(
            message.text,
            "Participant alice joined Chitty-Chat at Lamport time 1"
        );
        assert_eq!(message.timestamp, LamportTimestamp::new(1));
    }

    #[test]
    fn test_leave_notice() {
        // テスト項目: 退出通知はサーバーから送られ、Lamport 時刻を含む
        // given (前提条件):

        // when (操作):
        let message = ChatMessage::leave_notice(&alice(), LamportTimestamp::new(4));

        // then (期待する結果):
        assert_eq!(message.sender_name, SERVER_SENDER_NAME);
        assert_eq!(
            message.text,
            "Participant alice left Chitty-Chat at Lamport time 4"
        );
    }
}
