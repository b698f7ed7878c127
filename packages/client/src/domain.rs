//! Domain logic for client-side operations.
//!
//! This module contains pure functions that implement business logic
//! without side effects, making them easy to test.

use chitchat_server::domain::MessageText;
use uuid::Uuid;

use crate::error::ClientError;

/// Command that ends the session with a Leave
pub const DISCONNECT_COMMAND: &str = "/disconnect";

/// What a line typed at the prompt asks the client to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    /// Send the text as a chat message
    Send(MessageText),
    /// Leave the hub and exit
    Disconnect,
    /// Text longer than the hub accepts; `chars` is its length
    TooLong { chars: usize },
    /// Nothing to send
    Empty,
}

/// Classify one line of user input.
pub fn parse_input(line: &str) -> InputAction {
    let line = line.trim();
    if line.is_empty() {
        return InputAction::Empty;
    }
    if line == DISCONNECT_COMMAND {
        return InputAction::Disconnect;
    }

    let chars = line.chars().count();
    match MessageText::new(line.to_string()) {
        Ok(text) => InputAction::Send(text),
        Err(_) => InputAction::TooLong { chars },
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// # Arguments
///
/// * `error` - The client error to check
///
/// # Returns
///
/// `true` if retrying cannot succeed (the id is taken or the join was
/// rejected), `false` otherwise
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::DuplicateParticipant(_) | ClientError::JoinRejected(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `current_attempt` - The current reconnection attempt count (0-indexed)
/// * `max_attempts` - The maximum number of reconnection attempts allowed
///
/// # Returns
///
/// `true` if reconnection should be attempted, `false` otherwise
pub fn should_attempt_reconnect(
    error: &ClientError,
    current_attempt: u32,
    max_attempts: u32,
) -> bool {
    // Don't reconnect if the error requires immediate exit
    if should_exit_immediately(error) {
        return false;
    }

    // Don't reconnect if we've exhausted all attempts
    current_attempt < max_attempts
}

/// Participant id derived from a UUID, used when none is given.
pub fn participant_id_from_uuid(uuid: &Uuid) -> u32 {
    // low 32 bits; a v4 UUID is random there
    uuid.as_u128() as u32
}

/// Fresh random participant id
pub fn generate_participant_id() -> u32 {
    participant_id_from_uuid(&Uuid::new_v4())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_message() {
        // テスト項目: 通常の入力は送信メッセージとして扱われる
        // given (前提条件):
        let line = "  hello there  ";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(
            result,
            InputAction::Send(MessageText::new("hello there".to_string()).unwrap())
        );
    }

    #[test]
    fn test_parse_input_disconnect() {
        // テスト項目: /disconnect は退出コマンドとして扱われる
        // given (前提条件):
        let line = "/disconnect";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(result, InputAction::Disconnect);
    }

    #[test]
    fn test_parse_input_empty() {
        // テスト項目: 空白のみの入力は何も送らない
        // given (前提条件):
        let line = "   ";

        // when (操作):
        let result = parse_input(line);

        // then (期待する結果):
        assert_eq!(result, InputAction::Empty);
    }

    #[test]
    fn test_parse_input_too_long() {
        // テスト項目: 128 文字を超える入力は送信前に拒否される
        // given (前提条件):
        let at_limit = "あ".repeat(128);
        let over_limit = "a".repeat(129);

        // when (操作):
        let accepted = parse_input(&at_limit);
        let rejected = parse_input(&over_limit);

        // then (期待する結果):
        assert!(matches!(accepted, InputAction::Send(_)));
        assert_eq!(rejected, InputAction::TooLong { chars: 129 });
    }

    #[test]
    fn test_should_exit_immediately_with_duplicate_participant() {
        // テスト項目: DuplicateParticipant エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::DuplicateParticipant(42);

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: ConnectionError の場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_with_join_rejected() {
        // テスト項目: JoinRejected エラーの場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::JoinRejected("400 Bad Request".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 再接続回数が上限未満の場合、再接続すべきと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 4, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_attempt_reconnect_at_limit() {
        // テスト項目: 再接続回数が上限に達した場合、再接続すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("network error".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_participant_id_from_uuid() {
        // テスト項目: UUID の下位 32 ビットが参加者 id になる
        // given (前提条件):
        let uuid = Uuid::from_u128(0x1234_5678_9abc_def0_0000_0000_dead_beef);

        // when (操作):
        let id = participant_id_from_uuid(&uuid);

        // then (期待する結果):
        assert_eq!(id, 0xdead_beef);
    }
}
