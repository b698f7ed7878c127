//! Message formatting utilities for client display.

use chitchat_server::infrastructure::dto::websocket::ServerMessage;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format a message received from the hub
    ///
    /// # Arguments
    ///
    /// * `message` - The message as pushed by the hub
    /// * `received_at` - Local wall-clock time of receipt, for display only
    ///
    /// # Returns
    ///
    /// `{received_at} - [{lamport}] {name}: {text}`
    pub fn format_chat_message(message: &ServerMessage, received_at: &str) -> String {
        format!(
            "\n{} - [{}] {}: {}\n",
            received_at, message.lamport, message.name, message.text
        )
    }

    /// Greeting shown once joined
    pub fn format_welcome(name: &str) -> String {
        format!(
            "\n\nHello, {}. \nYou can disconnect with '/disconnect' \n\nWrite a message ...\n",
            name
        )
    }

    /// Notice shown when input exceeds the message limit
    pub fn format_too_long(max_chars: usize, chars: usize) -> String {
        format!(
            "\nYour message must be no longer than {} characters! ({} given)\n",
            max_chars, chars
        )
    }

    /// Format a raw text message (when parsing fails)
    pub fn format_raw_message(text: &str) -> String {
        format!("\n← Received: {}\n", text)
    }
}
