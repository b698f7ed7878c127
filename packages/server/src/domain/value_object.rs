//! Value objects for the chat hub.

use std::fmt;

use super::error::ValueObjectError;

/// Maximum number of characters accepted in a single chat message.
pub const MAX_MESSAGE_CHARS: usize = 128;

/// Maximum number of characters accepted in a display name.
pub const MAX_DISPLAY_NAME_CHARS: usize = 32;

/// Participant identifier (unique among registered connections)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ParticipantId(u32);

impl ParticipantId {
    pub fn new(value: u32) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ParticipantId {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifies one registration of a participant
///
/// Assigned by the registry on every successful register, never reused. A
/// participant that leaves and joins again with the same `ParticipantId` gets
/// a new `ConnectionId`, so cleanup for the old connection cannot remove the
/// new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Lamport timestamp assigned to hub events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LamportTimestamp(u64);

impl LamportTimestamp {
    pub const ZERO: Self = Self(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl From<u64> for LamportTimestamp {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for LamportTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display name shown as the sender of a participant's messages
///
/// Surrounding whitespace is trimmed; the result must be non-empty and at most
/// [`MAX_DISPLAY_NAME_CHARS`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValueObjectError::DisplayNameEmpty);
        }
        let chars = trimmed.chars().count();
        if chars > MAX_DISPLAY_NAME_CHARS {
            return Err(ValueObjectError::DisplayNameTooLong {
                max: MAX_DISPLAY_NAME_CHARS,
                actual: chars,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for DisplayName {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Text of a user-submitted chat message
///
/// Input arrives already trimmed by the I/O layer; only emptiness and length
/// are checked here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageText(String);

impl MessageText {
    pub fn new(value: String) -> Result<Self, ValueObjectError> {
        if value.is_empty() {
            return Err(ValueObjectError::MessageTextEmpty);
        }
        let chars = value.chars().count();
        if chars > MAX_MESSAGE_CHARS {
            return Err(ValueObjectError::MessageTextTooLong {
                max: MAX_MESSAGE_CHARS,
                actual: chars,
            });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<String> for MessageText {
    type Error = ValueObjectError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
