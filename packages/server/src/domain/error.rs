//! Domain errors.

use thiserror::Error;

use super::value_object::{LamportTimestamp, ParticipantId};

/// Invalid input for a value object
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueObjectError {
    #[error("display name must not be empty")]
    DisplayNameEmpty,

    #[error("display name is too long ({actual} characters, max {max})")]
    DisplayNameTooLong { max: usize, actual: usize },

    #[error("message text must not be empty")]
    MessageTextEmpty,

    #[error("message text is too long ({actual} characters, max {max})")]
    MessageTextTooLong { max: usize, actual: usize },
}

/// Registry mutation rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("participant {0} is already registered")]
    DuplicateParticipant(ParticipantId),
}

/// Lamport clock cannot advance past `u64::MAX`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClockError {
    #[error("Lamport time {incoming} cannot be merged: the clock would overflow")]
    Overflow { incoming: LamportTimestamp },
}

/// Delivery to a single participant's outbound channel failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeliveryError {
    #[error("outbound buffer is full")]
    ChannelFull,

    #[error("outbound channel is closed")]
    ChannelClosed,

    #[error("delivery timed out")]
    TimedOut,
}
