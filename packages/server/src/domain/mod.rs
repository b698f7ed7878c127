//! Domain layer for the chat hub.
//!
//! This module holds the hub's state model (logical clock, connection
//! registry) and the value objects flowing through it. Nothing here locks or
//! spawns; the use case layer decides how the state is shared.

pub mod clock;
pub mod entity;
pub mod error;
pub mod pusher;
pub mod registry;
pub mod value_object;

pub use clock::LogicalClock;
pub use entity::{ChatMessage, Participant};
pub use error::{ClockError, DeliveryError, RegistryError, ValueObjectError};
pub use pusher::MessagePusher;
pub use registry::{ConnectionRegistry, RegisteredConnection};
pub use value_object::{
    ConnectionId, DisplayName, LamportTimestamp, MessageText, ParticipantId,
};
