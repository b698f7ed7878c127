//! Hub tunables.

use std::time::Duration;

/// Default outbound buffer size per participant.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Default per-recipient delivery bound.
pub const DEFAULT_DELIVERY_TIMEOUT: Duration = Duration::from_millis(50);

/// Settings applied to every participant connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HubConfig {
    /// Number of messages buffered for a participant before delivery to it fails
    pub channel_capacity: usize,
    /// How long one delivery may wait for buffer space; zero means never wait
    pub delivery_timeout: Duration,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            delivery_timeout: DEFAULT_DELIVERY_TIMEOUT,
        }
    }
}
