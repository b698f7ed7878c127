//! Lamport logical clock.

use super::{error::ClockError, value_object::LamportTimestamp};

/// Lamport clock
///
/// The clock itself is not synchronised. The hub keeps it inside its single
/// critical section together with the connection registry, which is what
/// serialises `merge_and_advance` across concurrent callers.
#[derive(Debug, Default, Clone)]
pub struct LogicalClock {
    current: LamportTimestamp,
}

impl LogicalClock {
    /// Create a clock starting at 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a clock starting at `start`
    pub fn starting_at(start: LamportTimestamp) -> Self {
        Self { current: start }
    }

    /// Current value without advancing
    pub fn current(&self) -> LamportTimestamp {
        self.current
    }

    /// Merge an observed timestamp and advance: `t = max(t, incoming) + 1`
    ///
    /// Returns the new value of `t`, which is the timestamp of the event being
    /// processed. If `t` would pass `u64::MAX` the clock is left unchanged and
    /// the event must be rejected; a saturated clock would hand out the same
    /// timestamp twice.
    pub fn merge_and_advance(
        &mut self,
        incoming: LamportTimestamp,
    ) -> Result<LamportTimestamp, ClockError> {
        let merged = self.current.value().max(incoming.value());
        let next = merged
            .checked_add(1)
            .ok_or(ClockError::Overflow { incoming })?;
        self.current = LamportTimestamp::new(next);
        Ok(self.current)
    }

    /// Advance for a local event: `t = t + 1`
    ///
    /// Saturates at `u64::MAX`; only participants tick, and the hub rejects a
    /// claimed time it cannot merge.
    pub fn tick(&mut self) -> LamportTimestamp {
        self.current = LamportTimestamp::new(self.current.value().saturating_add(1));
        self.current
    }
}
