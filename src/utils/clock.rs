//! The wall clock used to key ledger entries.

use chrono::{Local, NaiveDateTime, Timelike};

/// A source of local wall-clock time. Every timestamp the collector stores
/// comes from here, so tests can substitute a deterministic clock.
pub trait Clock {
    /// The current local date and time, truncated to whole seconds.
    fn now(&self) -> NaiveDateTime;
}

/// The system's local clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> NaiveDateTime {
        truncate_to_seconds(Local::now().naive_local())
    }
}

/// Drops any sub-second component; ledgers store `HH:MM:SS`.
pub fn truncate_to_seconds(at: NaiveDateTime) -> NaiveDateTime {
    at.with_nanosecond(0).unwrap_or(at)
}
