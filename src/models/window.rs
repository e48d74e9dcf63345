//! Time window primitive.
//!
//! # Time Model
//! All times are in milliseconds relative to a scheduling epoch.
//! The host defines what the epoch means (e.g., midnight UTC of the
//! planning day). Durations are expressed in milliseconds as well;
//! [`hours_to_ms`] converts the hour figures used on the depot floor.

use serde::{Deserialize, Serialize};

/// Milliseconds per hour.
pub const HOUR_MS: i64 = 3_600_000;

/// Converts fractional hours to milliseconds (rounded to the nearest ms).
pub fn hours_to_ms(hours: f64) -> i64 {
    (hours * HOUR_MS as f64).round() as i64
}

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end. Two windows that
/// touch end-to-start do not overlap.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TimeWindow {
    /// Interval start (ms, inclusive).
    pub start_ms: i64,
    /// Interval end (ms, exclusive).
    pub end_ms: i64,
}

impl TimeWindow {
    /// Creates a new time window.
    pub fn new(start_ms: i64, end_ms: i64) -> Self {
        Self { start_ms, end_ms }
    }

    /// Creates a window of `duration_ms` starting at `start_ms`.
    ///
    /// Returns `None` if the end does not fit in an `i64`.
    pub fn starting_at(start_ms: i64, duration_ms: i64) -> Option<Self> {
        start_ms
            .checked_add(duration_ms)
            .map(|end_ms| Self::new(start_ms, end_ms))
    }

    /// Duration of this window (ms).
    #[inline]
    pub fn duration_ms(&self) -> i64 {
        self.end_ms - self.start_ms
    }

    /// Whether two windows overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start_ms < other.end_ms && other.start_ms < self.end_ms
    }
}
