//! Time spans on the timeline.
//!
//! All times are `f64` seconds. Spans are half-open: `[start, end)`, so two
//! clips that touch end-to-start do not overlap.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A half-open interval of timeline time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSpan {
    pub start: f64,
    pub end: f64,
}

impl TimeSpan {
    /// Create a span from start and end.
    #[inline]
    pub const fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    /// Create a span from a start and a duration.
    #[inline]
    pub fn from_start_duration(start: f64, duration: f64) -> Self {
        Self {
            start,
            end: start + duration,
        }
    }

    /// Length of the span.
    #[inline]
    pub fn duration(self) -> f64 {
        self.end - self.start
    }

    /// Check if a time is within this span.
    #[inline]
    pub fn contains(self, time: f64) -> bool {
        time >= self.start && time < self.end
    }

    /// Check if two spans overlap.
    ///
    /// `[a0, a1)` and `[b0, b1)` overlap iff `!(a1 <= b0 || b1 <= a0)`.
    #[inline]
    pub fn overlaps(self, other: Self) -> bool {
        !(self.end <= other.start || other.end <= self.start)
    }

    /// Clamp a time into `[start, end]`.
    #[inline]
    pub fn clamp(self, time: f64) -> f64 {
        time.max(self.start).min(self.end)
    }
}

impl fmt::Display for TimeSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.3}, {:.3})", self.start, self.end)
    }
}

/// Format seconds as `m:ss`, or `h:mm:ss` past the hour.
pub fn format_timecode(seconds: f64) -> String {
    let total = if seconds.is_finite() {
        seconds.max(0.0).floor() as u64
    } else {
        0
    };
    let hours = total / 3600;
    let mins = (total % 3600) / 60;
    let secs = total % 60;
    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, mins, secs)
    } else {
        format!("{}:{:02}", mins, secs)
    }
}
