//! Clip types for the timeline.

use serde::{Deserialize, Serialize};
use trimline_core::TimeSpan;
use uuid::Uuid;

/// Unique clip identifier.
pub type ClipId = Uuid;

/// Import/processing status. Owned by the import pipeline; the timeline only
/// reads it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClipStatus {
    #[default]
    Ready,
    Processing,
    Completed,
    Error,
}

/// A clip on the timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    /// Unique clip ID
    pub id: ClipId,
    /// Clip name (displayed in UI)
    pub name: String,
    /// Media locator handed to the playback element
    pub path: String,
    /// Total decodable duration of the source, in seconds
    pub source_duration: f64,
    /// Source in point
    pub trim_start: f64,
    /// Source out point
    pub trim_end: f64,
    /// Start offset on the shared timeline
    pub timeline_position: f64,
    /// Import status
    #[serde(default)]
    pub status: ClipStatus,
}

impl Clip {
    /// Create an untrimmed clip at timeline position zero.
    ///
    /// Non-finite or tiny durations are raised to `min_duration` so the trim
    /// range can never be empty.
    pub fn new(
        name: impl Into<String>,
        path: impl Into<String>,
        source_duration: f64,
        min_duration: f64,
    ) -> Self {
        let source_duration = if source_duration.is_finite() {
            source_duration.max(min_duration)
        } else {
            min_duration
        };
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            path: path.into(),
            source_duration,
            trim_start: 0.0,
            trim_end: source_duration,
            timeline_position: 0.0,
            status: ClipStatus::Ready,
        }
    }

    /// Builder: place the clip at a timeline position.
    pub fn at(mut self, position: f64) -> Self {
        self.timeline_position = position.max(0.0);
        self
    }

    /// Builder: set the trim range.
    pub fn trimmed(mut self, trim_start: f64, trim_end: f64) -> Self {
        self.trim_start = trim_start;
        self.trim_end = trim_end;
        self
    }

    /// Length of the played sub-range.
    #[inline]
    pub fn effective_duration(&self) -> f64 {
        self.trim_end - self.trim_start
    }

    /// Timeline time at which the clip stops playing.
    #[inline]
    pub fn timeline_end(&self) -> f64 {
        self.timeline_position + self.effective_duration()
    }

    /// The clip's `[position, position + effective_duration)` interval.
    #[inline]
    pub fn span(&self) -> TimeSpan {
        TimeSpan::from_start_duration(self.timeline_position, self.effective_duration())
    }

    /// Check whether the clip plays at the given timeline time.
    #[inline]
    pub fn contains_time(&self, time: f64) -> bool {
        self.span().contains(time)
    }

    /// Source (media) time corresponding to a timeline time.
    #[inline]
    pub fn media_time_at(&self, timeline_time: f64) -> f64 {
        self.trim_start + (timeline_time - self.timeline_position)
    }

    /// Timeline time corresponding to a source (media) time.
    #[inline]
    pub fn timeline_time_at(&self, media_time: f64) -> f64 {
        self.timeline_position + (media_time - self.trim_start)
    }

    /// Clamp a requested trim range into `[0, source_duration]` keeping at
    /// least `min_gap` between the edges.
    pub fn clamp_trim(&self, trim_start: f64, trim_end: f64, min_gap: f64) -> (f64, f64) {
        let gap = min_gap.min(self.source_duration);
        let end = finite_or(trim_end, self.trim_end).clamp(gap, self.source_duration);
        let start = finite_or(trim_start, self.trim_start).clamp(0.0, end - gap);
        (start, end)
    }
}

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}
