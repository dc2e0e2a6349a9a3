//! Timeline view and transport state owned by the clip store.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use trimline_core::{limits, TimelineConfig};

use crate::clip::ClipId;

/// Which edge of a clip's trim range a handle controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrimEdge {
    Start,
    End,
}

/// The trim handle currently highlighted or being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrimHandle {
    pub clip_id: ClipId,
    pub edge: TrimEdge,
}

/// Visible time window of the timeline. Always `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    start: f64,
    end: f64,
}

impl Viewport {
    /// Create a viewport, clamping so that `0 <= start < end`.
    pub fn new(start: f64, end: f64) -> Self {
        let start = if start.is_finite() { start.max(0.0) } else { 0.0 };
        let end = if end.is_finite() { end } else { start };
        Self {
            start,
            end: end.max(start + limits::MIN_VIEWPORT_SPAN),
        }
    }

    #[inline]
    pub fn start(&self) -> f64 {
        self.start
    }

    #[inline]
    pub fn end(&self) -> f64 {
        self.end
    }

    /// Visible span in seconds.
    #[inline]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    /// Shift by `delta` seconds without leaving `[0, limit]`. When the
    /// viewport is wider than the limit only the left bound is enforced.
    pub fn panned(self, delta: f64, limit: f64) -> Self {
        if !delta.is_finite() {
            return self;
        }
        let max_shift = (limit - self.end).max(0.0);
        let shift = delta.clamp(-self.start, max_shift);
        Self {
            start: self.start + shift,
            end: self.end + shift,
        }
    }
}

/// Selected clip ids in selection order, without duplicates.
pub type Selection = SmallVec<[ClipId; 4]>;

/// Authoritative timeline state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineState {
    /// Playhead position, always within `[0, total_duration]`.
    pub current_time: f64,
    /// Derived from the clip set; never below the configured minimum.
    pub total_duration: f64,
    pub zoom_level: f64,
    pub viewport: Viewport,
    pub snap_to_grid: bool,
    pub grid_interval: f64,
    pub selected_clip_ids: Selection,
    /// Clips picked for playback outside the timeline (e.g. in a media
    /// library). Used when neither track selection nor the playhead names
    /// a clip to show.
    #[serde(default)]
    pub playback_clip_ids: Selection,
    pub trim_mode: bool,
    pub active_trim_handle: Option<TrimHandle>,
    pub is_playing: bool,
    pub playback_rate: f64,
    /// Set while a drag or scrub is in progress. Playback updates must not
    /// overwrite `current_time` while this is set.
    pub manual_interaction: bool,
}

impl TimelineState {
    /// Initial state for an empty timeline.
    pub fn new(config: &TimelineConfig) -> Self {
        Self {
            current_time: 0.0,
            total_duration: config.min_timeline_duration,
            zoom_level: 1.0,
            viewport: Viewport::new(0.0, config.default_viewport_end),
            snap_to_grid: config.snap_to_grid,
            grid_interval: config.default_grid_interval.max(limits::MIN_GRID_INTERVAL),
            selected_clip_ids: Selection::new(),
            playback_clip_ids: Selection::new(),
            trim_mode: false,
            active_trim_handle: None,
            is_playing: false,
            playback_rate: 1.0,
            manual_interaction: false,
        }
    }

    /// Check whether a clip is track-selected.
    pub fn is_selected(&self, id: ClipId) -> bool {
        self.selected_clip_ids.contains(&id)
    }

    /// Clamp a time into `[0, total_duration]`.
    pub fn clamp_time(&self, time: f64) -> f64 {
        if time.is_finite() {
            time.clamp(0.0, self.total_duration)
        } else {
            self.current_time
        }
    }
}

impl Default for TimelineState {
    fn default() -> Self {
        Self::new(&TimelineConfig::default())
    }
}

/// Clamp a zoom level into the allowed range.
pub fn clamp_zoom(zoom: f64) -> f64 {
    if zoom.is_finite() {
        zoom.clamp(limits::MIN_ZOOM, limits::MAX_ZOOM)
    } else {
        1.0
    }
}
