//! Conversion between timeline seconds and pixels.
//!
//! `pixels_per_second = max(zoom * base, container_width / viewport_span)`:
//! the zoom-derived scale wins unless it would render the timeline narrower
//! than the visible viewport.

use serde::{Deserialize, Serialize};

use crate::clip::Clip;
use crate::state::{TimelineState, Viewport};

/// Horizontal placement of a clip, in timeline pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClipGeometry {
    pub left: f64,
    pub width: f64,
}

impl ClipGeometry {
    #[inline]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }
}

/// Maps time to pixels for one zoom/viewport/width combination.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometryMapper {
    pixels_per_second: f64,
}

impl GeometryMapper {
    /// Build a mapper. A non-positive container width falls back to
    /// `fallback_width`.
    pub fn new(
        zoom_level: f64,
        viewport: Viewport,
        container_width: f64,
        base_pixels_per_second: f64,
        fallback_width: f64,
    ) -> Self {
        let width = if container_width.is_finite() && container_width > 0.0 {
            container_width
        } else {
            fallback_width
        };
        let zoom_based = zoom_level * base_pixels_per_second;
        let viewport_fit = width / viewport.span();
        Self {
            pixels_per_second: zoom_based.max(viewport_fit),
        }
    }

    /// Mapper for the given state.
    pub fn from_state(
        state: &TimelineState,
        container_width: f64,
        base_pixels_per_second: f64,
        fallback_width: f64,
    ) -> Self {
        Self::new(
            state.zoom_level,
            state.viewport,
            container_width,
            base_pixels_per_second,
            fallback_width,
        )
    }

    #[inline]
    pub fn pixels_per_second(&self) -> f64 {
        self.pixels_per_second
    }

    /// Seconds → pixels. Also converts durations.
    #[inline]
    pub fn time_to_pixels(&self, time: f64) -> f64 {
        time * self.pixels_per_second
    }

    /// Pixels → seconds. Also converts pointer deltas.
    #[inline]
    pub fn pixels_to_time(&self, pixels: f64) -> f64 {
        pixels / self.pixels_per_second
    }

    /// Full width of a timeline of the given duration.
    pub fn timeline_width(&self, total_duration: f64) -> f64 {
        self.time_to_pixels(total_duration)
    }

    /// Left offset and width of a clip's trimmed body.
    pub fn clip_geometry(&self, clip: &Clip) -> ClipGeometry {
        ClipGeometry {
            left: self.time_to_pixels(clip.timeline_position),
            width: self.time_to_pixels(clip.effective_duration()),
        }
    }

    /// New scroll offset that brings `time` back into view, centred, or
    /// `None` when it is already visible.
    pub fn scroll_to_reveal(&self, time: f64, scroll_left: f64, visible_width: f64) -> Option<f64> {
        let x = self.time_to_pixels(time);
        if x < scroll_left || x > scroll_left + visible_width {
            Some(self.centered_scroll(time, visible_width))
        } else {
            None
        }
    }

    /// Scroll offset that centres `time` in the visible area.
    pub fn centered_scroll(&self, time: f64, visible_width: f64) -> f64 {
        (self.time_to_pixels(time) - visible_width / 2.0).max(0.0)
    }

    /// Scroll offset for `self` that keeps the time under the cursor at the
    /// same screen position it had under `previous`.
    pub fn anchored_scroll(&self, previous: &GeometryMapper, cursor_x: f64, scroll_left: f64) -> f64 {
        let anchor_time = previous.pixels_to_time(cursor_x + scroll_left);
        (self.time_to_pixels(anchor_time) - cursor_x).max(0.0)
    }
}
