//! Grid snapping for timeline interactions.

use crate::state::TimelineState;

/// Quantize `time` to the nearest multiple of `grid_interval`.
///
/// Non-positive or non-finite intervals leave the time unchanged. The result
/// is a fixed point: snapping an already-snapped value returns it unchanged.
#[inline]
pub fn snap(time: f64, grid_interval: f64) -> f64 {
    if !grid_interval.is_finite() || grid_interval <= 0.0 || !time.is_finite() {
        return time;
    }
    (time / grid_interval).round() * grid_interval
}

/// Engine for snapping candidate times to the active grid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    pub enabled: bool,
    /// Grid interval in seconds.
    pub grid_interval: f64,
}

impl SnapEngine {
    pub fn new(enabled: bool, grid_interval: f64) -> Self {
        Self {
            enabled,
            grid_interval,
        }
    }

    /// Engine configured from the timeline's current grid settings.
    pub fn from_state(state: &TimelineState) -> Self {
        Self::new(state.snap_to_grid, state.grid_interval)
    }

    /// Snap `time` if snapping is enabled.
    pub fn apply(&self, time: f64) -> f64 {
        if self.enabled {
            snap(time, self.grid_interval)
        } else {
            time
        }
    }
}
