//! Tunable engine settings.
//!
//! Every field has a default, so a config file only needs to name the values
//! it overrides:
//!
//! ```json
//! { "drift_threshold": 0.2, "zoom_step": 1.5 }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Result, TrimlineError};

/// Settings shared by the store, the gesture controller and the synchronizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Smallest allowed `trim_end - trim_start`, in seconds.
    pub min_trim_gap: f64,
    /// Largest tolerated gap between the timeline clock and the media clock
    /// before a corrective seek is issued.
    pub drift_threshold: f64,
    /// Pixels per second at zoom level 1.0.
    pub base_pixels_per_second: f64,
    /// Floor for the derived total duration (also used for an empty timeline).
    pub min_timeline_duration: f64,
    /// Initial viewport end, in seconds.
    pub default_viewport_end: f64,
    /// Container width assumed before the host reports a real one.
    pub default_container_width: f64,
    /// Multiplier applied by zoom-in / divisor applied by zoom-out.
    pub zoom_step: f64,
    /// Arrow-key seek step.
    pub seek_step: f64,
    /// Shift+arrow seek step.
    pub seek_step_large: f64,
    /// Up/down arrow seek step.
    pub seek_step_page: f64,
    /// Frame rate assumed for single-frame stepping.
    pub frame_rate: f64,
    /// Maximum undo history depth.
    pub undo_depth: usize,
    /// Width of a trim handle hit zone in pixels.
    pub trim_handle_width: f64,
    /// Initial grid interval in seconds.
    pub default_grid_interval: f64,
    /// Whether grid snapping starts enabled.
    pub snap_to_grid: bool,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            min_trim_gap: 0.1,
            drift_threshold: 0.1,
            base_pixels_per_second: 50.0,
            min_timeline_duration: 60.0,
            default_viewport_end: 100.0,
            default_container_width: 800.0,
            zoom_step: 1.3,
            seek_step: 1.0,
            seek_step_large: 10.0,
            seek_step_page: 60.0,
            frame_rate: 30.0,
            undo_depth: 200,
            trim_handle_width: 12.0,
            default_grid_interval: 1.0,
            snap_to_grid: true,
        }
    }
}

impl TimelineConfig {
    /// Parse and validate a config from JSON bytes.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| TrimlineError::Config(format!("Invalid config JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| TrimlineError::Serialization(format!("Failed to serialize config: {}", e)))
    }

    /// Load a config file from disk.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Check that every numeric setting is usable.
    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("min_trim_gap", self.min_trim_gap),
            ("drift_threshold", self.drift_threshold),
            ("base_pixels_per_second", self.base_pixels_per_second),
            ("min_timeline_duration", self.min_timeline_duration),
            ("default_viewport_end", self.default_viewport_end),
            ("default_container_width", self.default_container_width),
            ("seek_step", self.seek_step),
            ("seek_step_large", self.seek_step_large),
            ("seek_step_page", self.seek_step_page),
            ("frame_rate", self.frame_rate),
            ("trim_handle_width", self.trim_handle_width),
            ("default_grid_interval", self.default_grid_interval),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(TrimlineError::Config(format!(
                    "{} must be a positive number, got {}",
                    name, value
                )));
            }
        }
        if !self.zoom_step.is_finite() || self.zoom_step <= 1.0 {
            return Err(TrimlineError::Config(format!(
                "zoom_step must be greater than 1.0, got {}",
                self.zoom_step
            )));
        }
        if self.undo_depth == 0 {
            return Err(TrimlineError::Config("undo_depth must be at least 1".into()));
        }
        Ok(())
    }

    /// Duration of one frame at the configured frame rate.
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.frame_rate
    }
}
