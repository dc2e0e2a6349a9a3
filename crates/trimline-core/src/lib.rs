//! Trimline Core - Foundation types for the timeline engine
//!
//! This crate provides the pieces shared by every other Trimline crate:
//! - Error type and `Result` alias
//! - Engine limits (zoom bounds, minimum trim gap, drift threshold)
//! - `TimelineConfig`, the tunable settings loaded from JSON
//! - Time spans and timecode formatting

pub mod config;
pub mod error;
pub mod time;

pub use config::TimelineConfig;
pub use error::{Result, TrimlineError};
pub use time::{format_timecode, TimeSpan};

/// Hard limits of the engine. Tunable defaults live in [`TimelineConfig`].
pub mod limits {
    /// Smallest allowed zoom level.
    pub const MIN_ZOOM: f64 = 0.1;

    /// Largest allowed zoom level.
    pub const MAX_ZOOM: f64 = 10.0;

    /// Smallest grid interval in seconds.
    pub const MIN_GRID_INTERVAL: f64 = 0.1;

    /// Slowest and fastest playback rates forwarded to the media element.
    pub const MIN_PLAYBACK_RATE: f64 = 0.25;
    pub const MAX_PLAYBACK_RATE: f64 = 4.0;

    /// Smallest visible viewport span in seconds.
    pub const MIN_VIEWPORT_SPAN: f64 = 0.1;

    /// Tolerance used when comparing derived floating-point times.
    pub const TIME_EPSILON: f64 = 1e-9;
}
