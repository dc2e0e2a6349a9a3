//! The media element abstraction.
//!
//! A media element plays one source at a time. It reports what happens
//! through [`MediaEvent`]s, which the host drains with
//! [`MediaElement::poll_event`] and forwards to the synchronizer.

use thiserror::Error;
use trimline_core::TrimlineError;

/// Why a source failed to load or play.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MediaError {
    #[error("Video loading aborted")]
    Aborted,
    #[error("Network error loading video")]
    Network,
    #[error("Video decode error")]
    Decode,
    #[error("Video format not supported")]
    SourceNotSupported,
    #[error("Failed to play video")]
    PlayRejected,
    #[error("Video error: {0}")]
    Other(String),
}

impl From<MediaError> for TrimlineError {
    fn from(err: MediaError) -> Self {
        TrimlineError::Media(err.to_string())
    }
}

/// Notification from a media element.
#[derive(Debug, Clone, PartialEq)]
pub enum MediaEvent {
    /// The source's duration is known; seeks are now possible.
    LoadedMetadata { duration: f64 },
    /// The playback position advanced (source seconds).
    TimeUpdate(f64),
    /// A seek has completed.
    Seeked,
    /// Playback reached the end of the source.
    Ended,
    Error(MediaError),
}

/// A player for one media source at a time.
pub trait MediaElement {
    /// Start loading a source. Resets position and pauses.
    fn load_source(&mut self, path: &str);

    /// Locator of the loaded source.
    fn source(&self) -> Option<&str>;

    fn play(&mut self) -> Result<(), MediaError>;

    fn pause(&mut self);

    fn is_paused(&self) -> bool;

    /// Playback position in source seconds.
    fn current_time(&self) -> f64;

    /// Seek. Completion is reported with [`MediaEvent::Seeked`].
    fn set_current_time(&mut self, time: f64);

    /// Source duration, once metadata has loaded.
    fn duration(&self) -> Option<f64>;

    fn set_playback_rate(&mut self, rate: f64);

    /// Next pending event, if any.
    fn poll_event(&mut self) -> Option<MediaEvent>;
}
