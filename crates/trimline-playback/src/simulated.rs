//! A deterministic in-memory media element.
//!
//! Time only moves when [`SimulatedMediaElement::advance`] is called, and
//! every state change queues the event a real player would emit. Used by
//! the driver binary and by tests.

use std::collections::{HashMap, VecDeque};
use tracing::trace;

use crate::media::{MediaElement, MediaError, MediaEvent};

#[derive(Debug, Clone, Default)]
pub struct SimulatedMediaElement {
    /// Known sources and their durations.
    library: HashMap<String, f64>,
    /// Sources that fail to load with the given error.
    failures: HashMap<String, MediaError>,
    source: Option<String>,
    duration: Option<f64>,
    current_time: f64,
    paused: bool,
    rate: f64,
    events: VecDeque<MediaEvent>,
    seeks: Vec<f64>,
    loads: usize,
    /// Events of earlier sources dropped by a new load.
    discarded: usize,
}

impl SimulatedMediaElement {
    pub fn new() -> Self {
        Self {
            paused: true,
            rate: 1.0,
            ..Self::default()
        }
    }

    /// Register a playable source.
    pub fn with_source(mut self, path: impl Into<String>, duration: f64) -> Self {
        self.library.insert(path.into(), duration);
        self
    }

    /// Make loading `path` fail with `error`.
    pub fn fail_source(&mut self, path: impl Into<String>, error: MediaError) {
        self.failures.insert(path.into(), error);
    }

    /// Let a previously failing source load again.
    pub fn heal_source(&mut self, path: &str) {
        self.failures.remove(path);
    }

    /// Raise an error on the current source.
    pub fn raise(&mut self, error: MediaError) {
        self.paused = true;
        self.events.push_back(MediaEvent::Error(error));
    }

    /// Advance playback by `dt` wall-clock seconds.
    pub fn advance(&mut self, dt: f64) {
        let Some(duration) = self.duration else {
            return;
        };
        if self.paused || dt <= 0.0 {
            return;
        }
        self.current_time = (self.current_time + dt * self.rate).min(duration);
        self.events.push_back(MediaEvent::TimeUpdate(self.current_time));
        if self.current_time >= duration {
            self.paused = true;
            self.events.push_back(MediaEvent::Ended);
        }
    }

    /// Every seek target requested so far.
    pub fn seeks(&self) -> &[f64] {
        &self.seeks
    }

    /// How many times a source was loaded.
    pub fn load_count(&self) -> usize {
        self.loads
    }

    /// How many queued events were discarded by loading another source.
    pub fn discarded_events(&self) -> usize {
        self.discarded
    }

    pub fn playback_rate(&self) -> f64 {
        self.rate
    }
}

impl MediaElement for SimulatedMediaElement {
    fn load_source(&mut self, path: &str) {
        trace!(path, "load source");
        self.loads += 1;
        self.source = Some(path.to_string());
        self.duration = None;
        self.current_time = 0.0;
        self.paused = true;
        if !self.events.is_empty() {
            trace!(
                dropped = self.events.len(),
                pending = ?self.events,
                "pending events of previous source discarded"
            );
            self.discarded += self.events.len();
            self.events.clear();
        }

        if let Some(error) = self.failures.get(path) {
            self.events.push_back(MediaEvent::Error(error.clone()));
            return;
        }
        match self.library.get(path) {
            Some(&duration) => {
                self.duration = Some(duration);
                self.events.push_back(MediaEvent::LoadedMetadata { duration });
            }
            None => self
                .events
                .push_back(MediaEvent::Error(MediaError::SourceNotSupported)),
        }
    }

    fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    fn play(&mut self) -> Result<(), MediaError> {
        if self.duration.is_none() {
            return Err(MediaError::PlayRejected);
        }
        self.paused = false;
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn set_current_time(&mut self, time: f64) {
        let Some(duration) = self.duration else {
            return;
        };
        self.current_time = time.clamp(0.0, duration);
        self.seeks.push(self.current_time);
        self.events.push_back(MediaEvent::Seeked);
    }

    fn duration(&self) -> Option<f64> {
        self.duration
    }

    fn set_playback_rate(&mut self, rate: f64) {
        self.rate = rate;
    }

    fn poll_event(&mut self) -> Option<MediaEvent> {
        self.events.pop_front()
    }
}
