//! Two-way synchronization between the timeline clock and a media element.
//!
//! The store's `current_time` is authoritative. When it moves for any reason
//! other than a media time update, the synchronizer seeks the element if it
//! is too far away. Media time updates flow back onto the timeline while
//! playing. It never advances `current_time` on its own.

use std::collections::HashMap;
use tracing::{debug, info, trace, warn};
use trimline_core::limits::TIME_EPSILON;
use trimline_timeline::{Clip, ClipId, ClipStore, Operation, TimelineState};

use crate::media::{MediaElement, MediaError, MediaEvent};

/// The clip whose media should be showing.
///
/// The first track-selected clip (in store order) wins; otherwise the clip
/// under the playhead; otherwise the first clip picked for playback, falling
/// back to the first clip when none is picked.
pub fn select_active_clip<'a>(state: &TimelineState, clips: &'a [Clip]) -> Option<&'a Clip> {
    let first_in = |ids: &[ClipId]| clips.iter().find(|clip| ids.contains(&clip.id));
    first_in(&state.selected_clip_ids)
        .or_else(|| {
            clips
                .iter()
                .find(|clip| clip.contains_time(state.current_time))
        })
        .or_else(|| first_in(&state.playback_clip_ids))
        .or_else(|| clips.first())
}

/// Keeps one media element in step with one clip store.
#[derive(Debug, Default)]
pub struct PlaybackSynchronizer {
    active_clip: Option<ClipId>,
    /// Metadata for the active source has arrived.
    loaded: bool,
    /// Media target of a seek we issued that has not completed yet.
    pending_seek: Option<f64>,
    /// Active clip and timeline time the element was last checked against.
    reconciled: Option<(ClipId, f64)>,
    /// Last `is_playing` value forwarded to the element.
    media_playing: bool,
    /// Last playback rate forwarded to the element.
    media_rate: Option<f64>,
    errors: HashMap<ClipId, MediaError>,
}

impl PlaybackSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_clip(&self) -> Option<ClipId> {
        self.active_clip
    }

    /// Whether the active source is ready for seeking.
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn has_pending_seek(&self) -> bool {
        self.pending_seek.is_some()
    }

    /// Recoverable error recorded for a clip.
    pub fn error_for(&self, clip_id: ClipId) -> Option<&MediaError> {
        self.errors.get(&clip_id)
    }

    /// User-facing message for the active clip's error.
    pub fn active_error_message(&self) -> Option<String> {
        self.active_clip
            .and_then(|id| self.errors.get(&id))
            .map(|err| err.to_string())
    }

    // ── Transport requests ───────────────────────────────────────

    /// Request play or pause. Takes effect on the next [`tick`](Self::tick).
    pub fn set_playing(&self, store: &mut ClipStore, playing: bool) {
        store.dispatch(Operation::SetPlaying(playing));
    }

    pub fn toggle_playback(&self, store: &mut ClipStore) {
        store.dispatch(Operation::TogglePlayback);
    }

    // ── Reconciliation ───────────────────────────────────────────

    /// Reconcile the element with the store: switch sources, forward
    /// play/pause and rate changes, correct drift.
    pub fn tick(&mut self, store: &mut ClipStore, media: &mut dyn MediaElement) {
        let Some(clip) = select_active_clip(store.state(), store.clips()).cloned() else {
            if self.active_clip.take().is_some() {
                info!("no clip to play");
            }
            self.stop_media(media);
            return;
        };

        if self.active_clip != Some(clip.id) {
            self.switch_to(&clip, media);
        }

        if self.errors.contains_key(&clip.id) {
            if store.state().is_playing {
                store.dispatch(Operation::SetPlaying(false));
            }
            self.stop_media(media);
            return;
        }
        if !self.loaded {
            return;
        }

        let rate = store.state().playback_rate;
        if self.media_rate != Some(rate) {
            media.set_playback_rate(rate);
            self.media_rate = Some(rate);
        }

        if self.reconciled != Some((clip.id, store.state().current_time)) {
            self.sync_to_media(store, media);
        }

        let playing = store.state().is_playing;
        if playing != self.media_playing {
            if playing {
                self.start_media(store, clip.id, media);
            } else {
                self.stop_media(media);
            }
        }
    }

    /// Seek the element if it has drifted past the threshold from the
    /// timeline. Returns the media-time target when a seek was issued.
    ///
    /// [`tick`](Self::tick) only calls this after the timeline moved on its
    /// own; while playing undisturbed the media clock leads.
    pub fn sync_to_media(&mut self, store: &ClipStore, media: &mut dyn MediaElement) -> Option<f64> {
        self.seek_if_off(store, media, store.config().drift_threshold)
    }

    fn seek_if_off(
        &mut self,
        store: &ClipStore,
        media: &mut dyn MediaElement,
        tolerance: f64,
    ) -> Option<f64> {
        if !self.loaded || self.pending_seek.is_some() {
            return None;
        }
        let clip = store.clip(self.active_clip?)?;
        let current_time = store.state().current_time;
        self.reconciled = Some((clip.id, current_time));
        let target = clip
            .media_time_at(current_time)
            .clamp(clip.trim_start, clip.trim_end);
        let drift = (media.current_time() - target).abs();
        if drift <= tolerance {
            return None;
        }
        debug!(clip = %clip.id, target, drift, "corrective seek");
        self.pending_seek = Some(target);
        media.set_current_time(target);
        Some(target)
    }

    /// Drain and handle every pending event of the element.
    pub fn pump(&mut self, store: &mut ClipStore, media: &mut dyn MediaElement) {
        while let Some(event) = media.poll_event() {
            self.on_media_event(store, media, event);
        }
    }

    /// Handle one event from the element.
    pub fn on_media_event(
        &mut self,
        store: &mut ClipStore,
        media: &mut dyn MediaElement,
        event: MediaEvent,
    ) {
        let Some(clip) = self.active_clip.and_then(|id| store.clip(id)).cloned() else {
            trace!(?event, "media event without an active clip");
            return;
        };

        match event {
            MediaEvent::LoadedMetadata { duration } => {
                debug!(clip = %clip.id, duration, "metadata loaded");
                self.loaded = true;
                self.errors.remove(&clip.id);
                // A fresh source starts exactly at the playhead's offset
                self.seek_if_off(store, media, TIME_EPSILON);
                if store.state().is_playing {
                    self.start_media(store, clip.id, media);
                }
            }
            MediaEvent::Seeked => {
                self.pending_seek = None;
            }
            MediaEvent::TimeUpdate(media_time) => {
                if store.state().manual_interaction {
                    trace!("time update during manual interaction ignored");
                    return;
                }
                if self.pending_seek.is_some() {
                    trace!(media_time, "stale time update ignored");
                    return;
                }
                if media_time >= clip.trim_end - TIME_EPSILON {
                    self.reached_trim_end(store, media, &clip);
                } else {
                    store.dispatch(Operation::SetCurrentTime(clip.timeline_time_at(media_time)));
                    self.reconciled = Some((clip.id, store.state().current_time));
                }
            }
            MediaEvent::Ended => {
                if !store.state().manual_interaction && self.pending_seek.is_none() {
                    self.reached_trim_end(store, media, &clip);
                }
            }
            MediaEvent::Error(err) => self.record_error(store, media, clip.id, err),
        }
    }

    /// Clear the active clip's error and load its source again.
    pub fn retry(&mut self, store: &ClipStore, media: &mut dyn MediaElement) -> bool {
        let Some(clip) = self.active_clip.and_then(|id| store.clip(id)) else {
            return false;
        };
        if self.errors.remove(&clip.id).is_none() {
            return false;
        }
        info!(clip = %clip.id, "retrying media load");
        self.load(clip, media);
        true
    }

    // ── Internals ────────────────────────────────────────────────

    fn switch_to(&mut self, clip: &Clip, media: &mut dyn MediaElement) {
        info!(clip = %clip.id, name = %clip.name, "switching active clip");
        self.active_clip = Some(clip.id);
        if self.errors.contains_key(&clip.id) {
            self.loaded = false;
            self.pending_seek = None;
            return;
        }
        self.load(clip, media);
    }

    fn load(&mut self, clip: &Clip, media: &mut dyn MediaElement) {
        self.loaded = false;
        self.pending_seek = None;
        self.reconciled = None;
        self.media_playing = false;
        self.media_rate = None;
        media.load_source(&clip.path);
    }

    fn start_media(&mut self, store: &mut ClipStore, clip_id: ClipId, media: &mut dyn MediaElement) {
        match media.play() {
            Ok(()) => self.media_playing = true,
            Err(err) => self.record_error(store, media, clip_id, err),
        }
    }

    fn stop_media(&mut self, media: &mut dyn MediaElement) {
        if !media.is_paused() {
            media.pause();
        }
        self.media_playing = false;
    }

    fn reached_trim_end(&mut self, store: &mut ClipStore, media: &mut dyn MediaElement, clip: &Clip) {
        store.dispatch(Operation::SetCurrentTime(clip.timeline_end()));
        // Hand over only to a clip that actually plays at the new time
        let time = store.state().current_time;
        let next = select_active_clip(store.state(), store.clips())
            .filter(|next| next.id != clip.id && next.contains_time(time))
            .map(|next| next.id);
        if next.is_none() {
            info!(clip = %clip.id, "reached end of last clip, stopping");
            store.dispatch(Operation::SetPlaying(false));
            self.stop_media(media);
        } else {
            debug!(clip = %clip.id, "reached trim end, handing over to next clip");
        }
    }

    fn record_error(
        &mut self,
        store: &mut ClipStore,
        media: &mut dyn MediaElement,
        clip_id: ClipId,
        err: MediaError,
    ) {
        warn!(clip = %clip_id, error = %err, "media error");
        self.errors.insert(clip_id, err);
        self.loaded = false;
        self.pending_seek = None;
        store.dispatch(Operation::SetPlaying(false));
        self.stop_media(media);
    }
}
