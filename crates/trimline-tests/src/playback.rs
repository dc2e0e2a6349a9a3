//! Integration tests for playback synchronization.
//!
//! Runs the synchronizer against the simulated media element over whole
//! timelines built with trimline-timeline.

use trimline_core::TimelineConfig;
use trimline_playback::{MediaElement, MediaError, PlaybackSynchronizer, SimulatedMediaElement};
use trimline_timeline::{Clip, ClipStore, Operation};

// ── Helpers ────────────────────────────────────────────────────

fn clip(name: &str, secs: f64) -> Clip {
    Clip::new(name, format!("{name}.mp4"), secs, 0.1)
}

struct Rig {
    store: ClipStore,
    media: SimulatedMediaElement,
    sync: PlaybackSynchronizer,
}

impl Rig {
    fn new(clips: Vec<Clip>) -> Self {
        let media = clips
            .iter()
            .fold(SimulatedMediaElement::new(), |media, c| {
                media.with_source(c.path.clone(), c.source_duration)
            });
        let config = TimelineConfig {
            snap_to_grid: false,
            ..TimelineConfig::default()
        };
        Self {
            store: ClipStore::from_clips(config, clips),
            media,
            sync: PlaybackSynchronizer::new(),
        }
    }

    fn settle(&mut self) {
        for _ in 0..2 {
            self.sync.tick(&mut self.store, &mut self.media);
            self.sync.pump(&mut self.store, &mut self.media);
        }
    }

    /// Play in `dt` steps until playback stops or `max_steps` pass. Each
    /// frame the element's clock runs first and its events are only seen
    /// after the next tick, as with a real player.
    fn play(&mut self, dt: f64, max_steps: usize) -> usize {
        self.store.dispatch(Operation::SetPlaying(true));
        for step in 0..max_steps {
            self.media.advance(dt);
            self.sync.tick(&mut self.store, &mut self.media);
            self.sync.pump(&mut self.store, &mut self.media);
            if !self.store.state().is_playing {
                return step;
            }
        }
        max_steps
    }
}

// ── Convergence ────────────────────────────────────────────────

#[test]
fn small_drift_does_not_seek() {
    let mut rig = Rig::new(vec![clip("a", 20.0)]);
    rig.settle();
    rig.store.dispatch(Operation::SetCurrentTime(10.0));
    rig.settle();
    assert_eq!(rig.media.seeks(), &[10.0]);

    rig.store.dispatch(Operation::SetPlaying(true));
    rig.settle();
    rig.media.advance(0.05);
    rig.sync.pump(&mut rig.store, &mut rig.media);
    assert!((rig.store.state().current_time - 10.05).abs() < 1e-9);

    rig.settle();
    assert_eq!(rig.media.seeks().len(), 1);
}

#[test]
fn media_clock_drives_playhead() {
    let mut rig = Rig::new(vec![clip("a", 20.0)]);
    rig.store.dispatch(Operation::SetCurrentTime(10.0));
    rig.store.dispatch(Operation::SetPlaying(true));
    rig.settle();

    rig.media.advance(5.0);
    rig.sync.pump(&mut rig.store, &mut rig.media);
    assert!((rig.store.state().current_time - 15.0).abs() < 1e-9);
    rig.settle();
    assert_eq!(rig.media.seeks().len(), 1);
}

#[test]
fn tick_before_time_update_keeps_media_clock() {
    let mut rig = Rig::new(vec![clip("a", 20.0)]);
    rig.store.dispatch(Operation::SetPlaying(true));
    rig.settle();

    rig.media.advance(0.25);
    rig.sync.tick(&mut rig.store, &mut rig.media);
    assert!(rig.media.seeks().is_empty());
    assert_eq!(rig.media.current_time(), 0.25);

    rig.sync.pump(&mut rig.store, &mut rig.media);
    assert_eq!(rig.store.state().current_time, 0.25);
    assert!(rig.store.state().is_playing);
}

#[test]
fn user_seek_moves_media() {
    let mut rig = Rig::new(vec![clip("a", 30.0).at(4.0).trimmed(3.0, 30.0)]);
    rig.settle();

    rig.store.dispatch(Operation::SetCurrentTime(14.0));
    rig.settle();
    // trim_start + (14 - position)
    assert_eq!(rig.media.current_time(), 13.0);
}

// ── Whole-timeline playback ────────────────────────────────────

#[test]
fn plays_sequential_clips_then_stops() {
    let a = clip("a", 10.0);
    let b = clip("b", 5.0).at(10.0);
    let b_id = b.id;
    let mut rig = Rig::new(vec![a, b]);

    let steps = rig.play(0.5, 1_000);
    assert!(steps < 1_000);
    assert_eq!(rig.sync.active_clip(), Some(b_id));
    assert_eq!(rig.store.state().current_time, 15.0);
    assert!(!rig.store.state().is_playing);
    assert!(rig.media.is_paused());
    assert_eq!(rig.media.load_count(), 2);
    assert!(rig.media.seeks().is_empty());
}

#[test]
fn trimmed_clip_plays_only_its_range() {
    let c = clip("a", 30.0).trimmed(5.0, 12.0);
    let mut rig = Rig::new(vec![c]);

    rig.play(0.25, 1_000);
    // 7 s of material placed at 0
    assert!((rig.store.state().current_time - 7.0).abs() < 1e-9);
    assert_eq!(rig.media.seeks().first(), Some(&5.0));
}

#[test]
fn selected_clip_wins_over_playhead() {
    let a = clip("a", 10.0);
    let b = clip("b", 10.0).at(10.0);
    let a_id = a.id;
    let mut rig = Rig::new(vec![a, b.clone()]);
    rig.store.dispatch(Operation::SetCurrentTime(12.0));
    rig.store.dispatch(Operation::SelectClip {
        id: a_id,
        additive: false,
    });
    rig.settle();

    assert_eq!(rig.sync.active_clip(), Some(a_id));
    // Playhead lies past the clip, so media parks at its trim end
    assert_eq!(rig.media.current_time(), 10.0);

    rig.store.dispatch(Operation::ClearSelection);
    rig.settle();
    assert_eq!(rig.sync.active_clip(), Some(b.id));
    assert_eq!(rig.media.current_time(), 2.0);
}

#[test]
fn library_pick_used_when_playhead_is_past_clips() {
    let a = clip("a", 10.0);
    let b = clip("b", 10.0).at(10.0);
    let b_id = b.id;
    let mut rig = Rig::new(vec![a, b]);
    rig.store.dispatch(Operation::SetCurrentTime(45.0));
    rig.settle();
    assert_eq!(rig.media.source(), Some("a.mp4"));

    rig.store.dispatch(Operation::SetPlaybackSelection(vec![b_id]));
    rig.settle();
    assert_eq!(rig.sync.active_clip(), Some(b_id));
    assert_eq!(rig.media.source(), Some("b.mp4"));

    // The playhead still wins when it lies on a clip
    rig.store.dispatch(Operation::SetCurrentTime(3.0));
    rig.settle();
    assert_eq!(rig.media.source(), Some("a.mp4"));
}

#[test]
fn rate_change_speeds_up_playhead() {
    let mut rig = Rig::new(vec![clip("a", 30.0)]);
    rig.store.dispatch(Operation::SetPlaybackRate(2.0));
    rig.store.dispatch(Operation::SetPlaying(true));
    rig.settle();

    rig.media.advance(1.0);
    rig.sync.pump(&mut rig.store, &mut rig.media);
    assert_eq!(rig.store.state().current_time, 2.0);
}

// ── Errors ─────────────────────────────────────────────────────

#[test]
fn error_keeps_edits_and_recovers() {
    let c = clip("a", 10.0);
    let id = c.id;
    let mut rig = Rig::new(vec![c]);
    rig.store.dispatch(Operation::UpdateClipTrim {
        id,
        trim_start: 1.0,
        trim_end: 9.0,
    });
    rig.store.dispatch(Operation::SetCurrentTime(4.0));
    rig.settle();

    rig.store.dispatch(Operation::SetPlaying(true));
    rig.media.raise(MediaError::Decode);
    rig.settle();

    assert_eq!(
        rig.sync.active_error_message().as_deref(),
        Some("Video decode error")
    );
    assert!(!rig.store.state().is_playing);
    let clip = rig.store.clip(id).unwrap();
    assert_eq!((clip.trim_start, clip.trim_end), (1.0, 9.0));
    assert_eq!(rig.store.state().current_time, 4.0);

    assert!(rig.sync.retry(&rig.store, &mut rig.media));
    rig.settle();
    assert!(rig.sync.is_loaded());
    assert_eq!(rig.media.current_time(), 5.0);
}

#[test]
fn failed_clip_does_not_block_others() {
    let a = clip("a", 10.0);
    let b = clip("b", 10.0).at(10.0);
    let (a_id, b_id) = (a.id, b.id);
    let mut rig = Rig::new(vec![a, b]);
    rig.media.fail_source("a.mp4", MediaError::SourceNotSupported);

    rig.play(0.5, 10);
    assert!(rig.sync.error_for(a_id).is_some());
    assert!(!rig.store.state().is_playing);

    rig.store.dispatch(Operation::SeekTo(10.0));
    let steps = rig.play(0.5, 1_000);
    assert!(steps < 1_000);
    assert_eq!(rig.sync.active_clip(), Some(b_id));
    assert_eq!(rig.store.state().current_time, 20.0);
    assert!(rig.sync.error_for(b_id).is_none());
}
