//! Integration tests for the timeline subsystem.
//!
//! Exercises cross-crate interactions between trimline-core and
//! trimline-timeline: the store, lane layout, geometry and sessions.

use trimline_core::TimelineConfig;
use trimline_timeline::render;
use trimline_timeline::{
    Clip, ClipStore, GeometryMapper, Operation, RenderCache, SessionFile, TrimEdge, TrimHandle,
};

// ── Helpers ────────────────────────────────────────────────────

fn clip(name: &str, secs: f64) -> Clip {
    Clip::new(name, format!("media/{name}.mp4"), secs, 0.1)
}

fn config() -> TimelineConfig {
    TimelineConfig {
        snap_to_grid: false,
        ..TimelineConfig::default()
    }
}

/// A at 0..10, B at 10..15, C at 5..15.
fn abc_store() -> (ClipStore, [Clip; 3]) {
    let a = clip("A", 10.0);
    let b = clip("B", 5.0).at(10.0);
    let c = clip("C", 10.0).at(5.0);
    let store = ClipStore::from_clips(config(), [a.clone(), b.clone(), c.clone()]);
    (store, [a, b, c])
}

// ── Lane layout ────────────────────────────────────────────────

#[test]
fn overlapping_clip_goes_to_second_lane() {
    let (store, [a, b, c]) = abc_store();
    let geometry = render::compute(&store, 800.0);

    assert_eq!(geometry.lane_count(), 2);
    assert_eq!(geometry.layout.lane_of(a.id), Some(0));
    assert_eq!(geometry.layout.lane_of(b.id), Some(0));
    assert_eq!(geometry.layout.lane_of(c.id), Some(1));
    assert_eq!(
        geometry.layout.to_id_lists(),
        vec![vec![a.id, b.id], vec![c.id]]
    );
}

#[test]
fn moving_clip_away_collapses_lanes() {
    let (mut store, [_, _, c]) = abc_store();
    store.dispatch(Operation::UpdateClipPosition {
        id: c.id,
        position: 15.0,
    });
    let geometry = render::compute(&store, 800.0);
    assert_eq!(geometry.lane_count(), 1);
}

#[test]
fn trimming_clip_changes_its_lane() {
    let (mut store, [a, _, c]) = abc_store();
    // C shrinks to 5..10 and still collides with A
    store.dispatch(Operation::UpdateClipTrim {
        id: c.id,
        trim_start: 0.0,
        trim_end: 5.0,
    });
    assert_eq!(render::compute(&store, 800.0).layout.lane_of(c.id), Some(1));

    // A shrinks to 0..5, so C fits after it
    store.dispatch(Operation::UpdateClipTrim {
        id: a.id,
        trim_start: 0.0,
        trim_end: 5.0,
    });
    assert_eq!(render::compute(&store, 800.0).lane_count(), 1);
}

// ── Geometry ───────────────────────────────────────────────────

#[test]
fn placements_use_store_zoom() {
    let (mut store, [a, b, _]) = abc_store();
    let geometry = render::compute(&store, 800.0);
    let pa = geometry.placement(a.id).unwrap();
    let pb = geometry.placement(b.id).unwrap();
    assert_eq!(pa.geometry.left, 0.0);
    assert_eq!(pa.geometry.width, 500.0);
    assert_eq!(pb.geometry.left, 500.0);

    store.dispatch(Operation::SetZoom(2.0));
    let geometry = render::compute(&store, 800.0);
    assert_eq!(geometry.placement(a.id).unwrap().geometry.width, 1000.0);
}

#[test]
fn viewport_fit_wins_over_smaller_zoom() {
    let mut store = ClipStore::new(config());
    store.dispatch(Operation::SetViewport {
        start: 0.0,
        end: 4.0,
    });
    store.dispatch(Operation::ZoomIn);

    let mapper = GeometryMapper::from_state(store.state(), 800.0, 50.0, 800.0);
    // 800px / 4s beats 1.3 × 50
    assert_eq!(mapper.pixels_per_second(), 200.0);
}

#[test]
fn render_cache_recomputes_only_on_change() {
    let (mut store, [a, ..]) = abc_store();
    let mut cache = RenderCache::new();

    cache.get(&store, 800.0);
    cache.get(&store, 800.0);
    assert_eq!(cache.computations(), 1);

    store.dispatch(Operation::SeekTo(3.0));
    cache.get(&store, 800.0);
    assert_eq!(cache.computations(), 1);

    store.dispatch(Operation::UpdateClipPosition {
        id: a.id,
        position: 20.0,
    });
    cache.get(&store, 800.0);
    assert_eq!(cache.computations(), 2);

    cache.get(&store, 640.0);
    assert_eq!(cache.computations(), 3);
}

// ── Edits with undo ────────────────────────────────────────────

#[test]
fn undo_redo_across_mixed_edits() {
    let (mut store, [a, _, c]) = abc_store();
    store.dispatch(Operation::UpdateClipPosition {
        id: a.id,
        position: 30.0,
    });
    store.dispatch(Operation::UpdateClipTrim {
        id: c.id,
        trim_start: 2.0,
        trim_end: 6.0,
    });
    store.dispatch(Operation::RemoveClip(a.id));
    assert_eq!(store.clips().len(), 2);

    store.dispatch(Operation::Undo);
    assert_eq!(store.clip(a.id).unwrap().timeline_position, 30.0);

    store.dispatch(Operation::Undo);
    let restored = store.clip(c.id).unwrap();
    assert_eq!((restored.trim_start, restored.trim_end), (0.0, 10.0));

    store.dispatch(Operation::Undo);
    assert_eq!(store.clip(a.id).unwrap().timeline_position, 0.0);
    assert!(!store.can_undo());

    store.dispatch(Operation::Redo);
    assert_eq!(store.clip(a.id).unwrap().timeline_position, 30.0);
    assert!(store.can_redo());
}

#[test]
fn new_edit_clears_redo() {
    let (mut store, [a, b, _]) = abc_store();
    store.dispatch(Operation::UpdateClipPosition {
        id: a.id,
        position: 1.0,
    });
    store.dispatch(Operation::Undo);
    assert!(store.can_redo());
    store.dispatch(Operation::UpdateClipPosition {
        id: b.id,
        position: 40.0,
    });
    assert!(!store.can_redo());
}

#[test]
fn removing_clip_prunes_selection_and_handle() {
    let (mut store, [a, b, _]) = abc_store();
    store.dispatch(Operation::SelectClip {
        id: a.id,
        additive: false,
    });
    store.dispatch(Operation::SelectClip {
        id: b.id,
        additive: true,
    });
    store.dispatch(Operation::SetTrimMode(true));
    store.dispatch(Operation::SetActiveTrimHandle(Some(TrimHandle {
        clip_id: a.id,
        edge: TrimEdge::End,
    })));

    store.dispatch(Operation::RemoveClip(a.id));

    assert_eq!(store.state().selected_clip_ids.as_slice(), &[b.id]);
    assert_eq!(store.state().active_trim_handle, None);
}

#[test]
fn total_duration_follows_clips() {
    let mut store = ClipStore::new(config());
    assert_eq!(store.state().total_duration, 60.0);

    let long = clip("long", 30.0).at(100.0);
    let id = long.id;
    store.dispatch(Operation::AddClipAt {
        clip: long,
        position: 100.0,
    });
    assert_eq!(store.state().total_duration, 130.0);

    store.dispatch(Operation::JumpToEnd);
    store.dispatch(Operation::RemoveClip(id));
    assert_eq!(store.state().total_duration, 60.0);
    assert_eq!(store.state().current_time, 60.0);
}

#[test]
fn operations_on_missing_clip_are_noops() {
    let (mut store, _) = abc_store();
    let ghost = clip("ghost", 3.0);
    let revision = store.revision();

    assert!(!store.dispatch(Operation::RemoveClip(ghost.id)).applied());
    assert!(!store
        .dispatch(Operation::UpdateClipPosition {
            id: ghost.id,
            position: 1.0
        })
        .applied());
    assert!(!store
        .dispatch(Operation::UpdateClipTrim {
            id: ghost.id,
            trim_start: 0.0,
            trim_end: 1.0
        })
        .applied());
    assert_eq!(store.revision(), revision);
}

// ── Sessions ───────────────────────────────────────────────────

#[test]
fn session_file_round_trip_on_disk() {
    let (mut store, [a, _, c]) = abc_store();
    store.dispatch(Operation::UpdateClipTrim {
        id: c.id,
        trim_start: 1.5,
        trim_end: 7.0,
    });
    store.dispatch(Operation::SetZoom(2.5));
    store.dispatch(Operation::SetGridInterval(0.5));

    let path = std::env::temp_dir().join(format!("trimline-it-{}.json", uuid::Uuid::new_v4()));
    SessionFile::capture(&store).save_to_file(&path).unwrap();
    let loaded = SessionFile::load_from_file(&path).unwrap().into_store(config());
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.clips(), store.clips());
    assert_eq!(loaded.state().zoom_level, 2.5);
    assert_eq!(loaded.state().grid_interval, 0.5);
    assert_eq!(loaded.clip(a.id).unwrap().name, "A");
    // Loading is not an edit
    assert!(!loaded.can_undo());
}

#[test]
fn session_with_bad_view_is_clamped() {
    let (store, _) = abc_store();
    let mut session = SessionFile::capture(&store);
    session.view.zoom_level = 1000.0;
    session.view.grid_interval = -3.0;

    let json = session.to_json().unwrap();
    let loaded = SessionFile::from_json(&json).unwrap().into_store(config());
    assert_eq!(loaded.state().zoom_level, trimline_core::limits::MAX_ZOOM);
    assert_eq!(
        loaded.state().grid_interval,
        trimline_core::limits::MIN_GRID_INTERVAL
    );
}

#[test]
fn store_loads_from_clip_source() {
    let a = clip("A", 10.0);
    let source = vec![a.clone(), a.clone(), clip("B", 4.0).at(10.0)];
    let store = ClipStore::load(config(), &source).unwrap();
    assert_eq!(store.clips().len(), 2);
    assert_eq!(store.timeline_end(), 14.0);
}

#[test]
fn snapshot_tracks_revision() {
    let (mut store, [a, ..]) = abc_store();
    let before = store.snapshot().revision;

    store.dispatch(Operation::SetZoom(3.0));
    let snapshot = store.snapshot();
    assert_eq!(snapshot.revision, before);
    assert_eq!(snapshot.state.zoom_level, 3.0);

    store.dispatch(Operation::RemoveClip(a.id));
    let snapshot = store.snapshot();
    assert_eq!(snapshot.revision, before + 1);
    assert_eq!(snapshot.clips.len(), 2);
}
