//! Integration tests for pointer and keyboard interaction.
//!
//! Drives trimline-ui against real stores, and checks how gestures interact
//! with the playback synchronizer.

use egui::Pos2;
use trimline_core::TimelineConfig;
use trimline_playback::{MediaElement, PlaybackSynchronizer, SimulatedMediaElement};
use trimline_timeline::{Clip, ClipId, ClipStore, Operation};
use trimline_ui::{
    DragController, DragState, EguiInputAdapter, HitTarget, InputEvent, Key, Modifiers,
    PointerCapture, TimelineInput,
};

// ── Helpers ────────────────────────────────────────────────────

// Default layout: ruler y 0..30, first lane y 30..90, 50 px per second.
const LANE_Y: f32 = 60.0;
const RULER_Y: f32 = 10.0;

fn config() -> TimelineConfig {
    TimelineConfig {
        snap_to_grid: false,
        ..TimelineConfig::default()
    }
}

/// One 10 s clip at the origin, so its body spans x 0..500.
fn single_clip(config: &TimelineConfig) -> (ClipStore, ClipId) {
    let clip = Clip::new("a", "a.mp4", 10.0, config.min_trim_gap);
    let id = clip.id;
    (ClipStore::from_clips(config.clone(), [clip]), id)
}

fn focused_input(store: &mut ClipStore, drag: DragController) -> TimelineInput {
    let mut input = TimelineInput::with_drag(store.config(), drag);
    input.handle(store, InputEvent::FocusChanged(true));
    input
}

fn down(input: &mut TimelineInput, store: &mut ClipStore, x: f32, y: f32) {
    input.handle(
        store,
        InputEvent::PointerDown {
            pos: Pos2::new(x, y),
            modifiers: Modifiers::NONE,
        },
    );
}

fn move_to(input: &mut TimelineInput, store: &mut ClipStore, x: f32, y: f32) {
    input.handle(store, InputEvent::PointerMove { pos: Pos2::new(x, y) });
}

fn up(input: &mut TimelineInput, store: &mut ClipStore, x: f32, y: f32) {
    input.handle(store, InputEvent::PointerUp { pos: Pos2::new(x, y) });
}

fn press_key(input: &mut TimelineInput, store: &mut ClipStore, key: Key, modifiers: Modifiers) -> bool {
    input
        .handle(store, InputEvent::Key { key, modifiers })
        .handled
}

// ── Commit on release ──────────────────────────────────────────

#[test]
fn clip_drag_commits_once_on_release() {
    let config = config();
    let (mut store, id) = single_clip(&config);
    let mut input = focused_input(&mut store, DragController::new());
    let revision = store.revision();

    down(&mut input, &mut store, 250.0, LANE_Y);
    for x in [300.0, 350.0, 400.0] {
        move_to(&mut input, &mut store, x, LANE_Y);
        assert_eq!(store.revision(), revision);
    }
    let clip = store.clip(id).unwrap().clone();
    assert_eq!(clip.timeline_position, 0.0);
    assert_eq!(
        input.drag().preview_for(&clip).unwrap().timeline_position,
        3.0
    );
    assert!(store.state().manual_interaction);

    up(&mut input, &mut store, 400.0, LANE_Y);
    assert_eq!(store.revision(), revision + 1);
    assert_eq!(store.clip(id).unwrap().timeline_position, 3.0);
    assert!(!store.state().manual_interaction);

    // One gesture, one undo step
    assert!(press_key(&mut input, &mut store, Key::Z, Modifiers::CMD));
    assert_eq!(store.clip(id).unwrap().timeline_position, 0.0);
    assert!(!store.can_undo());
}

#[test]
fn trim_end_drag_through_hovered_handle() {
    let config = config();
    let (mut store, id) = single_clip(&config);
    let mut input = focused_input(&mut store, DragController::new());

    // Hovering reveals the handles, then press on the end edge
    move_to(&mut input, &mut store, 480.0, LANE_Y);
    down(&mut input, &mut store, 500.0, LANE_Y);
    assert!(matches!(input.drag().state(), DragState::DraggingTrimEnd(_)));
    assert!(store.state().active_trim_handle.is_some());

    move_to(&mut input, &mut store, 400.0, LANE_Y);
    assert_eq!(store.clip(id).unwrap().trim_end, 10.0);

    up(&mut input, &mut store, 400.0, LANE_Y);
    let clip = store.clip(id).unwrap();
    assert_eq!((clip.trim_start, clip.trim_end), (0.0, 8.0));
    assert_eq!(store.state().active_trim_handle, None);
}

#[test]
fn trim_start_drag_keeps_min_gap() {
    let config = config();
    let (mut store, id) = single_clip(&config);
    store.dispatch(Operation::SetTrimMode(true));
    let mut input = focused_input(&mut store, DragController::new());

    down(&mut input, &mut store, 0.0, LANE_Y);
    assert!(matches!(
        input.drag().state(),
        DragState::DraggingTrimStart(_)
    ));
    // Far past the end edge
    move_to(&mut input, &mut store, 2000.0, LANE_Y);
    up(&mut input, &mut store, 2000.0, LANE_Y);

    let clip = store.clip(id).unwrap();
    assert!((clip.trim_end - clip.trim_start - config.min_trim_gap).abs() < 1e-9);
    assert_eq!(clip.trim_end, 10.0);
}

// ── Gesture edge cases ─────────────────────────────────────────

#[test]
fn clip_removed_mid_drag_commits_nothing() {
    let config = config();
    let (mut store, id) = single_clip(&config);
    let capture = PointerCapture::new();
    let mut input = focused_input(&mut store, DragController::with_capture(capture.clone()));

    down(&mut input, &mut store, 250.0, LANE_Y);
    move_to(&mut input, &mut store, 400.0, LANE_Y);
    store.dispatch(Operation::RemoveClip(id));
    let revision = store.revision();

    up(&mut input, &mut store, 400.0, LANE_Y);
    assert!(store.clips().is_empty());
    assert_eq!(store.revision(), revision);
    assert!(!input.drag().is_dragging());
    assert!(!capture.is_captured());
}

#[test]
fn only_one_drag_across_timelines() {
    let config = config();
    let capture = PointerCapture::new();
    let (mut store_a, id_a) = single_clip(&config);
    let (mut store_b, id_b) = single_clip(&config);
    let mut input_a = focused_input(&mut store_a, DragController::with_capture(capture.clone()));
    let mut input_b = focused_input(&mut store_b, DragController::with_capture(capture.clone()));

    down(&mut input_a, &mut store_a, 100.0, LANE_Y);
    assert!(input_a.drag().is_dragging());

    down(&mut input_b, &mut store_b, 100.0, LANE_Y);
    assert!(!input_b.drag().is_dragging());
    move_to(&mut input_b, &mut store_b, 300.0, LANE_Y);
    up(&mut input_b, &mut store_b, 300.0, LANE_Y);
    assert_eq!(store_b.clip(id_b).unwrap().timeline_position, 0.0);

    up(&mut input_a, &mut store_a, 100.0, LANE_Y);
    assert!(!capture.is_captured());

    down(&mut input_b, &mut store_b, 100.0, LANE_Y);
    assert!(input_b.drag().is_dragging());
    move_to(&mut input_b, &mut store_b, 200.0, LANE_Y);
    up(&mut input_b, &mut store_b, 200.0, LANE_Y);
    assert_eq!(store_b.clip(id_b).unwrap().timeline_position, 2.0);
    assert_eq!(store_a.clip(id_a).unwrap().timeline_position, 0.0);
}

#[test]
fn escape_discards_trim_in_progress() {
    let config = config();
    let (mut store, id) = single_clip(&config);
    store.dispatch(Operation::SetTrimMode(true));
    let mut input = focused_input(&mut store, DragController::new());

    down(&mut input, &mut store, 500.0, LANE_Y);
    move_to(&mut input, &mut store, 300.0, LANE_Y);
    assert!(press_key(&mut input, &mut store, Key::Escape, Modifiers::NONE));

    assert!(!input.drag().is_dragging());
    assert_eq!(store.clip(id).unwrap().trim_end, 10.0);
    assert!(!store.state().trim_mode);
    assert!(!store.can_undo());

    // Release after cancel is harmless
    up(&mut input, &mut store, 300.0, LANE_Y);
    assert_eq!(store.clip(id).unwrap().trim_end, 10.0);
}

#[test]
fn keys_ignored_without_focus_or_while_typing() {
    let config = config();
    let (mut store, _) = single_clip(&config);
    let mut input = TimelineInput::new(&config);

    assert!(!press_key(&mut input, &mut store, Key::Space, Modifiers::NONE));
    assert!(!store.state().is_playing);

    input.handle(&mut store, InputEvent::FocusChanged(true));
    input.set_text_input_focused(true);
    assert!(!press_key(&mut input, &mut store, Key::Space, Modifiers::NONE));

    input.set_text_input_focused(false);
    assert!(press_key(&mut input, &mut store, Key::Space, Modifiers::NONE));
    assert!(store.state().is_playing);
}

#[test]
fn ruler_scrub_snaps_to_grid() {
    let config = TimelineConfig::default();
    let (mut store, _) = single_clip(&config);
    let mut input = focused_input(&mut store, DragController::new());

    down(&mut input, &mut store, 120.0, RULER_Y);
    assert_eq!(store.state().current_time, 2.0);
    move_to(&mut input, &mut store, 262.0, RULER_Y);
    assert_eq!(store.state().current_time, 5.0);
    up(&mut input, &mut store, 262.0, RULER_Y);
    assert!(!store.state().manual_interaction);
}

#[test]
fn command_wheel_zooms_around_cursor() {
    let config = config();
    let (mut store, _) = single_clip(&config);
    let mut input = focused_input(&mut store, DragController::new());

    let handled = input
        .handle(
            &mut store,
            InputEvent::Wheel {
                pos: Pos2::new(200.0, LANE_Y),
                delta: 1.0,
                modifiers: Modifiers::CMD,
            },
        )
        .handled;
    assert!(handled);
    assert!((store.state().zoom_level - config.zoom_step).abs() < 1e-9);
    // 4 s was under the cursor and stays there
    let pps = input.geometry(&store).mapper.pixels_per_second();
    assert!((4.0 * pps - input.scroll_left() - 200.0).abs() < 1e-6);
}

// ── Hosted in egui ─────────────────────────────────────────────

fn egui_button(x: f32, y: f32, pressed: bool) -> egui::Event {
    egui::Event::PointerButton {
        pos: Pos2::new(x, y),
        button: egui::PointerButton::Primary,
        pressed,
        modifiers: egui::Modifiers::NONE,
    }
}

#[test]
fn drag_follows_pointer_past_panel_edge() {
    let config = config();
    let (mut store, id) = single_clip(&config);
    let mut input = focused_input(&mut store, DragController::new());
    // Panel at (100, 200), 800 x 300 on screen
    let area = egui::Rect::from_min_size(Pos2::new(100.0, 200.0), egui::vec2(800.0, 300.0));
    let mut adapter = EguiInputAdapter::new(area);

    adapter.feed(
        &[
            egui::Event::PointerMoved(Pos2::new(200.0, 260.0)),
            egui_button(200.0, 260.0, true),
            egui::Event::PointerMoved(Pos2::new(600.0, 260.0)),
            egui::Event::PointerMoved(Pos2::new(1100.0, 260.0)),
        ],
        &mut input,
        &mut store,
    );
    assert!(input.drag().is_dragging());
    let clip = store.clip(id).unwrap();
    assert_eq!(input.drag().preview_for(clip).unwrap().timeline_position, 18.0);

    adapter.feed(&[egui_button(1100.0, 260.0, false)], &mut input, &mut store);
    assert_eq!(store.clip(id).unwrap().timeline_position, 18.0);
    assert!(!store.state().manual_interaction);

    // Back to hover: the first move outside reports the leave
    adapter.feed(
        &[egui::Event::PointerMoved(Pos2::new(1150.0, 260.0))],
        &mut input,
        &mut store,
    );
    assert_eq!(input.hover_target(), HitTarget::Empty);
}

#[test]
fn hover_outside_panel_is_dropped() {
    let config = config();
    let (mut store, id) = single_clip(&config);
    let mut input = focused_input(&mut store, DragController::new());
    let area = egui::Rect::from_min_size(Pos2::new(0.0, 0.0), egui::vec2(800.0, 300.0));
    let mut adapter = EguiInputAdapter::new(area);

    adapter.feed(
        &[egui::Event::PointerMoved(Pos2::new(100.0, LANE_Y))],
        &mut input,
        &mut store,
    );
    assert_eq!(input.hover_target(), HitTarget::ClipBody(id));

    let response = adapter.feed(
        &[egui::Event::PointerMoved(Pos2::new(900.0, LANE_Y))],
        &mut input,
        &mut store,
    );
    assert!(response.is_some());
    assert_eq!(input.hover_target(), HitTarget::Empty);
    assert!(adapter
        .feed(
            &[egui::Event::PointerMoved(Pos2::new(950.0, LANE_Y))],
            &mut input,
            &mut store,
        )
        .is_none());
    assert_eq!(store.clip(id).unwrap().timeline_position, 0.0);
}

// ── Gestures and playback ──────────────────────────────────────

#[test]
fn scrubbing_overrides_media_time_updates() {
    let config = config();
    let (mut store, _) = single_clip(&config);
    let mut media = SimulatedMediaElement::new().with_source("a.mp4", 10.0);
    let mut sync = PlaybackSynchronizer::new();
    let mut input = focused_input(&mut store, DragController::new());

    store.dispatch(Operation::SetPlaying(true));
    sync.tick(&mut store, &mut media);
    sync.pump(&mut store, &mut media);
    assert!(!media.is_paused());

    down(&mut input, &mut store, 300.0, RULER_Y);
    assert_eq!(store.state().current_time, 6.0);

    // The element keeps reporting its own clock while the user scrubs
    media.advance(0.5);
    sync.pump(&mut store, &mut media);
    assert_eq!(store.state().current_time, 6.0);

    up(&mut input, &mut store, 300.0, RULER_Y);
    sync.tick(&mut store, &mut media);
    assert_eq!(media.current_time(), 6.0);
    assert_eq!(media.seeks(), &[6.0]);
}
