//! Trimline - headless timeline driver
//!
//! Loads a session (or builds a demo timeline), runs a scripted editing
//! gesture through the input layer, then plays the timeline against a
//! simulated media element until playback stops.
//!
//! Usage: `trimline [SESSION.json] [--save OUT.json] [--keys]`

use anyhow::{Context, Result};
use egui::Pos2;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use trimline_core::{format_timecode, TimelineConfig};
use trimline_playback::{PlaybackSynchronizer, SimulatedMediaElement};
use trimline_timeline::{Clip, ClipStore, Operation, SessionFile};
use trimline_ui::{InputEvent, Key, Modifiers, TimelineInput};

/// Simulated wall-clock step per playback tick.
const TICK_SECONDS: f64 = 0.25;

/// Upper bound on ticks so a misbehaving session cannot spin forever.
const MAX_TICKS: usize = 100_000;

struct Args {
    session: Option<PathBuf>,
    save: Option<PathBuf>,
    /// List the keyboard shortcuts before running.
    keys: bool,
}

fn parse_args() -> Result<Args> {
    let mut args = Args {
        session: None,
        save: None,
        keys: false,
    };
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--save" => {
                let path = iter.next().context("--save needs a file path")?;
                args.save = Some(PathBuf::from(path));
            }
            "--keys" => args.keys = true,
            _ => args.session = Some(PathBuf::from(arg)),
        }
    }
    Ok(args)
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Trimline starting...");

    let args = parse_args()?;
    let config = load_config()?;
    if args.keys {
        list_shortcuts(&config);
    }

    let mut store = match &args.session {
        Some(path) => SessionFile::load_from_file(path)
            .with_context(|| format!("failed to load session {}", path.display()))?
            .into_store(config.clone()),
        None => demo_store(config.clone()),
    };
    report_layout(&store);

    run_gesture(&mut store, &config);
    report_layout(&store);

    play(&mut store);

    if let Some(path) = &args.save {
        SessionFile::capture(&store)
            .save_to_file(path)
            .with_context(|| format!("failed to save session {}", path.display()))?;
        info!(path = %path.display(), "session saved");
    }

    Ok(())
}

/// `<config dir>/trimline/config.json` if present, defaults otherwise.
fn load_config() -> Result<TimelineConfig> {
    let Some(path) = dirs::config_dir().map(|dir| dir.join("trimline").join("config.json")) else {
        return Ok(TimelineConfig::default());
    };
    if !path.exists() {
        return Ok(TimelineConfig::default());
    }
    let config = TimelineConfig::load_from_file(&path)
        .with_context(|| format!("invalid config {}", path.display()))?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}

fn list_shortcuts(config: &TimelineConfig) {
    let input = TimelineInput::new(config);
    for (shortcut, name) in input.keyboard().registry().help_entries() {
        info!(%shortcut, name, "shortcut");
    }
}

fn demo_store(config: TimelineConfig) -> ClipStore {
    let gap = config.min_trim_gap;
    let mut store = ClipStore::new(config);
    store.dispatch(Operation::AddClip(Clip::new("Intro", "intro.mp4", 10.0, gap)));
    store.dispatch(Operation::AddClip(Clip::new("Interview", "interview.mp4", 5.0, gap)));
    store.dispatch(Operation::AddClipAt {
        clip: Clip::new("B-roll", "broll.mp4", 10.0, gap),
        position: 5.0,
    });
    store
}

fn report_layout(store: &ClipStore) {
    let geometry = trimline_timeline::render::compute(store, store.config().default_container_width);
    info!(
        clips = store.clips().len(),
        lanes = geometry.lane_count(),
        duration = %format_timecode(store.state().total_duration),
        "timeline layout"
    );
    for clip in store.clips() {
        let lane = geometry.layout.lane_of(clip.id).unwrap_or(0);
        info!(
            lane,
            name = %clip.name,
            start = %format_timecode(clip.timeline_position),
            end = %format_timecode(clip.timeline_end()),
            "clip"
        );
    }
}

/// Drag the first clip's body one second to the right, then undo it with
/// the keyboard and redo it again.
fn run_gesture(store: &mut ClipStore, config: &TimelineConfig) {
    let mut input = TimelineInput::new(config);
    input.handle(store, InputEvent::FocusChanged(true));

    let Some(placement) = input.geometry(store).placements().first().copied() else {
        warn!("empty timeline, skipping gesture");
        return;
    };
    let layout = *input.layout();
    let rect = layout.clip_rect(&placement);
    let press = rect.center();
    let pps = input.geometry(store).mapper.pixels_per_second() as f32;
    let release = Pos2::new(press.x + pps, press.y);

    input.handle(store, InputEvent::PointerMove { pos: press });
    debug!(hit = ?input.hover_target(), cursor = ?input.cursor(), "hovering first clip");
    input.handle(
        store,
        InputEvent::PointerDown {
            pos: press,
            modifiers: Modifiers::NONE,
        },
    );
    input.handle(store, InputEvent::PointerMove { pos: release });
    input.handle(store, InputEvent::PointerUp { pos: release });

    let keys = [
        (Key::Z, Modifiers::CMD),
        (Key::Z, Modifiers::CMD_SHIFT),
        (Key::Home, Modifiers::NONE),
    ];
    for (key, modifiers) in keys {
        input.handle(store, InputEvent::Key { key, modifiers });
    }
    info!(can_undo = store.can_undo(), "gesture finished");
}

/// Play from the start until playback stops on its own.
fn play(store: &mut ClipStore) {
    let mut media = store
        .clips()
        .iter()
        .fold(SimulatedMediaElement::new(), |media, clip| {
            media.with_source(clip.path.clone(), clip.source_duration)
        });
    let mut sync = PlaybackSynchronizer::new();

    store.dispatch(Operation::SeekTo(0.0));
    store.dispatch(Operation::ClearSelection);
    store.dispatch(Operation::SetPlaying(true));
    info!("playback started");

    let mut last_second = None;
    for _ in 0..MAX_TICKS {
        // The element runs on its own clock; its events are seen a frame later
        media.advance(TICK_SECONDS);
        sync.tick(store, &mut media);
        sync.pump(store, &mut media);
        if !store.state().is_playing {
            break;
        }

        let second = store.state().current_time.floor() as i64;
        if last_second != Some(second) && second % 5 == 0 {
            info!(time = %format_timecode(store.state().current_time), "playing");
        }
        last_second = Some(second);
    }

    debug!(
        loads = media.load_count(),
        discarded = media.discarded_events(),
        "media element summary"
    );
    if let Some(message) = sync.active_error_message() {
        warn!(%message, "playback stopped on error");
    }
    info!(time = %format_timecode(store.state().current_time), "playback finished");
}
