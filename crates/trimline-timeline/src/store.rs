//! The clip store: the single owner of clips and timeline state.
//!
//! Every mutation goes through [`ClipStore::dispatch`]. Clip edits are turned
//! into [`EditCommand`]s and recorded for undo; view and transport operations
//! mutate [`TimelineState`] directly. Geometry inputs are clamped, never
//! rejected, and operations naming a missing clip are no-ops.

use tracing::debug;
use trimline_core::{limits, Result, TimelineConfig};

use crate::clip::{Clip, ClipId, ClipStatus};
use crate::edit::{EditCommand, UndoStack};
use crate::session::ClipSource;
use crate::snapping::SnapEngine;
use crate::state::{clamp_zoom, Selection, TimelineState, TrimHandle, Viewport};

/// Direction for single-frame stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepDirection {
    Forward,
    Backward,
}

/// A typed store operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    // ── Clip edits (undoable) ──
    /// Append a clip after the current timeline end.
    AddClip(Clip),
    /// Add a clip at an explicit timeline position.
    AddClipAt { clip: Clip, position: f64 },
    RemoveClip(ClipId),
    UpdateClipPosition { id: ClipId, position: f64 },
    UpdateClipTrim { id: ClipId, trim_start: f64, trim_end: f64 },
    Undo,
    Redo,

    // ── Import pipeline ──
    SetClipStatus { id: ClipId, status: ClipStatus },

    // ── Selection ──
    SelectClip { id: ClipId, additive: bool },
    DeselectClip(ClipId),
    ClearSelection,
    /// Replace the set of clips picked for playback. Unknown ids are dropped.
    SetPlaybackSelection(Vec<ClipId>),

    // ── Transport ──
    /// Set the playhead, clamped but not snapped.
    SetCurrentTime(f64),
    /// Seek, snapping to the grid when enabled.
    SeekTo(f64),
    /// Seek relative to the playhead, snapping like `SeekTo`.
    SeekBy(f64),
    StepFrame(StepDirection),
    JumpToStart,
    JumpToEnd,
    SetPlaying(bool),
    TogglePlayback,
    SetPlaybackRate(f64),

    // ── Zoom & viewport ──
    SetZoom(f64),
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ZoomToFit,
    SetViewport { start: f64, end: f64 },
    PanViewport(f64),

    // ── Grid & trim ──
    SetSnapToGrid(bool),
    SetGridInterval(f64),
    SetTrimMode(bool),
    SetActiveTrimHandle(Option<TrimHandle>),
    SetManualInteraction(bool),

    /// Drop all clips and history and return to the initial state.
    Reset,
}

/// Outcome of a dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    /// The store changed.
    Applied,
    /// Nothing changed (missing clip, same value, or ignored request).
    NoOp,
}

impl Dispatch {
    pub fn applied(self) -> bool {
        self == Self::Applied
    }

    fn from_changed(changed: bool) -> Self {
        if changed {
            Self::Applied
        } else {
            Self::NoOp
        }
    }
}

/// Read-only view of the store.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub state: &'a TimelineState,
    pub clips: &'a [Clip],
    pub revision: u64,
}

/// Owner of the clip list and the authoritative timeline state.
#[derive(Debug)]
pub struct ClipStore {
    config: TimelineConfig,
    clips: Vec<Clip>,
    state: TimelineState,
    history: UndoStack,
    /// Bumped on every change to clip data.
    revision: u64,
}

impl ClipStore {
    /// Create an empty store.
    pub fn new(config: TimelineConfig) -> Self {
        let state = TimelineState::new(&config);
        let history = UndoStack::new(config.undo_depth);
        Self {
            config,
            clips: Vec::new(),
            state,
            history,
            revision: 0,
        }
    }

    /// Create a store seeded with clips from the persistence collaborator.
    /// Seeded clips are normalized but not recorded in the undo history.
    pub fn from_clips(config: TimelineConfig, clips: impl IntoIterator<Item = Clip>) -> Self {
        let mut store = Self::new(config);
        for clip in clips {
            if store.clip(clip.id).is_some() {
                debug!(clip = %clip.id, "duplicate clip id in seed list, skipping");
                continue;
            }
            let position = clip.timeline_position;
            let clip = store.normalized(clip, position);
            store.clips.push(clip);
        }
        store.after_clip_change();
        store
    }

    /// Create a store from a [`ClipSource`].
    pub fn load(config: TimelineConfig, source: &dyn ClipSource) -> Result<Self> {
        Ok(Self::from_clips(config, source.load_clips()?))
    }

    // ── Read access ──────────────────────────────────────────────

    pub fn state(&self) -> &TimelineState {
        &self.state
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn config(&self) -> &TimelineConfig {
        &self.config
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.iter().find(|clip| clip.id == id)
    }

    /// Revision counter of the clip data.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            state: &self.state,
            clips: &self.clips,
            revision: self.revision,
        }
    }

    /// End of the last clip on the timeline, or zero when empty.
    pub fn timeline_end(&self) -> f64 {
        self.clips
            .iter()
            .map(Clip::timeline_end)
            .fold(0.0, f64::max)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ── Mutation ─────────────────────────────────────────────────

    /// Apply one operation.
    pub fn dispatch(&mut self, op: Operation) -> Dispatch {
        match op {
            Operation::AddClip(clip) => {
                let position = self.timeline_end();
                self.add_clip(clip, position)
            }
            Operation::AddClipAt { clip, position } => self.add_clip(clip, position),
            Operation::RemoveClip(id) => {
                let removal = self
                    .clips
                    .iter()
                    .position(|clip| clip.id == id)
                    .and_then(|index| EditCommand::remove_at(&self.clips, index));
                match removal {
                    Some(cmd) => {
                        debug!(clip = %id, "remove clip");
                        self.execute(cmd)
                    }
                    None => missing(id, "remove"),
                }
            }
            Operation::UpdateClipPosition { id, position } => self.move_clip(id, position),
            Operation::UpdateClipTrim {
                id,
                trim_start,
                trim_end,
            } => self.trim_clip(id, trim_start, trim_end),
            Operation::Undo => match self.history.undo() {
                Some(cmd) => {
                    cmd.apply(&mut self.clips);
                    self.after_clip_change();
                    debug!("undo");
                    Dispatch::Applied
                }
                None => Dispatch::NoOp,
            },
            Operation::Redo => match self.history.redo() {
                Some(cmd) => {
                    cmd.apply(&mut self.clips);
                    self.after_clip_change();
                    debug!("redo");
                    Dispatch::Applied
                }
                None => Dispatch::NoOp,
            },
            Operation::SetClipStatus { id, status } => {
                match self.clips.iter_mut().find(|clip| clip.id == id) {
                    Some(clip) if clip.status != status => {
                        clip.status = status;
                        self.revision += 1;
                        Dispatch::Applied
                    }
                    Some(_) => Dispatch::NoOp,
                    None => missing(id, "set status"),
                }
            }
            Operation::SelectClip { id, additive } => {
                if self.clip(id).is_none() {
                    return missing(id, "select");
                }
                let before = self.state.selected_clip_ids.clone();
                if !additive {
                    self.state.selected_clip_ids.clear();
                }
                if !self.state.selected_clip_ids.contains(&id) {
                    self.state.selected_clip_ids.push(id);
                }
                Dispatch::from_changed(before != self.state.selected_clip_ids)
            }
            Operation::DeselectClip(id) => {
                let before = self.state.selected_clip_ids.len();
                self.state.selected_clip_ids.retain(|s| *s != id);
                Dispatch::from_changed(before != self.state.selected_clip_ids.len())
            }
            Operation::ClearSelection => {
                let changed = !self.state.selected_clip_ids.is_empty();
                self.state.selected_clip_ids.clear();
                Dispatch::from_changed(changed)
            }
            Operation::SetPlaybackSelection(ids) => {
                let mut picked = Selection::new();
                for id in ids {
                    if self.clip(id).is_some() && !picked.contains(&id) {
                        picked.push(id);
                    }
                }
                let changed = picked != self.state.playback_clip_ids;
                self.state.playback_clip_ids = picked;
                Dispatch::from_changed(changed)
            }
            Operation::SetCurrentTime(time) => self.set_time(time),
            Operation::SeekTo(time) => {
                let snapped = SnapEngine::from_state(&self.state).apply(time);
                self.set_time(snapped)
            }
            Operation::SeekBy(delta) => {
                let target = self.state.current_time + delta;
                self.dispatch(Operation::SeekTo(target))
            }
            Operation::StepFrame(direction) => {
                let step = self.config.frame_duration();
                let delta = match direction {
                    StepDirection::Forward => step,
                    StepDirection::Backward => -step,
                };
                self.set_time(self.state.current_time + delta)
            }
            Operation::JumpToStart => self.set_time(0.0),
            Operation::JumpToEnd => self.set_time(self.state.total_duration),
            Operation::SetPlaying(playing) => {
                let changed = self.state.is_playing != playing;
                self.state.is_playing = playing;
                Dispatch::from_changed(changed)
            }
            Operation::TogglePlayback => {
                self.state.is_playing = !self.state.is_playing;
                Dispatch::Applied
            }
            Operation::SetPlaybackRate(rate) => {
                let rate = if rate.is_finite() {
                    rate.clamp(limits::MIN_PLAYBACK_RATE, limits::MAX_PLAYBACK_RATE)
                } else {
                    1.0
                };
                self.set_f64(|s| &mut s.playback_rate, rate)
            }
            Operation::SetZoom(zoom) => self.set_f64(|s| &mut s.zoom_level, clamp_zoom(zoom)),
            Operation::ZoomIn => {
                let zoom = clamp_zoom(self.state.zoom_level * self.config.zoom_step);
                self.set_f64(|s| &mut s.zoom_level, zoom)
            }
            Operation::ZoomOut => {
                let zoom = clamp_zoom(self.state.zoom_level / self.config.zoom_step);
                self.set_f64(|s| &mut s.zoom_level, zoom)
            }
            Operation::ResetZoom => self.set_f64(|s| &mut s.zoom_level, 1.0),
            Operation::ZoomToFit => {
                let viewport = Viewport::new(0.0, self.state.total_duration);
                let changed = viewport != self.state.viewport || self.state.zoom_level != 1.0;
                self.state.viewport = viewport;
                self.state.zoom_level = 1.0;
                Dispatch::from_changed(changed)
            }
            Operation::SetViewport { start, end } => self.set_viewport(Viewport::new(start, end)),
            Operation::PanViewport(delta) => {
                let viewport = self.state.viewport.panned(delta, self.state.total_duration);
                self.set_viewport(viewport)
            }
            Operation::SetSnapToGrid(enabled) => {
                let changed = self.state.snap_to_grid != enabled;
                self.state.snap_to_grid = enabled;
                Dispatch::from_changed(changed)
            }
            Operation::SetGridInterval(interval) => {
                let interval = if interval.is_finite() {
                    interval.max(limits::MIN_GRID_INTERVAL)
                } else {
                    self.state.grid_interval
                };
                self.set_f64(|s| &mut s.grid_interval, interval)
            }
            Operation::SetTrimMode(enabled) => {
                let before = (self.state.trim_mode, self.state.active_trim_handle);
                self.state.trim_mode = enabled;
                if !enabled && !self.state.manual_interaction {
                    self.state.active_trim_handle = None;
                }
                Dispatch::from_changed(before != (self.state.trim_mode, self.state.active_trim_handle))
            }
            Operation::SetActiveTrimHandle(handle) => self.set_trim_handle(handle),
            Operation::SetManualInteraction(active) => {
                let before = (self.state.manual_interaction, self.state.active_trim_handle);
                self.state.manual_interaction = active;
                if !active && !self.state.trim_mode {
                    self.state.active_trim_handle = None;
                }
                Dispatch::from_changed(
                    before != (self.state.manual_interaction, self.state.active_trim_handle),
                )
            }
            Operation::Reset => {
                self.clips.clear();
                self.state = TimelineState::new(&self.config);
                self.history.clear();
                self.revision += 1;
                debug!("timeline reset");
                Dispatch::Applied
            }
        }
    }

    // ── Clip edits ───────────────────────────────────────────────

    fn add_clip(&mut self, clip: Clip, position: f64) -> Dispatch {
        if self.clip(clip.id).is_some() {
            debug!(clip = %clip.id, "clip already on the timeline");
            return Dispatch::NoOp;
        }
        let clip = self.normalized(clip, position);
        debug!(clip = %clip.id, position = clip.timeline_position, "add clip");
        self.execute(EditCommand::InsertClip {
            index: self.clips.len(),
            clip,
        })
    }

    fn move_clip(&mut self, id: ClipId, position: f64) -> Dispatch {
        let Some(clip) = self.clip(id) else {
            return missing(id, "move");
        };
        let from = clip.timeline_position;
        let to = if position.is_finite() {
            position.max(0.0)
        } else {
            from
        };
        if to == from {
            return Dispatch::NoOp;
        }
        debug!(clip = %id, from, to, "move clip");
        self.execute(EditCommand::MoveClip { id, from, to })
    }

    fn trim_clip(&mut self, id: ClipId, trim_start: f64, trim_end: f64) -> Dispatch {
        let Some(clip) = self.clip(id) else {
            return missing(id, "trim");
        };
        let from = (clip.trim_start, clip.trim_end);
        let to = clip.clamp_trim(trim_start, trim_end, self.config.min_trim_gap);
        if to == from {
            return Dispatch::NoOp;
        }
        debug!(clip = %id, ?from, ?to, "trim clip");
        self.execute(EditCommand::TrimClip { id, from, to })
    }

    fn execute(&mut self, cmd: EditCommand) -> Dispatch {
        if !cmd.apply(&mut self.clips) {
            return Dispatch::NoOp;
        }
        self.history.push(cmd);
        self.after_clip_change();
        Dispatch::Applied
    }

    /// Clamp a clip's fields into a valid state at the given position.
    fn normalized(&self, mut clip: Clip, position: f64) -> Clip {
        let gap = self.config.min_trim_gap;
        if !clip.source_duration.is_finite() || clip.source_duration < gap {
            clip.source_duration = gap;
        }
        let (start, end) = clip.clamp_trim(clip.trim_start, clip.trim_end, gap);
        clip.trim_start = start;
        clip.trim_end = end;
        clip.timeline_position = if position.is_finite() {
            position.max(0.0)
        } else {
            0.0
        };
        clip
    }

    /// Re-derive everything that depends on the clip set.
    fn after_clip_change(&mut self) {
        self.revision += 1;
        self.state.total_duration = self.timeline_end().max(self.config.min_timeline_duration);
        self.state.current_time = self.state.current_time.clamp(0.0, self.state.total_duration);

        let clips = &self.clips;
        let exists = |id: &ClipId| clips.iter().any(|clip| clip.id == *id);
        self.state.selected_clip_ids.retain(|id| exists(id));
        self.state.playback_clip_ids.retain(|id| exists(id));
        if let Some(handle) = self.state.active_trim_handle {
            if !exists(&handle.clip_id) {
                self.state.active_trim_handle = None;
            }
        }
    }

    // ── View helpers ─────────────────────────────────────────────

    fn set_time(&mut self, time: f64) -> Dispatch {
        let time = self.state.clamp_time(time);
        self.set_f64(|s| &mut s.current_time, time)
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Dispatch {
        let changed = viewport != self.state.viewport;
        self.state.viewport = viewport;
        Dispatch::from_changed(changed)
    }

    fn set_trim_handle(&mut self, handle: Option<TrimHandle>) -> Dispatch {
        if let Some(h) = handle {
            if !self.state.trim_mode && !self.state.manual_interaction {
                debug!(clip = %h.clip_id, "trim handle ignored outside trim mode");
                return Dispatch::NoOp;
            }
            if self.clip(h.clip_id).is_none() {
                return missing(h.clip_id, "activate trim handle");
            }
        }
        let changed = self.state.active_trim_handle != handle;
        self.state.active_trim_handle = handle;
        Dispatch::from_changed(changed)
    }

    fn set_f64(&mut self, field: impl FnOnce(&mut TimelineState) -> &mut f64, value: f64) -> Dispatch {
        let slot = field(&mut self.state);
        let changed = *slot != value;
        *slot = value;
        Dispatch::from_changed(changed)
    }
}

fn missing(id: ClipId, action: &str) -> Dispatch {
    debug!(clip = %id, action, "clip not found, ignoring");
    Dispatch::NoOp
}
