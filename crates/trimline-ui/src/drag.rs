//! Drag gestures on the timeline: moving clips, trimming them, scrubbing.
//!
//! While a drag is in progress the candidate value lives only in the
//! controller's preview; the store is mutated exactly once, on release.
//! Entering a drag takes the pointer capture and raises the store's
//! manual-interaction flag; returning to idle gives both back.

use tracing::{debug, info};
use trimline_timeline::{
    Clip, ClipId, ClipStore, GeometryMapper, Operation, SnapEngine, TrimEdge, TrimHandle,
};

use crate::capture::{CaptureGuard, PointerCapture};

/// Clip move in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipDrag {
    pub clip_id: ClipId,
    pub start_pointer_x: f64,
    pub start_position: f64,
    /// Candidate timeline position.
    pub preview: f64,
}

/// Trim in progress.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrimDrag {
    pub clip_id: ClipId,
    /// Pixel x where source time zero sits, fixed at press time.
    pub source_origin_px: f64,
    pub source_duration: f64,
    /// Candidate `(trim_start, trim_end)`.
    pub preview: (f64, f64),
}

/// Gesture state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    DraggingClip(ClipDrag),
    DraggingTrimStart(TrimDrag),
    DraggingTrimEnd(TrimDrag),
    /// Seeking by dragging on the ruler or empty track area.
    Scrubbing,
}

/// Values a renderer should draw for a clip being dragged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPreview {
    pub timeline_position: f64,
    pub trim_start: f64,
    pub trim_end: f64,
}

/// Gesture state machine for one timeline view.
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
    capture: PointerCapture,
    guard: Option<CaptureGuard>,
    hovered: Option<ClipId>,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller sharing a capture with other controllers; at most one of
    /// them can drag at a time.
    pub fn with_capture(capture: PointerCapture) -> Self {
        Self {
            capture,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state != DragState::Idle
    }

    pub fn hovered(&self) -> Option<ClipId> {
        self.hovered
    }

    // ── Hover ────────────────────────────────────────────────────

    pub fn pointer_enter_clip(&mut self, clip_id: ClipId) {
        self.hovered = Some(clip_id);
    }

    pub fn pointer_leave_clip(&mut self, clip_id: ClipId) {
        if self.hovered == Some(clip_id) {
            self.hovered = None;
        }
    }

    // ── Press ────────────────────────────────────────────────────

    /// Press on a clip body. Selects the clip and, outside trim mode, starts
    /// moving it.
    pub fn pointer_down_on_clip(
        &mut self,
        store: &mut ClipStore,
        clip_id: ClipId,
        pointer_x: f64,
        additive: bool,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(clip) = store.clip(clip_id) else {
            return false;
        };
        let start_position = clip.timeline_position;
        // A press refused by the capture must leave the selection alone
        if self.capture.is_captured() {
            debug!(clip = %clip_id, "pointer captured elsewhere, press ignored");
            return false;
        }

        store.dispatch(Operation::SelectClip {
            id: clip_id,
            additive,
        });
        if store.state().trim_mode {
            return false;
        }

        if !self.begin(store) {
            return false;
        }
        self.state = DragState::DraggingClip(ClipDrag {
            clip_id,
            start_pointer_x: pointer_x,
            start_position,
            preview: start_position,
        });
        info!(clip = %clip_id, "clip drag started");
        true
    }

    /// Press on a trim handle. Ignored unless the handle is visible.
    pub fn pointer_down_on_handle(
        &mut self,
        store: &mut ClipStore,
        mapper: &GeometryMapper,
        clip_id: ClipId,
        edge: TrimEdge,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }
        let Some(clip) = store.clip(clip_id) else {
            return false;
        };
        let state = store.state();
        let visible = state.trim_mode
            || self.hovered == Some(clip_id)
            || state.active_trim_handle.is_some_and(|h| h.clip_id == clip_id);
        if !visible {
            debug!(clip = %clip_id, "press on hidden trim handle ignored");
            return false;
        }

        let drag = TrimDrag {
            clip_id,
            source_origin_px: mapper.time_to_pixels(clip.timeline_position - clip.trim_start),
            source_duration: clip.source_duration,
            preview: (clip.trim_start, clip.trim_end),
        };
        if !self.begin(store) {
            return false;
        }
        store.dispatch(Operation::SetActiveTrimHandle(Some(TrimHandle { clip_id, edge })));
        self.state = match edge {
            TrimEdge::Start => DragState::DraggingTrimStart(drag),
            TrimEdge::End => DragState::DraggingTrimEnd(drag),
        };
        info!(clip = %clip_id, ?edge, "trim drag started");
        true
    }

    /// Press on the ruler or empty track area: seek there and keep seeking
    /// while the pointer moves.
    pub fn pointer_down_on_empty(
        &mut self,
        store: &mut ClipStore,
        mapper: &GeometryMapper,
        pointer_x: f64,
        additive: bool,
    ) -> bool {
        if self.is_dragging() {
            return false;
        }
        if !self.begin(store) {
            return false;
        }
        if !additive {
            store.dispatch(Operation::ClearSelection);
        }
        store.dispatch(Operation::SeekTo(mapper.pixels_to_time(pointer_x)));
        self.state = DragState::Scrubbing;
        true
    }

    // ── Move ─────────────────────────────────────────────────────

    /// Update the preview. Never touches clip data.
    pub fn pointer_move(&mut self, store: &mut ClipStore, mapper: &GeometryMapper, pointer_x: f64) {
        let snap = SnapEngine::from_state(store.state());
        let min_gap = store.config().min_trim_gap;

        match &mut self.state {
            DragState::Idle => {}
            DragState::DraggingClip(drag) => {
                let delta = mapper.pixels_to_time(pointer_x - drag.start_pointer_x);
                drag.preview = snap.apply((drag.start_position + delta).max(0.0));
            }
            DragState::DraggingTrimStart(drag) => {
                let t = trim_candidate(drag, mapper, pointer_x, &snap);
                let end = drag.preview.1;
                drag.preview.0 = t.min(end - min_gap).max(0.0);
            }
            DragState::DraggingTrimEnd(drag) => {
                let t = trim_candidate(drag, mapper, pointer_x, &snap);
                let start = drag.preview.0;
                drag.preview.1 = t.max(start + min_gap).min(drag.source_duration);
            }
            DragState::Scrubbing => {
                store.dispatch(Operation::SeekTo(mapper.pixels_to_time(pointer_x)));
            }
        }
    }

    // ── Release ──────────────────────────────────────────────────

    /// Commit the preview with a single store mutation and return to idle.
    pub fn pointer_up(&mut self, store: &mut ClipStore) {
        match std::mem::take(&mut self.state) {
            DragState::Idle => {
                // Stale handle from a press that never became a drag
                store.dispatch(Operation::SetActiveTrimHandle(None));
                return;
            }
            DragState::DraggingClip(drag) => {
                let result = store.dispatch(Operation::UpdateClipPosition {
                    id: drag.clip_id,
                    position: drag.preview,
                });
                info!(clip = %drag.clip_id, position = drag.preview, applied = result.applied(), "clip drag committed");
            }
            DragState::DraggingTrimStart(drag) | DragState::DraggingTrimEnd(drag) => {
                let result = store.dispatch(Operation::UpdateClipTrim {
                    id: drag.clip_id,
                    trim_start: drag.preview.0,
                    trim_end: drag.preview.1,
                });
                info!(clip = %drag.clip_id, trim = ?drag.preview, applied = result.applied(), "trim committed");
            }
            DragState::Scrubbing => {}
        }
        store.dispatch(Operation::SetActiveTrimHandle(None));
        self.end(store);
    }

    /// The pointer left the timeline. During a drag the capture keeps
    /// delivering events, so this only matters when idle.
    pub fn pointer_leave(&mut self, store: &mut ClipStore) {
        if self.is_dragging() {
            return;
        }
        self.hovered = None;
        self.pointer_up(store);
    }

    /// Abort the gesture: trims are discarded, clip moves commit their
    /// preview. Returns whether a drag was active.
    pub fn cancel(&mut self, store: &mut ClipStore) -> bool {
        match self.state {
            DragState::Idle => false,
            DragState::DraggingClip(_) => {
                self.pointer_up(store);
                true
            }
            DragState::DraggingTrimStart(drag) | DragState::DraggingTrimEnd(drag) => {
                info!(clip = %drag.clip_id, "trim drag cancelled");
                self.state = DragState::Idle;
                store.dispatch(Operation::SetActiveTrimHandle(None));
                self.end(store);
                true
            }
            DragState::Scrubbing => {
                self.state = DragState::Idle;
                self.end(store);
                true
            }
        }
    }

    // ── Preview ──────────────────────────────────────────────────

    /// Preview values for a clip, if it is the one being dragged.
    pub fn preview_for(&self, clip: &Clip) -> Option<ClipPreview> {
        match self.state {
            DragState::DraggingClip(drag) if drag.clip_id == clip.id => Some(ClipPreview {
                timeline_position: drag.preview,
                trim_start: clip.trim_start,
                trim_end: clip.trim_end,
            }),
            DragState::DraggingTrimStart(drag) | DragState::DraggingTrimEnd(drag)
                if drag.clip_id == clip.id =>
            {
                Some(ClipPreview {
                    timeline_position: clip.timeline_position,
                    trim_start: drag.preview.0,
                    trim_end: drag.preview.1,
                })
            }
            _ => None,
        }
    }

    // ── Capture lifecycle ────────────────────────────────────────

    fn begin(&mut self, store: &mut ClipStore) -> bool {
        let Some(guard) = self.capture.try_acquire() else {
            debug!("pointer already captured, drag not started");
            return false;
        };
        self.guard = Some(guard);
        store.dispatch(Operation::SetManualInteraction(true));
        true
    }

    fn end(&mut self, store: &mut ClipStore) {
        self.guard = None;
        store.dispatch(Operation::SetManualInteraction(false));
    }
}

/// Source time under the pointer, clamped to the source and snapped.
fn trim_candidate(drag: &TrimDrag, mapper: &GeometryMapper, pointer_x: f64, snap: &SnapEngine) -> f64 {
    let t = mapper
        .pixels_to_time(pointer_x - drag.source_origin_px)
        .clamp(0.0, drag.source_duration);
    snap.apply(t)
}
