//! Input facade for one timeline view.
//!
//! [`TimelineInput`] owns everything a host needs to turn raw pointer, wheel
//! and key events into store operations: the render cache used for hit
//! testing, the drag controller, the keyboard dispatcher and the horizontal
//! scroll offset.

use egui::{CursorIcon, Pos2};
use tracing::trace;
use trimline_core::TimelineConfig;
use trimline_timeline::{ClipStore, GeometryMapper, Operation, RenderCache, RenderGeometry};

use crate::drag::DragController;
use crate::hit_test::{cursor_for, hit_test, HitTarget, TrackLayout};
use crate::keyboard::{Key, KeyboardDispatcher, Modifiers, ScrollRequest};

/// Engine-level input event. Positions are relative to the top-left of the
/// visible timeline area, before scrolling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Pos2, modifiers: Modifiers },
    PointerMove { pos: Pos2 },
    PointerUp { pos: Pos2 },
    /// The pointer left the timeline area.
    PointerLeave,
    /// Wheel with the command modifier zooms around the cursor, otherwise
    /// scrolls horizontally.
    Wheel {
        pos: Pos2,
        delta: f32,
        modifiers: Modifiers,
    },
    Key { key: Key, modifiers: Modifiers },
    FocusChanged(bool),
}

/// What the host should do after an event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputResponse {
    pub handled: bool,
    pub cursor: CursorIcon,
}

/// Pointer, wheel and keyboard handling for one timeline view.
#[derive(Debug)]
pub struct TimelineInput {
    drag: DragController,
    keyboard: KeyboardDispatcher,
    cache: RenderCache,
    layout: TrackLayout,
    container_width: f64,
    scroll_left: f64,
    hover_target: HitTarget,
    /// Playhead time the scroll offset was last reconciled with.
    followed_time: Option<f64>,
}

impl TimelineInput {
    pub fn new(config: &TimelineConfig) -> Self {
        Self::with_drag(config, DragController::new())
    }

    /// Use a drag controller that shares its pointer capture with others.
    pub fn with_drag(config: &TimelineConfig, drag: DragController) -> Self {
        Self {
            drag,
            keyboard: KeyboardDispatcher::new(),
            cache: RenderCache::new(),
            layout: TrackLayout {
                handle_width: config.trim_handle_width as f32,
                ..TrackLayout::default()
            },
            container_width: config.default_container_width,
            scroll_left: 0.0,
            hover_target: HitTarget::Empty,
            followed_time: None,
        }
    }

    pub fn drag(&self) -> &DragController {
        &self.drag
    }

    pub fn keyboard(&self) -> &KeyboardDispatcher {
        &self.keyboard
    }

    pub fn layout(&self) -> &TrackLayout {
        &self.layout
    }

    pub fn set_container_width(&mut self, width: f64) {
        self.container_width = width;
    }

    pub fn scroll_left(&self) -> f64 {
        self.scroll_left
    }

    pub fn set_scroll_left(&mut self, scroll_left: f64) {
        self.scroll_left = scroll_left.max(0.0);
    }

    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.keyboard.set_text_input_focused(focused);
    }

    pub fn hover_target(&self) -> HitTarget {
        self.hover_target
    }

    /// Current render geometry, from the cache.
    pub fn geometry(&mut self, store: &ClipStore) -> &RenderGeometry {
        self.cache.get(store, self.container_width)
    }

    fn mapper(&mut self, store: &ClipStore) -> GeometryMapper {
        self.geometry(store).mapper
    }

    fn content_pos(&self, pos: Pos2) -> Pos2 {
        Pos2::new(pos.x + self.scroll_left as f32, pos.y)
    }

    fn hit(&mut self, store: &ClipStore, pos: Pos2) -> HitTarget {
        let content = self.content_pos(pos);
        let hovered = self.drag.hovered();
        let layout = self.layout;
        let geometry = self.cache.get(store, self.container_width);
        hit_test(geometry, store.state(), &layout, hovered, content)
    }

    /// Handle one event.
    pub fn handle(&mut self, store: &mut ClipStore, event: InputEvent) -> InputResponse {
        let handled = match event {
            InputEvent::PointerDown { pos, modifiers } => {
                let target = self.hit(store, pos);
                let mapper = self.mapper(store);
                let x = self.content_pos(pos).x as f64;
                match target {
                    HitTarget::TrimHandle { clip_id, edge } => {
                        self.drag.pointer_down_on_handle(store, &mapper, clip_id, edge);
                    }
                    HitTarget::ClipBody(clip_id) => {
                        self.drag
                            .pointer_down_on_clip(store, clip_id, x, modifiers.is_additive());
                    }
                    HitTarget::Ruler | HitTarget::Empty => {
                        self.drag
                            .pointer_down_on_empty(store, &mapper, x, modifiers.command);
                    }
                }
                true
            }
            InputEvent::PointerMove { pos } => {
                if self.drag.is_dragging() {
                    let mapper = self.mapper(store);
                    let x = self.content_pos(pos).x as f64;
                    self.drag.pointer_move(store, &mapper, x);
                } else {
                    self.update_hover(store, pos);
                }
                self.drag.is_dragging()
            }
            InputEvent::PointerUp { .. } => {
                let was_dragging = self.drag.is_dragging();
                self.drag.pointer_up(store);
                was_dragging
            }
            InputEvent::PointerLeave => {
                self.drag.pointer_leave(store);
                if !self.drag.is_dragging() {
                    self.hover_target = HitTarget::Empty;
                }
                false
            }
            InputEvent::Wheel {
                pos,
                delta,
                modifiers,
            } => self.wheel(store, pos, delta, modifiers),
            InputEvent::Key { key, modifiers } => {
                let outcome = self.keyboard.key_down(key, modifiers, store, &mut self.drag);
                if let Some(ScrollRequest::CenterOn(time)) = outcome.scroll {
                    let mapper = self.mapper(store);
                    self.scroll_left = mapper.centered_scroll(time, self.container_width);
                    self.followed_time = Some(store.state().current_time);
                }
                outcome.handled
            }
            InputEvent::FocusChanged(focused) => {
                self.keyboard.set_timeline_focused(focused);
                false
            }
        };

        self.follow_playhead(store);
        InputResponse {
            handled,
            cursor: self.cursor(),
        }
    }

    /// Keep the playhead visible: when it has moved off screen since the
    /// last check, recentre on it. Suspended while dragging.
    pub fn follow_playhead(&mut self, store: &ClipStore) {
        let time = store.state().current_time;
        if self.drag.is_dragging() || self.followed_time == Some(time) {
            return;
        }
        self.followed_time = Some(time);
        let mapper = self.mapper(store);
        if let Some(scroll) = mapper.scroll_to_reveal(time, self.scroll_left, self.container_width) {
            trace!(time, scroll, "auto-scroll to playhead");
            self.scroll_left = scroll;
        }
    }

    /// Cursor for the current hover target.
    pub fn cursor(&self) -> CursorIcon {
        if self.drag.is_dragging() && matches!(self.hover_target, HitTarget::ClipBody(_)) {
            CursorIcon::Grabbing
        } else {
            cursor_for(self.hover_target)
        }
    }

    fn update_hover(&mut self, store: &ClipStore, pos: Pos2) {
        let target = self.hit(store, pos);
        let hovered_clip = match target {
            HitTarget::ClipBody(id) | HitTarget::TrimHandle { clip_id: id, .. } => Some(id),
            HitTarget::Ruler | HitTarget::Empty => None,
        };
        match (self.drag.hovered(), hovered_clip) {
            (Some(old), Some(new)) if old != new => {
                self.drag.pointer_leave_clip(old);
                self.drag.pointer_enter_clip(new);
            }
            (None, Some(new)) => self.drag.pointer_enter_clip(new),
            (Some(old), None) => self.drag.pointer_leave_clip(old),
            _ => {}
        }
        // Handles become visible on hover, so resolve once more
        self.hover_target = if hovered_clip.is_some() {
            self.hit(store, pos)
        } else {
            target
        };
    }

    fn wheel(&mut self, store: &mut ClipStore, pos: Pos2, delta: f32, modifiers: Modifiers) -> bool {
        if delta == 0.0 || !delta.is_finite() {
            return false;
        }
        if modifiers.command {
            let before = self.mapper(store);
            let op = if delta > 0.0 {
                Operation::ZoomIn
            } else {
                Operation::ZoomOut
            };
            store.dispatch(op);
            let after = self.mapper(store);
            self.scroll_left = after.anchored_scroll(&before, pos.x as f64, self.scroll_left);
        } else {
            let visible = self.container_width;
            let max_scroll = (self.geometry(store).timeline_width - visible).max(0.0);
            self.scroll_left = (self.scroll_left - delta as f64).clamp(0.0, max_scroll);
        }
        true
    }
}
