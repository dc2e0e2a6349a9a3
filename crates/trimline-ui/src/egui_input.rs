//! Adapter from `egui` events to timeline input events.

use egui::{Event, PointerButton, Pos2, Rect};
use trimline_timeline::ClipStore;

use crate::input::{InputEvent, InputResponse, TimelineInput};
use crate::keyboard::{Key, Modifiers};

/// Translate egui modifiers. Ctrl and ⌘ both count as the command modifier.
pub fn translate_modifiers(modifiers: egui::Modifiers) -> Modifiers {
    Modifiers {
        shift: modifiers.shift,
        alt: modifiers.alt,
        command: modifiers.command || modifiers.ctrl || modifiers.mac_cmd,
    }
}

/// Translate an egui key, if the timeline cares about it.
pub fn translate_key(key: egui::Key) -> Option<Key> {
    Some(match key {
        egui::Key::Home => Key::Home,
        egui::Key::End => Key::End,
        egui::Key::ArrowLeft => Key::ArrowLeft,
        egui::Key::ArrowRight => Key::ArrowRight,
        egui::Key::ArrowUp => Key::ArrowUp,
        egui::Key::ArrowDown => Key::ArrowDown,
        egui::Key::Space => Key::Space,
        egui::Key::Escape => Key::Escape,
        egui::Key::Comma => Key::Comma,
        egui::Key::Period => Key::Period,
        egui::Key::Plus => Key::Plus,
        egui::Key::Equals => Key::Equals,
        egui::Key::Minus => Key::Minus,
        egui::Key::Num0 => Key::Num0,
        egui::Key::T => Key::T,
        egui::Key::Z => Key::Z,
        _ => return None,
    })
}

/// Stateful translator for one timeline area on screen.
#[derive(Debug, Clone)]
pub struct EguiInputAdapter {
    /// Screen rectangle of the visible timeline area.
    area: Rect,
    last_pointer: Option<Pos2>,
    inside: bool,
    /// Primary button went down inside the area and is still held.
    pressed: bool,
    /// The timeline reported a drag in progress before the current event.
    dragging: bool,
}

impl EguiInputAdapter {
    pub fn new(area: Rect) -> Self {
        Self {
            area,
            last_pointer: None,
            inside: false,
            pressed: false,
            dragging: false,
        }
    }

    /// Update the on-screen area after a layout change.
    pub fn set_area(&mut self, area: Rect) {
        self.area = area;
    }

    fn local(&self, pos: Pos2) -> Pos2 {
        (pos - self.area.min).to_pos2()
    }

    /// Whether pointer events are captured by a gesture that started here.
    fn captured(&self) -> bool {
        self.pressed || self.dragging
    }

    /// Translate one event. While a gesture started in the area is held,
    /// every move is delivered, unclamped, wherever the pointer is.
    /// Otherwise pointer events outside the area are dropped, except that
    /// leaving it is reported once.
    pub fn translate(&mut self, event: &Event) -> Option<InputEvent> {
        match event {
            Event::PointerMoved(pos) => {
                self.last_pointer = Some(*pos);
                if self.captured() {
                    return Some(InputEvent::PointerMove {
                        pos: self.local(*pos),
                    });
                }
                let inside = self.area.contains(*pos);
                let was_inside = std::mem::replace(&mut self.inside, inside);
                if inside {
                    Some(InputEvent::PointerMove {
                        pos: self.local(*pos),
                    })
                } else if was_inside {
                    Some(InputEvent::PointerLeave)
                } else {
                    None
                }
            }
            Event::PointerGone => {
                self.last_pointer = None;
                if self.captured() {
                    return None;
                }
                std::mem::replace(&mut self.inside, false).then_some(InputEvent::PointerLeave)
            }
            Event::PointerButton {
                pos,
                button: PointerButton::Primary,
                pressed,
                modifiers,
            } => {
                self.last_pointer = Some(*pos);
                let local = self.local(*pos);
                if *pressed {
                    if !self.area.contains(*pos) {
                        return None;
                    }
                    self.pressed = true;
                    self.inside = true;
                    Some(InputEvent::PointerDown {
                        pos: local,
                        modifiers: translate_modifiers(*modifiers),
                    })
                } else {
                    // Releases are delivered even outside the area
                    self.pressed = false;
                    self.dragging = false;
                    Some(InputEvent::PointerUp { pos: local })
                }
            }
            Event::MouseWheel {
                delta, modifiers, ..
            } => {
                let pos = self.last_pointer.filter(|p| self.area.contains(*p))?;
                Some(InputEvent::Wheel {
                    pos: self.local(pos),
                    delta: delta.y,
                    modifiers: translate_modifiers(*modifiers),
                })
            }
            Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } => translate_key(*key).map(|key| InputEvent::Key {
                key,
                modifiers: translate_modifiers(*modifiers),
            }),
            Event::WindowFocused(false) => Some(InputEvent::FocusChanged(false)),
            _ => None,
        }
    }

    /// Translate and apply a frame's worth of events. Returns the last
    /// response, or `None` if no event concerned the timeline.
    pub fn feed(
        &mut self,
        events: &[Event],
        input: &mut TimelineInput,
        store: &mut ClipStore,
    ) -> Option<InputResponse> {
        let mut last = None;
        for event in events {
            self.dragging = input.drag().is_dragging();
            if let Some(event) = self.translate(event) {
                last = Some(input.handle(store, event));
            }
        }
        last
    }
}
