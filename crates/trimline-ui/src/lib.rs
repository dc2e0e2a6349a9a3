//! Trimline UI - Timeline interaction
//!
//! Turns pointer and keyboard input into clip store operations:
//! - Drag gestures (move, trim, scrub) with commit-on-release
//! - Pointer capture shared between timeline views
//! - Hit testing against the cached render geometry
//! - Keyboard shortcuts with a listable registry
//! - An adapter for hosting the timeline in an `egui` application

pub mod capture;
pub mod drag;
pub mod egui_input;
pub mod input;
pub mod keyboard;

pub use capture::{CaptureGuard, PointerCapture};
pub use drag::{ClipPreview, DragController, DragState};
pub use egui_input::EguiInputAdapter;
pub use hit_test::{hit_test, HitTarget, TrackLayout};
pub use input::{InputEvent, InputResponse, TimelineInput};
pub use keyboard::{
    Key, KeyOutcome, KeyboardDispatcher, Modifiers, ScrollRequest, Shortcut, ShortcutRegistry,
    TimelineAction,
};
