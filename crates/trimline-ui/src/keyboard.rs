//! Timeline keyboard shortcuts.
//!
//! Every shortcut is a [`TimelineCommand`] in a [`ShortcutRegistry`], so a
//! help overlay can list them. [`KeyboardDispatcher`] resolves key presses
//! through the registry and applies the resulting action to the store.

use std::collections::HashMap;
use tracing::debug;
use trimline_timeline::{ClipStore, Operation, StepDirection};

use crate::drag::DragController;

// ── Keys and modifiers ──────────────────────────────────────────

/// Keys the timeline reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Home,
    End,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Space,
    Escape,
    Comma,
    Period,
    Plus,
    Equals,
    Minus,
    Num0,
    T,
    Z,
}

impl Key {
    /// Label used in shortcut listings.
    pub fn label(self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::End => "End",
            Self::ArrowLeft => "←",
            Self::ArrowRight => "→",
            Self::ArrowUp => "↑",
            Self::ArrowDown => "↓",
            Self::Space => "Space",
            Self::Escape => "Esc",
            Self::Comma => ",",
            Self::Period => ".",
            Self::Plus => "+",
            Self::Equals => "=",
            Self::Minus => "-",
            Self::Num0 => "0",
            Self::T => "T",
            Self::Z => "Z",
        }
    }
}

/// Keyboard modifiers. `command` is the platform's primary modifier: Ctrl, or
/// ⌘ on macOS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub alt: bool,
    pub command: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        alt: false,
        command: false,
    };
    pub const CMD: Self = Self {
        shift: false,
        alt: false,
        command: true,
    };
    pub const CMD_SHIFT: Self = Self {
        shift: true,
        alt: false,
        command: true,
    };
    pub const SHIFT: Self = Self {
        shift: true,
        alt: false,
        command: false,
    };

    /// Modifiers that extend a selection instead of replacing it.
    pub fn is_additive(&self) -> bool {
        self.command || self.shift
    }
}

/// A keyboard shortcut (modifier + key).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shortcut {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl Shortcut {
    pub const fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }

    /// Format for display: "⌘T", "⇧⌘Z", etc.
    pub fn display(&self) -> String {
        let mut s = String::new();
        if self.modifiers.alt {
            s.push('⌥');
        }
        if self.modifiers.shift {
            s.push('⇧');
        }
        if self.modifiers.command {
            s.push('⌘');
        }
        s.push_str(self.key.label());
        s
    }
}

// ── Actions ─────────────────────────────────────────────────────

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimelineAction {
    JumpToStart,
    JumpToEnd,
    SeekBackward,
    SeekForward,
    SeekBackwardLarge,
    SeekForwardLarge,
    SeekBackwardPage,
    SeekForwardPage,
    PreviousFrame,
    NextFrame,
    ZoomIn,
    ZoomOut,
    ResetZoom,
    ToggleTrimMode,
    TogglePlayback,
    Escape,
    Undo,
    Redo,
}

/// A registered timeline command.
#[derive(Debug, Clone)]
pub struct TimelineCommand {
    /// Unique command ID (e.g., "timeline.zoom_in").
    pub id: &'static str,
    /// Display name.
    pub name: &'static str,
    pub action: TimelineAction,
    /// Every shortcut bound to this command; the first is the one displayed.
    pub shortcuts: Vec<Shortcut>,
}

// ── Registry ────────────────────────────────────────────────────

/// Lookup table of all timeline shortcuts.
#[derive(Debug, Clone)]
pub struct ShortcutRegistry {
    commands: Vec<TimelineCommand>,
    by_shortcut: HashMap<Shortcut, usize>,
}

impl ShortcutRegistry {
    /// Create a registry with the built-in bindings.
    pub fn new() -> Self {
        let mut reg = Self {
            commands: Vec::new(),
            by_shortcut: HashMap::new(),
        };
        reg.register_builtins();
        reg
    }

    /// Register a command. A shortcut already bound elsewhere is rebound.
    pub fn register(&mut self, cmd: TimelineCommand) {
        let idx = self.commands.len();
        for shortcut in &cmd.shortcuts {
            self.by_shortcut.insert(*shortcut, idx);
        }
        self.commands.push(cmd);
    }

    pub fn get_by_shortcut(&self, shortcut: &Shortcut) -> Option<&TimelineCommand> {
        self.by_shortcut.get(shortcut).map(|&i| &self.commands[i])
    }

    /// All commands in registration order.
    pub fn all(&self) -> &[TimelineCommand] {
        &self.commands
    }

    /// `(shortcut, name)` pairs for a help overlay.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.commands
            .iter()
            .filter_map(|cmd| cmd.shortcuts.first().map(|s| (s.display(), cmd.name)))
            .collect()
    }

    fn register_builtins(&mut self) {
        use Key::*;
        use TimelineAction as A;

        let table: [(&'static str, &'static str, A, Vec<Shortcut>); 18] = [
            ("timeline.jump_start", "Go to Beginning", A::JumpToStart, vec![Shortcut::new(Modifiers::NONE, Home)]),
            ("timeline.jump_end", "Go to End", A::JumpToEnd, vec![Shortcut::new(Modifiers::NONE, End)]),
            ("timeline.seek_back", "Back 1 Second", A::SeekBackward, vec![Shortcut::new(Modifiers::NONE, ArrowLeft)]),
            ("timeline.seek_forward", "Forward 1 Second", A::SeekForward, vec![Shortcut::new(Modifiers::NONE, ArrowRight)]),
            ("timeline.seek_back_large", "Back 10 Seconds", A::SeekBackwardLarge, vec![Shortcut::new(Modifiers::SHIFT, ArrowLeft)]),
            ("timeline.seek_forward_large", "Forward 10 Seconds", A::SeekForwardLarge, vec![Shortcut::new(Modifiers::SHIFT, ArrowRight)]),
            ("timeline.seek_back_page", "Back 1 Minute", A::SeekBackwardPage, vec![Shortcut::new(Modifiers::NONE, ArrowDown)]),
            ("timeline.seek_forward_page", "Forward 1 Minute", A::SeekForwardPage, vec![Shortcut::new(Modifiers::NONE, ArrowUp)]),
            ("timeline.prev_frame", "Previous Frame", A::PreviousFrame, vec![Shortcut::new(Modifiers::NONE, Comma)]),
            ("timeline.next_frame", "Next Frame", A::NextFrame, vec![Shortcut::new(Modifiers::NONE, Period)]),
            (
                "timeline.zoom_in",
                "Zoom In",
                A::ZoomIn,
                vec![
                    Shortcut::new(Modifiers::CMD, Plus),
                    Shortcut::new(Modifiers::CMD, Equals),
                    Shortcut::new(Modifiers::CMD_SHIFT, Plus),
                    Shortcut::new(Modifiers::CMD_SHIFT, Equals),
                ],
            ),
            ("timeline.zoom_out", "Zoom Out", A::ZoomOut, vec![Shortcut::new(Modifiers::CMD, Minus)]),
            ("timeline.zoom_reset", "Reset Zoom", A::ResetZoom, vec![Shortcut::new(Modifiers::CMD, Num0)]),
            ("timeline.trim_mode", "Toggle Trim Mode", A::ToggleTrimMode, vec![Shortcut::new(Modifiers::CMD, T)]),
            ("transport.play_pause", "Play / Pause", A::TogglePlayback, vec![Shortcut::new(Modifiers::NONE, Space)]),
            ("timeline.escape", "Cancel / Clear Selection", A::Escape, vec![Shortcut::new(Modifiers::NONE, Escape)]),
            ("edit.undo", "Undo", A::Undo, vec![Shortcut::new(Modifiers::CMD, Z)]),
            ("edit.redo", "Redo", A::Redo, vec![Shortcut::new(Modifiers::CMD_SHIFT, Z)]),
        ];

        for (id, name, action, shortcuts) in table {
            self.register(TimelineCommand {
                id,
                name,
                action,
                shortcuts,
            });
        }
    }
}

impl Default for ShortcutRegistry {
    fn default() -> Self {
        Self::new()
    }
}

// ── Dispatcher ──────────────────────────────────────────────────

/// Scroll adjustment requested by a shortcut.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollRequest {
    /// Centre the given time in the visible area.
    CenterOn(f64),
}

/// Result of a key press.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeyOutcome {
    /// The key was consumed; the host should not process it further.
    pub handled: bool,
    pub scroll: Option<ScrollRequest>,
}

impl KeyOutcome {
    fn handled() -> Self {
        Self {
            handled: true,
            scroll: None,
        }
    }

    fn with_scroll(time: f64) -> Self {
        Self {
            handled: true,
            scroll: Some(ScrollRequest::CenterOn(time)),
        }
    }
}

/// Applies shortcuts to the store while the timeline has keyboard focus.
#[derive(Debug, Clone, Default)]
pub struct KeyboardDispatcher {
    registry: ShortcutRegistry,
    timeline_focused: bool,
    text_input_focused: bool,
}

impl KeyboardDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &ShortcutRegistry {
        &self.registry
    }

    pub fn set_timeline_focused(&mut self, focused: bool) {
        self.timeline_focused = focused;
    }

    pub fn is_timeline_focused(&self) -> bool {
        self.timeline_focused
    }

    /// Keys are ignored while a text field has focus.
    pub fn set_text_input_focused(&mut self, focused: bool) {
        self.text_input_focused = focused;
    }

    /// Handle a key press.
    pub fn key_down(
        &self,
        key: Key,
        modifiers: Modifiers,
        store: &mut ClipStore,
        drag: &mut DragController,
    ) -> KeyOutcome {
        if !self.timeline_focused || self.text_input_focused {
            return KeyOutcome::default();
        }
        let shortcut = Shortcut::new(
            Modifiers {
                alt: false,
                ..modifiers
            },
            key,
        );
        let Some(cmd) = self.registry.get_by_shortcut(&shortcut) else {
            return KeyOutcome::default();
        };
        debug!(command = cmd.id, "shortcut");
        apply_action(cmd.action, store, drag)
    }
}

/// Apply one timeline action.
pub fn apply_action(
    action: TimelineAction,
    store: &mut ClipStore,
    drag: &mut DragController,
) -> KeyOutcome {
    let config = store.config();
    let (step, large, page) = (config.seek_step, config.seek_step_large, config.seek_step_page);

    match action {
        TimelineAction::JumpToStart => {
            store.dispatch(Operation::SeekTo(0.0));
            return KeyOutcome::with_scroll(store.state().current_time);
        }
        TimelineAction::JumpToEnd => {
            let end = store.state().total_duration;
            store.dispatch(Operation::SeekTo(end));
            return KeyOutcome::with_scroll(store.state().current_time);
        }
        TimelineAction::SeekBackward => seek_by(store, -step),
        TimelineAction::SeekForward => seek_by(store, step),
        TimelineAction::SeekBackwardLarge => seek_by(store, -large),
        TimelineAction::SeekForwardLarge => seek_by(store, large),
        TimelineAction::SeekBackwardPage => seek_by(store, -page),
        TimelineAction::SeekForwardPage => seek_by(store, page),
        TimelineAction::PreviousFrame => {
            store.dispatch(Operation::StepFrame(StepDirection::Backward));
        }
        TimelineAction::NextFrame => {
            store.dispatch(Operation::StepFrame(StepDirection::Forward));
        }
        TimelineAction::ZoomIn => {
            store.dispatch(Operation::ZoomIn);
        }
        TimelineAction::ZoomOut => {
            store.dispatch(Operation::ZoomOut);
        }
        TimelineAction::ResetZoom => {
            store.dispatch(Operation::ResetZoom);
            return KeyOutcome::with_scroll(store.state().current_time);
        }
        TimelineAction::ToggleTrimMode => {
            let enabled = !store.state().trim_mode;
            store.dispatch(Operation::SetTrimMode(enabled));
        }
        TimelineAction::TogglePlayback => {
            store.dispatch(Operation::TogglePlayback);
        }
        TimelineAction::Escape => {
            drag.cancel(store);
            store.dispatch(Operation::ClearSelection);
            store.dispatch(Operation::SetTrimMode(false));
        }
        TimelineAction::Undo => {
            store.dispatch(Operation::Undo);
        }
        TimelineAction::Redo => {
            store.dispatch(Operation::Redo);
        }
    }
    KeyOutcome::handled()
}

fn seek_by(store: &mut ClipStore, delta: f64) {
    store.dispatch(Operation::SeekBy(delta));
}
