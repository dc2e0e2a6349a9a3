//! Clip edits with undo/redo support.
//!
//! Uses the Command pattern: every clip mutation is an `EditCommand` that
//! knows how to apply itself and produce its inverse for undo. Commands carry
//! already-clamped values; clamping happens in the store before a command is
//! built.

use std::collections::VecDeque;
use tracing::debug;

use crate::clip::{Clip, ClipId};

// ── Edit commands ───────────────────────────────────────────────

/// A reversible edit on the clip list.
#[derive(Debug, Clone, PartialEq)]
pub enum EditCommand {
    /// Insert a clip at `index` in the clip list.
    InsertClip { index: usize, clip: Clip },
    /// Remove a clip. `index` and `clip` describe it as it was before
    /// removal so the inverse can restore it in place.
    RemoveClip { index: usize, clip: Clip },
    /// Move a clip to a new timeline position.
    MoveClip { id: ClipId, from: f64, to: f64 },
    /// Change a clip's trim range.
    TrimClip {
        id: ClipId,
        from: (f64, f64),
        to: (f64, f64),
    },
}

impl EditCommand {
    /// Removal of the clip at `index`, or `None` when out of range.
    pub fn remove_at(clips: &[Clip], index: usize) -> Option<Self> {
        clips.get(index).map(|clip| Self::RemoveClip {
            index,
            clip: clip.clone(),
        })
    }

    /// Apply this command to the clip list, mutating it in place.
    ///
    /// Returns `false` when the command referred to a clip that no longer
    /// exists; the list is left untouched in that case.
    pub fn apply(&self, clips: &mut Vec<Clip>) -> bool {
        match self {
            Self::InsertClip { index, clip } => {
                clips.insert((*index).min(clips.len()), clip.clone());
                true
            }
            Self::RemoveClip { clip, .. } => match position_of(clips, clip.id) {
                Some(at) => {
                    clips.remove(at);
                    true
                }
                None => missing(clip.id),
            },
            Self::MoveClip { id, to, .. } => match find_clip_mut(clips, *id) {
                Some(clip) => {
                    clip.timeline_position = *to;
                    true
                }
                None => missing(*id),
            },
            Self::TrimClip { id, to, .. } => match find_clip_mut(clips, *id) {
                Some(clip) => {
                    (clip.trim_start, clip.trim_end) = *to;
                    true
                }
                None => missing(*id),
            },
        }
    }

    /// Produce the inverse command (for undo).
    pub fn inverse(&self) -> Self {
        match self {
            Self::InsertClip { index, clip } => Self::RemoveClip {
                index: *index,
                clip: clip.clone(),
            },
            Self::RemoveClip { index, clip } => Self::InsertClip {
                index: *index,
                clip: clip.clone(),
            },
            Self::MoveClip { id, from, to } => Self::MoveClip {
                id: *id,
                from: *to,
                to: *from,
            },
            Self::TrimClip { id, from, to } => Self::TrimClip {
                id: *id,
                from: *to,
                to: *from,
            },
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn position_of(clips: &[Clip], id: ClipId) -> Option<usize> {
    clips.iter().position(|clip| clip.id == id)
}

fn find_clip_mut(clips: &mut [Clip], id: ClipId) -> Option<&mut Clip> {
    clips.iter_mut().find(|clip| clip.id == id)
}

fn missing(id: ClipId) -> bool {
    debug!(clip = %id, "edit refers to a missing clip, skipping");
    false
}

// ── Undo stack ──────────────────────────────────────────────────

/// Bounded undo/redo history.
///
/// Holds applied commands; undo hands back their inverse, redo hands back the
/// command itself. The oldest entry is dropped once `max_depth` is exceeded.
#[derive(Debug)]
pub struct UndoStack {
    done: VecDeque<EditCommand>,
    undone: Vec<EditCommand>,
    max_depth: usize,
}

impl UndoStack {
    pub fn new(max_depth: usize) -> Self {
        let max_depth = max_depth.max(1);
        Self {
            done: VecDeque::with_capacity(max_depth.min(64)),
            undone: Vec::new(),
            max_depth,
        }
    }

    /// Record an applied command. Any redo history is discarded.
    pub fn push(&mut self, command: EditCommand) {
        self.undone.clear();
        if self.done.len() == self.max_depth {
            self.done.pop_front();
        }
        self.done.push_back(command);
    }

    /// Inverse of the latest applied command, ready to apply.
    pub fn undo(&mut self) -> Option<EditCommand> {
        let command = self.done.pop_back()?;
        let inverse = command.inverse();
        self.undone.push(command);
        Some(inverse)
    }

    /// The latest undone command, ready to re-apply.
    pub fn redo(&mut self) -> Option<EditCommand> {
        let command = self.undone.pop()?;
        self.done.push_back(command.clone());
        Some(command)
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }

    /// Number of steps that can be undone.
    pub fn depth(&self) -> usize {
        self.done.len()
    }
}

// ── Tests ───────────────────────────────────────────────────────
