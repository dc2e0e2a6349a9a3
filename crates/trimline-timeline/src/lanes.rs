//! Lane assignment for rendering.
//!
//! Greedy interval partitioning: clips are visited in the order given and
//! each one lands in the first lane where it overlaps nothing. The result is
//! deterministic for a given clip order, so an unchanged clip set keeps its
//! lanes across re-renders.

use smallvec::SmallVec;
use std::collections::HashMap;
use trimline_core::TimeSpan;

use crate::clip::{Clip, ClipId};

/// A clip placed in a lane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaneEntry {
    pub clip_id: ClipId,
    pub span: TimeSpan,
}

/// One horizontal track of non-overlapping clips.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Lane {
    entries: SmallVec<[LaneEntry; 8]>,
}

impl Lane {
    /// Entries in placement order.
    pub fn entries(&self) -> &[LaneEntry] {
        &self.entries
    }

    /// Ids of the clips in this lane, in placement order.
    pub fn clip_ids(&self) -> impl Iterator<Item = ClipId> + '_ {
        self.entries.iter().map(|e| e.clip_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check whether a span fits without overlapping any entry.
    pub fn accepts(&self, span: TimeSpan) -> bool {
        !self.entries.iter().any(|e| e.span.overlaps(span))
    }
}

/// The full lane assignment for a clip set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaneLayout {
    lanes: Vec<Lane>,
    lane_of: HashMap<ClipId, usize>,
}

impl LaneLayout {
    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Lane index assigned to a clip.
    pub fn lane_of(&self, id: ClipId) -> Option<usize> {
        self.lane_of.get(&id).copied()
    }

    /// Lanes as lists of clip ids.
    pub fn to_id_lists(&self) -> Vec<Vec<ClipId>> {
        self.lanes
            .iter()
            .map(|lane| lane.clip_ids().collect())
            .collect()
    }
}

/// Compute a non-overlapping lane assignment. O(n × lanes).
pub fn allocate(clips: &[Clip]) -> LaneLayout {
    let mut layout = LaneLayout::default();

    for clip in clips {
        let entry = LaneEntry {
            clip_id: clip.id,
            span: clip.span(),
        };
        let index = match layout.lanes.iter().position(|lane| lane.accepts(entry.span)) {
            Some(index) => index,
            None => {
                layout.lanes.push(Lane::default());
                layout.lanes.len() - 1
            }
        };
        layout.lanes[index].entries.push(entry);
        layout.lane_of.insert(clip.id, index);
    }

    layout
}
