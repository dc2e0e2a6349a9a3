//! Memoized render geometry.
//!
//! Lane layout and clip rectangles are derived data. `RenderCache` keeps the
//! last result together with the exact inputs it was computed from and only
//! recomputes when one of them changes.

use std::collections::HashMap;
use tracing::trace;

use crate::clip::ClipId;
use crate::geometry::{ClipGeometry, GeometryMapper};
use crate::lanes::{self, LaneLayout};
use crate::store::ClipStore;

/// Placement of one clip: lane plus horizontal geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlacement {
    pub clip_id: ClipId,
    pub lane: usize,
    pub geometry: ClipGeometry,
}

/// Everything a renderer needs to draw the clip area.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderGeometry {
    pub mapper: GeometryMapper,
    pub timeline_width: f64,
    pub layout: LaneLayout,
    placements: Vec<ClipPlacement>,
    by_id: HashMap<ClipId, usize>,
}

impl RenderGeometry {
    /// Placements in clip-store order.
    pub fn placements(&self) -> &[ClipPlacement] {
        &self.placements
    }

    pub fn placement(&self, id: ClipId) -> Option<&ClipPlacement> {
        self.by_id.get(&id).map(|&i| &self.placements[i])
    }

    pub fn lane_count(&self) -> usize {
        self.layout.lane_count()
    }
}

/// Exact inputs of a render geometry computation. Floats are compared by bit
/// pattern so any change, however small, invalidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CacheKey {
    revision: u64,
    zoom: u64,
    viewport_start: u64,
    viewport_end: u64,
    container_width: u64,
    total_duration: u64,
}

impl CacheKey {
    fn of(store: &ClipStore, container_width: f64) -> Self {
        let state = store.state();
        Self {
            revision: store.revision(),
            zoom: state.zoom_level.to_bits(),
            viewport_start: state.viewport.start().to_bits(),
            viewport_end: state.viewport.end().to_bits(),
            container_width: container_width.to_bits(),
            total_duration: state.total_duration.to_bits(),
        }
    }
}

/// Cache for [`RenderGeometry`].
#[derive(Debug, Default)]
pub struct RenderCache {
    key: Option<CacheKey>,
    geometry: Option<RenderGeometry>,
    computations: u64,
}

impl RenderCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current render geometry, recomputed only if an input changed.
    pub fn get(&mut self, store: &ClipStore, container_width: f64) -> &RenderGeometry {
        let key = CacheKey::of(store, container_width);
        if self.key != Some(key) {
            self.geometry = None;
            self.key = Some(key);
        }
        let computations = &mut self.computations;
        self.geometry.get_or_insert_with(|| {
            *computations += 1;
            trace!(revision = key.revision, "render geometry recomputed");
            compute(store, container_width)
        })
    }

    /// How many times geometry has been computed.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

/// Compute render geometry from scratch.
pub fn compute(store: &ClipStore, container_width: f64) -> RenderGeometry {
    let config = store.config();
    let state = store.state();
    let mapper = GeometryMapper::from_state(
        state,
        container_width,
        config.base_pixels_per_second,
        config.default_container_width,
    );
    let layout = lanes::allocate(store.clips());

    let mut placements = Vec::with_capacity(store.clips().len());
    let mut by_id = HashMap::with_capacity(store.clips().len());
    for clip in store.clips() {
        let lane = layout.lane_of(clip.id).unwrap_or(0);
        by_id.insert(clip.id, placements.len());
        placements.push(ClipPlacement {
            clip_id: clip.id,
            lane,
            geometry: mapper.clip_geometry(clip),
        });
    }

    RenderGeometry {
        mapper,
        timeline_width: mapper.timeline_width(state.total_duration),
        layout,
        placements,
        by_id,
    }
}
