//! Trimline Timeline - Clip store and timeline geometry
//!
//! Everything between user intent and pixels:
//! - Clips with trim ranges and the `ClipStore` that owns them
//! - Edit commands with undo/redo
//! - Lane allocation for overlapping clips
//! - Time ↔ pixel mapping, grid snapping and the memoized render geometry
//! - Versioned session files

pub mod clip;
pub mod edit;
pub mod geometry;
pub mod lanes;
pub mod render;
pub mod session;
pub mod snapping;
pub mod state;
pub mod store;

pub use clip::{Clip, ClipId, ClipStatus};
pub use edit::{EditCommand, UndoStack};
pub use geometry::{ClipGeometry, GeometryMapper};
pub use lanes::{allocate, Lane, LaneLayout};
pub use render::{ClipPlacement, RenderCache, RenderGeometry};
pub use session::{ClipSource, SessionFile, ViewSettings};
pub use snapping::{snap, SnapEngine};
pub use state::{TimelineState, TrimEdge, TrimHandle, Viewport};
pub use store::{ClipStore, Dispatch, Operation, Snapshot, StepDirection};
