//! Trimline Playback - Media synchronization
//!
//! Keeps a media element showing the right clip at the right offset:
//! - `MediaElement` trait and the events a player reports
//! - `PlaybackSynchronizer`, the two-way clock bridge
//! - `SimulatedMediaElement`, a deterministic player for tests and tooling

pub mod media;
pub mod simulated;
pub mod sync;

pub use media::{MediaElement, MediaError, MediaEvent};
pub use simulated::SimulatedMediaElement;
pub use sync::{select_active_clip, PlaybackSynchronizer};
