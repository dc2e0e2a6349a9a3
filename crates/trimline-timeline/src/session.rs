//! Session persistence with versioning and migration.
//!
//! A session is the clip list plus the view settings worth restoring (zoom,
//! viewport, grid). It is stored as JSON with a schema version field.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use trimline_core::{Result, TimelineConfig, TrimlineError};

use crate::clip::Clip;
use crate::state::Viewport;
use crate::store::{ClipStore, Operation};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 2;

/// Supplier of the initial clip list.
pub trait ClipSource {
    fn load_clips(&self) -> Result<Vec<Clip>>;
}

impl ClipSource for Vec<Clip> {
    fn load_clips(&self) -> Result<Vec<Clip>> {
        Ok(self.clone())
    }
}

/// View settings saved with a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSettings {
    pub zoom_level: f64,
    pub viewport: Viewport,
    pub snap_to_grid: bool,
    pub grid_interval: f64,
}

impl Default for ViewSettings {
    fn default() -> Self {
        let config = TimelineConfig::default();
        Self {
            zoom_level: 1.0,
            viewport: Viewport::new(0.0, config.default_viewport_end),
            snap_to_grid: config.snap_to_grid,
            grid_interval: config.default_grid_interval,
        }
    }
}

/// Versioned session file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionFile {
    /// Schema version for migration.
    pub version: u32,
    /// Application version that wrote this file.
    pub app_version: String,
    pub clips: Vec<Clip>,
    #[serde(default)]
    pub view: ViewSettings,
}

impl SessionFile {
    /// Capture the current contents of a store.
    pub fn capture(store: &ClipStore) -> Self {
        let state = store.state();
        Self {
            version: CURRENT_VERSION,
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            clips: store.clips().to_vec(),
            view: ViewSettings {
                zoom_level: state.zoom_level,
                viewport: state.viewport,
                snap_to_grid: state.snap_to_grid,
                grid_interval: state.grid_interval,
            },
        }
    }

    /// Build a store from this session. View settings go through the store's
    /// own clamping, so a hand-edited file cannot produce an invalid state.
    pub fn into_store(self, config: TimelineConfig) -> ClipStore {
        let mut store = ClipStore::from_clips(config, self.clips);
        let view = self.view;
        store.dispatch(Operation::SetZoom(view.zoom_level));
        store.dispatch(Operation::SetViewport {
            start: view.viewport.start(),
            end: view.viewport.end(),
        });
        store.dispatch(Operation::SetSnapToGrid(view.snap_to_grid));
        store.dispatch(Operation::SetGridInterval(view.grid_interval));
        store
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| TrimlineError::Serialization(format!("Failed to serialize session: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| TrimlineError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(TrimlineError::Serialization(format!(
                "Session file version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        let session: Self = serde_json::from_value(migrated)
            .map_err(|e| TrimlineError::Serialization(format!("Failed to parse session: {}", e)))?;
        session.validate()?;
        Ok(session)
    }

    /// Reject clip data no store operation could have produced. Values that
    /// are merely out of range are left for the store to clamp.
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::with_capacity(self.clips.len());
        for clip in &self.clips {
            if !seen.insert(clip.id) {
                return Err(TrimlineError::Timeline(format!(
                    "duplicate clip id {} in session",
                    clip.id
                )));
            }
            if clip.source_duration < 0.0 || clip.trim_start < 0.0 || clip.timeline_position < 0.0 {
                return Err(TrimlineError::InvalidParameter(format!(
                    "clip {} ({}) has negative timing",
                    clip.id, clip.name
                )));
            }
        }
        Ok(())
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let data = self.to_json()?;
        std::fs::write(path, data)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => {
                TrimlineError::NotFound(format!("session file {}", path.display()))
            }
            _ => TrimlineError::Io(e),
        })?;
        Self::from_json(&data)
    }
}

impl ClipSource for SessionFile {
    fn load_clips(&self) -> Result<Vec<Clip>> {
        Ok(self.clips.clone())
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0: a bare array of clips
                if data.is_array() {
                    data = serde_json::json!({
                        "version": 1,
                        "app_version": "0.0.0",
                        "clips": data,
                    });
                } else {
                    return Err(TrimlineError::Serialization(
                        "Unversioned session must be a clip array".into(),
                    ));
                }
                version = 1;
            }
            1 => {
                // v1 → v2: `duration` renamed to `source_duration`
                if let Some(clips) = data.get_mut("clips").and_then(|c| c.as_array_mut()) {
                    for clip in clips.iter_mut().filter_map(|c| c.as_object_mut()) {
                        if let Some(duration) = clip.remove("duration") {
                            clip.entry("source_duration").or_insert(duration);
                        }
                    }
                }
                data["version"] = serde_json::json!(2);
                version = 2;
            }
            _ => {
                return Err(TrimlineError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
