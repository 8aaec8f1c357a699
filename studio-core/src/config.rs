//! Editor configuration.

use serde::{Deserialize, Serialize};

use crate::document::CanvasSize;
use crate::CanvasResult;

/// Default grid spacing in pixels.
pub const DEFAULT_GRID_SIZE: f32 = 8.0;

/// Default offset applied to pasted and duplicated elements.
pub const DEFAULT_PASTE_OFFSET: f32 = 20.0;

/// Default suffix appended to the names of copies.
pub const DEFAULT_COPY_SUFFIX: &str = " Copy";

/// Initial settings for a new document.
///
/// Every field has a default, so partial JSON configs are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Widget canvas size in pixels.
    pub canvas_size: CanvasSize,
    /// Grid spacing used for snapping.
    pub grid_size: f32,
    /// Whether move/resize snap to the grid.
    pub snap_to_grid: bool,
    /// Offset applied to each paste or duplicate on both axes.
    pub paste_offset: f32,
    /// Suffix appended to the names of pasted or duplicated elements.
    pub copy_suffix: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_size: CanvasSize::default(),
            grid_size: DEFAULT_GRID_SIZE,
            snap_to_grid: false,
            paste_offset: DEFAULT_PASTE_OFFSET,
            copy_suffix: DEFAULT_COPY_SUFFIX.to_string(),
        }
    }
}

impl EditorConfig {
    /// Parse a config from JSON, filling missing fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
