//! Document state: elements, history, selection, clipboard and settings.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::clipboard::Clipboard;
use crate::config::EditorConfig;
use crate::geometry::Rect;
use crate::history::History;
use crate::selection::Selection;
use crate::store::ElementStore;
use crate::{CanvasError, CanvasResult, Element, ElementId};

/// Default canvas width in pixels.
const DEFAULT_WIDTH: f32 = 800.0;

/// Default canvas height in pixels.
const DEFAULT_HEIGHT: f32 = 600.0;

/// Size of the widget being designed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

/// Pan and zoom of the editing surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Current zoom level (1.0 = 100%).
    pub zoom: f32,
    /// Pan offset X.
    pub pan_x: f32,
    /// Pan offset Y.
    pub pan_y: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            zoom: 1.0,
            pan_x: 0.0,
            pan_y: 0.0,
        }
    }
}

/// Read-only view handed to the renderer each frame.
#[derive(Debug, Clone, Copy)]
pub struct RenderView<'a> {
    /// All elements.
    pub elements: &'a ElementStore,
    /// Top-level z-order, back-to-front.
    pub element_order: &'a [ElementId],
    /// Selected ids, in selection order.
    pub selected_ids: &'a [ElementId],
    /// Hovered element, if any.
    pub hovered_id: Option<&'a ElementId>,
}

/// The complete state of one open design.
///
/// Mutated only through [`crate::reduce`] or [`crate::Editor::dispatch`].
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub(crate) store: ElementStore,
    pub(crate) selection: Selection,
    pub(crate) clipboard: Clipboard,
    pub(crate) history: History,
    pub(crate) canvas_size: CanvasSize,
    pub(crate) grid_size: f32,
    pub(crate) snap_to_grid: bool,
    pub(crate) viewport: Viewport,
    pub(crate) paste_offset: f32,
    pub(crate) copy_suffix: String,
}

impl Document {
    /// Create an empty document from the given settings.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        let store = ElementStore::new();
        Self {
            history: History::new(&store),
            store,
            selection: Selection::default(),
            clipboard: Clipboard::default(),
            canvas_size: config.canvas_size,
            grid_size: config.grid_size,
            snap_to_grid: config.snap_to_grid,
            viewport: Viewport::default(),
            paste_offset: config.paste_offset,
            copy_suffix: config.copy_suffix.clone(),
        }
    }

    /// All elements.
    #[must_use]
    pub fn elements(&self) -> &ElementStore {
        &self.store
    }

    /// Get an element by ID.
    #[must_use]
    pub fn element(&self, id: &ElementId) -> Option<&Element> {
        self.store.get(id)
    }

    /// Get an element by ID, failing if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for unknown ids.
    pub fn try_element(&self, id: &ElementId) -> CanvasResult<&Element> {
        self.store
            .get(id)
            .ok_or_else(|| CanvasError::ElementNotFound(id.to_string()))
    }

    /// Top-level z-order, back-to-front.
    #[must_use]
    pub fn element_order(&self) -> &[ElementId] {
        self.store.order()
    }

    /// Selected ids.
    #[must_use]
    pub fn selected_ids(&self) -> &[ElementId] {
        self.selection.ids()
    }

    /// Hovered element.
    #[must_use]
    pub fn hovered_id(&self) -> Option<&ElementId> {
        self.selection.hovered()
    }

    /// Clipboard contents.
    #[must_use]
    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    /// Undo history.
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Current history cursor.
    #[must_use]
    pub fn history_index(&self) -> usize {
        self.history.index()
    }

    /// Widget canvas size.
    #[must_use]
    pub fn canvas_size(&self) -> CanvasSize {
        self.canvas_size
    }

    /// Grid spacing.
    #[must_use]
    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    /// Whether snapping is on.
    #[must_use]
    pub fn snap_to_grid(&self) -> bool {
        self.snap_to_grid
    }

    /// Pan and zoom.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Borrow everything the renderer needs for one frame.
    #[must_use]
    pub fn render_view(&self) -> RenderView<'_> {
        RenderView {
            elements: &self.store,
            element_order: self.store.order(),
            selected_ids: self.selection.ids(),
            hovered_id: self.selection.hovered(),
        }
    }

    /// Absolute frame of an element, for hit-testing and selection handles.
    #[must_use]
    pub fn absolute_bounds(&self, id: &ElementId) -> Option<Rect> {
        self.store.absolute_rect(id)
    }

    /// Find the topmost top-level element under a screen-space point.
    #[must_use]
    pub fn element_at(&self, x: f32, y: f32) -> Option<ElementId> {
        // Transform screen coordinates to canvas coordinates
        let canvas_x = (x - self.viewport.pan_x) / self.viewport.zoom;
        let canvas_y = (y - self.viewport.pan_y) / self.viewport.zoom;
        self.store.hit_test(canvas_x, canvas_y)
    }

    /// Capture the persistable part of the document.
    #[must_use]
    pub fn snapshot(&self) -> DocumentSnapshot {
        DocumentSnapshot {
            elements: self.store.paint_order().into_iter().cloned().collect(),
            element_order: self.store.order().to_vec(),
            canvas_size: self.canvas_size,
        }
    }

    /// Verify every structural invariant, including the history cursor.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvariantViolation`] describing the first
    /// broken invariant.
    pub fn check_invariants(&self) -> CanvasResult<()> {
        self.store.check_invariants()?;
        if self.history.index() >= self.history.len() {
            return Err(CanvasError::InvariantViolation(format!(
                "history index {} out of range for {} entries",
                self.history.index(),
                self.history.len()
            )));
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

/// Persistable document content exchanged with the storage collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Every element, in paint order.
    pub elements: Vec<Element>,
    /// Top-level z-order, back-to-front.
    pub element_order: Vec<ElementId>,
    /// Widget canvas size.
    #[serde(default)]
    pub canvas_size: CanvasSize,
}

impl DocumentSnapshot {
    /// Check that the snapshot describes a structurally valid document.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::InvalidDocument`] for duplicate ids and
    /// [`CanvasError::InvariantViolation`] for broken structure.
    pub fn validate(&self) -> CanvasResult<()> {
        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(&element.id) {
                return Err(CanvasError::InvalidDocument(format!(
                    "duplicate element id {}",
                    element.id
                )));
            }
        }
        self.to_store().check_invariants()
    }

    /// Build element storage from this snapshot.
    #[must_use]
    pub fn to_store(&self) -> ElementStore {
        ElementStore::from_elements(self.elements.clone(), self.element_order.clone())
    }

    /// Serialize the snapshot to pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string_pretty(self).map_err(CanvasError::Serialization)
    }

    /// Deserialize a snapshot from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails.
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        serde_json::from_str(json).map_err(CanvasError::Serialization)
    }
}
