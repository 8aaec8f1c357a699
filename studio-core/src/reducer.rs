//! Actions and the reducer: the only way a document changes.
//!
//! Element-affecting actions commit exactly one history entry when they
//! change `(elements, element_order)` and nothing otherwise. Selection,
//! hover, viewport and grid actions never touch history.

use serde::{Deserialize, Serialize};

use crate::clipboard::Clipboard;
use crate::document::{CanvasSize, Document, DocumentSnapshot};
use crate::geometry::{self, Alignment, Rect};
use crate::grouping;
use crate::id::IdProvider;
use crate::selection::Selection;
use crate::store::ElementStore;
use crate::{Element, ElementDraft, ElementId, ElementKind, ElementPatch};

/// Smallest allowed zoom factor.
pub const MIN_ZOOM: f32 = 0.1;

/// Largest allowed zoom factor.
pub const MAX_ZOOM: f32 = 8.0;

/// Where to move an element within its sibling list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReorderTarget {
    /// Front-most.
    Front,
    /// Back-most.
    Back,
    /// One step towards the front.
    Forward,
    /// One step towards the back.
    Backward,
    /// An explicit index, clamped to the list.
    Index(usize),
}

impl ReorderTarget {
    fn resolve(self, from: usize, last: usize) -> usize {
        match self {
            Self::Front => last,
            Self::Back => 0,
            Self::Forward => (from + 1).min(last),
            Self::Backward => from.saturating_sub(1),
            Self::Index(index) => index.min(last),
        }
    }
}

/// Everything that can happen to a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    /// Add a new top-level element and select it.
    Add {
        /// What to create.
        draft: ElementDraft,
    },
    /// Patch an existing element field-by-field.
    Update {
        /// Element to patch.
        id: ElementId,
        /// Fields to change.
        patch: ElementPatch,
    },
    /// Delete elements and their subtrees. Locked elements are skipped.
    Delete {
        /// Elements to delete.
        ids: Vec<ElementId>,
    },
    /// Move elements by a delta, snapping the result.
    Move {
        /// Elements to move.
        ids: Vec<ElementId>,
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta.
        dy: f32,
    },
    /// Resize elements, snapping the result.
    Resize {
        /// Elements to resize.
        ids: Vec<ElementId>,
        /// New width.
        width: f32,
        /// New height.
        height: f32,
        /// New absolute left edge.
        #[serde(default)]
        x: Option<f32>,
        /// New absolute top edge.
        #[serde(default)]
        y: Option<f32>,
    },
    /// Change an element's stacking position among its siblings.
    Reorder {
        /// Element to restack.
        id: ElementId,
        /// Destination.
        target: ReorderTarget,
    },
    /// Line elements up along an edge or center.
    ///
    /// Several elements align to their common bounds; a single element
    /// aligns to the canvas.
    Align {
        /// Elements to align.
        ids: Vec<ElementId>,
        /// Edge or center.
        alignment: Alignment,
    },
    /// Copy elements in place with an offset and select the copies.
    Duplicate {
        /// Elements to duplicate.
        ids: Vec<ElementId>,
    },
    /// Copy elements to the clipboard.
    Copy {
        /// Elements to copy.
        ids: Vec<ElementId>,
    },
    /// Copy elements to the clipboard and delete them.
    Cut {
        /// Elements to cut.
        ids: Vec<ElementId>,
    },
    /// Insert the clipboard contents and select them.
    Paste,
    /// Group top-level elements.
    Group {
        /// Elements to group.
        ids: Vec<ElementId>,
    },
    /// Dissolve a group.
    Ungroup {
        /// Group to dissolve.
        id: ElementId,
    },
    /// Replace or toggle the selection.
    Select {
        /// Elements to select.
        ids: Vec<ElementId>,
        /// Toggle membership instead of replacing.
        #[serde(default)]
        additive: bool,
    },
    /// Select every top-level element.
    SelectAll,
    /// Deselect everything.
    ClearSelection,
    /// Set or clear the hovered element.
    Hover {
        /// Hovered element.
        #[serde(default)]
        id: Option<ElementId>,
    },
    /// Pan the viewport.
    Pan {
        /// Horizontal delta.
        dx: f32,
        /// Vertical delta.
        dy: f32,
    },
    /// Set the zoom factor.
    Zoom {
        /// New zoom, clamped to [`MIN_ZOOM`]..=[`MAX_ZOOM`].
        zoom: f32,
    },
    /// Set the grid spacing.
    SetGridSize {
        /// New spacing, must be positive.
        size: f32,
    },
    /// Turn snapping on or off.
    SetSnapToGrid {
        /// Whether to snap.
        enabled: bool,
    },
    /// Flip snapping.
    ToggleSnapToGrid,
    /// Resize the widget canvas.
    SetCanvasSize {
        /// New size.
        size: CanvasSize,
    },
    /// Step back in history.
    Undo,
    /// Step forward in history.
    Redo,
    /// Replace the document and reset history.
    LoadDocument {
        /// Content to load.
        snapshot: DocumentSnapshot,
    },
}

impl Action {
    /// Short name for logs.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::Move { .. } => "move",
            Self::Resize { .. } => "resize",
            Self::Reorder { .. } => "reorder",
            Self::Align { .. } => "align",
            Self::Duplicate { .. } => "duplicate",
            Self::Copy { .. } => "copy",
            Self::Cut { .. } => "cut",
            Self::Paste => "paste",
            Self::Group { .. } => "group",
            Self::Ungroup { .. } => "ungroup",
            Self::Select { .. } => "select",
            Self::SelectAll => "select_all",
            Self::ClearSelection => "clear_selection",
            Self::Hover { .. } => "hover",
            Self::Pan { .. } => "pan",
            Self::Zoom { .. } => "zoom",
            Self::SetGridSize { .. } => "set_grid_size",
            Self::SetSnapToGrid { .. } => "set_snap_to_grid",
            Self::ToggleSnapToGrid => "toggle_snap_to_grid",
            Self::SetCanvasSize { .. } => "set_canvas_size",
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::LoadDocument { .. } => "load_document",
        }
    }
}

/// What an action did to the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    /// Content changed and a history entry was committed.
    Committed,
    /// Content was restored from history (undo, redo, load).
    Restored,
    /// Only transient state (selection, viewport, clipboard, grid) changed.
    Transient,
    /// Nothing happened.
    Unchanged,
}

/// Apply an action to a copy of `state`, leaving `state` untouched.
#[must_use]
pub fn reduce(state: &Document, action: Action, id_provider: &mut dyn IdProvider) -> Document {
    let mut next = state.clone();
    apply(&mut next, action, id_provider);
    next
}

/// Apply an action in place.
pub fn apply(doc: &mut Document, action: Action, id_provider: &mut dyn IdProvider) -> Outcome {
    let name = action.name();
    let outcome = match action {
        Action::Add { draft } => add(doc, draft, id_provider),
        Action::Update { id, patch } => update(doc, &id, &patch),
        Action::Delete { ids } => delete(doc, &ids),
        Action::Move { ids, dx, dy } => move_by(doc, &ids, dx, dy),
        Action::Resize {
            ids,
            width,
            height,
            x,
            y,
        } => resize(doc, &ids, (width, height), (x, y)),
        Action::Reorder { id, target } => reorder(doc, &id, target),
        Action::Align { ids, alignment } => align(doc, &ids, alignment),
        Action::Duplicate { ids } => duplicate(doc, &ids, id_provider),
        Action::Copy { ids } => copy(doc, &ids),
        Action::Cut { ids } => cut(doc, &ids),
        Action::Paste => paste(doc, id_provider),
        Action::Group { ids } => group(doc, &ids, id_provider),
        Action::Ungroup { id } => ungroup(doc, &id),
        Action::Select { ids, additive } => {
            let existing: Vec<ElementId> =
                ids.into_iter().filter(|id| doc.store.contains(id)).collect();
            if additive {
                doc.selection.toggle(existing);
            } else {
                doc.selection.set(existing);
            }
            Outcome::Transient
        }
        Action::SelectAll => {
            doc.selection.set(doc.store.order().to_vec());
            Outcome::Transient
        }
        Action::ClearSelection => {
            doc.selection.clear();
            Outcome::Transient
        }
        Action::Hover { id } => {
            if id.as_ref().is_some_and(|id| !doc.store.contains(id)) {
                tracing::debug!("Ignoring hover over unknown element");
                Outcome::Unchanged
            } else {
                doc.selection.hover(id);
                Outcome::Transient
            }
        }
        Action::Pan { dx, dy } => {
            doc.viewport.pan_x += dx;
            doc.viewport.pan_y += dy;
            Outcome::Transient
        }
        Action::Zoom { zoom } => {
            if zoom.is_finite() && zoom > 0.0 {
                doc.viewport.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
                Outcome::Transient
            } else {
                Outcome::Unchanged
            }
        }
        Action::SetGridSize { size } => {
            if size.is_finite() && size > 0.0 {
                doc.grid_size = size;
                Outcome::Transient
            } else {
                Outcome::Unchanged
            }
        }
        Action::SetSnapToGrid { enabled } => {
            doc.snap_to_grid = enabled;
            Outcome::Transient
        }
        Action::ToggleSnapToGrid => {
            doc.snap_to_grid = !doc.snap_to_grid;
            Outcome::Transient
        }
        Action::SetCanvasSize { size } => {
            doc.canvas_size = size;
            Outcome::Transient
        }
        Action::Undo => match doc.history.undo() {
            Some(store) => restore(doc, store),
            None => Outcome::Unchanged,
        },
        Action::Redo => match doc.history.redo() {
            Some(store) => restore(doc, store),
            None => Outcome::Unchanged,
        },
        Action::LoadDocument { snapshot } => match snapshot.validate() {
            Err(e) => {
                tracing::warn!("Rejected document snapshot: {}", e);
                Outcome::Unchanged
            }
            Ok(()) => {
                doc.store = snapshot.to_store();
                doc.history.reset(&doc.store);
                doc.selection = Selection::default();
                doc.canvas_size = snapshot.canvas_size;
                tracing::info!("Loaded document with {} elements", doc.store.len());
                Outcome::Restored
            }
        },
    };
    tracing::debug!("Action {name}: {outcome:?}");
    outcome
}

/// Run an element edit and commit it if the content changed.
///
/// The closure returns the selection to install on commit, if any.
fn edit<F>(doc: &mut Document, f: F) -> Outcome
where
    F: FnOnce(&mut ElementStore) -> Option<Vec<ElementId>>,
{
    let before = doc.store.clone();
    let selection = f(&mut doc.store);
    if doc.store.same_content(&before) {
        doc.store = before;
        return Outcome::Unchanged;
    }
    doc.history.commit(&doc.store);
    if let Some(selection) = selection {
        doc.selection.set(selection);
    }
    doc.selection.retain_existing(&doc.store);
    Outcome::Committed
}

fn restore(doc: &mut Document, store: ElementStore) -> Outcome {
    doc.store = store;
    doc.selection.clear();
    doc.selection.retain_existing(&doc.store);
    Outcome::Restored
}

/// Outermost existing targets that are not locked.
fn unlocked_targets(store: &ElementStore, ids: &[ElementId]) -> Vec<ElementId> {
    store
        .outermost(ids)
        .into_iter()
        .filter(|id| store.get(id).is_some_and(|e| !e.locked))
        .collect()
}

fn add(doc: &mut Document, draft: ElementDraft, id_provider: &mut dyn IdProvider) -> Outcome {
    if matches!(draft.kind, ElementKind::Group { .. }) {
        tracing::debug!("Groups are created by grouping, not by adding");
        return Outcome::Unchanged;
    }
    edit(doc, |store| {
        let id = store.mint_id(id_provider);
        store.insert(draft.into_element(id.clone()));
        Some(vec![id])
    })
}

fn update(doc: &mut Document, id: &ElementId, patch: &ElementPatch) -> Outcome {
    if !doc.store.contains(id) {
        tracing::debug!("Ignoring update of unknown element {id}");
        return Outcome::Unchanged;
    }
    edit(doc, |store| {
        if let Some(element) = store.get_mut(id) {
            patch.apply_attributes(element);
        }
        if let Some(transform_patch) = &patch.transform {
            if let Some(current) = store.get(id).map(|e| e.transform) {
                grouping::set_transform(store, id, transform_patch.apply(&current));
            }
        }
        None
    })
}

fn delete(doc: &mut Document, ids: &[ElementId]) -> Outcome {
    let targets = unlocked_targets(&doc.store, ids);
    if targets.is_empty() {
        return Outcome::Unchanged;
    }
    edit(doc, |store| {
        for id in &targets {
            grouping::remove_subtree(store, id);
        }
        None
    })
}

fn move_by(doc: &mut Document, ids: &[ElementId], dx: f32, dy: f32) -> Outcome {
    let targets = unlocked_targets(&doc.store, ids);
    if targets.is_empty() {
        return Outcome::Unchanged;
    }
    let (grid, snap_on) = (doc.grid_size, doc.snap_to_grid);
    edit(doc, |store| {
        for id in &targets {
            let (Some(element), Some(abs)) = (store.get(id), store.absolute_rect(id)) else {
                continue;
            };
            let mut transform = element.transform;
            let (ox, oy) = store.parent_origin(id);
            transform.x = geometry::snap(abs.x + dx, grid, snap_on) - ox;
            transform.y = geometry::snap(abs.y + dy, grid, snap_on) - oy;
            grouping::set_transform(store, id, transform);
        }
        None
    })
}

fn resize(
    doc: &mut Document,
    ids: &[ElementId],
    (width, height): (f32, f32),
    (x, y): (Option<f32>, Option<f32>),
) -> Outcome {
    let targets = unlocked_targets(&doc.store, ids);
    if targets.is_empty() {
        return Outcome::Unchanged;
    }
    let (grid, snap_on) = (doc.grid_size, doc.snap_to_grid);
    edit(doc, |store| {
        for id in &targets {
            let Some(element) = store.get(id) else {
                continue;
            };
            let mut transform = element.transform;
            let (ox, oy) = store.parent_origin(id);
            transform.width = geometry::snap_size(width, grid, snap_on);
            transform.height = geometry::snap_size(height, grid, snap_on);
            if let Some(x) = x {
                transform.x = geometry::snap(x, grid, snap_on) - ox;
            }
            if let Some(y) = y {
                transform.y = geometry::snap(y, grid, snap_on) - oy;
            }
            grouping::set_transform(store, id, transform);
        }
        None
    })
}

fn reorder(doc: &mut Document, id: &ElementId, target: ReorderTarget) -> Outcome {
    let Some(siblings) = doc.store.siblings(id) else {
        tracing::debug!("Ignoring reorder of unknown element {id}");
        return Outcome::Unchanged;
    };
    let Some(from) = siblings.iter().position(|sid| sid == id) else {
        return Outcome::Unchanged;
    };
    let to = target.resolve(from, siblings.len() - 1);
    if to == from {
        return Outcome::Unchanged;
    }
    let parent = doc.store.get(id).and_then(|e| e.parent.clone());
    edit(doc, |store| {
        if let Some(siblings) = store.siblings_mut(parent.as_ref()) {
            let moved = siblings.remove(from);
            siblings.insert(to, moved);
        }
        None
    })
}

fn align(doc: &mut Document, ids: &[ElementId], alignment: Alignment) -> Outcome {
    let targets = doc.store.outermost(ids);
    let reference = if targets.len() == 1 {
        Some(Rect::new(
            0.0,
            0.0,
            doc.canvas_size.width,
            doc.canvas_size.height,
        ))
    } else {
        geometry::union_all(targets.iter().filter_map(|id| doc.store.absolute_rect(id)))
    };
    let Some(reference) = reference else {
        return Outcome::Unchanged;
    };
    edit(doc, |store| {
        for id in &targets {
            let (Some(element), Some(abs)) = (store.get(id), store.absolute_rect(id)) else {
                continue;
            };
            if element.locked {
                continue;
            }
            let (dx, dy) = alignment.offset(&abs, &reference);
            let mut transform = element.transform;
            transform.x += dx;
            transform.y += dy;
            grouping::set_transform(store, id, transform);
        }
        None
    })
}

fn duplicate(doc: &mut Document, ids: &[ElementId], id_provider: &mut dyn IdProvider) -> Outcome {
    let copied = Clipboard::capture(&doc.store, ids);
    if copied.is_empty() {
        return Outcome::Unchanged;
    }
    let offset = (doc.paste_offset, doc.paste_offset);
    let suffix = doc.copy_suffix.clone();
    edit(doc, |store| {
        Some(copied.instantiate(store, id_provider, offset, &suffix))
    })
}

fn copy(doc: &mut Document, ids: &[ElementId]) -> Outcome {
    let copied = Clipboard::capture(&doc.store, ids);
    if copied.is_empty() {
        return Outcome::Unchanged;
    }
    tracing::debug!("Copied {} elements", copied.len());
    doc.clipboard = copied;
    Outcome::Transient
}

fn cut(doc: &mut Document, ids: &[ElementId]) -> Outcome {
    let targets = unlocked_targets(&doc.store, ids);
    if targets.is_empty() {
        return Outcome::Unchanged;
    }
    let copied = Clipboard::capture(&doc.store, &targets);
    let outcome = edit(doc, |store| {
        for id in &targets {
            grouping::remove_subtree(store, id);
        }
        None
    });
    if outcome == Outcome::Committed {
        doc.clipboard = copied;
    }
    outcome
}

fn paste(doc: &mut Document, id_provider: &mut dyn IdProvider) -> Outcome {
    if doc.clipboard.is_empty() {
        return Outcome::Unchanged;
    }
    let clipboard = doc.clipboard.clone();
    let offset = (doc.paste_offset, doc.paste_offset);
    let suffix = doc.copy_suffix.clone();
    let outcome = edit(doc, |store| {
        Some(clipboard.instantiate(store, id_provider, offset, &suffix))
    });
    if outcome == Outcome::Committed {
        doc.clipboard.advance(offset);
    }
    outcome
}

fn group(doc: &mut Document, ids: &[ElementId], id_provider: &mut dyn IdProvider) -> Outcome {
    if ids.len() < 2 {
        tracing::debug!("Ignoring group of {} elements", ids.len());
        return Outcome::Unchanged;
    }
    edit(doc, |store| {
        grouping::group(store, ids, id_provider).map(|group_id| vec![group_id])
    })
}

fn ungroup(doc: &mut Document, id: &ElementId) -> Outcome {
    if !doc.store.get(id).is_some_and(Element::is_group) {
        tracing::debug!("Ignoring ungroup of non-group {id}");
        return Outcome::Unchanged;
    }
    edit(doc, |store| grouping::ungroup(store, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::id::SequentialIds;
    use crate::{Transform, TransformPatch};

    fn rect_draft(x: f32, y: f32) -> ElementDraft {
        ElementDraft::new(ElementKind::Rectangle { corner_radius: 0.0 })
            .with_transform(Transform::new(x, y, 10.0, 10.0))
    }

    fn doc_with(rects: &[(f32, f32)]) -> (Document, SequentialIds) {
        let mut doc = Document::default();
        let mut ids = SequentialIds::default();
        for (x, y) in rects {
            apply(
                &mut doc,
                Action::Add {
                    draft: rect_draft(*x, *y),
                },
                &mut ids,
            );
        }
        (doc, ids)
    }

    fn id(raw: &str) -> ElementId {
        ElementId::from(raw)
    }

    #[test]
    fn test_reduce_leaves_input_untouched() {
        let (doc, mut ids) = doc_with(&[(0.0, 0.0)]);
        let before = doc.clone();
        let next = reduce(
            &doc,
            Action::Move {
                ids: vec![id("el-1")],
                dx: 5.0,
                dy: 0.0,
            },
            &mut ids,
        );
        assert_eq!(doc, before);
        assert_ne!(next, doc);
        assert_eq!(next.history().len(), doc.history().len() + 1);
    }

    #[test]
    fn test_add_selects_and_commits() {
        let (doc, _) = doc_with(&[(0.0, 0.0)]);
        assert_eq!(doc.selected_ids(), &[id("el-1")]);
        assert_eq!(doc.history().len(), 2);
        assert_eq!(doc.element(&id("el-1")).map(|e| e.name.as_str()), Some("Rectangle"));
    }

    #[test]
    fn test_add_group_kind_is_rejected() {
        let (mut doc, mut ids) = doc_with(&[]);
        let outcome = apply(
            &mut doc,
            Action::Add {
                draft: ElementDraft::new(ElementKind::Group { children: vec![] }),
            },
            &mut ids,
        );
        assert_eq!(outcome, Outcome::Unchanged);
        assert!(doc.elements().is_empty());
    }

    #[test]
    fn test_update_unknown_is_noop() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0)]);
        let before = doc.clone();
        let outcome = apply(
            &mut doc,
            Action::Update {
                id: id("missing"),
                patch: ElementPatch::default(),
            },
            &mut ids,
        );
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_update_without_effect_does_not_commit() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0)]);
        let outcome = apply(
            &mut doc,
            Action::Update {
                id: id("el-1"),
                patch: ElementPatch {
                    name: Some("Rectangle".to_string()),
                    ..ElementPatch::default()
                },
            },
            &mut ids,
        );
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(doc.history().len(), 2);
    }

    #[test]
    fn test_update_merges_transform() {
        let (mut doc, mut ids) = doc_with(&[(3.0, 4.0)]);
        let outcome = apply(
            &mut doc,
            Action::Update {
                id: id("el-1"),
                patch: ElementPatch {
                    transform: Some(TransformPatch {
                        width: Some(50.0),
                        ..TransformPatch::default()
                    }),
                    locked: Some(true),
                    ..ElementPatch::default()
                },
            },
            &mut ids,
        );
        assert_eq!(outcome, Outcome::Committed);
        let element = doc.element(&id("el-1")).expect("exists");
        assert_eq!(element.transform, Transform::new(3.0, 4.0, 50.0, 10.0));
        assert!(element.locked);
    }

    #[test]
    fn test_move_skips_locked_individually() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0), (50.0, 0.0)]);
        apply(
            &mut doc,
            Action::Update {
                id: id("el-1"),
                patch: ElementPatch {
                    locked: Some(true),
                    ..ElementPatch::default()
                },
            },
            &mut ids,
        );
        let outcome = apply(
            &mut doc,
            Action::Move {
                ids: vec![id("el-1"), id("el-2")],
                dx: 10.0,
                dy: 10.0,
            },
            &mut ids,
        );
        assert_eq!(outcome, Outcome::Committed);
        assert!((doc.element(&id("el-1")).expect("a").transform.x - 0.0).abs() < f32::EPSILON);
        assert!((doc.element(&id("el-2")).expect("b").transform.x - 60.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resize_snaps_size_and_position() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0)]);
        apply(&mut doc, Action::SetSnapToGrid { enabled: true }, &mut ids);
        apply(
            &mut doc,
            Action::Resize {
                ids: vec![id("el-1")],
                width: 21.0,
                height: 2.0,
                x: Some(13.0),
                y: None,
            },
            &mut ids,
        );
        let element = doc.element(&id("el-1")).expect("exists");
        assert_eq!(element.transform, Transform::new(16.0, 0.0, 24.0, 8.0));
    }

    #[test]
    fn test_reorder_within_top_level() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0), (0.0, 0.0), (0.0, 0.0)]);
        let outcome = apply(
            &mut doc,
            Action::Reorder {
                id: id("el-1"),
                target: ReorderTarget::Front,
            },
            &mut ids,
        );
        assert_eq!(outcome, Outcome::Committed);
        assert_eq!(doc.element_order(), &[id("el-2"), id("el-3"), id("el-1")]);

        let outcome = apply(
            &mut doc,
            Action::Reorder {
                id: id("el-1"),
                target: ReorderTarget::Forward,
            },
            &mut ids,
        );
        assert_eq!(outcome, Outcome::Unchanged);

        apply(
            &mut doc,
            Action::Reorder {
                id: id("el-1"),
                target: ReorderTarget::Index(1),
            },
            &mut ids,
        );
        assert_eq!(doc.element_order(), &[id("el-2"), id("el-1"), id("el-3")]);
    }

    #[test]
    fn test_align_left_and_single_to_canvas() {
        let (mut doc, mut ids) = doc_with(&[(10.0, 0.0), (40.0, 30.0)]);
        apply(
            &mut doc,
            Action::Align {
                ids: vec![id("el-1"), id("el-2")],
                alignment: Alignment::Left,
            },
            &mut ids,
        );
        assert!((doc.element(&id("el-2")).expect("b").transform.x - 10.0).abs() < f32::EPSILON);

        apply(
            &mut doc,
            Action::Align {
                ids: vec![id("el-2")],
                alignment: Alignment::Bottom,
            },
            &mut ids,
        );
        let bottom = doc.canvas_size().height - 10.0;
        assert!((doc.element(&id("el-2")).expect("b").transform.y - bottom).abs() < f32::EPSILON);
    }

    #[test]
    fn test_transient_actions_skip_history() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0)]);
        let history_len = doc.history().len();
        for action in [
            Action::SelectAll,
            Action::Hover { id: Some(id("el-1")) },
            Action::Pan { dx: 3.0, dy: 4.0 },
            Action::Zoom { zoom: 20.0 },
            Action::SetGridSize { size: 4.0 },
            Action::ToggleSnapToGrid,
            Action::Copy {
                ids: vec![id("el-1")],
            },
        ] {
            assert_eq!(apply(&mut doc, action, &mut ids), Outcome::Transient);
        }
        assert_eq!(doc.history().len(), history_len);
        assert!((doc.viewport().zoom - MAX_ZOOM).abs() < f32::EPSILON);
        assert!(doc.snap_to_grid());
        assert_eq!(doc.hovered_id(), Some(&id("el-1")));
    }

    #[test]
    fn test_invalid_settings_are_ignored() {
        let (mut doc, mut ids) = doc_with(&[]);
        assert_eq!(
            apply(&mut doc, Action::SetGridSize { size: 0.0 }, &mut ids),
            Outcome::Unchanged
        );
        assert_eq!(
            apply(&mut doc, Action::Zoom { zoom: f32::NAN }, &mut ids),
            Outcome::Unchanged
        );
        assert_eq!(
            apply(
                &mut doc,
                Action::Hover {
                    id: Some(id("ghost"))
                },
                &mut ids
            ),
            Outcome::Unchanged
        );
    }

    #[test]
    fn test_select_additive_toggles() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0), (0.0, 0.0)]);
        apply(
            &mut doc,
            Action::Select {
                ids: vec![id("el-1"), id("ghost")],
                additive: false,
            },
            &mut ids,
        );
        assert_eq!(doc.selected_ids(), &[id("el-1")]);
        apply(
            &mut doc,
            Action::Select {
                ids: vec![id("el-2"), id("el-1")],
                additive: true,
            },
            &mut ids,
        );
        assert_eq!(doc.selected_ids(), &[id("el-2")]);
    }

    #[test]
    fn test_cut_then_paste() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0)]);
        let outcome = apply(
            &mut doc,
            Action::Cut {
                ids: vec![id("el-1")],
            },
            &mut ids,
        );
        assert_eq!(outcome, Outcome::Committed);
        assert!(doc.elements().is_empty());
        assert!(doc.selected_ids().is_empty());

        apply(&mut doc, Action::Paste, &mut ids);
        let pasted = doc.selected_ids()[0].clone();
        assert_ne!(pasted, id("el-1"));
        let element = doc.element(&pasted).expect("pasted");
        assert_eq!(element.name, "Rectangle Copy");
        assert!((element.transform.x - 20.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_paste_with_empty_clipboard_is_noop() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0)]);
        assert_eq!(apply(&mut doc, Action::Paste, &mut ids), Outcome::Unchanged);
    }

    #[test]
    fn test_load_document_resets_history_keeps_clipboard() {
        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0), (5.0, 5.0)]);
        apply(
            &mut doc,
            Action::Copy {
                ids: vec![id("el-1")],
            },
            &mut ids,
        );
        let snapshot = Document::new(&EditorConfig::default()).snapshot();
        let outcome = apply(&mut doc, Action::LoadDocument { snapshot }, &mut ids);

        assert_eq!(outcome, Outcome::Restored);
        assert_eq!(doc.history().len(), 1);
        assert_eq!(doc.history_index(), 0);
        assert!(doc.elements().is_empty());
        assert!(!doc.clipboard().is_empty());
        assert_eq!(apply(&mut doc, Action::Undo, &mut ids), Outcome::Unchanged);
    }

    #[test]
    fn test_load_document_rejects_invalid_snapshot() {
        let (source, _) = doc_with(&[(40.0, 40.0)]);
        let mut orphaned = source.snapshot();
        orphaned.element_order.clear();

        let (mut doc, mut ids) = doc_with(&[(0.0, 0.0)]);
        let before = doc.clone();
        let next = reduce(
            &doc,
            Action::LoadDocument {
                snapshot: orphaned.clone(),
            },
            &mut ids,
        );
        assert_eq!(next, before);

        let outcome = apply(&mut doc, Action::LoadDocument { snapshot: orphaned }, &mut ids);
        assert_eq!(outcome, Outcome::Unchanged);
        assert_eq!(doc, before);
        assert!(doc.check_invariants().is_ok());
    }

    #[test]
    fn test_action_json_shape() {
        let action: Action = serde_json::from_str(
            r#"{"type": "move", "ids": ["a"], "dx": 1.5, "dy": -2}"#,
        )
        .expect("parse");
        assert_eq!(
            action,
            Action::Move {
                ids: vec![id("a")],
                dx: 1.5,
                dy: -2.0
            }
        );
        let undo: Action = serde_json::from_str(r#"{"type": "undo"}"#).expect("parse");
        assert_eq!(undo, Action::Undo);
        let reorder: Action = serde_json::from_str(
            r#"{"type": "reorder", "id": "a", "target": {"index": 2}}"#,
        )
        .expect("parse");
        assert_eq!(reorder.name(), "reorder");
    }
}
