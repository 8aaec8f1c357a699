//! Copy/paste holding area, independent of history.
//!
//! The clipboard keeps value snapshots: copied roots are stored in absolute
//! space with their full group subtrees, so later edits to the document do
//! not leak into what gets pasted.

use std::collections::HashMap;

use crate::id::IdProvider;
use crate::store::ElementStore;
use crate::{Element, ElementId};

/// Snapshot of copied elements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Clipboard {
    /// Ids of the copied roots, back-to-front.
    roots: Vec<ElementId>,
    /// Roots followed by their descendants.
    elements: Vec<Element>,
}

impl Clipboard {
    /// Snapshot `ids` (and their subtrees) out of `store`.
    ///
    /// Unknown ids and ids covered by a copied ancestor are skipped.
    #[must_use]
    pub fn capture(store: &ElementStore, ids: &[ElementId]) -> Self {
        let mut clipboard = Self::default();
        for id in store.outermost(ids) {
            let (Some(root), Some(abs)) = (store.get(&id), store.absolute_rect(&id)) else {
                continue;
            };
            let mut root = root.clone();
            root.transform.x = abs.x;
            root.transform.y = abs.y;
            root.parent = None;
            clipboard.roots.push(id.clone());
            clipboard.elements.push(root);

            clipboard.elements.extend(
                store
                    .descendants(&id)
                    .iter()
                    .filter_map(|d| store.get(d))
                    .cloned(),
            );
        }
        clipboard
    }

    /// Whether nothing has been copied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    /// Number of copied elements, including group members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Ids the copied roots had when they were captured.
    #[must_use]
    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    /// All copied elements.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Insert a fresh copy of the clipboard into `store`.
    ///
    /// Every element gets a new id; roots are renamed with `suffix`, shifted
    /// by `offset` and placed front-most. Returns the new root ids.
    pub fn instantiate(
        &self,
        store: &mut ElementStore,
        id_provider: &mut dyn IdProvider,
        offset: (f32, f32),
        suffix: &str,
    ) -> Vec<ElementId> {
        let mut remap: HashMap<&ElementId, ElementId> = HashMap::with_capacity(self.elements.len());
        for element in &self.elements {
            let fresh = store.mint_id(id_provider);
            remap.insert(&element.id, fresh);
        }
        let lookup = |id: &ElementId| remap.get(id).cloned().unwrap_or_else(|| id.clone());

        let mut new_roots = Vec::with_capacity(self.roots.len());
        for element in &self.elements {
            let mut copy = element.clone();
            copy.id = lookup(&element.id);
            copy.parent = element.parent.as_ref().map(lookup);
            if let Some(children) = copy.children_mut() {
                for child in children.iter_mut() {
                    *child = lookup(child);
                }
            }
            if self.roots.contains(&element.id) {
                copy.name.push_str(suffix);
                copy.transform.x += offset.0;
                copy.transform.y += offset.1;
                new_roots.push(copy.id.clone());
            }
            store.insert(copy);
        }
        new_roots
    }

    /// Shift the copied roots so the next paste lands further along.
    pub fn advance(&mut self, offset: (f32, f32)) {
        for element in &mut self.elements {
            if self.roots.contains(&element.id) {
                element.transform.x += offset.0;
                element.transform.y += offset.1;
            }
        }
    }
}
