//! Transient selection and hover state. Never recorded in history.

use crate::store::ElementStore;
use crate::ElementId;

/// Ordered selection plus hover target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ElementId>,
    hovered: Option<ElementId>,
}

impl Selection {
    /// Selected ids, in selection order.
    #[must_use]
    pub fn ids(&self) -> &[ElementId] {
        &self.ids
    }

    /// Currently hovered element.
    #[must_use]
    pub fn hovered(&self) -> Option<&ElementId> {
        self.hovered.as_ref()
    }

    /// Whether an element is selected.
    #[must_use]
    pub fn contains(&self, id: &ElementId) -> bool {
        self.ids.contains(id)
    }

    /// Whether nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Replace the selection, dropping duplicates.
    pub fn set(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Toggle membership of each id, appending newly selected ones.
    pub fn toggle(&mut self, ids: impl IntoIterator<Item = ElementId>) {
        for id in ids {
            if let Some(pos) = self.ids.iter().position(|s| s == &id) {
                self.ids.remove(pos);
            } else {
                self.ids.push(id);
            }
        }
    }

    /// Deselect everything. Hover is left alone.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Set or clear the hover target.
    pub fn hover(&mut self, id: Option<ElementId>) {
        self.hovered = id;
    }

    /// Drop ids that no longer exist in `store`.
    pub fn retain_existing(&mut self, store: &ElementStore) {
        self.ids.retain(|id| store.contains(id));
        if self.hovered.as_ref().is_some_and(|id| !store.contains(id)) {
            self.hovered = None;
        }
    }
}
