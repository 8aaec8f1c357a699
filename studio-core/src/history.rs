//! Linear undo/redo history of document snapshots.
//!
//! Each entry shares structure with the live store, so committing is a
//! couple of reference-count bumps rather than a deep copy. Every commit
//! after an undo drops the undone future for good.

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::store::{ElementMap, ElementStore};
use crate::ElementId;

/// An immutable snapshot of document content.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    elements: Arc<ElementMap>,
    element_order: Arc<Vec<ElementId>>,
    timestamp_ms: u64,
}

impl HistoryEntry {
    /// Snapshot a store at the given time.
    #[must_use]
    pub fn new(store: &ElementStore, timestamp_ms: u64) -> Self {
        Self {
            elements: store.shared_elements(),
            element_order: store.shared_order(),
            timestamp_ms,
        }
    }

    /// Rebuild a store sharing this entry's content.
    #[must_use]
    pub fn store(&self) -> ElementStore {
        ElementStore::from_shared(Arc::clone(&self.elements), Arc::clone(&self.element_order))
    }

    /// Top-level order captured by this entry.
    #[must_use]
    pub fn element_order(&self) -> &[ElementId] {
        &self.element_order
    }

    /// Number of elements captured by this entry.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// When the entry was committed (ms since epoch).
    #[must_use]
    pub fn timestamp_ms(&self) -> u64 {
        self.timestamp_ms
    }
}

impl PartialEq for HistoryEntry {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp_ms == other.timestamp_ms && self.store().same_content(&other.store())
    }
}

/// Snapshot list plus cursor.
///
/// Never empty: `index < entries.len()` always holds.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    /// Start a history whose only entry is `initial`.
    #[must_use]
    pub fn new(initial: &ElementStore) -> Self {
        Self {
            entries: vec![HistoryEntry::new(initial, current_timestamp_ms())],
            index: 0,
        }
    }

    /// Record a new snapshot, discarding any undone entries after the cursor.
    pub fn commit(&mut self, store: &ElementStore) {
        let discarded = self.entries.len() - (self.index + 1);
        if discarded > 0 {
            tracing::debug!("Discarding {discarded} undone history entries");
        }
        self.entries.truncate(self.index + 1);
        self.entries
            .push(HistoryEntry::new(store, current_timestamp_ms()));
        self.index = self.entries.len() - 1;
    }

    /// Step back one entry, returning the store to restore.
    pub fn undo(&mut self) -> Option<ElementStore> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        tracing::trace!("History cursor moved back to {}", self.index);
        Some(self.entries[self.index].store())
    }

    /// Step forward one entry, returning the store to restore.
    pub fn redo(&mut self) -> Option<ElementStore> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        tracing::trace!("History cursor moved forward to {}", self.index);
        Some(self.entries[self.index].store())
    }

    /// Replace all history with a single entry for `store`.
    pub fn reset(&mut self, store: &ElementStore) {
        *self = Self::new(store);
    }

    /// Current cursor position.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a history holds at least one entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Whether an undo would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.index > 0
    }

    /// Whether a redo would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.index + 1 < self.entries.len()
    }
}

/// Get the current Unix timestamp in milliseconds.
#[must_use]
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| {
        // Timestamp will not exceed u64 max for millennia
        #[allow(clippy::cast_possible_truncation)]
        {
            d.as_millis() as u64
        }
    })
}
