//! Stateful front door: owns a document and an id source.

use crate::config::EditorConfig;
use crate::document::{Document, DocumentSnapshot};
use crate::id::{IdProvider, UuidIds};
use crate::reducer::{self, Action, Outcome};
use crate::CanvasResult;

/// Owns the current document and feeds actions through the reducer.
#[derive(Debug)]
pub struct Editor<P: IdProvider = UuidIds> {
    document: Document,
    ids: P,
}

impl Editor<UuidIds> {
    /// Create an editor with an empty document and random ids.
    #[must_use]
    pub fn new(config: &EditorConfig) -> Self {
        Self::with_ids(config, UuidIds)
    }
}

impl Default for Editor<UuidIds> {
    fn default() -> Self {
        Self::new(&EditorConfig::default())
    }
}

impl<P: IdProvider> Editor<P> {
    /// Create an editor with a custom id source.
    #[must_use]
    pub fn with_ids(config: &EditorConfig, ids: P) -> Self {
        Self {
            document: Document::new(config),
            ids,
        }
    }

    /// The current document.
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Give up the editor, keeping the document.
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    /// Apply one action.
    pub fn dispatch(&mut self, action: Action) -> Outcome {
        let span = tracing::debug_span!("dispatch", action = action.name());
        let _guard = span.enter();
        let outcome = reducer::apply(&mut self.document, action, &mut self.ids);
        debug_assert!(
            self.document.check_invariants().is_ok(),
            "document invariants broken: {:?}",
            self.document.check_invariants()
        );
        outcome
    }

    /// Apply actions in order, returning how many changed content.
    pub fn dispatch_all(&mut self, actions: impl IntoIterator<Item = Action>) -> usize {
        actions
            .into_iter()
            .map(|action| self.dispatch(action))
            .filter(|outcome| matches!(outcome, Outcome::Committed | Outcome::Restored))
            .count()
    }

    /// Validate and load a snapshot, replacing the document content.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot is structurally invalid; the
    /// current document is left untouched.
    pub fn load_document(&mut self, snapshot: DocumentSnapshot) -> CanvasResult<Outcome> {
        if let Err(e) = snapshot.validate() {
            tracing::warn!("Rejected document snapshot: {}", e);
            return Err(e);
        }
        Ok(self.dispatch(Action::LoadDocument { snapshot }))
    }
}
