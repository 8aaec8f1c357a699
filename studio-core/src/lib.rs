//! # Widget Studio Core
//!
//! Document and state engine for the widget design canvas.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                  Editor                     │
//! │        dispatch(Action) -> Outcome          │
//! ├─────────────────────────────────────────────┤
//! │  Reducer          │  Document               │
//! │  - Element edits  │  - ElementStore         │
//! │  - Snapping       │  - History              │
//! │  - Clipboard      │  - Selection / hover    │
//! ├─────────────────────────────────────────────┤
//! │  Grouping         │  Geometry               │
//! │  - Local space    │  - Rects / unions       │
//! │  - Re-bounding    │  - Grid snap / align    │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Every change goes through [`reduce`] (pure) or [`Editor::dispatch`]
//! (in place). Element edits commit one history entry each; selection,
//! hover, viewport and clipboard changes never do.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod clipboard;
pub mod config;
pub mod document;
pub mod editor;
pub mod element;
pub mod error;
pub mod geometry;
pub mod grouping;
pub mod history;
pub mod id;
pub mod reducer;
pub mod selection;
pub mod store;

pub use clipboard::Clipboard;
pub use config::EditorConfig;
pub use document::{CanvasSize, Document, DocumentSnapshot, RenderView, Viewport};
pub use editor::Editor;
pub use element::{
    Element, ElementDraft, ElementId, ElementKind, ElementPatch, ImageFit, Style, StylePatch,
    TextAlign, TextStyle, TextStylePatch, Transform, TransformPatch,
};
pub use error::{CanvasError, CanvasResult};
pub use geometry::{Alignment, Rect};
pub use history::{History, HistoryEntry};
pub use id::{IdProvider, SequentialIds, UuidIds};
pub use reducer::{reduce, Action, Outcome, ReorderTarget};
pub use selection::Selection;
pub use store::ElementStore;

/// Studio core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
