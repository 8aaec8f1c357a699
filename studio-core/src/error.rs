//! Error types for canvas operations.
//!
//! The reducer itself never fails: invalid requests are no-ops. Errors only
//! surface at the boundaries where documents enter or leave the engine.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Element not found in the document.
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// A structural invariant of the document does not hold.
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),

    /// A document handed to the engine is malformed.
    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
