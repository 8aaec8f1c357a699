//! Element id providers.
//!
//! The reducer never invents ids itself; it asks an injected provider so
//! tests can run against deterministic sequences.

use uuid::Uuid;

use crate::ElementId;

/// Source of fresh element ids.
pub trait IdProvider {
    /// Produce an id that this provider has never produced before.
    fn next_id(&mut self) -> ElementId;
}

/// Random v4 UUID ids. The default for interactive sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdProvider for UuidIds {
    fn next_id(&mut self) -> ElementId {
        ElementId::new(Uuid::new_v4().to_string())
    }
}

/// Monotonic counter ids of the form `{prefix}-{n}`, starting at 1.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl SequentialIds {
    /// Create a counter with the given prefix.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub fn issued(&self) -> u64 {
        self.next - 1
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("el")
    }
}

impl IdProvider for SequentialIds {
    fn next_id(&mut self) -> ElementId {
        let id = ElementId::new(format!("{}-{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

impl<P: IdProvider + ?Sized> IdProvider for &mut P {
    fn next_id(&mut self) -> ElementId {
        (**self).next_id()
    }
}
