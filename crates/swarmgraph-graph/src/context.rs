//! Per-node context log.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Maximum number of entries kept per node.
pub const CONTEXT_CAPACITY: usize = 50;

/// Identifier of a context entry, unique within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(pub u64);

/// Who produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Written by the simulation when a signal arrives
    System,
    /// Injected by hand
    User,
}

/// One item in a node's context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub id: EntryId,
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub content: String,
}

/// An entry that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryDraft {
    pub kind: EntryKind,
    pub content: String,
}

impl EntryDraft {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::User,
            content: content.into(),
        }
    }
}

/// Newest-first log bounded to [`CONTEXT_CAPACITY`] entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextLog {
    entries: VecDeque<ContextEntry>,
}

impl ContextLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a batch in front of the log, keeping the batch's own order, then
    /// drop the oldest entries past capacity.
    pub fn prepend(&mut self, batch: Vec<ContextEntry>) {
        for entry in batch.into_iter().rev() {
            self.entries.push_front(entry);
        }
        self.entries.truncate(CONTEXT_CAPACITY);
    }

    /// Remove an entry by id. Returns whether it was present.
    pub fn remove(&mut self, id: EntryId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Newest entry.
    pub fn latest(&self) -> Option<&ContextEntry> {
        self.entries.front()
    }

    /// Entries, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &ContextEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
