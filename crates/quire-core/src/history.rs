//! Execution history and the execution counter.
//!
//! Both are owned by the [`Notebook`](crate::Notebook) and only ever grow: the
//! history has no way to edit or drop an entry, and the counter can only be
//! advanced by one.

use serde::Serialize;

use crate::notebook::CellId;

/// Record of one evaluation attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryEntry {
    pub cell_id: CellId,
    /// Milliseconds since the UNIX epoch.
    pub timestamp: u64,
    /// Source that was (or was about to be) evaluated.
    pub content: String,
}

/// Append-only log of evaluation attempts, in insertion order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct History(Vec<HistoryEntry>);

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, entry: HistoryEntry) {
        self.0.push(entry);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.0.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.0.iter()
    }

    /// Entries recorded for one cell, oldest first.
    pub fn for_cell(&self, cell_id: CellId) -> impl Iterator<Item = &HistoryEntry> {
        self.0.iter().filter(move |entry| entry.cell_id == cell_id)
    }
}

impl<'a> IntoIterator for &'a History {
    type Item = &'a HistoryEntry;
    type IntoIter = std::slice::Iter<'a, HistoryEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Monotonic counter of evaluations that performed new work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ExecutionCounter(u64);

impl ExecutionCounter {
    /// Value every new notebook starts from.
    pub const INITIAL: u64 = 0;

    pub fn new() -> Self {
        Self(Self::INITIAL)
    }

    pub fn get(&self) -> u64 {
        self.0
    }

    /// Advance by exactly one and return the new value.
    pub(crate) fn advance(&mut self) -> u64 {
        self.0 += 1;
        self.0
    }
}
