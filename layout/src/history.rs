//! Linear undo/redo history.
//!
//! The history is a list of full snapshots plus a cursor naming the one the
//! document currently shows. Pushing truncates everything after the cursor,
//! so redo is lost as soon as a new action follows an undo. There is no
//! branching.
//!
//! The first entry is a baseline supplied at construction. When a size limit
//! is set, the oldest entries are dropped and the cursor shifts with them.

#[cfg(test)]
#[path = "history_test.rs"]
mod history_test;

/// Snapshot stack with a cursor. Never empty.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: Vec<T>,
    cursor: usize,
    limit: Option<usize>,
}

impl<T: Clone> History<T> {
    /// Unbounded history starting at `baseline`.
    #[must_use]
    pub fn new(baseline: T) -> Self {
        Self { entries: vec![baseline], cursor: 0, limit: None }
    }

    /// History retaining at most `limit` snapshots (at least one).
    #[must_use]
    pub fn with_limit(baseline: T, limit: usize) -> Self {
        Self { entries: vec![baseline], cursor: 0, limit: Some(limit.max(1)) }
    }

    /// Drop the redo tail, append `snapshot`, and move the cursor onto it.
    pub fn push(&mut self, snapshot: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(snapshot);
        if let Some(limit) = self.limit {
            if self.entries.len() > limit {
                let excess = self.entries.len() - limit;
                self.entries.drain(..excess);
            }
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Step back one snapshot and return it, or `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&T> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        self.entries.get(self.cursor)
    }

    /// Step forward one snapshot and return it, or `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&T> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        self.entries.get(self.cursor)
    }

    /// Discard everything and start again from `baseline`.
    pub fn reset(&mut self, baseline: T) {
        self.entries.clear();
        self.entries.push(baseline);
        self.cursor = 0;
    }

    /// The snapshot under the cursor.
    #[must_use]
    pub fn current(&self) -> &T {
        &self.entries[self.cursor]
    }

    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; a history holds at least its baseline.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}
