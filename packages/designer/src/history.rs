//! # Snapshot History
//!
//! Linear undo/redo over cloned snapshots.
//!
//! ## Design
//!
//! - `add` discards everything after the cursor, then appends
//! - Past capacity the oldest snapshot is evicted and the cursor stays put
//! - `undo`/`redo` move the cursor and hand back a clone, never a reference
//!   into the buffer
//! - Boundaries are `None`, not errors
//!
//! ## Example
//!
//! ```rust
//! use formwork_designer::History;
//!
//! let mut history = History::new();
//! history.add("A");
//! history.add("B");
//!
//! assert_eq!(history.undo(), Some("A"));
//! assert_eq!(history.redo(), Some("B"));
//! assert_eq!(history.redo(), None);
//! ```

use std::collections::VecDeque;
use tracing::debug;

/// Snapshots kept when no capacity is configured
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// Where the cursor sits relative to the buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryState {
    /// No snapshots
    Empty,
    /// Cursor on the newest snapshot; redo unavailable
    AtHead,
    /// Cursor on the oldest of several snapshots; undo unavailable
    AtTail,
    /// Undo and redo both available
    Mid,
}

/// Bounded undo/redo buffer
#[derive(Debug, Clone)]
pub struct History<T: Clone> {
    records: VecDeque<T>,

    /// Index of the current snapshot; `None` only while empty
    cursor: Option<usize>,

    capacity: usize,
}

impl<T: Clone> History<T> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history holding at most `capacity` snapshots (minimum 1)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    /// Record a snapshot, discarding any redo branch
    pub fn add(&mut self, snapshot: T) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        let discarded = self.records.len() - keep;
        self.records.truncate(keep);

        self.records.push_back(snapshot);

        if self.records.len() > self.capacity {
            self.records.pop_front();
            debug!(capacity = self.capacity, "History full, evicted oldest snapshot");
        } else {
            self.cursor = Some(keep);
        }

        if discarded > 0 {
            debug!(discarded, "Discarded redo branch");
        }
    }

    /// Step back and return the snapshot now under the cursor
    pub fn undo(&mut self) -> Option<T> {
        match self.cursor {
            Some(cursor) if cursor > 0 => {
                self.cursor = Some(cursor - 1);
                self.records.get(cursor - 1).cloned()
            }
            _ => None,
        }
    }

    /// Step forward and return the snapshot now under the cursor
    pub fn redo(&mut self) -> Option<T> {
        match self.cursor {
            Some(cursor) if cursor + 1 < self.records.len() => {
                self.cursor = Some(cursor + 1);
                self.records.get(cursor + 1).cloned()
            }
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.records.len())
    }

    pub fn state(&self) -> HistoryState {
        match (self.can_undo(), self.can_redo()) {
            _ if self.records.is_empty() => HistoryState::Empty,
            (true, true) => HistoryState::Mid,
            (false, true) => HistoryState::AtTail,
            _ => HistoryState::AtHead,
        }
    }

    /// Clone of the snapshot under the cursor
    pub fn current(&self) -> Option<T> {
        self.cursor.and_then(|c| self.records.get(c).cloned())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.cursor = None;
    }
}

impl<T: Clone> Default for History<T> {
    fn default() -> Self {
        Self::new()
    }
}
