use std::collections::VecDeque;

use super::cut_range::CutRange;
use super::segment_store::SegmentStore;
use crate::shared::constants::HISTORY_LIMIT;

/// Full copy of the editable state, taken before a mutation.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub segments: SegmentStore,
    pub cut_ranges: Vec<CutRange>,
}

/// Bounded undo stack paired with a redo stack.
///
/// Does not own the current state: callers pass it in on `undo`/`redo` and
/// install whatever snapshot comes back.
#[derive(Debug)]
pub struct EditHistory {
    undo_stack: VecDeque<HistoryEntry>,
    redo_stack: Vec<HistoryEntry>,
    limit: usize,
}

impl EditHistory {
    pub fn new(limit: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Pushes the pre-edit snapshot and invalidates redo.
    pub fn record(&mut self, snapshot: HistoryEntry) {
        if self.undo_stack.len() >= self.limit {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(snapshot);
        self.redo_stack.clear();
    }

    pub fn undo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(current);
        Some(previous)
    }

    pub fn redo(&mut self, current: HistoryEntry) -> Option<HistoryEntry> {
        let next = self.redo_stack.pop()?;
        if self.undo_stack.len() >= self.limit {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(current);
        Some(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for EditHistory {
    fn default() -> Self {
        Self::new(HISTORY_LIMIT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editing::domain::word_unit::{UnitId, UnitKind, WordUnit};

    fn snapshot(tag: usize) -> HistoryEntry {
        HistoryEntry {
            segments: SegmentStore::new(vec![WordUnit::new(
                UnitId::new(format!("u{tag}")),
                "w",
                0.0,
                1.0,
                UnitKind::Word,
            )]),
            cut_ranges: Vec::new(),
        }
    }

    #[test]
    fn test_undo_on_empty_is_noop() {
        let mut h = EditHistory::default();
        assert!(h.undo(snapshot(0)).is_none());
        assert_eq!(h.redo_depth(), 0);
    }

    #[test]
    fn test_redo_on_empty_is_noop() {
        let mut h = EditHistory::default();
        assert!(h.redo(snapshot(0)).is_none());
        assert_eq!(h.undo_depth(), 0);
    }

    #[test]
    fn test_undo_returns_recorded_and_stores_current_for_redo() {
        let mut h = EditHistory::default();
        h.record(snapshot(1));
        let restored = h.undo(snapshot(2)).unwrap();
        assert_eq!(restored, snapshot(1));
        assert!(h.can_redo());
        let redone = h.redo(snapshot(1)).unwrap();
        assert_eq!(redone, snapshot(2));
        assert!(h.can_undo());
        assert!(!h.can_redo());
    }

    #[test]
    fn test_record_clears_redo() {
        let mut h = EditHistory::default();
        h.record(snapshot(1));
        h.undo(snapshot(2));
        assert!(h.can_redo());
        h.record(snapshot(3));
        assert!(!h.can_redo());
    }

    #[test]
    fn test_bound_drops_oldest() {
        let mut h = EditHistory::default();
        for i in 0..60 {
            h.record(snapshot(i));
        }
        assert_eq!(h.undo_depth(), HISTORY_LIMIT);

        let mut undone = Vec::new();
        while let Some(entry) = h.undo(snapshot(999)) {
            undone.push(entry);
        }
        assert_eq!(undone.len(), 50);
        // Most recent first; the ten oldest were dropped
        assert_eq!(undone[0], snapshot(59));
        assert_eq!(undone[49], snapshot(10));
    }

    #[test]
    fn test_custom_limit() {
        let mut h = EditHistory::new(2);
        h.record(snapshot(1));
        h.record(snapshot(2));
        h.record(snapshot(3));
        assert_eq!(h.undo_depth(), 2);
    }

    #[test]
    fn test_clear() {
        let mut h = EditHistory::default();
        h.record(snapshot(1));
        h.undo(snapshot(2));
        h.record(snapshot(3));
        h.clear();
        assert!(!h.can_undo());
        assert!(!h.can_redo());
    }
}
