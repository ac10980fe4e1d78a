//! Bounded linear undo/redo log over full-model snapshots.

use crate::model::HistoryItem;

pub const DEFAULT_HISTORY_LIMIT: usize = 10;

/// Holds up to `limit` snapshots and a pointer at the current one.
///
/// `undo`/`redo`/`set_limit` return the new current item when the visible
/// item changed; the caller forwards that to its observer. `append` returns
/// nothing because the caller already holds the data it just appended.
#[derive(Debug, Clone)]
pub struct HistoryLog<T> {
    items: Vec<HistoryItem<T>>,
    current: Option<usize>,
    limit: usize,
}

impl<T: Clone> Default for HistoryLog<T> {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}

impl<T: Clone> HistoryLog<T> {
    pub fn new(limit: usize) -> Self {
        Self {
            items: Vec::new(),
            current: None,
            limit: limit.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    pub fn current_item(&self) -> Option<&HistoryItem<T>> {
        self.current.map(|i| &self.items[i])
    }

    pub fn can_undo(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.items.len())
    }

    /// Discards any redoable tail, appends the snapshot, trims the oldest
    /// items over the limit and points at the new last item.
    pub fn append(&mut self, item: HistoryItem<T>) {
        let keep = self.current.map_or(0, |i| i + 1);
        self.items.truncate(keep);
        self.items.push(item);
        if self.items.len() > self.limit {
            let excess = self.items.len() - self.limit;
            self.items.drain(..excess);
        }
        self.current = Some(self.items.len() - 1);
    }

    /// Moves the pointer back one item. No-op at the start of the log.
    pub fn undo(&mut self) -> Option<HistoryItem<T>> {
        let index = self.current.filter(|&i| i > 0)?;
        self.current = Some(index - 1);
        Some(self.items[index - 1].clone())
    }

    /// Moves the pointer forward one item. No-op at the end of the log.
    pub fn redo(&mut self) -> Option<HistoryItem<T>> {
        let index = self.current.filter(|&i| i + 1 < self.items.len())?;
        self.current = Some(index + 1);
        Some(self.items[index + 1].clone())
    }

    /// Changes the limit. Shrinking trims the oldest items and re-clamps the
    /// pointer; returns the new current item only if the visible item changed.
    pub fn set_limit(&mut self, limit: usize) -> Option<HistoryItem<T>> {
        self.limit = limit.max(1);
        if self.items.len() <= self.limit {
            return None;
        }
        let excess = self.items.len() - self.limit;
        self.items.drain(..excess);
        let index = self.current?;
        if index >= excess {
            self.current = Some(index - excess);
            None
        } else {
            self.current = Some(0);
            Some(self.items[0].clone())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellData, RowData};

    fn snapshot(tag: &str) -> HistoryItem<String> {
        vec![RowData::new(
            tag,
            vec![CellData::new(tag.to_string(), 0.0, 1.0)],
        )]
    }

    fn tag_of(item: &HistoryItem<String>) -> &str {
        &item[0].header
    }

    #[test]
    fn starts_empty() {
        let log: HistoryLog<String> = HistoryLog::default();
        assert!(log.is_empty());
        assert_eq!(log.current_index(), None);
        assert!(!log.can_undo());
        assert!(!log.can_redo());
    }

    #[test]
    fn append_after_undo_discards_redo_tail() {
        let mut log = HistoryLog::new(10);
        log.append(snapshot("a"));
        log.append(snapshot("b"));
        let undone = log.undo().unwrap();
        assert_eq!(tag_of(&undone), "a");
        log.append(snapshot("c"));

        assert_eq!(log.len(), 2);
        assert_eq!(tag_of(&log.items[0]), "a");
        assert_eq!(tag_of(&log.items[1]), "c");
        assert_eq!(log.current_index(), Some(1));
    }

    #[test]
    fn limit_trims_oldest() {
        let mut log = HistoryLog::new(3);
        for tag in ["a", "b", "c", "d", "e"] {
            log.append(snapshot(tag));
        }
        assert_eq!(log.len(), 3);
        let tags: Vec<_> = log.items.iter().map(tag_of).collect();
        assert_eq!(tags, vec!["c", "d", "e"]);
        assert_eq!(log.current_index(), Some(2));
    }

    #[test]
    fn undo_redo_walk_the_log() {
        let mut log = HistoryLog::new(10);
        log.append(snapshot("a"));
        log.append(snapshot("b"));
        log.append(snapshot("c"));

        assert_eq!(tag_of(&log.undo().unwrap()), "b");
        assert_eq!(tag_of(&log.undo().unwrap()), "a");
        assert!(log.undo().is_none());
        assert_eq!(tag_of(&log.redo().unwrap()), "b");
        assert_eq!(tag_of(&log.redo().unwrap()), "c");
        assert!(log.redo().is_none());
    }

    #[test]
    fn shrinking_limit_keeps_visible_item_when_possible() {
        let mut log = HistoryLog::new(10);
        for tag in ["a", "b", "c", "d"] {
            log.append(snapshot(tag));
        }
        // Pointer at "d"; trimming "a" and "b" leaves it visible.
        assert!(log.set_limit(2).is_none());
        assert_eq!(tag_of(log.current_item().unwrap()), "d");
    }

    #[test]
    fn shrinking_limit_notifies_when_visible_item_trimmed() {
        let mut log = HistoryLog::new(10);
        for tag in ["a", "b", "c", "d"] {
            log.append(snapshot(tag));
        }
        log.undo();
        log.undo();
        log.undo();
        assert_eq!(tag_of(log.current_item().unwrap()), "a");

        let changed = log.set_limit(2).unwrap();
        assert_eq!(tag_of(&changed), "c");
        assert_eq!(log.current_index(), Some(0));
    }
}
