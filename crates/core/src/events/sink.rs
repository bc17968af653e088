//! Tree change sink trait and the bounded queue behind the dispatcher.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use log::warn;

use super::TreeChange;
use crate::constants::CHANGE_QUEUE_CAPACITY;

/// Trait for receiving tree changes.
///
/// `emit()` must be fast and never fail; the tree calls it on every
/// observed mutation.
pub trait TreeChangeSink: Send + Sync {
    /// Emit a single change.
    fn emit(&self, change: TreeChange);

    /// Emit multiple changes, in order.
    fn emit_batch(&self, changes: Vec<TreeChange>) {
        for change in changes {
            self.emit(change);
        }
    }
}

/// Everything drained from a [`ChangeQueue`] in one call.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ChangeBatch {
    /// Changes in receipt order.
    pub changes: Vec<TreeChange>,
    /// Changes were dropped since the last drain; the whole tree is suspect.
    pub overflowed: bool,
}

impl ChangeBatch {
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && !self.overflowed
    }
}

#[derive(Default)]
struct QueueState {
    changes: VecDeque<TreeChange>,
    overflowed: bool,
}

/// Bounded FIFO of tree changes.
///
/// Once full, further changes are dropped and the queue remembers that it
/// overflowed until the next drain.
pub struct ChangeQueue {
    capacity: usize,
    state: Mutex<QueueState>,
}

impl Default for ChangeQueue {
    fn default() -> Self {
        Self::with_capacity(CHANGE_QUEUE_CAPACITY)
    }
}

impl ChangeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            state: Mutex::new(QueueState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Takes every pending change, oldest first.
    pub fn drain(&self) -> ChangeBatch {
        let mut state = self.state();
        ChangeBatch {
            changes: state.changes.drain(..).collect(),
            overflowed: std::mem::take(&mut state.overflowed),
        }
    }

    pub fn len(&self) -> usize {
        self.state().changes.len()
    }

    pub fn is_empty(&self) -> bool {
        let state = self.state();
        state.changes.is_empty() && !state.overflowed
    }

    pub fn has_overflowed(&self) -> bool {
        self.state().overflowed
    }
}

impl TreeChangeSink for ChangeQueue {
    fn emit(&self, change: TreeChange) {
        let mut state = self.state();
        if state.changes.len() >= self.capacity {
            if !state.overflowed {
                warn!(
                    "Change queue full ({} pending), falling back to a full rescan",
                    self.capacity
                );
            }
            state.overflowed = true;
            return;
        }
        state.changes.push_back(change);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::NodeId;

    #[test]
    fn test_queue_drains_in_receipt_order() {
        let queue = ChangeQueue::new();
        assert!(queue.is_empty());

        queue.emit(TreeChange::text_changed(NodeId::new(4)));
        queue.emit_batch(vec![
            TreeChange::subtree_inserted(NodeId::new(1)),
            TreeChange::text_changed(NodeId::new(2)),
        ]);
        assert_eq!(queue.len(), 3);

        let batch = queue.drain();
        assert!(!batch.overflowed);
        let nodes: Vec<usize> = batch.changes.iter().map(|c| c.node().index()).collect();
        assert_eq!(nodes, vec![4, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_queue_overflow_is_reported_once() {
        let queue = ChangeQueue::with_capacity(2);
        for i in 0..5 {
            queue.emit(TreeChange::text_changed(NodeId::new(i)));
        }
        assert_eq!(queue.len(), 2);
        assert!(queue.has_overflowed());

        let batch = queue.drain();
        assert!(batch.overflowed);
        assert_eq!(batch.changes.len(), 2);
        assert!(!queue.has_overflowed());
        assert!(queue.drain().is_empty());
    }

    #[test]
    fn test_change_serializes_with_type_tag() {
        let json = serde_json::to_string(&TreeChange::text_changed(NodeId::new(7))).unwrap();
        assert_eq!(json, r#"{"type":"text_changed","node":7}"#);
    }
}
