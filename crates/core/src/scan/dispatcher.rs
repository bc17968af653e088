//! Change-driven re-scans.

use std::collections::HashSet;
use std::sync::Arc;

use log::{debug, warn};

use super::scanner::{ScanReport, Scanner};
use crate::constants::MAX_DISPATCH_ROUNDS;
use crate::document::{NodeId, SegmentTree, TreeNavigation};
use crate::events::{ChangeQueue, TreeChange};

/// What one pump did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DispatchReport {
    /// Drain rounds that found pending changes.
    pub rounds: usize,
    pub changes: usize,
    pub full_rescans: usize,
    pub scan: ScanReport,
}

/// Feeds tree changes back into the scanner.
///
/// While attached, the tree reports into a bounded queue. Each pump drains
/// the queue in receipt order; the scanner's own edits show up as new
/// changes and are drained in the next round, where they convert nothing.
pub struct ChangeDispatcher {
    queue: Arc<ChangeQueue>,
    attached: bool,
}

impl Default for ChangeDispatcher {
    fn default() -> Self {
        Self::new(Arc::new(ChangeQueue::new()))
    }
}

impl ChangeDispatcher {
    pub fn new(queue: Arc<ChangeQueue>) -> Self {
        Self {
            queue,
            attached: false,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Starts observing `tree`.
    pub fn attach(&mut self, tree: &mut SegmentTree) {
        tree.observe(self.queue.clone());
        self.attached = true;
    }

    /// Stops observing `tree` and drops anything still pending.
    pub fn detach(&mut self, tree: &mut SegmentTree) {
        tree.unobserve();
        self.discard_pending();
        self.attached = false;
    }

    /// Drops pending changes, e.g. after a full scan made them moot.
    pub fn discard_pending(&self) {
        let dropped = self.queue.drain();
        if !dropped.is_empty() {
            debug!("Discarded {} pending changes", dropped.changes.len());
        }
    }

    /// Drains and re-scans until the queue stays empty or the round limit hits.
    pub fn pump(&self, tree: &mut SegmentTree, scanner: &Scanner<'_>) -> DispatchReport {
        let mut report = DispatchReport::default();
        if !self.attached {
            return report;
        }

        for _ in 0..MAX_DISPATCH_ROUNDS {
            let batch = self.queue.drain();
            if batch.is_empty() {
                return report;
            }
            report.rounds += 1;
            report.changes += batch.changes.len();

            if batch.overflowed {
                let root = tree.root();
                report.scan.merge(scanner.scan(tree, root));
                report.full_rescans += 1;
                continue;
            }

            let targets: Vec<NodeId> = batch
                .changes
                .iter()
                .map(|change| scan_target(tree, change))
                .collect();
            let mut seen = HashSet::new();
            for target in targets {
                if tree.contains(target) && seen.insert(target) {
                    report.scan.merge(scanner.scan(tree, target));
                }
            }
        }

        if !self.queue.is_empty() {
            warn!(
                "Changes still pending after {} rounds, leaving them for the next pump",
                MAX_DISPATCH_ROUNDS
            );
        }
        report
    }
}

fn scan_target(tree: &SegmentTree, change: &TreeChange) -> NodeId {
    match change {
        TreeChange::TextChanged { node } => tree.parent(*node).unwrap_or(*node),
        TreeChange::SubtreeInserted { node } => *node,
    }
}
