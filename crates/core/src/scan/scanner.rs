//! Document-order scan of a subtree.

use log::{debug, trace};

use super::applier::apply_matches;
use crate::constants::{AVOIDED_TAGS, MAX_SEGMENT_PASSES};
use crate::context::ConversionContext;
use crate::currency::expand_notation;
use crate::detect::{classify, MatchKind, MatcherCache};
use crate::document::{NodeId, SegmentTree, TextMutation, TreeNavigation};
use crate::resolve::resolve;

/// What one scan did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanReport {
    pub segments_visited: usize,
    /// Segments rewritten in place.
    pub segments_converted: usize,
    /// Isolated markers paired with a neighbouring amount.
    pub markers_resolved: usize,
}

impl ScanReport {
    pub fn merge(&mut self, other: ScanReport) {
        self.segments_visited += other.segments_visited;
        self.segments_converted += other.segments_converted;
        self.markers_resolved += other.markers_resolved;
    }

    pub fn changed(&self) -> bool {
        self.segments_converted > 0 || self.markers_resolved > 0
    }
}

enum SegmentOutcome {
    Unchanged,
    Converted,
    Resolved,
}

/// Single entry point for initial scans and change-driven re-scans.
pub struct Scanner<'a> {
    ctx: &'a ConversionContext,
    matchers: &'a MatcherCache,
}

impl<'a> Scanner<'a> {
    pub fn new(ctx: &'a ConversionContext, matchers: &'a MatcherCache) -> Self {
        Self { ctx, matchers }
    }

    /// Converts every eligible segment at or below `root`, in document order.
    pub fn scan(&self, tree: &mut SegmentTree, root: NodeId) -> ScanReport {
        let mut report = ScanReport::default();
        for segment in tree.text_segments(root) {
            if self.is_skipped(tree, segment) {
                continue;
            }
            report.segments_visited += 1;
            match self.scan_segment(tree, segment) {
                SegmentOutcome::Converted => report.segments_converted += 1,
                SegmentOutcome::Resolved => report.markers_resolved += 1,
                SegmentOutcome::Unchanged => {}
            }
        }
        debug!(
            "Scanned {} segments under {}: {} converted, {} markers resolved",
            report.segments_visited, root, report.segments_converted, report.markers_resolved
        );
        report
    }

    fn is_skipped(&self, tree: &SegmentTree, segment: NodeId) -> bool {
        let avoided = tree
            .parent(segment)
            .and_then(|parent| tree.tag(parent))
            .map(|tag| AVOIDED_TAGS.contains(&tag))
            .unwrap_or(false);
        avoided || tree.text(segment).map(|t| t.trim().is_empty()).unwrap_or(true)
    }

    /// Applies the first currency that matches, then looks at the segment
    /// again so a second currency in the same text is converted too.
    fn scan_segment(&self, tree: &mut SegmentTree, segment: NodeId) -> SegmentOutcome {
        let mut outcome = SegmentOutcome::Unchanged;

        for _ in 0..MAX_SEGMENT_PASSES {
            let text = match tree.text(segment) {
                Some(text) if !text.trim().is_empty() => expand_notation(text).into_owned(),
                _ => break,
            };

            let hit = self
                .matchers
                .iter()
                .map(|matchers| (matchers, classify(&text, matchers)))
                .find(|(_, kind)| kind.is_match());
            let (matchers, kind) = match hit {
                Some(hit) => hit,
                None => break,
            };
            trace!("{} classified as {:?} for {}", segment, kind, matchers.code());

            match kind {
                MatchKind::IsolatedCurrency { search_both_sides } => {
                    if resolve(tree, segment, matchers, search_both_sides, self.ctx) {
                        outcome = SegmentOutcome::Resolved;
                    }
                    break;
                }
                MatchKind::IsolatedAmount | MatchKind::NoMatch => break,
                _ => match apply_matches(&text, matchers, kind, self.ctx) {
                    Some(rewritten) => {
                        tree.set_text(segment, &rewritten);
                        outcome = SegmentOutcome::Converted;
                    }
                    None => break,
                },
            }
        }
        outcome
    }
}
