//! Conversion session - owns the published context and reacts to preference
//! updates.

use std::sync::Arc;

use log::info;

use crate::context::{ConversionContext, Preferences};
use crate::detect::MatcherCache;
use crate::document::SegmentTree;
use crate::errors::Result;
use crate::scan::{rescale_converted, ChangeDispatcher, DispatchReport, ScanReport, Scanner};

/// Outcome of publishing new preferences.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionUpdate {
    /// Present when a full scan ran.
    pub scan: Option<ScanReport>,
    /// Segments whose converted values followed a base rate change.
    pub rescaled: usize,
    pub attached: bool,
}

/// Drives the engine for one page.
///
/// A session starts detached. Publishing enabled preferences scans the whole
/// tree and starts observing it; disabled preferences stop observation.
pub struct ConversionSession {
    context: Arc<ConversionContext>,
    matchers: MatcherCache,
    dispatcher: ChangeDispatcher,
}

impl ConversionSession {
    pub fn new(prefs: &Preferences) -> Result<Self> {
        let context = ConversionContext::from_preferences(prefs)?;
        let matchers = MatcherCache::build(&context.supported_currencies);
        Ok(Self {
            context: Arc::new(context),
            matchers,
            dispatcher: ChangeDispatcher::default(),
        })
    }

    pub fn context(&self) -> &Arc<ConversionContext> {
        &self.context
    }

    pub fn matchers(&self) -> &MatcherCache {
        &self.matchers
    }

    pub fn is_attached(&self) -> bool {
        self.dispatcher.is_attached()
    }

    /// Applies the current preferences to a freshly loaded tree.
    pub fn start(&mut self, tree: &mut SegmentTree) -> SessionUpdate {
        if self.is_attached() || !self.context.enabled {
            return SessionUpdate {
                attached: self.is_attached(),
                ..SessionUpdate::default()
            };
        }
        let scan = self.full_scan(tree);
        self.dispatcher.attach(tree);
        SessionUpdate {
            scan: Some(scan),
            rescaled: 0,
            attached: true,
        }
    }

    /// Publishes new preferences.
    ///
    /// Invalid preferences are rejected and the previous context stays in
    /// effect.
    pub fn apply_preferences(
        &mut self,
        tree: &mut SegmentTree,
        prefs: &Preferences,
    ) -> Result<SessionUpdate> {
        let next = ConversionContext::from_preferences(prefs)?;
        let old_base = self.context.base_rate;
        if next.supported_currencies != self.context.supported_currencies {
            self.matchers = MatcherCache::build(&next.supported_currencies);
        }
        self.context = Arc::new(next);

        let update = match (self.is_attached(), self.context.enabled) {
            (false, true) => self.start(tree),
            (true, false) => {
                info!("Conversion disabled, detaching from the page");
                self.dispatcher.detach(tree);
                SessionUpdate::default()
            }
            (true, true) => {
                let root = tree.root();
                // rescale before scanning so fresh conversions are not rescaled
                let rescaled = rescale_converted(
                    tree,
                    root,
                    old_base,
                    self.context.base_rate,
                    &self.context,
                );
                let scan = self.full_scan(tree);
                SessionUpdate {
                    scan: Some(scan),
                    rescaled,
                    attached: true,
                }
            }
            (false, false) => SessionUpdate::default(),
        };
        Ok(update)
    }

    /// Re-scans whatever changed since the last call.
    pub fn process_changes(&self, tree: &mut SegmentTree) -> DispatchReport {
        let scanner = Scanner::new(&self.context, &self.matchers);
        self.dispatcher.pump(tree, &scanner)
    }

    fn full_scan(&self, tree: &mut SegmentTree) -> ScanReport {
        let root = tree.root();
        let report = Scanner::new(&self.context, &self.matchers).scan(tree, root);
        // the full scan already covered anything reported so far
        self.dispatcher.discard_pending();
        info!(
            "Full scan: {} segments converted, {} markers resolved",
            report.segments_converted, report.markers_resolved
        );
        report
    }
}
