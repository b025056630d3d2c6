//! Filtering, budget enforcement and notification around each visited entry.

use dirlist_core::{DEFAULT_LIMIT, Entry, Notification, ResultTree, TreeBuilder};

use crate::classifier::{MimeFilter, PathClassifier};
use crate::notify::Notify;
use crate::walker::{VisitOutcome, Visitor};

/// Gates every visited entry and feeds accepted ones to a [`TreeBuilder`].
///
/// The budget counts entries *examined*, not entries accepted: an entry
/// rejected by the MIME filter still uses one unit. One policy is shared by
/// every root of a listing, so the budget is global to the call.
///
/// The walk root itself spends one unit but is never notified, even when it
/// would pass the filter. It never appears in the result either, so every
/// notification corresponds to exactly one reported handle.
pub struct VisitPolicy<'a> {
    filter: MimeFilter,
    limit: usize,
    visited: usize,
    accepted: usize,
    classifier: &'a dyn PathClassifier,
    notifier: Option<&'a mut dyn Notify>,
    builder: TreeBuilder,
}

impl<'a> VisitPolicy<'a> {
    pub fn new(flat: bool, classifier: &'a dyn PathClassifier) -> Self {
        Self {
            filter: MimeFilter::accept_all(),
            limit: DEFAULT_LIMIT,
            visited: 0,
            accepted: 0,
            classifier,
            notifier: None,
            builder: TreeBuilder::new(flat),
        }
    }

    pub fn with_filter(mut self, filter: MimeFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_notifier(mut self, notifier: &'a mut dyn Notify) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Entries examined so far.
    pub fn visited(&self) -> usize {
        self.visited
    }

    /// Entries that passed the filter.
    pub fn accepted(&self) -> usize {
        self.accepted
    }

    /// Whether the budget is used up.
    pub fn is_exhausted(&self) -> bool {
        self.visited >= self.limit
    }

    /// Prepare for the next walk root.
    pub fn start_root(&mut self) {
        self.builder.start_root();
    }

    /// Take the accumulated result.
    pub fn adopt_tree(&mut self) -> ResultTree {
        self.builder.adopt_tree()
    }
}

impl Visitor for VisitPolicy<'_> {
    fn visit(&mut self, entry: &Entry) -> VisitOutcome {
        if self.is_exhausted() {
            tracing::debug!(limit = self.limit, "visit budget exhausted");
            return VisitOutcome::Stop;
        }
        self.visited += 1;

        // The walk root costs budget but is not part of its own listing.
        if entry.is_walk_root() {
            return VisitOutcome::Continue;
        }

        if !self.filter.accepts(self.classifier, entry) {
            return VisitOutcome::Continue;
        }

        tracing::trace!(path = %entry.absolute_path.display(), "accepted");
        if let Some(notifier) = self.notifier.as_deref_mut() {
            notifier.notify(&Notification::for_entry(entry, self.builder.is_flat()));
        }

        self.builder.add(entry);
        self.accepted += 1;
        VisitOutcome::Continue
    }
}
