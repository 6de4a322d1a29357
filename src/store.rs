//! Canonical log storage plus the collapsed projection.
//!
//! The canonical list is append-only within a session and never merges
//! entries. The collapsed projection mirrors it, keyed by
//! (severity, tag, message), with an occurrence count per key.

use crate::entry::{CollapseKey, CollapsedEntry, LogEntry, SeverityCounts};
use crate::event::{StoreEvent, Subscribers};
use std::collections::{BTreeSet, HashMap};
use std::sync::mpsc::Receiver;

#[derive(Debug, Default)]
pub struct EntryStore {
    canonical: Vec<LogEntry>,
    collapsed: Vec<CollapsedEntry>,
    /// Collapse key -> position in `collapsed`
    index: HashMap<CollapseKey, usize>,
    subscribers: Subscribers,
}

impl EntryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a viewer for change notifications.
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        self.subscribers.subscribe()
    }

    pub fn canonical(&self) -> &[LogEntry] {
        &self.canonical
    }

    pub fn collapsed(&self) -> &[CollapsedEntry] {
        &self.collapsed
    }

    pub fn len(&self) -> usize {
        self.canonical.len()
    }

    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }

    /// Append to the canonical list and fold into the collapsed projection.
    pub fn append(&mut self, entry: LogEntry) {
        self.fold(&entry);
        self.canonical.push(entry);
        self.subscribers.notify(StoreEvent::Changed);
    }

    /// Empty both lists and the key index.
    pub fn clear_all(&mut self) {
        self.canonical.clear();
        self.collapsed.clear();
        self.index.clear();
        self.subscribers.notify(StoreEvent::Cleared);
    }

    /// User-facing clear that keeps every entry matching `keep`.
    pub fn clear_preserving<F>(&mut self, keep: F)
    where
        F: FnMut(&LogEntry) -> bool,
    {
        self.canonical.retain(keep);
        self.rebuild_collapsed();
        self.subscribers.notify(StoreEvent::Cleared);
    }

    /// Drop entries not matching `keep` without resetting viewer selection.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&LogEntry) -> bool,
    {
        let before = self.canonical.len();
        self.canonical.retain(keep);
        if self.canonical.len() != before {
            self.rebuild_collapsed();
            self.subscribers.notify(StoreEvent::Changed);
        }
    }

    /// Replace the canonical list and derive the collapsed projection from it.
    ///
    /// Deterministic: the same canonical list always yields the same
    /// collapsed output, in first-occurrence order.
    pub fn rebuild_collapsed_from(&mut self, canonical: Vec<LogEntry>) {
        self.canonical = canonical;
        self.rebuild_collapsed();
        self.subscribers.notify(StoreEvent::Changed);
    }

    /// Per-severity totals over the canonical list.
    pub fn counts(&self) -> SeverityCounts {
        let mut counts = SeverityCounts::default();
        for entry in &self.canonical {
            counts.add(entry.severity);
        }
        counts
    }

    /// Distinct tags in use, sorted.
    pub fn tags(&self) -> Vec<String> {
        let tags: BTreeSet<&str> = self.collapsed.iter().map(|c| c.entry.tag.as_str()).collect();
        tags.into_iter().map(str::to_string).collect()
    }

    fn rebuild_collapsed(&mut self) {
        self.collapsed.clear();
        self.index.clear();
        let canonical = std::mem::take(&mut self.canonical);
        for entry in &canonical {
            self.fold(entry);
        }
        self.canonical = canonical;
    }

    fn fold(&mut self, entry: &LogEntry) {
        let key = entry.collapse_key();
        match self.index.get(&key) {
            Some(&pos) => self.collapsed[pos].count += 1,
            None => {
                self.index.insert(key, self.collapsed.len());
                self.collapsed.push(CollapsedEntry {
                    entry: entry.clone(),
                    count: 1,
                });
            }
        }
    }
}
