//! Per-viewer query over the shared entry store.
//!
//! Each viewer owns its own filter state and selection; only the store is
//! shared. The visible list is recomputed from scratch on demand.

pub mod prefs;

use crate::entry::{LogEntry, Severity};
use crate::event::StoreEvent;
use crate::filter::{build_filter, SearchMode};
use crate::store::EntryStore;
use prefs::FilterPrefs;
use std::collections::BTreeSet;
use std::sync::mpsc::Receiver;

/// One visible row as handed to a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row<'a> {
    pub entry: &'a LogEntry,
    /// Occurrence count; always 1 when not collapsed
    pub count: usize,
}

impl<'a> Row<'a> {
    pub fn severity(&self) -> Severity {
        self.entry.severity
    }

    pub fn tag(&self) -> &'a str {
        &self.entry.tag
    }

    pub fn message(&self) -> &'a str {
        &self.entry.message
    }

    pub fn stack(&self) -> &'a str {
        &self.entry.stack
    }
}

#[derive(Debug)]
pub struct ViewFilter {
    show_info: bool,
    show_warnings: bool,
    show_errors: bool,
    /// Explicit tag allow-list
    tags: BTreeSet<String>,
    /// Governs the empty allow-list: everything when true, nothing when false
    show_all_tags: bool,
    search: String,
    search_mode: SearchMode,
    collapse: bool,
    selected: Option<usize>,
    /// Indices into the canonical or collapsed list, per `visible_collapsed`
    visible: Vec<usize>,
    visible_collapsed: bool,
    events: Option<Receiver<StoreEvent>>,
    dirty: bool,
}

impl Default for ViewFilter {
    fn default() -> Self {
        Self::from_prefs(&FilterPrefs::default())
    }
}

impl ViewFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_prefs(prefs: &FilterPrefs) -> Self {
        Self {
            show_info: prefs.show_info,
            show_warnings: prefs.show_warnings,
            show_errors: prefs.show_errors,
            tags: prefs.tags.iter().cloned().collect(),
            show_all_tags: prefs.show_all_tags,
            search: prefs.search.clone(),
            search_mode: prefs.search_mode,
            collapse: prefs.collapse,
            selected: None,
            visible: Vec::new(),
            visible_collapsed: prefs.collapse,
            events: None,
            dirty: true,
        }
    }

    pub fn prefs(&self) -> FilterPrefs {
        FilterPrefs {
            show_info: self.show_info,
            show_warnings: self.show_warnings,
            show_errors: self.show_errors,
            tags: self.tags.iter().cloned().collect(),
            show_all_tags: self.show_all_tags,
            collapse: self.collapse,
            search: self.search.clone(),
            search_mode: self.search_mode,
        }
    }

    /// Subscribe to store notifications so `sync` knows when to rebuild.
    pub fn attach(&mut self, store: &mut EntryStore) {
        self.events = Some(store.subscribe());
        self.dirty = true;
    }

    /// Drain pending notifications and rebuild if anything changed.
    /// Returns whether a rebuild happened.
    pub fn sync(&mut self, store: &EntryStore) -> bool {
        if let Some(events) = &self.events {
            for event in events.try_iter() {
                self.dirty = true;
                if event == StoreEvent::Cleared {
                    self.selected = None;
                }
            }
        }
        if self.dirty {
            self.build_visible(store);
            true
        } else {
            false
        }
    }

    /// Recompute the visible list and clamp the selection into it.
    ///
    /// A selection past the end moves to the last visible row, not the first;
    /// an empty list clears it.
    pub fn build_visible(&mut self, store: &EntryStore) {
        let search = build_filter(&self.search, self.search_mode);
        let keep = |entry: &LogEntry| {
            if !self.tag_allowed(&entry.tag) || !self.severity_visible(entry.severity) {
                return false;
            }
            search.as_ref().map_or(true, |f| f.matches_entry(entry))
        };

        self.visible = if self.collapse {
            store
                .collapsed()
                .iter()
                .enumerate()
                .filter(|(_, c)| keep(&c.entry))
                .map(|(i, _)| i)
                .collect()
        } else {
            store
                .canonical()
                .iter()
                .enumerate()
                .filter(|(_, e)| keep(*e))
                .map(|(i, _)| i)
                .collect()
        };
        self.visible_collapsed = self.collapse;
        self.dirty = false;

        let len = self.visible.len();
        self.selected = match self.selected {
            Some(_) if len == 0 => None,
            Some(i) if i >= len => Some(len - 1),
            other => other,
        };
    }

    pub fn visible_count(&self) -> usize {
        self.visible.len()
    }

    pub fn visible_row<'a>(&self, store: &'a EntryStore, index: usize) -> Option<Row<'a>> {
        let pos = *self.visible.get(index)?;
        if self.visible_collapsed {
            store.collapsed().get(pos).map(|c| Row {
                entry: &c.entry,
                count: c.count,
            })
        } else {
            store.canonical().get(pos).map(|entry| Row { entry, count: 1 })
        }
    }

    pub fn visible_rows<'a>(
        &'a self,
        store: &'a EntryStore,
    ) -> impl Iterator<Item = Row<'a>> + 'a {
        (0..self.visible.len()).filter_map(move |i| self.visible_row(store, i))
    }

    // Selection

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    /// Select a row of the last computed list. Out-of-range is clamped.
    pub fn select(&mut self, index: Option<usize>) {
        let len = self.visible.len();
        self.selected = match index {
            Some(_) if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => None,
        };
    }

    pub fn selected_row<'a>(&self, store: &'a EntryStore) -> Option<Row<'a>> {
        self.selected.and_then(|i| self.visible_row(store, i))
    }

    // Filter state

    pub fn severity_visible(&self, severity: Severity) -> bool {
        match severity {
            Severity::Info => self.show_info,
            Severity::Warning => self.show_warnings,
            Severity::Error => self.show_errors,
        }
    }

    pub fn set_severity_visible(&mut self, severity: Severity, visible: bool) {
        match severity {
            Severity::Info => self.show_info = visible,
            Severity::Warning => self.show_warnings = visible,
            Severity::Error => self.show_errors = visible,
        }
        self.dirty = true;
    }

    pub fn tag_allowed(&self, tag: &str) -> bool {
        if self.tags.is_empty() {
            self.show_all_tags
        } else {
            self.tags.contains(tag)
        }
    }

    pub fn enable_tag(&mut self, tag: impl Into<String>) {
        self.tags.insert(tag.into());
        self.dirty = true;
    }

    pub fn disable_tag(&mut self, tag: &str) {
        self.tags.remove(tag);
        self.dirty = true;
    }

    pub fn clear_tags(&mut self) {
        self.tags.clear();
        self.dirty = true;
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn set_show_all_tags(&mut self, show: bool) {
        self.show_all_tags = show;
        self.dirty = true;
    }

    pub fn set_search(&mut self, search: impl Into<String>, mode: SearchMode) {
        self.search = search.into();
        self.search_mode = mode;
        self.dirty = true;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_collapse(&mut self, collapse: bool) {
        self.collapse = collapse;
        self.dirty = true;
    }

    pub fn is_collapsed(&self) -> bool {
        self.collapse
    }
}
