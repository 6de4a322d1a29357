//! Snapshots that carry the log across a process-state reset.
//!
//! Two independent single-use snapshots are kept: the full canonical list,
//! and a compiler-only list of diagnostics. Reading a snapshot always
//! consumes it, and a snapshot that fails to parse is discarded as if it
//! had never been written.

pub mod slots;

use crate::compiler::CompilerDiagnostic;
use crate::entry::LogEntry;
use crate::store::EntryStore;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use slots::SlotStore;

pub const FULL_SNAPSHOT_KEY: &str = "logdeck.snapshot.full";
pub const COMPILER_SNAPSHOT_KEY: &str = "logdeck.snapshot.compiler";

/// Bumped whenever the payload layout changes. Older payloads are dropped.
const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct FullSnapshot {
    version: u32,
    entries: Vec<LogEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CompilerSnapshot {
    version: u32,
    diagnostics: Vec<CompilerDiagnostic>,
}

fn flag_key(key: &str) -> String {
    format!("{}.present", key)
}

pub struct SessionPersistence<S: SlotStore> {
    slots: S,
}

impl<S: SlotStore> SessionPersistence<S> {
    pub fn new(slots: S) -> Self {
        Self { slots }
    }

    pub fn slots(&self) -> &S {
        &self.slots
    }

    pub fn into_slots(self) -> S {
        self.slots
    }

    pub fn has_full_snapshot(&self) -> bool {
        self.slots.flag(&flag_key(FULL_SNAPSHOT_KEY))
    }

    pub fn has_compiler_snapshot(&self) -> bool {
        self.slots.flag(&flag_key(COMPILER_SNAPSHOT_KEY))
    }

    /// Write the whole canonical list.
    pub fn save_full(&mut self, store: &EntryStore) {
        let snapshot = FullSnapshot {
            version: SNAPSHOT_VERSION,
            entries: store.canonical().to_vec(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(payload) => {
                self.slots.set(FULL_SNAPSHOT_KEY, payload);
                self.slots.set_flag(&flag_key(FULL_SNAPSHOT_KEY), true);
                tracing::debug!(entries = snapshot.entries.len(), "full snapshot saved");
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize full snapshot"),
        }
    }

    /// Consume the full snapshot, if any.
    ///
    /// Restored entries go in front of whatever the store already holds and
    /// the collapsed projection is rebuilt. Returns the restored entries.
    pub fn restore_full(&mut self, store: &mut EntryStore) -> Vec<LogEntry> {
        let Some(snapshot) = self.take::<FullSnapshot>(FULL_SNAPSHOT_KEY) else {
            return Vec::new();
        };

        let restored = snapshot.entries;
        let mut entries = restored.clone();
        entries.extend(store.canonical().iter().cloned());
        store.rebuild_collapsed_from(entries);
        tracing::debug!(entries = restored.len(), "full snapshot restored");
        restored
    }

    /// Write the known diagnostics, in ingestion order.
    pub fn save_compiler(&mut self, diagnostics: &[CompilerDiagnostic]) {
        let snapshot = CompilerSnapshot {
            version: SNAPSHOT_VERSION,
            diagnostics: diagnostics.to_vec(),
        };
        match serde_json::to_string(&snapshot) {
            Ok(payload) => {
                self.slots.set(COMPILER_SNAPSHOT_KEY, payload);
                self.slots.set_flag(&flag_key(COMPILER_SNAPSHOT_KEY), true);
            }
            Err(e) => tracing::warn!(error = %e, "failed to serialize compiler snapshot"),
        }
    }

    /// Consume the compiler-only snapshot, if any.
    ///
    /// The caller feeds the result through the ingestor's dedup check.
    pub fn restore_compiler(&mut self) -> Vec<CompilerDiagnostic> {
        self.take::<CompilerSnapshot>(COMPILER_SNAPSHOT_KEY)
            .map(|s| s.diagnostics)
            .unwrap_or_default()
    }

    /// Drop both snapshots without reading them.
    pub fn discard(&mut self) {
        for key in [FULL_SNAPSHOT_KEY, COMPILER_SNAPSHOT_KEY] {
            self.slots.set_flag(&flag_key(key), false);
            self.slots.remove(key);
        }
    }

    /// Read and delete a snapshot slot. Any failure yields `None`.
    fn take<T>(&mut self, key: &str) -> Option<T>
    where
        T: DeserializeOwned + Versioned,
    {
        let flag = flag_key(key);
        if !self.slots.flag(&flag) {
            return None;
        }
        let payload = self.slots.get(key);
        self.slots.set_flag(&flag, false);
        self.slots.remove(key);

        let payload = payload?;
        match serde_json::from_str::<T>(&payload) {
            Ok(snapshot) if snapshot.version() == SNAPSHOT_VERSION => Some(snapshot),
            Ok(snapshot) => {
                tracing::warn!(
                    key,
                    version = snapshot.version(),
                    "dropping snapshot with unknown version"
                );
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "dropping malformed snapshot");
                None
            }
        }
    }
}

trait Versioned {
    fn version(&self) -> u32;
}

impl Versioned for FullSnapshot {
    fn version(&self) -> u32 {
        self.version
    }
}

impl Versioned for CompilerSnapshot {
    fn version(&self) -> u32 {
        self.version
    }
}
