//! Config types for logdeck.
//!
//! Defines structures for parsing and representing configuration files.

use crate::compiler::sync::{DEFAULT_GRACE, DEFAULT_POLL_INTERVAL};
use crate::stack::StackClassifier;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Raw config file structure (used for parsing).
///
/// Every field is optional so a project file can override a global one
/// field by field. Unknown fields are rejected with an error.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfig {
    /// Clear the log when entering the running/playing state.
    pub clear_on_play: Option<bool>,
    /// Clear the log when packaging/building.
    pub clear_on_build: Option<bool>,
    /// Clear the log on recompilation; otherwise it is carried across.
    pub clear_on_recompile: Option<bool>,
    /// Poll the compiler for diagnostics while a compilation runs.
    pub live_compiler_sync: Option<bool>,
    /// Root stripped from compiler paths (may contain tilde).
    pub project_root: Option<PathBuf>,
    pub poll_interval_ms: Option<u64>,
    pub sync_grace_ms: Option<u64>,
    /// Stack frame classification heuristics.
    pub stack: Option<StackClassifier>,
}

/// Validated settings read at each lifecycle point.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub clear_on_play: bool,
    pub clear_on_build: bool,
    pub clear_on_recompile: bool,
    pub live_compiler_sync: bool,
    pub project_root: Option<PathBuf>,
    pub poll_interval: Duration,
    pub sync_grace: Duration,
    pub stack: StackClassifier,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            clear_on_play: false,
            clear_on_build: false,
            clear_on_recompile: false,
            live_compiler_sync: true,
            project_root: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
            sync_grace: DEFAULT_GRACE,
            stack: StackClassifier::default(),
        }
    }
}
