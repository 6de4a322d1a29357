//! Log entry domain model.
//!
//! A [`LogEntry`] is immutable once created. Occurrence counting lives on
//! [`CollapsedEntry`], never on the canonical entry itself.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag assigned to entries created without one.
pub const DEFAULT_TAG: &str = "default";

/// Tag marking build diagnostics.
pub const COMPILER_TAG: &str = "Compiler";

/// Tag marking entries mirrored from the host's own log buffer.
pub const HOST_TAG: &str = "Host";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Info, Severity::Warning, Severity::Error];

    /// Lowercase display name, also matched by free-text search.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Normalize a host-level category. Asserts and exceptions are errors.
    pub fn from_host(host: HostSeverity) -> Self {
        match host {
            HostSeverity::Log => Severity::Info,
            HostSeverity::Warning => Severity::Warning,
            HostSeverity::Error | HostSeverity::Assert | HostSeverity::Exception => {
                Severity::Error
            }
        }
    }

    fn index(self) -> usize {
        match self {
            Severity::Info => 0,
            Severity::Warning => 1,
            Severity::Error => 2,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Categories reported by the host runtime before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HostSeverity {
    Log,
    Warning,
    Error,
    Assert,
    Exception,
}

/// A single ingested log event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub severity: Severity,
    pub tag: String,
    pub message: String,
    /// Raw, unparsed origin trace. May be empty.
    #[serde(default)]
    pub stack: String,
}

impl LogEntry {
    pub fn new(
        severity: Severity,
        tag: impl Into<String>,
        message: impl Into<String>,
        stack: impl Into<String>,
    ) -> Self {
        let tag = tag.into();
        let tag = if tag.trim().is_empty() {
            DEFAULT_TAG.to_string()
        } else {
            tag
        };
        Self {
            severity,
            tag,
            message: message.into(),
            stack: stack.into(),
        }
    }

    pub fn collapse_key(&self) -> CollapseKey {
        CollapseKey {
            severity: self.severity,
            tag: self.tag.clone(),
            message: self.message.clone(),
        }
    }

    pub fn is_compiler(&self) -> bool {
        self.tag == COMPILER_TAG
    }
}

/// Identity used to merge entries in the collapsed projection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CollapseKey {
    pub severity: Severity,
    pub tag: String,
    pub message: String,
}

/// One row of the collapsed projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollapsedEntry {
    pub entry: LogEntry,
    pub count: usize,
}

/// Per-severity totals over the canonical list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    counts: [usize; 3],
}

impl SeverityCounts {
    pub fn add(&mut self, severity: Severity) {
        self.counts[severity.index()] += 1;
    }

    pub fn get(&self, severity: Severity) -> usize {
        self.counts[severity.index()]
    }

    pub fn info(&self) -> usize {
        self.get(Severity::Info)
    }

    pub fn warnings(&self) -> usize {
        self.get(Severity::Warning)
    }

    pub fn errors(&self) -> usize {
        self.get(Severity::Error)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}
