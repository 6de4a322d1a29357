//! Compiler diagnostics ingestion.
//!
//! Build diagnostics are identity-deduplicated, not occurrence-counted: a
//! diagnostic already known by its key is silently dropped, however many
//! times the compiler reports it.

pub mod sync;

use crate::entry::{LogEntry, Severity, COMPILER_TAG};
use crate::store::EntryStore;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

/// Severity as reported by the compiler. Anything other than error or
/// warning is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Error,
    Warning,
    #[serde(other)]
    Other,
}

/// One raw record from the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerMessage {
    pub severity: MessageKind,
    /// Absolute path as reported by the compiler
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

impl CompilerMessage {
    pub fn new(
        severity: MessageKind,
        file: impl Into<String>,
        line: u32,
        column: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            file: file.into(),
            line,
            column,
            message: message.into(),
        }
    }
}

/// A normalized diagnostic. Its fields are also its dedup key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompilerDiagnostic {
    pub severity: Severity,
    /// Project-relative, forward-slash path
    pub path: String,
    pub line: u32,
    pub column: u32,
    pub message: String,
}

static DISPLAY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<path>.+?)\((?P<line>\d+),(?P<column>\d+)\): ",
        r"(?P<severity>error|warning): (?P<message>.*)$",
    ))
    .expect("diagnostic display regex must compile")
});

impl CompilerDiagnostic {
    /// Normalize a raw record. Returns `None` for non error/warning kinds.
    pub fn from_message(message: &CompilerMessage, project_root: Option<&str>) -> Option<Self> {
        let severity = match message.severity {
            MessageKind::Error => Severity::Error,
            MessageKind::Warning => Severity::Warning,
            MessageKind::Other => return None,
        };
        Some(Self {
            severity,
            path: relative_path(&message.file, project_root),
            line: message.line,
            column: message.column,
            message: single_line(&message.message),
        })
    }

    /// `<path>(<line>,<col>): error|warning: <message>`
    pub fn display(&self) -> String {
        let kind = match self.severity {
            Severity::Warning => "warning",
            _ => "error",
        };
        format!(
            "{}({},{}): {}: {}",
            self.path, self.line, self.column, kind, self.message
        )
    }

    /// Parse a display string back into a diagnostic.
    pub fn parse_display(text: &str) -> Option<Self> {
        let caps = DISPLAY_RE.captures(text)?;
        let severity = match &caps["severity"] {
            "warning" => Severity::Warning,
            _ => Severity::Error,
        };
        Some(Self {
            severity,
            path: caps["path"].to_string(),
            line: caps["line"].parse().ok()?,
            column: caps["column"].parse().ok()?,
            message: caps["message"].to_string(),
        })
    }

    /// Recover the diagnostic behind a `Compiler` entry.
    pub fn from_entry(entry: &LogEntry) -> Option<Self> {
        if !entry.is_compiler() {
            return None;
        }
        Self::parse_display(&entry.message)
    }

    /// Synthetic one-frame trace so navigation reuses stack-frame handling.
    pub fn stack(&self) -> String {
        format!("Compiler (at {}:{})", self.path, self.line)
    }

    pub fn to_entry(&self) -> LogEntry {
        LogEntry::new(self.severity, COMPILER_TAG, self.display(), self.stack())
    }
}

/// Join a multi-line compiler message into one line, trimming each part.
pub fn single_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Forward slashes, with the project root prefix stripped when present.
pub fn relative_path(file: &str, project_root: Option<&str>) -> String {
    let file = file.replace('\\', "/");
    let Some(root) = project_root else {
        return file;
    };
    let root = root.replace('\\', "/");
    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return file;
    }
    match file.strip_prefix(root) {
        Some(rest) if rest.starts_with('/') => rest.trim_start_matches('/').to_string(),
        _ => file,
    }
}

/// Provider of the compiler's current messages.
///
/// `None` means the source is unavailable; ingestion then does nothing.
pub trait DiagnosticSource {
    fn poll(&mut self) -> Option<Vec<CompilerMessage>>;
}

/// Converts compiler batches into `Compiler` entries, at most once per key.
#[derive(Debug, Default)]
pub struct CompilerIngestor {
    known: HashSet<CompilerDiagnostic>,
    /// Known diagnostics in the order they were first seen
    records: Vec<CompilerDiagnostic>,
    project_root: Option<String>,
}

impl CompilerIngestor {
    pub fn new(project_root: Option<&Path>) -> Self {
        Self {
            known: HashSet::new(),
            records: Vec::new(),
            project_root: project_root.map(|p| p.to_string_lossy().into_owned()),
        }
    }

    pub fn project_root(&self) -> Option<&str> {
        self.project_root.as_deref()
    }

    /// Ingest a raw batch. Returns the diagnostics that produced new entries.
    pub fn ingest(
        &mut self,
        store: &mut EntryStore,
        batch: &[CompilerMessage],
    ) -> Vec<CompilerDiagnostic> {
        let diagnostics: Vec<CompilerDiagnostic> = batch
            .iter()
            .filter_map(|m| CompilerDiagnostic::from_message(m, self.project_root.as_deref()))
            .collect();
        self.ingest_diagnostics(store, diagnostics)
    }

    /// Ingest already-normalized diagnostics through the same dedup check.
    pub fn ingest_diagnostics<I>(
        &mut self,
        store: &mut EntryStore,
        diagnostics: I,
    ) -> Vec<CompilerDiagnostic>
    where
        I: IntoIterator<Item = CompilerDiagnostic>,
    {
        let mut added = Vec::new();
        for diagnostic in diagnostics {
            if self.known.contains(&diagnostic) {
                tracing::trace!(
                    path = %diagnostic.path,
                    line = diagnostic.line,
                    "duplicate diagnostic dropped"
                );
                continue;
            }
            store.append(diagnostic.to_entry());
            self.remember(diagnostic.clone());
            added.push(diagnostic);
        }
        if !added.is_empty() {
            tracing::debug!(count = added.len(), "compiler diagnostics added");
        }
        added
    }

    /// Poll `source` and ingest whatever it returns.
    pub fn ingest_from(
        &mut self,
        store: &mut EntryStore,
        source: &mut dyn DiagnosticSource,
    ) -> Vec<CompilerDiagnostic> {
        match source.poll() {
            Some(batch) => self.ingest(store, &batch),
            None => {
                tracing::trace!("diagnostic source unavailable");
                Vec::new()
            }
        }
    }

    /// Mark a diagnostic as known without creating an entry.
    pub fn register(&mut self, diagnostic: CompilerDiagnostic) -> bool {
        self.remember(diagnostic)
    }

    fn remember(&mut self, diagnostic: CompilerDiagnostic) -> bool {
        if !self.known.insert(diagnostic.clone()) {
            return false;
        }
        self.records.push(diagnostic);
        true
    }

    /// Every known diagnostic, oldest first.
    pub fn diagnostics(&self) -> &[CompilerDiagnostic] {
        &self.records
    }

    /// Forget every key. Only on compilation restart or deliberate clear.
    pub fn reset(&mut self) {
        self.known.clear();
        self.records.clear();
    }
}
