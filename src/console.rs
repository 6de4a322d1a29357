//! The console service: sole owner and mutator of the entry store.
//!
//! Hosts construct one `Console` at startup, feed it ingestion and
//! lifecycle events, and attach any number of [`ViewFilter`]s to read from
//! it. Every failure inside degrades to "as if the event did not happen".

use crate::compiler::sync::LiveSync;
use crate::compiler::{CompilerDiagnostic, CompilerIngestor, CompilerMessage, DiagnosticSource};
use crate::config::Settings;
use crate::entry::{HostSeverity, LogEntry, Severity, SeverityCounts, HOST_TAG};
use crate::event::ConsoleEvent;
use crate::persistence::slots::SlotStore;
use crate::persistence::SessionPersistence;
use crate::stack::{first_user_frame, StackFrame, StackParser};
use crate::store::EntryStore;
use crate::view::ViewFilter;
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// What triggered a process-state reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetReason {
    EnterPlay,
    Build,
    Recompile,
}

/// A log record taken from the host's own buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostLog {
    pub severity: HostSeverity,
    pub message: String,
    pub stack: String,
}

/// Adapter over the host's pre-existing log buffer, when one is reachable.
pub trait HostLogSource {
    fn drain(&mut self) -> Vec<HostLog>;
}

/// File and 1-based line handed to the external file opener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationTarget {
    pub path: PathBuf,
    pub line: u32,
}

pub struct Console<S: SlotStore> {
    store: EntryStore,
    ingestor: CompilerIngestor,
    persistence: SessionPersistence<S>,
    live: LiveSync,
    parser: StackParser,
    settings: Settings,
    diagnostics: Option<Box<dyn DiagnosticSource>>,
}

impl<S: SlotStore> Console<S> {
    pub fn new(settings: Settings, slots: S) -> Self {
        Self {
            store: EntryStore::new(),
            ingestor: CompilerIngestor::new(settings.project_root.as_deref()),
            persistence: SessionPersistence::new(slots),
            live: LiveSync::new(settings.poll_interval, settings.sync_grace),
            parser: StackParser::new(settings.stack.clone()),
            settings,
            diagnostics: None,
        }
    }

    pub fn with_diagnostic_source(mut self, source: Box<dyn DiagnosticSource>) -> Self {
        self.diagnostics = Some(source);
        self
    }

    pub fn set_diagnostic_source(&mut self, source: Option<Box<dyn DiagnosticSource>>) {
        self.diagnostics = source;
    }

    pub fn store(&self) -> &EntryStore {
        &self.store
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn persistence(&self) -> &SessionPersistence<S> {
        &self.persistence
    }

    /// Hand the slots back, e.g. to build the console that follows a reset.
    pub fn into_slots(self) -> S {
        self.persistence.into_slots()
    }

    /// Apply new settings. A running compile keeps its polling window.
    ///
    /// Diagnostics are keyed by project-relative path, so a new project root
    /// drops the current ones and re-reads them from the source.
    pub fn update_settings(&mut self, settings: Settings) {
        self.parser = StackParser::new(settings.stack.clone());
        self.live.reconfigure(settings.poll_interval, settings.sync_grace);
        let root_changed = settings.project_root != self.settings.project_root;
        self.settings = settings;

        if root_changed {
            self.store.retain(|e| !e.is_compiler());
            self.ingestor = CompilerIngestor::new(self.settings.project_root.as_deref());
            self.persistence.save_compiler(self.ingestor.diagnostics());
            self.sync_from_source();
        }
    }

    /// Subscribe a viewer to this console's store.
    pub fn attach(&mut self, view: &mut ViewFilter) {
        view.attach(&mut self.store);
    }

    // Ingestion

    pub fn add_log(
        &mut self,
        tag: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
        stack: impl Into<String>,
    ) {
        self.store.append(LogEntry::new(severity, tag, message, stack));
    }

    /// Mirror an entry from the host's own log.
    pub fn add_host_log(
        &mut self,
        message: impl Into<String>,
        severity: HostSeverity,
        stack: impl Into<String>,
    ) {
        self.add_log(HOST_TAG, message, Severity::from_host(severity), stack);
    }

    /// Pull everything the host adapter has buffered. Returns the number imported.
    pub fn import_host_logs(&mut self, source: &mut dyn HostLogSource) -> usize {
        let logs = source.drain();
        let count = logs.len();
        for log in logs {
            self.add_host_log(log.message, log.severity, log.stack);
        }
        count
    }

    /// Ingest a compiler batch. Returns the number of new entries.
    pub fn add_compiler_messages(&mut self, batch: &[CompilerMessage]) -> usize {
        let added = self.ingestor.ingest(&mut self.store, batch);
        self.after_compiler_ingest(added.len())
    }

    fn sync_from_source(&mut self) -> usize {
        let Some(source) = self.diagnostics.as_mut() else {
            return 0;
        };
        let added = self.ingestor.ingest_from(&mut self.store, source.as_mut());
        self.after_compiler_ingest(added.len())
    }

    fn after_compiler_ingest(&mut self, added: usize) -> usize {
        if added > 0 {
            self.persistence.save_compiler(self.ingestor.diagnostics());
        }
        added
    }

    // Compilation lifecycle

    /// Drop stale diagnostics and forget their keys, so problems that are
    /// still present come back on the next pass.
    pub fn on_compilation_started(&mut self) {
        self.live.started();
        self.store.retain(|e| !e.is_compiler());
        self.ingestor.reset();
        tracing::debug!("compilation started");
    }

    pub fn on_compilation_finished(&mut self, now: Instant) -> usize {
        self.live.finished(now);
        self.sync_from_source()
    }

    pub fn on_per_assembly_finished(&mut self, batch: &[CompilerMessage]) -> usize {
        self.add_compiler_messages(batch)
    }

    /// Periodic tick. Polls the diagnostic source only inside the sync window.
    pub fn on_config_changed_tick(&mut self, now: Instant) -> usize {
        if !self.settings.live_compiler_sync || !self.live.should_poll(now) {
            return 0;
        }
        self.sync_from_source()
    }

    // Process-state resets

    pub fn clears_on(&self, reason: ResetReason) -> bool {
        match reason {
            ResetReason::EnterPlay => self.settings.clear_on_play,
            ResetReason::Build => self.settings.clear_on_build,
            ResetReason::Recompile => self.settings.clear_on_recompile,
        }
    }

    /// Snapshot state that must survive the coming reset.
    pub fn on_before_reset(&mut self, reason: ResetReason) {
        self.persistence.save_compiler(self.ingestor.diagnostics());
        if self.clears_on(reason) {
            tracing::debug!(?reason, "clearing log before reset");
            self.store.clear_all();
            self.ingestor.reset();
        } else {
            self.persistence.save_full(&self.store);
        }
    }

    /// A recorded reset replayed in one process still has the old state in
    /// memory. Drop it so only the snapshots carry over.
    fn drop_process_state(&mut self) {
        self.store.clear_all();
        self.ingestor.reset();
        self.live = LiveSync::new(self.settings.poll_interval, self.settings.sync_grace);
    }

    /// Restore whatever the previous process left behind. Single use.
    ///
    /// `Compiler` rows that come back with the full snapshot are matched to
    /// their diagnostic record, so the compiler snapshot does not add them
    /// a second time.
    pub fn on_after_reset(&mut self) {
        let restored = self.persistence.restore_full(&mut self.store);
        let diagnostics = self.persistence.restore_compiler();

        let restored_rows: HashSet<&str> = restored
            .iter()
            .filter(|e| e.is_compiler())
            .map(|e| e.message.as_str())
            .collect();
        for diagnostic in &diagnostics {
            if restored_rows.contains(diagnostic.display().as_str()) {
                self.ingestor.register(diagnostic.clone());
            }
        }
        // Rows without a record, e.g. when only the full snapshot survived
        for entry in &restored {
            if let Some(diagnostic) = CompilerDiagnostic::from_entry(entry) {
                self.ingestor.register(diagnostic);
            }
        }

        self.ingestor.ingest_diagnostics(&mut self.store, diagnostics);
    }

    // User actions

    /// Clear everything except compiler diagnostics. Known keys are kept.
    pub fn clear(&mut self) {
        self.store.clear_preserving(LogEntry::is_compiler);
        self.persistence.save_compiler(self.ingestor.diagnostics());
    }

    /// Clear everything, diagnostics and pending snapshots included.
    pub fn clear_all(&mut self) {
        self.store.clear_all();
        self.ingestor.reset();
        self.persistence.discard();
    }

    /// Dispatch one recorded event. `now` drives the polling window.
    pub fn handle(&mut self, event: ConsoleEvent, now: Instant) {
        match event {
            ConsoleEvent::Log {
                tag,
                message,
                severity,
                stack,
            } => self.add_log(tag, message, Severity::from_host(severity), stack),
            ConsoleEvent::HostLog {
                message,
                severity,
                stack,
            } => self.add_host_log(message, severity, stack),
            ConsoleEvent::Compiler { messages } => {
                self.add_compiler_messages(&messages);
            }
            ConsoleEvent::CompilationStarted => self.on_compilation_started(),
            ConsoleEvent::CompilationFinished => {
                self.on_compilation_finished(now);
            }
            ConsoleEvent::AssemblyFinished { messages } => {
                self.on_per_assembly_finished(&messages);
            }
            ConsoleEvent::BeforeReset { reason } => self.on_before_reset(reason),
            ConsoleEvent::AfterReset => {
                self.drop_process_state();
                self.on_after_reset();
            }
            ConsoleEvent::Tick => {
                self.on_config_changed_tick(now);
            }
            ConsoleEvent::Clear => self.clear(),
            ConsoleEvent::ClearAll => self.clear_all(),
        }
    }

    // Queries

    pub fn counts(&self) -> SeverityCounts {
        self.store.counts()
    }

    pub fn frames(&self, stack: &str) -> Vec<StackFrame> {
        self.parser.parse(stack)
    }

    /// Jump target for a trace: its first user-code frame.
    pub fn navigation_target(&self, stack: &str) -> Option<NavigationTarget> {
        let frames = self.parser.parse(stack);
        first_user_frame(&frames).and_then(|f| self.frame_target(f))
    }

    /// Jump target for a specific frame, resolved against the project root.
    pub fn frame_target(&self, frame: &StackFrame) -> Option<NavigationTarget> {
        if !frame.is_navigable() {
            return None;
        }
        let path = Path::new(frame.path.as_deref()?);
        let path = match &self.settings.project_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        };
        Some(NavigationTarget {
            path,
            line: frame.line,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::MessageKind;
    use crate::entry::COMPILER_TAG;
    use crate::persistence::slots::MemorySlots;
    use crate::persistence::FULL_SNAPSHOT_KEY;
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    fn settings() -> Settings {
        Settings {
            project_root: Some(PathBuf::from("/work/proj")),
            ..Settings::default()
        }
    }

    fn broken() -> CompilerMessage {
        CompilerMessage::new(
            MessageKind::Error,
            "/work/proj/Assets/A.cs",
            10,
            3,
            "missing ;",
        )
    }

    /// Diagnostic source returning a shared, mutable batch and counting polls.
    #[derive(Clone, Default)]
    struct FakeSource {
        batch: Rc<RefCell<Option<Vec<CompilerMessage>>>>,
        polls: Rc<RefCell<usize>>,
    }

    impl DiagnosticSource for FakeSource {
        fn poll(&mut self) -> Option<Vec<CompilerMessage>> {
            *self.polls.borrow_mut() += 1;
            self.batch.borrow().clone()
        }
    }

    fn compiler_count<S: SlotStore>(console: &Console<S>) -> usize {
        console
            .store()
            .canonical()
            .iter()
            .filter(|e| e.tag == COMPILER_TAG)
            .count()
    }

    #[test]
    fn test_logs_survive_recompile() {
        let mut console = Console::new(settings(), MemorySlots::new());
        console.add_log("net", "timeout", Severity::Error, "");
        console.add_log("net", "timeout", Severity::Error, "");
        console.add_compiler_messages(&[broken()]);
        let before = console.store().canonical().to_vec();

        console.on_before_reset(ResetReason::Recompile);
        let mut next = Console::new(settings(), console.into_slots());
        next.on_after_reset();

        assert_eq!(next.store().canonical(), before.as_slice());
        assert_eq!(next.store().collapsed()[0].count, 2);

        // Diagnostics from the restored list are known: no duplicate
        assert_eq!(next.add_compiler_messages(&[broken()]), 0);
        assert_eq!(compiler_count(&next), 1);

        // Single use
        next.on_after_reset();
        assert_eq!(next.store().len(), 3);
    }

    #[test]
    fn test_clear_on_play_keeps_only_diagnostics() {
        let settings = Settings {
            clear_on_play: true,
            ..settings()
        };
        let mut console = Console::new(settings.clone(), MemorySlots::new());
        console.add_log("ui", "click", Severity::Info, "");
        console.add_compiler_messages(&[broken()]);

        console.on_before_reset(ResetReason::EnterPlay);
        assert!(console.store().is_empty());
        assert!(!console.persistence().has_full_snapshot());

        let mut next = Console::new(settings, console.into_slots());
        next.on_after_reset();
        assert_eq!(next.store().len(), 1);
        assert_eq!(
            next.store().canonical()[0].message,
            "Assets/A.cs(10,3): error: missing ;"
        );
    }

    #[test]
    fn test_reset_in_same_process_does_not_duplicate() {
        let mut console = Console::new(settings(), MemorySlots::new());
        console.add_compiler_messages(&[broken()]);
        console.on_before_reset(ResetReason::Build);
        console.store.clear_all();
        console.on_after_reset();
        assert_eq!(compiler_count(&console), 1);
    }

    #[test]
    fn test_corrupt_snapshot_is_ignored() {
        let mut slots = MemorySlots::new();
        slots.set(FULL_SNAPSHOT_KEY, "garbage".to_string());
        slots.set_flag("logdeck.snapshot.full.present", true);

        let mut console = Console::new(settings(), slots);
        console.on_after_reset();
        assert!(console.store().is_empty());
        assert!(!console.persistence().has_full_snapshot());
    }

    #[test]
    fn test_broken_diagnostic_survives_recompile() {
        let source = FakeSource::default();
        *source.batch.borrow_mut() = Some(vec![broken()]);
        let mut console = Console::new(settings(), MemorySlots::new())
            .with_diagnostic_source(Box::new(source.clone()));

        let start = Instant::now();
        console.on_compilation_started();
        assert_eq!(console.on_compilation_finished(start), 1);

        console.on_compilation_started();
        assert_eq!(compiler_count(&console), 0);
        assert_eq!(console.on_compilation_finished(start), 1);
        assert_eq!(compiler_count(&console), 1);
    }

    #[test]
    fn test_fixed_diagnostic_disappears_after_recompile() {
        let source = FakeSource::default();
        *source.batch.borrow_mut() = Some(vec![broken()]);
        let mut console = Console::new(settings(), MemorySlots::new())
            .with_diagnostic_source(Box::new(source.clone()));
        let start = Instant::now();
        console.on_compilation_finished(start);

        *source.batch.borrow_mut() = Some(Vec::new());
        console.on_compilation_started();
        console.on_compilation_finished(start);
        assert_eq!(compiler_count(&console), 0);
    }

    #[test]
    fn test_tick_polls_only_inside_window() {
        let source = FakeSource::default();
        *source.batch.borrow_mut() = Some(vec![broken()]);
        let settings = Settings {
            poll_interval: Duration::from_millis(100),
            sync_grace: Duration::from_millis(1000),
            ..settings()
        };
        let mut console =
            Console::new(settings, MemorySlots::new()).with_diagnostic_source(Box::new(source.clone()));
        let start = Instant::now();

        console.on_config_changed_tick(start);
        assert_eq!(*source.polls.borrow(), 0);

        console.on_compilation_started();
        assert_eq!(console.on_config_changed_tick(start), 1);
        assert_eq!(console.on_config_changed_tick(start + Duration::from_millis(200)), 0);
        assert_eq!(*source.polls.borrow(), 2);
        assert_eq!(compiler_count(&console), 1);

        console.on_compilation_finished(start + Duration::from_millis(300));
        console.on_config_changed_tick(start + Duration::from_secs(5));
        assert_eq!(*source.polls.borrow(), 3);
    }

    #[test]
    fn test_live_sync_disabled() {
        let source = FakeSource::default();
        let settings = Settings {
            live_compiler_sync: false,
            ..settings()
        };
        let mut console =
            Console::new(settings, MemorySlots::new()).with_diagnostic_source(Box::new(source.clone()));
        console.on_compilation_started();
        console.on_config_changed_tick(Instant::now());
        assert_eq!(*source.polls.borrow(), 0);
    }

    #[test]
    fn test_unavailable_source_is_silent() {
        let source = FakeSource::default();
        let mut console = Console::new(settings(), MemorySlots::new())
            .with_diagnostic_source(Box::new(source.clone()));
        assert_eq!(console.on_compilation_finished(Instant::now()), 0);
        assert!(console.store().is_empty());

        let mut bare = Console::new(settings(), MemorySlots::new());
        assert_eq!(bare.on_compilation_finished(Instant::now()), 0);
    }

    #[test]
    fn test_user_clear_keeps_diagnostics_and_keys() {
        let mut console = Console::new(settings(), MemorySlots::new());
        console.add_log("net", "a", Severity::Info, "");
        console.add_log("net", "b", Severity::Warning, "");
        console.add_log("db", "c", Severity::Error, "");
        console.add_compiler_messages(&[
            broken(),
            CompilerMessage::new(MessageKind::Warning, "/work/proj/Assets/B.cs", 1, 1, "unused"),
        ]);

        console.clear();
        assert_eq!(console.store().len(), 2);
        assert_eq!(console.add_compiler_messages(&[broken()]), 0);

        console.clear_all();
        assert!(console.store().is_empty());
        assert_eq!(console.add_compiler_messages(&[broken()]), 1);
    }

    #[test]
    fn test_host_logs_are_tagged_and_normalized() {
        struct Buffer(Vec<HostLog>);
        impl HostLogSource for Buffer {
            fn drain(&mut self) -> Vec<HostLog> {
                std::mem::take(&mut self.0)
            }
        }

        let mut console = Console::new(settings(), MemorySlots::new());
        let mut buffer = Buffer(vec![HostLog {
            severity: HostSeverity::Exception,
            message: "NullReferenceException".into(),
            stack: String::new(),
        }]);
        assert_eq!(console.import_host_logs(&mut buffer), 1);
        assert_eq!(console.import_host_logs(&mut buffer), 0);

        let entry = &console.store().canonical()[0];
        assert_eq!(entry.tag, HOST_TAG);
        assert_eq!(entry.severity, Severity::Error);
        assert_eq!(console.counts().errors(), 1);
    }

    #[test]
    fn test_navigation_for_compiler_entry() {
        let mut console = Console::new(settings(), MemorySlots::new());
        console.add_compiler_messages(&[broken()]);
        let stack = console.store().canonical()[0].stack.clone();

        let target = console.navigation_target(&stack).unwrap();
        assert_eq!(target.path, PathBuf::from("/work/proj/Assets/A.cs"));
        assert_eq!(target.line, 10);
    }

    #[test]
    fn test_navigation_skips_system_frames() {
        let console = Console::new(settings(), MemorySlots::new());
        let stack = "UnityEngine.Debug:Log (object) (at /build/Debug.cs:35)\n\
                     Game.Boot:Run () (at Assets/Boot.cs:8)";
        let target = console.navigation_target(stack).unwrap();
        assert_eq!(target.path, PathBuf::from("/work/proj/Assets/Boot.cs"));
        assert_eq!(target.line, 8);

        assert!(console.navigation_target("no frames here").is_none());
    }

    #[test]
    fn test_viewer_sees_console_changes() {
        let mut console = Console::new(settings(), MemorySlots::new());
        let mut view = ViewFilter::new();
        console.attach(&mut view);

        console.add_log("net", "timeout", Severity::Error, "");
        view.sync(console.store());
        assert_eq!(view.visible_count(), 1);

        console.clear_all();
        view.sync(console.store());
        assert_eq!(view.visible_count(), 0);
    }

    #[test]
    fn test_handle_recorded_events() {
        let lines = [
            r#"{"event":"log","tag":"net","message":"timeout","severity":"error"}"#,
            r#"{"event":"log","tag":"net","message":"timeout","severity":"error"}"#,
            r#"{"event":"compiler","messages":[{"severity":"error","file":"/work/proj/Assets/A.cs","line":10,"column":3,"message":"missing ;"}]}"#,
            r#"{"event":"before_reset","reason":"recompile"}"#,
            r#"{"event":"after_reset"}"#,
            r#"{"event":"clear"}"#,
        ];
        let mut console = Console::new(settings(), MemorySlots::new());
        let now = Instant::now();
        for line in lines {
            let event: ConsoleEvent = serde_json::from_str(line).unwrap();
            console.handle(event, now);
        }
        assert_eq!(console.store().len(), 1);
        assert_eq!(compiler_count(&console), 1);
    }

    #[test]
    fn test_update_settings_rekeys_diagnostics_under_new_root() {
        let source = FakeSource::default();
        *source.batch.borrow_mut() = Some(vec![broken()]);
        let mut console = Console::new(settings(), MemorySlots::new())
            .with_diagnostic_source(Box::new(source.clone()));
        console.add_compiler_messages(&[broken()]);

        console.update_settings(Settings {
            project_root: Some(PathBuf::from("/work")),
            ..settings()
        });
        assert_eq!(compiler_count(&console), 1);
        assert_eq!(
            console.store().canonical()[0].message,
            "proj/Assets/A.cs(10,3): error: missing ;"
        );

        assert_eq!(console.add_compiler_messages(&[broken()]), 0);
        assert_eq!(compiler_count(&console), 1);
        assert_eq!(console.settings().project_root, Some(PathBuf::from("/work")));
    }

    #[test]
    fn test_update_settings_without_source_leaves_one_entry() {
        let mut console = Console::new(settings(), MemorySlots::new());
        console.add_log("net", "timeout", Severity::Error, "");
        console.add_compiler_messages(&[broken()]);

        console.update_settings(Settings {
            project_root: Some(PathBuf::from("/work")),
            ..settings()
        });
        assert_eq!(compiler_count(&console), 0);
        assert_eq!(console.store().len(), 1);

        assert_eq!(console.add_compiler_messages(&[broken()]), 1);
        assert_eq!(console.add_compiler_messages(&[broken()]), 0);
        assert_eq!(compiler_count(&console), 1);
    }

    #[test]
    fn test_update_settings_mid_compile_keeps_polling() {
        let source = FakeSource::default();
        *source.batch.borrow_mut() = Some(vec![broken()]);
        let mut console = Console::new(settings(), MemorySlots::new())
            .with_diagnostic_source(Box::new(source.clone()));

        console.on_compilation_started();
        console.update_settings(Settings {
            clear_on_play: true,
            ..settings()
        });
        assert_eq!(console.on_config_changed_tick(Instant::now()), 1);
        assert_eq!(*source.polls.borrow(), 1);
    }

    fn multi_line() -> CompilerMessage {
        CompilerMessage::new(
            MessageKind::Error,
            "/work/proj/Assets/A.cs",
            4,
            9,
            "type mismatch\n  expected int\n  found string",
        )
    }

    #[test]
    fn test_multi_line_diagnostic_survives_clearing_reset() {
        let settings = Settings {
            clear_on_play: true,
            ..settings()
        };
        let mut console = Console::new(settings.clone(), MemorySlots::new());
        console.add_compiler_messages(&[multi_line()]);
        assert!(!console.store().canonical()[0].message.contains('\n'));

        console.on_before_reset(ResetReason::EnterPlay);
        let mut next = Console::new(settings, console.into_slots());
        next.on_after_reset();
        assert_eq!(compiler_count(&next), 1);
        assert_eq!(
            next.store().canonical()[0].message,
            "Assets/A.cs(4,9): error: type mismatch expected int found string"
        );
    }

    #[test]
    fn test_multi_line_diagnostic_not_duplicated_after_restore() {
        let mut console = Console::new(settings(), MemorySlots::new());
        console.add_compiler_messages(&[multi_line()]);

        console.on_before_reset(ResetReason::Recompile);
        let mut next = Console::new(settings(), console.into_slots());
        next.on_after_reset();
        assert_eq!(compiler_count(&next), 1);

        assert_eq!(next.add_compiler_messages(&[multi_line()]), 0);
        assert_eq!(compiler_count(&next), 1);
    }

    #[test]
    fn test_compiler_snapshot_alone_restores_rows() {
        let mut console = Console::new(settings(), MemorySlots::new());
        console.add_log("ui", "click", Severity::Info, "");
        console.add_compiler_messages(&[broken()]);
        console.on_before_reset(ResetReason::Build);

        let mut slots = console.into_slots();
        slots.set_flag("logdeck.snapshot.full.present", false);
        slots.remove(FULL_SNAPSHOT_KEY);

        let mut next = Console::new(settings(), slots);
        next.on_after_reset();
        assert_eq!(next.store().len(), 1);
        assert_eq!(compiler_count(&next), 1);
    }
}
