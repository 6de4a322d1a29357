use crate::compiler::CompilerMessage;
use crate::console::ResetReason;
use crate::entry::HostSeverity;
use serde::Deserialize;
use std::sync::mpsc::{channel, Receiver, Sender};

/// Notifications raised by the entry store.
/// Delivery is fire-and-forget: the store never waits on, or observes, a consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    /// New data arrived or entries were removed without a user clear
    Changed,
    /// Storage was cleared; viewers drop their selection
    Cleared,
}

/// Observer list backed by channels.
#[derive(Debug, Default)]
pub struct Subscribers {
    senders: Vec<Sender<StoreEvent>>,
}

impl Subscribers {
    pub fn subscribe(&mut self) -> Receiver<StoreEvent> {
        let (tx, rx) = channel();
        self.senders.push(tx);
        rx
    }

    /// Send to every live subscriber, dropping the ones whose receiver is gone
    pub fn notify(&mut self, event: StoreEvent) {
        self.senders.retain(|tx| tx.send(event).is_ok());
    }
}

/// Events replayed into a console by the `logdeck` binary, one JSON object per line
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ConsoleEvent {
    // Ingestion
    Log {
        #[serde(default)]
        tag: String,
        message: String,
        severity: HostSeverity,
        #[serde(default)]
        stack: String,
    },
    HostLog {
        message: String,
        severity: HostSeverity,
        #[serde(default)]
        stack: String,
    },
    Compiler {
        messages: Vec<CompilerMessage>,
    },

    // Compilation lifecycle
    CompilationStarted,
    CompilationFinished,
    AssemblyFinished {
        messages: Vec<CompilerMessage>,
    },

    // Process-state resets
    BeforeReset {
        reason: ResetReason,
    },
    AfterReset,

    // Polling and user actions
    Tick,
    Clear,
    ClearAll,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::MessageKind;

    #[test]
    fn test_notify_prunes_dropped_receivers() {
        let mut subs = Subscribers::default();
        let kept = subs.subscribe();
        let dropped = subs.subscribe();
        drop(dropped);

        subs.notify(StoreEvent::Changed);
        assert_eq!(subs.senders.len(), 1);
        assert_eq!(kept.try_recv(), Ok(StoreEvent::Changed));
    }

    #[test]
    fn test_notify_without_subscribers() {
        let mut subs = Subscribers::default();
        subs.notify(StoreEvent::Cleared);
        assert!(subs.senders.is_empty());
    }

    #[test]
    fn test_parse_log_event() {
        let line = r#"{"event":"log","tag":"net","message":"timeout","severity":"exception"}"#;
        let event: ConsoleEvent = serde_json::from_str(line).unwrap();
        assert_eq!(
            event,
            ConsoleEvent::Log {
                tag: "net".into(),
                message: "timeout".into(),
                severity: HostSeverity::Exception,
                stack: String::new(),
            }
        );
    }

    #[test]
    fn test_parse_lifecycle_events() {
        let event: ConsoleEvent =
            serde_json::from_str(r#"{"event":"before_reset","reason":"recompile"}"#).unwrap();
        assert_eq!(
            event,
            ConsoleEvent::BeforeReset {
                reason: ResetReason::Recompile
            }
        );

        let event: ConsoleEvent = serde_json::from_str(r#"{"event":"tick"}"#).unwrap();
        assert_eq!(event, ConsoleEvent::Tick);
    }

    #[test]
    fn test_parse_compiler_event() {
        let line = r#"{"event":"compiler","messages":[{"severity":"error","file":"/p/a.cs","line":10,"column":3,"message":"missing ;"}]}"#;
        let event: ConsoleEvent = serde_json::from_str(line).unwrap();
        match event {
            ConsoleEvent::Compiler { messages } => {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].severity, MessageKind::Error);
                assert_eq!(messages[0].line, 10);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
