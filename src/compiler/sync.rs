//! Polling window for live compiler sync.
//!
//! Polling is active while a compilation runs and for a short grace period
//! after it finishes, to catch diagnostics delivered late. Outside that
//! window every tick is a no-op.

use std::time::{Duration, Instant};

pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(250);
pub const DEFAULT_GRACE: Duration = Duration::from_secs(3);

#[derive(Debug, Clone)]
pub struct LiveSync {
    compiling: bool,
    /// End of the post-compilation grace window
    deadline: Option<Instant>,
    last_poll: Option<Instant>,
    interval: Duration,
    grace: Duration,
}

impl Default for LiveSync {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL, DEFAULT_GRACE)
    }
}

impl LiveSync {
    pub fn new(interval: Duration, grace: Duration) -> Self {
        Self {
            compiling: false,
            deadline: None,
            last_poll: None,
            interval,
            grace,
        }
    }

    pub fn is_compiling(&self) -> bool {
        self.compiling
    }

    pub fn started(&mut self) {
        self.compiling = true;
        self.deadline = None;
        self.last_poll = None;
    }

    /// Rewinds the deadline to `now + grace`.
    pub fn finished(&mut self, now: Instant) {
        self.compiling = false;
        self.deadline = Some(now + self.grace);
    }

    /// Change the timing without leaving the current window. A running grace
    /// deadline keeps its end; the new grace applies from the next finish.
    pub fn reconfigure(&mut self, interval: Duration, grace: Duration) {
        self.interval = interval;
        self.grace = grace;
    }

    /// Whether polling is allowed at `now`, ignoring the interval.
    pub fn is_active(&self, now: Instant) -> bool {
        self.compiling || self.deadline.is_some_and(|d| now < d)
    }

    /// Decide whether this tick should poll. Records the poll when it does.
    pub fn should_poll(&mut self, now: Instant) -> bool {
        if !self.is_active(now) {
            self.deadline = None;
            return false;
        }
        if let Some(last) = self.last_poll {
            if now.saturating_duration_since(last) < self.interval {
                return false;
            }
        }
        self.last_poll = Some(now);
        true
    }
}
