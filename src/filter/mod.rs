//! Free-text search matchers used by the view filter.

pub mod regex_filter;
pub mod string_filter;

use crate::entry::LogEntry;
use regex_filter::RegexFilter;
use serde::{Deserialize, Serialize};
use string_filter::StringFilter;

/// A compiled search term.
pub trait Filter: Send + Sync {
    fn matches(&self, text: &str) -> bool;

    /// An entry matches when its severity name, tag or message does.
    fn matches_entry(&self, entry: &LogEntry) -> bool {
        self.matches(entry.severity.name())
            || self.matches(&entry.tag)
            || self.matches(&entry.message)
    }
}

/// How the search string is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Case-insensitive substring
    #[default]
    Plain,
    /// Case-insensitive regular expression
    Regex,
}

/// Build a matcher for `pattern`.
///
/// Returns `None` when there is nothing to filter on: an empty pattern, or
/// a regex that does not compile.
pub fn build_filter(pattern: &str, mode: SearchMode) -> Option<Box<dyn Filter>> {
    if pattern.is_empty() {
        return None;
    }
    match mode {
        SearchMode::Plain => Some(Box::new(StringFilter::new(pattern))),
        SearchMode::Regex => match RegexFilter::new(pattern) {
            Ok(filter) => Some(Box::new(filter)),
            Err(e) => {
                tracing::debug!(pattern, error = %e, "invalid search regex ignored");
                None
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pattern_is_no_filter() {
        assert!(build_filter("", SearchMode::Plain).is_none());
        assert!(build_filter("", SearchMode::Regex).is_none());
    }

    #[test]
    fn test_invalid_regex_is_no_filter() {
        assert!(build_filter("(unclosed", SearchMode::Regex).is_none());
    }

    #[test]
    fn test_plain_is_case_insensitive() {
        let filter = build_filter("TimeOut", SearchMode::Plain).unwrap();
        assert!(filter.matches("connection timeout"));
        assert!(!filter.matches("connection refused"));
    }

    #[test]
    fn test_entry_matches_on_severity_tag_or_message() {
        use crate::entry::Severity;

        let entry = LogEntry::new(Severity::Warning, "Net", "slow reply", "");
        let by = |p: &str| build_filter(p, SearchMode::Plain).unwrap().matches_entry(&entry);
        assert!(by("warn"));
        assert!(by("net"));
        assert!(by("REPLY"));
        assert!(!by("error"));
        // The stack is not searched
        let traced = LogEntry::new(Severity::Info, "ui", "click", "Game.Boot:Run ()");
        assert!(!build_filter("boot", SearchMode::Plain)
            .unwrap()
            .matches_entry(&traced));
    }

    #[test]
    fn test_regex_mode() {
        let filter = build_filter(r"^net\d", SearchMode::Regex).unwrap();
        assert!(filter.matches("NET7 down"));
        assert!(!filter.matches("the net7"));
    }
}
