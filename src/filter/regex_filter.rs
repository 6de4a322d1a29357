use super::Filter;
use regex::{Regex, RegexBuilder};

/// Regex-based filter, case-insensitive
pub struct RegexFilter {
    regex: Regex,
}

impl RegexFilter {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        let regex = RegexBuilder::new(pattern).case_insensitive(true).build()?;
        Ok(Self { regex })
    }
}

impl Filter for RegexFilter {
    fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}
