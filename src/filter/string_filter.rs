use super::Filter;

/// Case-insensitive substring search.
///
/// The needle is folded once up front; each haystack is folded per call.
pub struct StringFilter {
    needle: String,
    ascii: bool,
}

impl StringFilter {
    pub fn new(pattern: &str) -> Self {
        Self {
            needle: pattern.to_lowercase(),
            ascii: pattern.is_ascii(),
        }
    }
}

impl Filter for StringFilter {
    fn matches(&self, text: &str) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        if self.ascii && text.is_ascii() {
            let needle = self.needle.as_bytes();
            if needle.len() > text.len() {
                return false;
            }
            return text
                .as_bytes()
                .windows(needle.len())
                .any(|w| w.eq_ignore_ascii_case(needle));
        }
        text.to_lowercase().contains(&self.needle)
    }
}
