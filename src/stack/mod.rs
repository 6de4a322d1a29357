//! Stack trace parsing and user-code classification.
//!
//! Raw multi-line stack text is turned into [`StackFrame`]s by trying each
//! registered [`LineMatcher`] in order. Frames are then classified as user
//! or system code so navigation can jump straight to the call site.

pub mod matcher;

use matcher::{default_matchers, FrameLocation, LineMatcher};
use serde::Deserialize;

/// One parsed line of a stack trace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackFrame {
    /// Original line, untrimmed
    pub raw: String,
    pub method: String,
    /// Forward-slash path, `None` when unknown
    pub path: Option<String>,
    /// 1-based line number, 0 when unknown
    pub line: u32,
    pub is_user: bool,
    /// Short `path:line` form, or the raw text for unmatched lines
    pub display: String,
}

impl StackFrame {
    /// Whether this frame can be used as a jump target.
    pub fn is_navigable(&self) -> bool {
        self.path.is_some() && self.line > 0
    }
}

/// Heuristics separating user code from system/library code.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StackClassifier {
    /// Method namespaces treated as system code
    pub system_prefixes: Vec<String>,
    /// Path fragments marking project sources
    pub source_markers: Vec<String>,
    /// Path fragments of the console's own implementation
    pub tool_dirs: Vec<String>,
    /// Path segments after which short display paths start
    pub root_markers: Vec<String>,
}

impl Default for StackClassifier {
    fn default() -> Self {
        let strings = |items: &[&str]| -> Vec<String> { items.iter().map(|s| s.to_string()).collect() };
        Self {
            system_prefixes: strings(&[
                "System.",
                "Mono.",
                "Microsoft.",
                "UnityEngine.",
                "UnityEditor.",
                "Unity.",
                "LogDeck.",
            ]),
            source_markers: strings(&["Assets/"]),
            tool_dirs: strings(&["Plugins/LogDeck/"]),
            root_markers: strings(&["Assets/", "Packages/"]),
        }
    }
}

impl StackClassifier {
    fn is_system_method(&self, method: &str) -> bool {
        let method = method.trim_start();
        self.system_prefixes.iter().any(|p| method.starts_with(p.as_str()))
    }

    fn is_user_path(&self, path: &str) -> bool {
        self.source_markers.iter().any(|m| path.contains(m.as_str()))
            && !self.tool_dirs.iter().any(|d| path.contains(d.as_str()))
    }

    /// Either check passing is enough to count as user code.
    pub fn is_user(&self, method: &str, path: Option<&str>) -> bool {
        !self.is_system_method(method) || path.is_some_and(|p| self.is_user_path(p))
    }

    /// Strip everything up to and including the last root marker segment,
    /// falling back to the file name.
    pub fn short_path<'a>(&self, path: &'a str) -> &'a str {
        let mut cut: Option<usize> = None;
        for marker in &self.root_markers {
            for (pos, _) in path.match_indices(marker.as_str()) {
                let at_segment = pos == 0 || path[..pos].ends_with('/');
                let end = pos + marker.len();
                if at_segment && end < path.len() && cut.map_or(true, |c| end > c) {
                    cut = Some(end);
                }
            }
        }
        match cut {
            Some(end) => &path[end..],
            None => path.rsplit('/').next().unwrap_or(path),
        }
    }
}

/// Ordered list of line matchers plus the classifier.
pub struct StackParser {
    matchers: Vec<Box<dyn LineMatcher>>,
    classifier: StackClassifier,
}

impl Default for StackParser {
    fn default() -> Self {
        Self::new(StackClassifier::default())
    }
}

impl StackParser {
    pub fn new(classifier: StackClassifier) -> Self {
        Self {
            matchers: default_matchers(),
            classifier,
        }
    }

    /// Register an additional trace format, tried after the built-in ones.
    pub fn with_matcher(mut self, matcher: Box<dyn LineMatcher>) -> Self {
        self.matchers.push(matcher);
        self
    }

    pub fn classifier(&self) -> &StackClassifier {
        &self.classifier
    }

    /// Parse every non-blank line of `text` into a frame.
    pub fn parse(&self, text: &str) -> Vec<StackFrame> {
        text.lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| self.parse_line(line))
            .collect()
    }

    pub fn parse_line(&self, line: &str) -> StackFrame {
        match self.matchers.iter().find_map(|m| m.match_line(line)) {
            Some(location) => self.build_frame(line, location),
            None => StackFrame {
                raw: line.to_string(),
                method: line.trim().to_string(),
                path: None,
                line: 0,
                is_user: false,
                display: line.trim().to_string(),
            },
        }
    }

    fn build_frame(&self, raw: &str, location: FrameLocation) -> StackFrame {
        let path = normalize_path(&location.path);
        let is_user = self.classifier.is_user(&location.method, path.as_deref());
        let display = match &path {
            Some(p) => {
                let short = self.classifier.short_path(p);
                if location.line > 0 {
                    format!("{}:{}", short, location.line)
                } else {
                    short.to_string()
                }
            }
            None => raw.trim().to_string(),
        };
        StackFrame {
            raw: raw.to_string(),
            method: location.method,
            path,
            line: location.line,
            is_user,
            display,
        }
    }
}

/// Forward slashes; placeholders such as `<filename unknown>` become `None`.
fn normalize_path(path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() || path.starts_with('<') {
        return None;
    }
    Some(path.replace('\\', "/"))
}

/// First frame, in original order, that is user code with a known location.
pub fn first_user_frame(frames: &[StackFrame]) -> Option<&StackFrame> {
    frames.iter().find(|f| f.is_user && f.is_navigable())
}
