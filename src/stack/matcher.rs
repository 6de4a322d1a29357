use regex::{Captures, Regex};
use std::sync::LazyLock;

/// Location fields pulled out of one stack line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLocation {
    pub method: String,
    pub path: String,
    pub line: u32,
}

/// Trait for extensible stack-line recognition.
pub trait LineMatcher: Send + Sync {
    fn match_line(&self, line: &str) -> Option<FrameLocation>;

    fn name(&self) -> &'static str;
}

/// `at Namespace.Type.Method() in /path/File.cs:line 42`
static DOTNET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*at\s+(?P<method>.+?)\s+in\s+(?P<path>.+):line\s+(?P<line>\d+)\s*$")
        .expect("dotnet stack regex must compile")
});

/// `at Namespace.Type.Method () [0x0001b] in /path/File.cs:42`
static MONO_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*at\s+(?P<method>.+?)\s+\[[^\]]*\]\s+in\s+(?P<path>.+):(?P<line>\d+)\s*$")
        .expect("mono stack regex must compile")
});

/// `Namespace.Type:Method () (at Assets/Scripts/File.cs:42)`
static HOST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?P<method>.+?)\s*\(at\s+(?P<path>.+):(?P<line>\d+)\)\s*$")
        .expect("host stack regex must compile")
});

fn location(caps: Captures<'_>) -> Option<FrameLocation> {
    Some(FrameLocation {
        method: caps.name("method")?.as_str().trim().to_string(),
        path: caps.name("path")?.as_str().trim().to_string(),
        line: caps.name("line")?.as_str().parse().ok()?,
    })
}

pub struct DotnetMatcher;

impl LineMatcher for DotnetMatcher {
    fn match_line(&self, line: &str) -> Option<FrameLocation> {
        DOTNET_RE.captures(line).and_then(location)
    }

    fn name(&self) -> &'static str {
        "dotnet"
    }
}

pub struct MonoMatcher;

impl LineMatcher for MonoMatcher {
    fn match_line(&self, line: &str) -> Option<FrameLocation> {
        MONO_RE.captures(line).and_then(location)
    }

    fn name(&self) -> &'static str {
        "mono"
    }
}

pub struct HostMatcher;

impl LineMatcher for HostMatcher {
    fn match_line(&self, line: &str) -> Option<FrameLocation> {
        HOST_RE.captures(line).and_then(location)
    }

    fn name(&self) -> &'static str {
        "host"
    }
}

/// Recognizers in priority order. The first match wins.
pub fn default_matchers() -> Vec<Box<dyn LineMatcher>> {
    vec![
        Box::new(DotnetMatcher),
        Box::new(MonoMatcher),
        Box::new(HostMatcher),
    ]
}
