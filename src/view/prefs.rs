use crate::filter::SearchMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
#[cfg(not(test))]
use std::path::PathBuf;

/// Filter preferences a viewer restores on startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterPrefs {
    pub show_info: bool,
    pub show_warnings: bool,
    pub show_errors: bool,
    pub tags: Vec<String>,
    pub show_all_tags: bool,
    pub collapse: bool,
    pub search: String,
    pub search_mode: SearchMode,
}

impl Default for FilterPrefs {
    fn default() -> Self {
        Self {
            show_info: true,
            show_warnings: true,
            show_errors: true,
            tags: Vec::new(),
            show_all_tags: true,
            collapse: false,
            search: String::new(),
            search_mode: SearchMode::Plain,
        }
    }
}

/// Get the prefs file path
#[cfg(not(test))]
fn prefs_file_path() -> Option<PathBuf> {
    crate::config::logdeck_dir().map(|p| p.join("prefs.json"))
}

/// Load filter preferences from disk.
///
/// In test builds, returns defaults to avoid reading the user's real prefs file.
/// The core logic in `load_from` is tested directly.
pub fn load_prefs() -> FilterPrefs {
    #[cfg(test)]
    {
        return FilterPrefs::default();
    }

    #[cfg(not(test))]
    {
        let Some(path) = prefs_file_path() else {
            return FilterPrefs::default();
        };
        load_from(&path)
    }
}

/// Save filter preferences to disk.
///
/// In test builds, this is a no-op to avoid corrupting the user's real prefs file.
pub fn save_prefs(prefs: &FilterPrefs) {
    #[cfg(test)]
    {
        let _ = prefs;
    }

    #[cfg(not(test))]
    {
        let Some(path) = prefs_file_path() else {
            return;
        };
        save_to(&path, prefs);
    }
}

pub fn load_from(path: &Path) -> FilterPrefs {
    if !path.exists() {
        return FilterPrefs::default();
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str(&content) {
            Ok(prefs) => prefs,
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse filter prefs");
                FilterPrefs::default()
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "failed to read filter prefs");
            FilterPrefs::default()
        }
    }
}

pub fn save_to(path: &Path, prefs: &FilterPrefs) {
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!(error = %e, "failed to create config directory");
            return;
        }
    }

    match serde_json::to_string_pretty(prefs) {
        Ok(content) => {
            if let Err(e) = fs::write(path, content) {
                tracing::warn!(error = %e, "failed to save filter prefs");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize filter prefs");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let prefs = FilterPrefs {
            show_info: false,
            tags: vec!["net".into(), "Compiler".into()],
            collapse: true,
            search: "timeout".into(),
            search_mode: SearchMode::Regex,
            ..FilterPrefs::default()
        };

        save_to(&path, &prefs);
        assert_eq!(load_from(&path), prefs);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nonexistent.json");
        assert_eq!(load_from(&path), FilterPrefs::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, r#"{"collapse": true}"#).unwrap();

        let prefs = load_from(&path);
        assert!(prefs.collapse);
        assert!(prefs.show_errors);
        assert!(prefs.show_all_tags);
    }

    #[test]
    fn test_test_builds_use_defaults() {
        save_prefs(&FilterPrefs::default());
        assert_eq!(load_prefs(), FilterPrefs::default());
    }
}
