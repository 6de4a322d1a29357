//! Config discovery for logdeck.
//!
//! Walks parent directories to find `logdeck.yaml` and checks for global config
//! at `~/.config/logdeck/config.yaml`.

use std::path::{Path, PathBuf};

/// Project config filename to search for in parent directories.
pub const PROJECT_CONFIG_NAME: &str = "logdeck.yaml";

/// Global config filename within the logdeck config directory.
pub const GLOBAL_CONFIG_NAME: &str = "config.yaml";

/// Result of config discovery.
///
/// Contains paths to discovered configs and the project root directory.
#[derive(Debug, Clone, Default)]
pub struct DiscoveryResult {
    /// Directory containing `logdeck.yaml` (the project root).
    pub project_root: Option<PathBuf>,
    /// Full path to the project config file (`logdeck.yaml`).
    pub project_config: Option<PathBuf>,
    /// Full path to the global config file (`~/.config/logdeck/config.yaml`).
    pub global_config: Option<PathBuf>,
}

impl DiscoveryResult {
    /// Returns true if any config was found (project or global).
    pub fn has_config(&self) -> bool {
        self.project_config.is_some() || self.global_config.is_some()
    }
}

/// Discover config files starting from the current working directory.
pub fn discover() -> DiscoveryResult {
    let mut result = match std::env::current_dir() {
        Ok(dir) => discover_from(&dir.canonicalize().unwrap_or(dir)),
        Err(_) => DiscoveryResult::default(),
    };

    if let Some(config_dir) = dirs::config_dir() {
        let global_config_path = config_dir.join("logdeck").join(GLOBAL_CONFIG_NAME);
        if global_config_path.try_exists().unwrap_or(false) && global_config_path.is_file() {
            result.global_config = Some(global_config_path);
        }
    }

    result
}

/// Walk `start` and its ancestors looking for `logdeck.yaml`.
///
/// Only fills the project fields; the global config is left to [`discover`].
pub fn discover_from(start: &Path) -> DiscoveryResult {
    let mut result = DiscoveryResult::default();

    for ancestor in start.ancestors() {
        let config_path = ancestor.join(PROJECT_CONFIG_NAME);
        if config_path.try_exists().unwrap_or(false) && config_path.is_file() {
            result.project_root = Some(ancestor.to_path_buf());
            result.project_config = Some(config_path);
            break;
        }
    }

    tracing::debug!(
        project = ?result.project_config,
        start = %start.display(),
        "config discovery"
    );
    result
}
