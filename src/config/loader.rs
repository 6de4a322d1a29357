//! Config loading for logdeck.
//!
//! Loads and validates YAML config files with path expansion. The global
//! file is applied first and the project file overrides it field by field.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::discovery::DiscoveryResult;
use crate::config::error::ConfigError;
use crate::config::types::{RawConfig, Settings};

/// Expand tilde in path to home directory.
///
/// Handles the following cases:
/// - `~/foo` -> `/home/user/foo`
/// - `/absolute/path` -> unchanged
/// - `relative/path` -> unchanged
pub fn expand_path(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();

    if let Some(rest) = path_str.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    } else if path_str == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }

    path.to_path_buf()
}

/// Whether a YAML document holds nothing but blank lines and comments.
fn is_blank_yaml(content: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#'))
}

/// Load and parse a YAML config file.
fn load_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    if is_blank_yaml(&content) {
        return Ok(RawConfig::default());
    }

    serde_saphyr::from_str(&content).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Overlay `raw` onto `settings`. `base_dir` resolves a relative project root.
fn apply(
    settings: &mut Settings,
    raw: RawConfig,
    path: &Path,
    base_dir: Option<&Path>,
) -> Result<(), ConfigError> {
    if let Some(v) = raw.clear_on_play {
        settings.clear_on_play = v;
    }
    if let Some(v) = raw.clear_on_build {
        settings.clear_on_build = v;
    }
    if let Some(v) = raw.clear_on_recompile {
        settings.clear_on_recompile = v;
    }
    if let Some(v) = raw.live_compiler_sync {
        settings.live_compiler_sync = v;
    }
    if let Some(root) = raw.project_root {
        let root = expand_path(&root);
        settings.project_root = Some(match base_dir {
            Some(base) if root.is_relative() => base.join(root),
            _ => root,
        });
    }
    if let Some(ms) = raw.poll_interval_ms {
        if ms == 0 {
            return Err(ConfigError::Validation {
                path: path.to_path_buf(),
                message: "poll_interval_ms must be greater than zero".to_string(),
            });
        }
        settings.poll_interval = Duration::from_millis(ms);
    }
    if let Some(ms) = raw.sync_grace_ms {
        settings.sync_grace = Duration::from_millis(ms);
    }
    if let Some(stack) = raw.stack {
        settings.stack = stack;
    }
    Ok(())
}

/// Load settings from a single file, on top of the defaults.
pub fn load_single_file(path: &Path) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();
    let raw = load_file(path)?;
    apply(&mut settings, raw, path, path.parent())?;
    if settings.project_root.is_none() {
        settings.project_root = path.parent().map(Path::to_path_buf);
    }
    Ok(settings)
}

/// Load settings from discovered config files.
///
/// Returns defaults if no config files exist (graceful degradation). The
/// project root defaults to the directory holding `logdeck.yaml`.
pub fn load(discovery: &DiscoveryResult) -> Result<Settings, ConfigError> {
    let mut settings = Settings::default();

    if let Some(global_path) = &discovery.global_config {
        let raw = load_file(global_path)?;
        apply(&mut settings, raw, global_path, None)?;
    }

    if let Some(project_path) = &discovery.project_config {
        let raw = load_file(project_path)?;
        apply(
            &mut settings,
            raw,
            project_path,
            discovery.project_root.as_deref(),
        )?;
    }

    if settings.project_root.is_none() {
        settings.project_root = discovery.project_root.clone();
    }

    Ok(settings)
}
