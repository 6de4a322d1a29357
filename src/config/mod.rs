pub mod discovery;
pub mod error;
pub mod loader;
pub mod types;

pub use discovery::{discover, DiscoveryResult};
pub use error::ConfigError;
pub use loader::{load, load_single_file};
pub use types::Settings;

use std::path::PathBuf;

/// Get the logdeck state directory: ~/.config/logdeck/
pub fn logdeck_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|p| p.join(".config").join("logdeck"))
}
