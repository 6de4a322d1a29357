use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// String-valued key-value slots that outlive a process-state reset.
pub trait SlotStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: String);

    fn remove(&mut self, key: &str);

    fn flag(&self, key: &str) -> bool {
        self.get(key).as_deref() == Some("true")
    }

    fn set_flag(&mut self, key: &str, value: bool) {
        if value {
            self.set(key, "true".to_string());
        } else {
            self.remove(key);
        }
    }
}

/// In-memory slots for hosts that keep their own storage, and for tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySlots {
    values: BTreeMap<String, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl SlotStore for MemorySlots {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
    }

    fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SlotFile {
    slots: BTreeMap<String, String>,
}

/// Slots stored in a JSON file, rewritten on every change.
///
/// A missing or unreadable file behaves as empty slots.
#[derive(Debug)]
pub struct FileSlots {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl FileSlots {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = load_from(&path);
        Self { path, values }
    }

    /// Slots file in the user data directory (`~/.config/logdeck/state.json`).
    pub fn open_default() -> Option<Self> {
        crate::config::logdeck_dir().map(|dir| Self::open(dir.join("state.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) {
        save_to(&self.path, &self.values);
    }
}

impl SlotStore for FileSlots {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.values.insert(key.to_string(), value);
        self.persist();
    }

    fn remove(&mut self, key: &str) {
        if self.values.remove(key).is_some() {
            self.persist();
        }
    }
}

fn load_from(path: &Path) -> BTreeMap<String, String> {
    if !path.exists() {
        return BTreeMap::new();
    }

    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<SlotFile>(&content) {
            Ok(file) => file.slots,
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "ignoring unreadable slot file"
                );
                BTreeMap::new()
            }
        },
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "failed to read slot file");
            BTreeMap::new()
        }
    }
}

fn save_to(path: &Path, values: &BTreeMap<String, String>) {
    // Create parent directory if it doesn't exist
    if let Some(parent) = path.parent() {
        if let Err(e) = fs::create_dir_all(parent) {
            tracing::warn!(
                path = %parent.display(),
                error = %e,
                "failed to create state directory"
            );
            return;
        }
    }

    let file = SlotFile {
        slots: values.clone(),
    };
    match serde_json::to_string_pretty(&file) {
        Ok(content) => {
            if let Err(e) = fs::write(path, content) {
                tracing::warn!(path = %path.display(), error = %e, "failed to write slot file");
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "failed to serialize slots");
        }
    }
}
