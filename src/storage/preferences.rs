//! Durable preference storage
//!
//! Preferences are a flat JSON object of string keys to string values in
//! `preferences.json` under the platform data directory. Only the theme is
//! stored today.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use tracing::debug;

use crate::domain::{PreferenceError, PreferenceStore};

const PREFERENCES_FILE: &str = "preferences.json";

/// Preference store backed by a JSON file
#[derive(Debug)]
pub struct FilePreferenceStore {
    path: Option<PathBuf>,
    values: BTreeMap<String, String>,
}

impl FilePreferenceStore {
    /// Opens the store at `path`; a missing or unreadable file reads as empty
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let values = read_values(&path);
        Self {
            path: Some(path),
            values,
        }
    }

    /// Opens the store in the platform data directory
    ///
    /// Without a home directory the store still works for this run but
    /// cannot persist anything.
    pub fn open_default() -> Self {
        match Self::default_path() {
            Some(path) => Self::open(path),
            None => Self {
                path: None,
                values: BTreeMap::new(),
            },
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("dev", "mythic", "mythic-chronicles")
            .map(|dirs| dirs.data_dir().join(PREFERENCES_FILE))
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn save(&self) -> Result<(), PreferenceError> {
        let path = self.path.as_ref().ok_or(PreferenceError::NoLocation)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.values)?;

        // Write to temp file, then rename
        let temp_path = path.with_extension("json.tmp");
        fs::write(&temp_path, content)?;
        fs::rename(&temp_path, path)?;

        debug!(path = %path.display(), "Preferences saved");
        Ok(())
    }
}

fn read_values(path: &Path) -> BTreeMap<String, String> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(_) => return BTreeMap::new(),
    };

    serde_json::from_str(&content).unwrap_or_else(|e| {
        debug!("Ignoring unreadable preferences at {}: {}", path.display(), e);
        BTreeMap::new()
    })
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        self.save()
    }
}

/// In-memory preference store, forgotten at exit
#[derive(Debug, Default)]
pub struct MemoryPreferenceStore {
    values: BTreeMap<String, String>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
