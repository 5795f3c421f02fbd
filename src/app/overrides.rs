use std::{
    collections::BTreeMap,
    fs, io,
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::{debug, info};

use crate::app::settings::write_private;

pub const OVERRIDES_FILE: &str = "location_overrides.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to encode location overrides: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("failed to write location overrides to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("failed to remove {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },
}

/// Per-location forced on/off switches. Keys compare case-insensitively but
/// keep the spelling they were first stored with.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationOverrides {
    entries: BTreeMap<String, bool>,
}

impl LocationOverrides {
    /// A missing or unreadable file counts as "no overrides".
    #[must_use]
    pub fn load(path: &Path) -> Self {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                debug!(path = %path.display(), error = %err, "no location overrides");
                return Self::default();
            }
        };
        match serde_json::from_str::<BTreeMap<String, bool>>(&content) {
            Ok(raw) => {
                let mut overrides = Self::default();
                for (name, enabled) in raw {
                    overrides.set(&name, enabled);
                }
                overrides
            }
            Err(err) => {
                debug!(path = %path.display(), error = %err, "ignoring corrupt location overrides");
                Self::default()
            }
        }
    }

    fn key_for(&self, name: &str) -> Option<&String> {
        self.entries.keys().find(|key| key.eq_ignore_ascii_case(name))
    }

    fn set(&mut self, name: &str, enabled: bool) {
        let key = self.key_for(name).cloned().unwrap_or_else(|| name.to_string());
        self.entries.insert(key, enabled);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<bool> {
        self.key_for(name).and_then(|key| self.entries.get(key)).copied()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Outdoors by default, unless the location has an override.
    #[must_use]
    pub fn is_enabled(&self, name: &str, is_outdoors: bool) -> bool {
        self.get(name).unwrap_or(is_outdoors)
    }

    /// Adds an override opposite to the default rule, or drops the existing
    /// one. Returns whether rays are now enabled for the location.
    pub fn toggle(&mut self, name: &str, is_outdoors: bool) -> bool {
        if let Some(key) = self.key_for(name).cloned()
            && let Some(previous) = self.entries.remove(&key)
        {
            return !previous;
        }
        let enabled = !is_outdoors;
        self.entries.insert(name.to_string(), enabled);
        enabled
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        if self.entries.is_empty() {
            return match fs::remove_file(path) {
                Ok(()) => Ok(()),
                Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(StoreError::Remove {
                    path: path.to_path_buf(),
                    source,
                }),
            };
        }
        let payload = serde_json::to_string_pretty(&self.entries)?;
        write_private(path, &payload).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Overrides backed by a file, read on first use.
#[derive(Debug)]
pub struct OverrideBook {
    path: PathBuf,
    loaded: Option<LocationOverrides>,
}

impl OverrideBook {
    #[must_use]
    pub fn new(path: PathBuf) -> Self {
        Self { path, loaded: None }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn overrides(&mut self) -> &LocationOverrides {
        self.loaded_mut()
    }

    fn loaded_mut(&mut self) -> &mut LocationOverrides {
        let path = &self.path;
        self.loaded
            .get_or_insert_with(|| LocationOverrides::load(path))
    }

    pub fn is_enabled(&mut self, name: &str, is_outdoors: bool) -> bool {
        self.overrides().is_enabled(name, is_outdoors)
    }

    /// Toggles and persists. The in-memory state changes even when the write
    /// fails.
    pub fn toggle(&mut self, name: &str, is_outdoors: bool) -> Result<bool, StoreError> {
        let enabled = self.loaded_mut().toggle(name, is_outdoors);
        info!(location = name, enabled, "location override toggled");
        let path = self.path.clone();
        self.loaded_mut().save(&path)?;
        Ok(enabled)
    }
}
