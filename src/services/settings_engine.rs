//! Settings engine for Linkshelf.
//!
//! Settings live in one JSON file, `settings.json` under the platform config
//! directory unless a path is given. An update addresses one field by dotted
//! key; the whole settings value is re-validated and written atomically
//! before the change is reported, and the caller learns which section moved
//! so it can apply the change to running components.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::platform;
use crate::storage::file::write_atomic;
use crate::types::errors::SettingsError;
use crate::types::settings::{LinkshelfSettings, SettingsSection};

pub const SETTINGS_FILE: &str = "settings.json";

pub struct SettingsEngine {
    path: PathBuf,
    settings: LinkshelfSettings,
}

impl SettingsEngine {
    pub fn default_path() -> PathBuf {
        platform::get_config_dir().join(SETTINGS_FILE)
    }

    /// Reads settings from `path`. A missing file yields defaults and is not
    /// created until the first update.
    pub fn load(path: PathBuf) -> Result<Self, SettingsError> {
        let settings = match fs::read_to_string(&path) {
            Ok(content) => {
                let settings: LinkshelfSettings = serde_json::from_str(&content).map_err(|e| {
                    SettingsError::SerializationError(format!("{}: {}", path.display(), e))
                })?;
                settings.validate().map_err(SettingsError::InvalidValue)?;
                settings
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => LinkshelfSettings::default(),
            Err(e) => {
                return Err(SettingsError::IoError(format!("{}: {}", path.display(), e)));
            }
        };
        Ok(Self { path, settings })
    }

    /// Engine over in-memory settings; nothing is read from `path`.
    pub fn with_settings(path: PathBuf, settings: LinkshelfSettings) -> Self {
        Self { path, settings }
    }

    pub fn settings(&self) -> &LinkshelfSettings {
        &self.settings
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<(), SettingsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                SettingsError::IoError(format!("Failed to create config directory: {}", e))
            })?;
        }
        let json = serde_json::to_string_pretty(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        write_atomic(&self.path, &json)
            .map_err(|e| SettingsError::IoError(format!("{}: {}", self.path.display(), e)))
    }

    /// Sets the field at a dotted key such as `resolver.timeout_secs` and saves.
    ///
    /// Nothing changes, in memory or on disk, unless the key exists, the value
    /// has the field's type and the result passes validation.
    pub fn set_value(&mut self, key: &str, value: Value) -> Result<SettingsSection, SettingsError> {
        let section = SettingsSection::of_key(key)
            .ok_or_else(|| SettingsError::InvalidKey(key.to_string()))?;

        let mut tree = serde_json::to_value(&self.settings)
            .map_err(|e| SettingsError::SerializationError(e.to_string()))?;
        let pointer = format!("/{}", key.replace('.', "/"));
        let slot = tree
            .pointer_mut(&pointer)
            .ok_or_else(|| SettingsError::InvalidKey(key.to_string()))?;
        *slot = value;

        let updated: LinkshelfSettings = serde_json::from_value(tree)
            .map_err(|e| SettingsError::InvalidValue(format!("{}: {}", key, e)))?;
        updated.validate().map_err(SettingsError::InvalidValue)?;

        let previous = std::mem::replace(&mut self.settings, updated);
        if let Err(e) = self.save() {
            self.settings = previous;
            return Err(e);
        }
        log::info!("[SETTINGS] Updated {}", key);
        Ok(section)
    }
}
