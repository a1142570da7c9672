//! JSON file storage adapter: one `<key>.json` file per key.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::StoragePort;
use crate::types::errors::StorageError;

/// Stores each key as a file inside `dir`.
pub struct JsonFileStorage {
    dir: PathBuf,
}

impl JsonFileStorage {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the file holding `key`.
    ///
    /// Path separators in the key are replaced so a key can never escape `dir`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| if c == '/' || c == '\\' || c == '.' { '_' } else { c })
            .collect();
        self.dir.join(format!("{}.json", safe))
    }
}

impl StoragePort for JsonFileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        fs::read_to_string(&path)
            .map(Some)
            .map_err(|e| StorageError::Io(format!("Failed to read {}: {}", path.display(), e)))
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            StorageError::Io(format!("Failed to create storage directory: {}", e))
        })?;
        let path = self.path_for(key);
        write_atomic(&path, value)
            .map_err(|e| StorageError::Io(format!("Failed to write {}: {}", path.display(), e)))
    }
}

/// Sibling file a new value is staged in before it replaces `path`.
pub fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Replaces the file at `path` with `contents` so that a reader sees either
/// the old file or the new one, never a partial write.
///
/// Key files always end in `.json`, so they never collide with a staging path.
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let staged = staging_path(path);
    {
        let mut file = File::create(&staged)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(&staged, path)
}
