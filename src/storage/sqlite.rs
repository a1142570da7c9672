//! SQLite storage adapter backed by the `kv_store` table.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{params, OptionalExtension};

use super::StoragePort;
use crate::database::Database;
use crate::types::errors::StorageError;

/// Stores each key as one row of `kv_store`.
///
/// `rusqlite::Connection` is not `Sync`, so access is serialized behind a mutex.
pub struct SqliteStorage {
    db: Mutex<Database>,
}

impl SqliteStorage {
    /// Opens (or creates) the database file, creating parent directories first.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StorageError::Io(format!("Failed to create data directory: {}", e))
                })?;
            }
        }
        let db = Database::open(path)?;
        log::info!("[STORAGE] Opened SQLite store at {}", path.display());
        Ok(Self::from_database(db))
    }

    pub fn open_in_memory() -> Result<Self, StorageError> {
        Ok(Self::from_database(Database::open_in_memory()?))
    }

    pub fn from_database(db: Database) -> Self {
        Self { db: Mutex::new(db) }
    }
}

impl StoragePort for SqliteStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let value = db
            .connection()
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let db = self
            .db
            .lock()
            .map_err(|e| StorageError::Database(e.to_string()))?;
        let now = chrono::Utc::now().timestamp();
        db.connection().execute(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            params![key, value, now],
        )?;
        Ok(())
    }
}
