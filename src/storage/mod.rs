//! Persistence port for serialized collections.
//!
//! The bookmark store reads the whole collection once at startup and writes
//! it back in full after every mutation. Adapters only need to move opaque
//! strings under a key.

use crate::types::errors::StorageError;

pub mod file;
pub mod memory;
pub mod sqlite;

pub use file::JsonFileStorage;
pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Read-all / write-all access to a durable key/value mechanism.
pub trait StoragePort: Send + Sync {
    /// Returns the stored value, or `None` if nothing was ever written under `key`.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    /// Replaces the value stored under `key`.
    fn write(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
