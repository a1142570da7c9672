use std::fmt;

// === BookmarkError ===

/// Errors surfaced by bookmark store operations.
#[derive(Debug)]
pub enum BookmarkError {
    /// The URL is missing, blank, uses a non-HTTP scheme, or has no host.
    InvalidUrl(String),
    /// The in-memory change was applied but could not be persisted.
    Storage(String),
}

impl fmt::Display for BookmarkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookmarkError::InvalidUrl(url) => write!(f, "Invalid bookmark URL: {}", url),
            BookmarkError::Storage(msg) => write!(f, "Bookmark storage error: {}", msg),
        }
    }
}

impl std::error::Error for BookmarkError {}

impl From<StorageError> for BookmarkError {
    fn from(err: StorageError) -> Self {
        BookmarkError::Storage(err.to_string())
    }
}

// === StorageError ===

/// Errors raised by persistence adapters.
#[derive(Debug)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    Io(String),
    /// The SQLite key/value table could not be read or written.
    Database(String),
    /// The collection could not be serialized.
    Serialization(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(msg) => write!(f, "Storage I/O error: {}", msg),
            StorageError::Database(msg) => write!(f, "Storage database error: {}", msg),
            StorageError::Serialization(msg) => {
                write!(f, "Storage serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for StorageError {}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        StorageError::Database(err.to_string())
    }
}

// === FetchError ===

/// Errors raised while retrieving a page through the relay.
///
/// These never leave the metadata resolver; they only decide which
/// fallback triple is produced and what gets logged.
#[derive(Debug)]
pub enum FetchError {
    /// The HTTP client could not be constructed.
    Client(String),
    /// The relay or target host could not be reached.
    Network(String),
    /// The request did not complete within the configured timeout.
    Timeout(String),
    /// The relay answered with a non-2xx status.
    HttpStatus(u16),
    /// The response declared a content type that is not markup.
    NotHtml(String),
    /// The response body could not be read.
    Body(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Client(msg) => write!(f, "HTTP client error: {}", msg),
            FetchError::Network(msg) => write!(f, "Fetch network error: {}", msg),
            FetchError::Timeout(url) => write!(f, "Fetch timed out: {}", url),
            FetchError::HttpStatus(code) => write!(f, "Fetch returned HTTP status {}", code),
            FetchError::NotHtml(content_type) => {
                write!(f, "Fetched content is not HTML: {}", content_type)
            }
            FetchError::Body(msg) => write!(f, "Failed to read fetched body: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}
