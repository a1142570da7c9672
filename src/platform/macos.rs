// Linkshelf platform paths for macOS
// Config: ~/Library/Application Support/Linkshelf
// Data:   ~/Library/Application Support/Linkshelf

use std::env;
use std::path::PathBuf;

fn home_dir() -> PathBuf {
    PathBuf::from(env::var("HOME").unwrap_or_else(|_| String::from("/tmp")))
}

/// Returns the configuration directory for Linkshelf on macOS.
/// `~/Library/Application Support/Linkshelf`
pub fn get_config_dir() -> PathBuf {
    home_dir()
        .join("Library")
        .join("Application Support")
        .join("Linkshelf")
}

/// Returns the data directory for Linkshelf on macOS (same as config).
pub fn get_data_dir() -> PathBuf {
    get_config_dir()
}
