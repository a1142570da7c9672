// Linkshelf platform paths for Windows
// Config: %APPDATA%/Linkshelf
// Data:   %APPDATA%/Linkshelf

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for Linkshelf on Windows.
/// `%APPDATA%/Linkshelf`
pub fn get_config_dir() -> PathBuf {
    let appdata =
        env::var("APPDATA").unwrap_or_else(|_| String::from("C:\\Users\\Default\\AppData\\Roaming"));
    PathBuf::from(appdata).join("Linkshelf")
}

/// Returns the data directory for Linkshelf on Windows (same as config).
pub fn get_data_dir() -> PathBuf {
    get_config_dir()
}
