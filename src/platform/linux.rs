// Linkshelf platform paths for Linux
// Config: ~/.config/linkshelf
// Data:   ~/.local/share/linkshelf

use std::env;
use std::path::PathBuf;

/// Returns the configuration directory for Linkshelf on Linux.
/// Uses `$XDG_CONFIG_HOME/linkshelf` if set, otherwise `~/.config/linkshelf`.
pub fn get_config_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        PathBuf::from(xdg).join("linkshelf")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home).join(".config").join("linkshelf")
    }
}

/// Returns the data directory for Linkshelf on Linux.
/// Uses `$XDG_DATA_HOME/linkshelf` if set, otherwise `~/.local/share/linkshelf`.
pub fn get_data_dir() -> PathBuf {
    if let Ok(xdg) = env::var("XDG_DATA_HOME") {
        PathBuf::from(xdg).join("linkshelf")
    } else {
        let home = env::var("HOME").unwrap_or_else(|_| String::from("/tmp"));
        PathBuf::from(home)
            .join(".local")
            .join("share")
            .join("linkshelf")
    }
}
