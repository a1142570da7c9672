use serde::{Deserialize, Serialize};

use super::category::Category;

/// Top-level settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkshelfSettings {
    pub resolver: ResolverSettings,
    pub storage: StorageSettings,
    pub store: StoreSettings,
}

impl Default for LinkshelfSettings {
    fn default() -> Self {
        Self {
            resolver: ResolverSettings::default(),
            storage: StorageSettings::default(),
            store: StoreSettings::default(),
        }
    }
}

/// Metadata resolver settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResolverSettings {
    /// Relay prefix; the percent-encoded target URL is appended to it.
    pub proxy_url: String,
    /// Favicon-by-domain service; `domain` and `sz` query parameters are appended.
    pub favicon_service_url: String,
    pub favicon_size: u32,
    pub timeout_secs: u64,
    pub max_body_bytes: usize,
    pub user_agent: String,
    pub description_max_chars: usize,
}

impl Default for ResolverSettings {
    fn default() -> Self {
        Self {
            proxy_url: "https://api.allorigins.win/raw?url=".to_string(),
            favicon_service_url: "https://www.google.com/s2/favicons".to_string(),
            favicon_size: 64,
            timeout_secs: 10,
            max_body_bytes: 1024 * 1024,
            user_agent: format!("linkshelf/{}", env!("CARGO_PKG_VERSION")),
            description_max_chars: 150,
        }
    }
}

/// Which persistence adapter backs the store.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Sqlite,
    Json,
    Memory,
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    /// Key under which the serialized collection is stored.
    pub storage_key: String,
    /// Overrides the platform data directory when set.
    pub data_dir: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Sqlite,
            storage_key: "bookmarks".to_string(),
            data_dir: None,
        }
    }
}

/// Bookmark store settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoreSettings {
    /// Category assigned when a draft does not name one.
    pub default_category: String,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            default_category: Category::default().as_str().to_string(),
        }
    }
}

/// Top-level settings group a dotted key belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SettingsSection {
    Resolver,
    Storage,
    Store,
}

impl SettingsSection {
    /// Section named by the first segment of a dotted key.
    pub fn of_key(key: &str) -> Option<Self> {
        match key.split('.').next()? {
            "resolver" => Some(SettingsSection::Resolver),
            "storage" => Some(SettingsSection::Storage),
            "store" => Some(SettingsSection::Store),
            _ => None,
        }
    }
}

/// Outcome of a settings change on a running app.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub section: SettingsSection,
    /// The new value is saved but only takes effect after a restart.
    pub restart_required: bool,
}

impl LinkshelfSettings {
    /// Rejects values that would leave the resolver or store unusable.
    pub fn validate(&self) -> Result<(), String> {
        let required = [
            ("resolver.proxy_url", &self.resolver.proxy_url),
            ("resolver.favicon_service_url", &self.resolver.favicon_service_url),
            ("storage.storage_key", &self.storage.storage_key),
            ("store.default_category", &self.store.default_category),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(format!("{} cannot be empty", key));
            }
        }
        if self.resolver.timeout_secs == 0 {
            return Err("resolver.timeout_secs must be at least 1".to_string());
        }
        if self.resolver.max_body_bytes == 0 {
            return Err("resolver.max_body_bytes must be at least 1".to_string());
        }
        Ok(())
    }
}
