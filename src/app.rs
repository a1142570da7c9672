//! App Core for Linkshelf.
//!
//! Central struct holding the settings engine, the metadata resolver and the
//! bookmark store, wired to the storage backend chosen in settings.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde_json::Value;

use crate::managers::bookmark_store::{BookmarkStore, BookmarkStoreConfig};
use crate::platform;
use crate::services::metadata_resolver::{
    MetadataResolver, MetadataResolverTrait, SharedResolver,
};
use crate::services::settings_engine::SettingsEngine;
use crate::storage::{JsonFileStorage, MemoryStorage, SqliteStorage, StoragePort};
use crate::types::errors::{SettingsError, StorageError};
use crate::types::settings::{LinkshelfSettings, SettingsSection, SettingsUpdate, StorageBackend};

/// File name of the SQLite database inside the data directory.
pub const DATABASE_FILE: &str = "linkshelf.db";

/// Central application struct.
///
/// The store and resolver synchronize internally, so RPC handlers share one
/// `App` by reference. Settings changes go through [`App::update_setting`].
pub struct App {
    pub settings_engine: Mutex<SettingsEngine>,
    pub store: Arc<BookmarkStore>,
    pub resolver: Arc<SharedResolver>,
}

impl App {
    /// Creates a new App from the settings file at `settings_path` (or the
    /// platform default), opening the configured storage backend.
    pub fn new(settings_path: Option<PathBuf>) -> Result<Self, Box<dyn std::error::Error>> {
        let path = settings_path.unwrap_or_else(SettingsEngine::default_path);
        let settings_engine = match SettingsEngine::load(path.clone()) {
            Ok(engine) => engine,
            Err(e) => {
                log::warn!("[SETTINGS] Using defaults, could not load {}: {}", path.display(), e);
                SettingsEngine::with_settings(path, LinkshelfSettings::default())
            }
        };
        let settings = settings_engine.settings().clone();

        let resolver: Arc<dyn MetadataResolverTrait> =
            Arc::new(MetadataResolver::from_settings(&settings.resolver)?);
        let storage = open_storage(&settings)?;

        Ok(Self::with_parts(settings_engine, storage, resolver)?)
    }

    /// Assembles an App from already-built parts.
    pub fn with_parts(
        settings_engine: SettingsEngine,
        storage: Arc<dyn StoragePort>,
        resolver: Arc<dyn MetadataResolverTrait>,
    ) -> Result<Self, StorageError> {
        let resolver = Arc::new(SharedResolver::new(resolver));
        let config = BookmarkStoreConfig::from_settings(settings_engine.settings());
        let store = BookmarkStore::open(storage, resolver.clone(), config)?;

        Ok(Self {
            settings_engine: Mutex::new(settings_engine),
            store: Arc::new(store),
            resolver,
        })
    }

    /// Saves one setting and applies it to the running components.
    ///
    /// Resolver and store settings take effect on the next call. Storage
    /// settings only take effect after a restart, since the open collection
    /// stays bound to its adapter.
    pub fn update_setting(&self, key: &str, value: Value) -> Result<SettingsUpdate, SettingsError> {
        let mut engine = self.settings_engine.lock().unwrap_or_else(|e| e.into_inner());
        let section = engine.set_value(key, value)?;
        let settings = engine.settings();

        let restart_required = match section {
            SettingsSection::Resolver => match MetadataResolver::from_settings(&settings.resolver) {
                Ok(resolver) => {
                    self.resolver.replace(Arc::new(resolver));
                    log::info!("[RESOLVER] Rebuilt after {} changed", key);
                    false
                }
                Err(e) => {
                    log::warn!("[RESOLVER] Keeping current resolver until restart: {}", e);
                    true
                }
            },
            SettingsSection::Store => {
                self.store.set_default_category(&settings.store.default_category);
                false
            }
            SettingsSection::Storage => {
                log::info!("[STORAGE] {} takes effect after restart", key);
                true
            }
        };

        Ok(SettingsUpdate {
            section,
            restart_required,
        })
    }
}

/// Opens the storage adapter named by `settings.storage.backend`.
pub fn open_storage(settings: &LinkshelfSettings) -> Result<Arc<dyn StoragePort>, StorageError> {
    let data_dir = platform::resolve_data_dir(settings.storage.data_dir.as_deref());
    let storage: Arc<dyn StoragePort> = match settings.storage.backend {
        StorageBackend::Sqlite => Arc::new(SqliteStorage::open(data_dir.join(DATABASE_FILE))?),
        StorageBackend::Json => Arc::new(JsonFileStorage::new(data_dir)),
        StorageBackend::Memory => {
            log::warn!("[STORAGE] Memory backend selected, bookmarks will not survive restart");
            Arc::new(MemoryStorage::new())
        }
    };
    Ok(storage)
}
