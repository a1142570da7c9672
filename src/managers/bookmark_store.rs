//! Bookmark Store for Linkshelf.
//!
//! Implements `BookmarkStoreTrait`: the authoritative newest-first collection
//! of bookmarks, written through to a [`StoragePort`] after every mutation.
//!
//! All reads and mutations go through one mutex. `add` awaits metadata
//! resolution before taking the lock, then prepends and persists inside it,
//! so concurrent adds each land exactly once.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use uuid::Uuid;

use crate::services::metadata_resolver::MetadataResolverTrait;
use crate::services::url_normalizer::{host_of, normalize_tags, normalize_url};
use crate::storage::StoragePort;
use crate::types::bookmark::{Bookmark, BookmarkDraft, BookmarkPatch, BookmarkStats};
use crate::types::category::ALL_CATEGORIES;
use crate::types::errors::{BookmarkError, StorageError};
use crate::types::settings::LinkshelfSettings;

/// Trait defining bookmark store operations.
#[async_trait]
pub trait BookmarkStoreTrait: Send + Sync {
    /// Creates a bookmark from a draft, resolving metadata when no title is given.
    async fn add(&self, draft: BookmarkDraft) -> Result<Bookmark, BookmarkError>;
    /// Merges `patch` into the bookmark with `id`. `Ok(None)` if there is none.
    fn update(&self, id: &str, patch: BookmarkPatch) -> Result<Option<Bookmark>, BookmarkError>;
    /// Deletes the bookmark with `id`. `Ok(false)` if there is none.
    fn remove(&self, id: &str) -> Result<bool, BookmarkError>;
    fn get(&self, id: &str) -> Option<Bookmark>;
    /// Bookmarks in `category` (or all, for `"all"`) whose title, url or
    /// description contains `term`, case-insensitively.
    fn filter(&self, term: &str, category: &str) -> Vec<Bookmark>;
    /// `"all"` followed by each category present, in first-seen order.
    fn distinct_categories(&self) -> Vec<String>;
    fn count(&self) -> usize;
    fn stats(&self, term: &str, category: &str) -> BookmarkStats;
}

/// Store options taken from settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookmarkStoreConfig {
    /// Key the serialized collection lives under.
    pub storage_key: String,
    /// Category for drafts that don't name one.
    pub default_category: String,
}

impl BookmarkStoreConfig {
    pub fn from_settings(settings: &LinkshelfSettings) -> Self {
        Self {
            storage_key: settings.storage.storage_key.clone(),
            default_category: settings.store.default_category.clone(),
        }
    }
}

impl Default for BookmarkStoreConfig {
    fn default() -> Self {
        Self::from_settings(&LinkshelfSettings::default())
    }
}

/// Bookmark store backed by a persistence port.
pub struct BookmarkStore {
    bookmarks: Mutex<Vec<Bookmark>>,
    storage: Arc<dyn StoragePort>,
    resolver: Arc<dyn MetadataResolverTrait>,
    storage_key: String,
    default_category: RwLock<String>,
}

impl BookmarkStore {
    /// Opens the store, loading whatever collection is persisted under the key.
    ///
    /// Missing or unparseable state yields an empty collection.
    ///
    /// # Errors
    /// Returns the adapter's `StorageError` if the stored value cannot be read
    /// at all, so an unreadable store is never silently overwritten.
    pub fn open(
        storage: Arc<dyn StoragePort>,
        resolver: Arc<dyn MetadataResolverTrait>,
        config: BookmarkStoreConfig,
    ) -> Result<Self, StorageError> {
        let bookmarks = match storage.read(&config.storage_key)? {
            None => Vec::new(),
            Some(raw) => match serde_json::from_str::<Vec<Bookmark>>(&raw) {
                Ok(loaded) => {
                    Self::repair(loaded, resolver.as_ref(), &config.default_category)
                }
                Err(e) => {
                    log::warn!(
                        "[STORE] Ignoring unparseable collection under '{}': {}",
                        config.storage_key,
                        e
                    );
                    Vec::new()
                }
            },
        };

        log::info!("[STORE] Loaded {} bookmarks", bookmarks.len());

        Ok(Self {
            bookmarks: Mutex::new(bookmarks),
            storage,
            resolver,
            storage_key: config.storage_key,
            default_category: RwLock::new(config.default_category),
        })
    }

    /// Category given to later drafts that don't name one. Blank values are ignored.
    pub fn set_default_category(&self, category: &str) {
        let category = category.trim();
        if category.is_empty() {
            return;
        }
        *self.default_category.write().unwrap_or_else(|e| e.into_inner()) = category.to_string();
        log::info!("[STORE] Default category is now '{}'", category);
    }

    pub fn default_category(&self) -> String {
        self.default_category
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Every bookmark, newest first.
    pub fn all(&self) -> Vec<Bookmark> {
        self.lock().clone()
    }

    /// Host-based favicon for a bookmark URL, for image-load fallbacks.
    pub fn fallback_favicon(&self, url: &str) -> String {
        self.resolver.fallback_favicon(url)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Bookmark>> {
        // Poisoning is recoverable: each mutation touches a single record.
        self.bookmarks.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Writes the full collection under the storage key.
    fn persist(&self, bookmarks: &[Bookmark]) -> Result<(), BookmarkError> {
        let json = serde_json::to_string(bookmarks)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage
            .write(&self.storage_key, &json)
            .map_err(|e| {
                log::error!("[STORE] Failed to persist collection: {}", e);
                BookmarkError::from(e)
            })
    }

    /// Restores record invariants on data read back from storage.
    fn repair(
        loaded: Vec<Bookmark>,
        resolver: &dyn MetadataResolverTrait,
        default_category: &str,
    ) -> Vec<Bookmark> {
        let mut seen = HashSet::new();
        let mut repaired = Vec::with_capacity(loaded.len());
        for mut bookmark in loaded {
            if !seen.insert(bookmark.id.clone()) {
                log::warn!("[STORE] Dropping duplicate bookmark id {}", bookmark.id);
                continue;
            }
            bookmark.tags = normalize_tags(&bookmark.tags);
            if bookmark.title.trim().is_empty() {
                bookmark.title = host_of(&bookmark.url).unwrap_or_else(|| bookmark.url.clone());
            }
            if bookmark.favicon.trim().is_empty() {
                bookmark.favicon = resolver.fallback_favicon(&bookmark.url);
            }
            if bookmark.category.trim().is_empty() {
                bookmark.category = default_category.to_string();
            }
            repaired.push(bookmark);
        }
        repaired
    }

    fn matches(bookmark: &Bookmark, term: &str, category: &str) -> bool {
        let category_ok = category == ALL_CATEGORIES || bookmark.category == category;
        if !category_ok {
            return false;
        }
        if term.is_empty() {
            return true;
        }
        bookmark.title.to_lowercase().contains(term)
            || bookmark.url.to_lowercase().contains(term)
            || bookmark.description.to_lowercase().contains(term)
    }

    fn categories_of(bookmarks: &[Bookmark]) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for bookmark in bookmarks {
            if bookmark.category.is_empty() || categories.contains(&bookmark.category) {
                continue;
            }
            categories.push(bookmark.category.clone());
        }
        categories
    }

    fn now() -> String {
        Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Trims an optional string, treating blank as absent.
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[async_trait]
impl BookmarkStoreTrait for BookmarkStore {
    async fn add(&self, draft: BookmarkDraft) -> Result<Bookmark, BookmarkError> {
        let url = normalize_url(&draft.url)?;
        let tags = normalize_tags(&draft.tags);
        let category = non_blank(draft.category).unwrap_or_else(|| self.default_category());
        let description = non_blank(draft.description);

        let (title, description, favicon) = match non_blank(draft.title) {
            Some(title) => (
                title,
                description.unwrap_or_default(),
                self.resolver.fallback_favicon(&url),
            ),
            None => {
                let metadata = self.resolver.resolve(&url).await;
                (
                    metadata.title,
                    description.unwrap_or(metadata.description),
                    metadata.favicon,
                )
            }
        };

        let title = non_blank(Some(title))
            .unwrap_or_else(|| host_of(&url).unwrap_or_else(|| url.clone()));
        let favicon = non_blank(Some(favicon))
            .unwrap_or_else(|| self.resolver.fallback_favicon(&url));

        let mut bookmarks = self.lock();
        let mut id = Uuid::new_v4().to_string();
        while bookmarks.iter().any(|b| b.id == id) {
            id = Uuid::new_v4().to_string();
        }

        let bookmark = Bookmark {
            id,
            url,
            title,
            description,
            category,
            tags,
            favicon,
            created_at: Self::now(),
        };
        bookmarks.insert(0, bookmark.clone());
        log::info!("[STORE] Added bookmark {} ({})", bookmark.id, bookmark.url);

        self.persist(&bookmarks)?;
        Ok(bookmark)
    }

    fn update(&self, id: &str, patch: BookmarkPatch) -> Result<Option<Bookmark>, BookmarkError> {
        let url = patch.url.as_deref().map(normalize_url).transpose()?;

        let mut bookmarks = self.lock();
        let Some(bookmark) = bookmarks.iter_mut().find(|b| b.id == id) else {
            log::debug!("[STORE] Update ignored, no bookmark {}", id);
            return Ok(None);
        };

        if patch.is_empty() {
            return Ok(Some(bookmark.clone()));
        }

        if let Some(url) = url {
            bookmark.url = url;
        }
        if let Some(title) = non_blank(patch.title) {
            bookmark.title = title;
        }
        if let Some(description) = patch.description {
            bookmark.description = description.trim().to_string();
        }
        if let Some(category) = non_blank(patch.category) {
            bookmark.category = category;
        }
        if let Some(tags) = patch.tags {
            bookmark.tags = normalize_tags(&tags);
        }
        if let Some(favicon) = non_blank(patch.favicon) {
            bookmark.favicon = favicon;
        }

        let updated = bookmark.clone();
        log::info!("[STORE] Updated bookmark {}", id);
        self.persist(&bookmarks)?;
        Ok(Some(updated))
    }

    fn remove(&self, id: &str) -> Result<bool, BookmarkError> {
        let mut bookmarks = self.lock();
        let Some(index) = bookmarks.iter().position(|b| b.id == id) else {
            return Ok(false);
        };
        bookmarks.remove(index);
        log::info!("[STORE] Removed bookmark {}", id);
        self.persist(&bookmarks)?;
        Ok(true)
    }

    fn get(&self, id: &str) -> Option<Bookmark> {
        self.lock().iter().find(|b| b.id == id).cloned()
    }

    fn filter(&self, term: &str, category: &str) -> Vec<Bookmark> {
        let term = term.to_lowercase();
        self.lock()
            .iter()
            .filter(|b| Self::matches(b, &term, category))
            .cloned()
            .collect()
    }

    fn distinct_categories(&self) -> Vec<String> {
        Self::categories_of(&self.lock())
    }

    fn count(&self) -> usize {
        self.lock().len()
    }

    fn stats(&self, term: &str, category: &str) -> BookmarkStats {
        let term = term.to_lowercase();
        let bookmarks = self.lock();
        BookmarkStats {
            total: bookmarks.len(),
            categories: Self::categories_of(&bookmarks).len() - 1,
            filtered: bookmarks
                .iter()
                .filter(|b| Self::matches(b, &term, category))
                .count(),
        }
    }
}
