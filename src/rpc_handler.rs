//! RPC method handler for the Linkshelf JSON-RPC protocol.
//!
//! Extracted from `rpc_server.rs` so it can be unit-tested independently.
//! The `handle_method` function dispatches JSON-RPC method calls to the
//! bookmark store, the metadata resolver and the settings engine via `App`.

use serde_json::{json, Value};

use crate::app::App;
use crate::managers::bookmark_store::BookmarkStoreTrait;
use crate::services::metadata_resolver::MetadataResolverTrait;
use crate::services::url_normalizer::{display_url, normalize_url};
use crate::types::bookmark::{BookmarkDraft, BookmarkPatch};
use crate::types::category::{Category, ALL_CATEGORIES, QUICK_ADD_SITES, SUGGESTED_TAGS};

fn str_param<'a>(params: &'a Value, name: &str) -> Option<&'a str> {
    params.get(name).and_then(|v| v.as_str())
}

/// Dispatch a JSON-RPC method call to the appropriate handler.
///
/// Returns `Ok(Value)` on success or `Err(String)` with an error message.
pub async fn handle_method(app: &App, method: &str, params: &Value) -> Result<Value, String> {
    match method {
        "ping" => Ok(json!({"pong": true, "version": env!("CARGO_PKG_VERSION")})),

        // ─── Bookmarks ───
        "bookmark.add" => {
            let draft: BookmarkDraft =
                serde_json::from_value(params.clone()).map_err(|e| format!("invalid params: {}", e))?;
            let bookmark = app.store.add(draft).await.map_err(|e| e.to_string())?;
            serde_json::to_value(bookmark).map_err(|e| e.to_string())
        }
        "bookmark.update" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            let patch: BookmarkPatch = match params.get("patch") {
                Some(p) => serde_json::from_value(p.clone()).map_err(|e| format!("invalid patch: {}", e))?,
                None => BookmarkPatch::default(),
            };
            let updated = app.store.update(id, patch).map_err(|e| e.to_string())?;
            Ok(json!({"bookmark": updated}))
        }
        "bookmark.remove" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            let removed = app.store.remove(id).map_err(|e| e.to_string())?;
            Ok(json!({"removed": removed}))
        }
        "bookmark.get" => {
            let id = str_param(params, "id").ok_or("missing id")?;
            Ok(json!({"bookmark": app.store.get(id)}))
        }
        "bookmark.filter" => {
            let term = str_param(params, "term").unwrap_or("");
            let category = str_param(params, "category").unwrap_or(ALL_CATEGORIES);
            let bookmarks = app.store.filter(term, category);
            let arr: Vec<Value> = bookmarks
                .iter()
                .map(|b| {
                    let mut v = json!(b);
                    v["displayUrl"] = json!(display_url(&b.url));
                    v
                })
                .collect();
            Ok(json!(arr))
        }
        "bookmark.categories" => Ok(json!(app.store.distinct_categories())),
        "bookmark.count" => Ok(json!({"count": app.store.count()})),
        "bookmark.stats" => {
            let term = str_param(params, "term").unwrap_or("");
            let category = str_param(params, "category").unwrap_or(ALL_CATEGORIES);
            serde_json::to_value(app.store.stats(term, category)).map_err(|e| e.to_string())
        }
        "bookmark.suggestions" => {
            let categories: Vec<Value> = Category::ALL
                .iter()
                .map(|c| json!({"value": c.as_str(), "label": c.label()}))
                .collect();
            Ok(json!({
                "categories": categories,
                "tags": SUGGESTED_TAGS,
                "sites": QUICK_ADD_SITES,
            }))
        }

        // ─── Metadata ───
        "metadata.resolve" => {
            let raw = str_param(params, "url").ok_or("missing url")?;
            let url = normalize_url(raw).map_err(|e| e.to_string())?;
            let metadata = app.resolver.resolve(&url).await;
            serde_json::to_value(metadata).map_err(|e| e.to_string())
        }

        // ─── Settings ───
        "settings.get" => {
            let engine = app.settings_engine.lock().map_err(|e| e.to_string())?;
            serde_json::to_value(engine.settings()).map_err(|e| e.to_string())
        }
        "settings.set" => {
            let key = str_param(params, "key").ok_or("missing key")?;
            let value = params.get("value").cloned().ok_or("missing value")?;
            let update = app.update_setting(key, value).map_err(|e| e.to_string())?;
            serde_json::to_value(update).map_err(|e| e.to_string())
        }

        _ => Err(format!("unknown method: {}", method)),
    }
}
