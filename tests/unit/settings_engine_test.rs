//! Unit tests for the settings engine: defaults, dot-path updates, validation, persistence.

use std::path::PathBuf;

use rstest::rstest;
use serde_json::{json, Value};
use tempfile::TempDir;

use linkshelf::services::settings_engine::{SettingsEngine, SETTINGS_FILE};
use linkshelf::storage::file::staging_path;
use linkshelf::types::errors::SettingsError;
use linkshelf::types::settings::{LinkshelfSettings, SettingsSection, StorageBackend};

fn setup() -> (SettingsEngine, PathBuf, TempDir) {
    let tmp = TempDir::new().expect("Failed to create temp dir");
    let path = tmp.path().join(SETTINGS_FILE);
    let engine = SettingsEngine::load(path.clone()).expect("Failed to load settings");
    (engine, path, tmp)
}

#[test]
fn test_defaults() {
    let settings = LinkshelfSettings::default();
    assert_eq!(settings.resolver.proxy_url, "https://api.allorigins.win/raw?url=");
    assert_eq!(settings.resolver.favicon_service_url, "https://www.google.com/s2/favicons");
    assert_eq!(settings.resolver.favicon_size, 64);
    assert_eq!(settings.resolver.description_max_chars, 150);
    assert_eq!(settings.storage.backend, StorageBackend::Sqlite);
    assert_eq!(settings.storage.storage_key, "bookmarks");
    assert_eq!(settings.store.default_category, "work");
    assert!(settings.validate().is_ok());
}

#[test]
fn test_missing_file_loads_defaults_without_creating_it() {
    let (engine, path, _tmp) = setup();
    assert_eq!(engine.settings(), &LinkshelfSettings::default());
    assert_eq!(engine.path(), path.as_path());
    assert!(!path.exists());
}

#[test]
fn test_set_value_persists_to_disk() {
    let (mut engine, path, _tmp) = setup();
    let section = engine
        .set_value("store.default_category", json!("learning"))
        .unwrap();
    assert_eq!(section, SettingsSection::Store);

    let reloaded = SettingsEngine::load(path.clone()).unwrap();
    assert_eq!(reloaded.settings().store.default_category, "learning");
    assert!(!staging_path(&path).exists());
}

#[rstest]
#[case("resolver.timeout_secs", SettingsSection::Resolver)]
#[case("storage.backend", SettingsSection::Storage)]
#[case("store.default_category", SettingsSection::Store)]
fn test_section_of_key(#[case] key: &str, #[case] section: SettingsSection) {
    assert_eq!(SettingsSection::of_key(key), Some(section));
}

#[test]
fn test_set_value_wrong_type_leaves_settings_unchanged() {
    let (mut engine, path, _tmp) = setup();

    let result = engine.set_value("resolver.timeout_secs", json!("soon"));
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.settings().resolver.timeout_secs, 10);
    assert!(!path.exists());
}

#[rstest]
#[case("resolver.timeout_secs", json!(0))]
#[case("resolver.max_body_bytes", json!(0))]
#[case("resolver.proxy_url", json!("  "))]
#[case("store.default_category", json!(""))]
#[case("storage.storage_key", json!(" "))]
fn test_unusable_values_are_rejected(#[case] key: &str, #[case] value: Value) {
    let (mut engine, _path, _tmp) = setup();
    let result = engine.set_value(key, value);
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
    assert_eq!(engine.settings(), &LinkshelfSettings::default());
}

#[rstest]
#[case("resolver.nope")]
#[case("colors.accent")]
#[case("")]
fn test_unknown_key_is_rejected(#[case] key: &str) {
    let (mut engine, _path, _tmp) = setup();
    let result = engine.set_value(key, json!(1));
    assert!(matches!(result, Err(SettingsError::InvalidKey(_))));
}

#[test]
fn test_malformed_file_is_serialization_error() {
    let (_engine, path, _tmp) = setup();
    std::fs::write(&path, "{ not json").unwrap();
    let result = SettingsEngine::load(path);
    assert!(matches!(result, Err(SettingsError::SerializationError(_))));
}

#[test]
fn test_file_with_unusable_value_is_rejected_on_load() {
    let (_engine, path, _tmp) = setup();
    let mut settings = LinkshelfSettings::default();
    settings.resolver.timeout_secs = 0;
    std::fs::write(&path, serde_json::to_string(&settings).unwrap()).unwrap();

    let result = SettingsEngine::load(path);
    assert!(matches!(result, Err(SettingsError::InvalidValue(_))));
}
