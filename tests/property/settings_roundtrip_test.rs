//! Property-based tests for LinkshelfSettings serialization round-trip.
//!
//! These tests verify that LinkshelfSettings can be serialized to JSON
//! and deserialized back without data loss for arbitrary valid inputs.

use linkshelf::services::settings_engine::SettingsEngine;
use linkshelf::types::settings::{
    LinkshelfSettings, ResolverSettings, StorageBackend, StorageSettings, StoreSettings,
};
use proptest::prelude::*;

fn arb_backend() -> impl Strategy<Value = StorageBackend> {
    prop_oneof![
        Just(StorageBackend::Sqlite),
        Just(StorageBackend::Json),
        Just(StorageBackend::Memory),
    ]
}

fn arb_resolver_settings() -> impl Strategy<Value = ResolverSettings> {
    (
        "https://[a-z]{3,10}\\.[a-z]{2,3}/[a-z]{0,5}\\?url=",
        "https://[a-z]{3,10}\\.[a-z]{2,3}/[a-z/]{0,10}",
        1u32..512,
        1u64..120,
        1usize..10_000_000,
        "[a-zA-Z0-9/._-]{1,30}",
        1usize..1000,
    )
        .prop_map(
            |(
                proxy_url,
                favicon_service_url,
                favicon_size,
                timeout_secs,
                max_body_bytes,
                user_agent,
                description_max_chars,
            )| ResolverSettings {
                proxy_url,
                favicon_service_url,
                favicon_size,
                timeout_secs,
                max_body_bytes,
                user_agent,
                description_max_chars,
            },
        )
}

fn arb_storage_settings() -> impl Strategy<Value = StorageSettings> {
    (
        arb_backend(),
        "[a-z_]{1,20}",
        proptest::option::of("/[a-z]{1,10}(/[a-z]{1,10}){0,3}"),
    )
        .prop_map(|(backend, storage_key, data_dir)| StorageSettings {
            backend,
            storage_key,
            data_dir,
        })
}

fn arb_settings() -> impl Strategy<Value = LinkshelfSettings> {
    (
        arb_resolver_settings(),
        arb_storage_settings(),
        "[a-z]{1,15}",
    )
        .prop_map(|(resolver, storage, default_category)| LinkshelfSettings {
            resolver,
            storage,
            store: StoreSettings { default_category },
        })
}

proptest! {
    #[test]
    fn settings_json_roundtrip(settings in arb_settings()) {
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: LinkshelfSettings = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(parsed, settings);
    }

    #[test]
    fn settings_engine_save_load_roundtrip(settings in arb_settings()) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");

        let engine = SettingsEngine::with_settings(path.clone(), settings.clone());
        engine.save().unwrap();

        let reloaded = SettingsEngine::load(path).unwrap();
        prop_assert_eq!(reloaded.settings(), &settings);
    }
}
