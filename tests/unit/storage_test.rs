//! Unit tests for the persistence adapters behind `StoragePort`.

use rstest::rstest;
use tempfile::TempDir;

use linkshelf::storage::file::staging_path;
use linkshelf::storage::{JsonFileStorage, MemoryStorage, SqliteStorage, StoragePort};

enum Backend {
    Memory,
    Sqlite,
    Json,
}

fn open(backend: Backend, dir: &TempDir) -> Box<dyn StoragePort> {
    match backend {
        Backend::Memory => Box::new(MemoryStorage::new()),
        Backend::Sqlite => Box::new(SqliteStorage::open(dir.path().join("shelf.db")).unwrap()),
        Backend::Json => Box::new(JsonFileStorage::new(dir.path().join("json"))),
    }
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[case::json(Backend::Json)]
fn test_read_missing_key_is_none(#[case] backend: Backend) {
    let dir = TempDir::new().unwrap();
    let storage = open(backend, &dir);
    assert_eq!(storage.read("bookmarks").unwrap(), None);
}

#[rstest]
#[case::memory(Backend::Memory)]
#[case::sqlite(Backend::Sqlite)]
#[case::json(Backend::Json)]
fn test_write_then_read_and_overwrite(#[case] backend: Backend) {
    let dir = TempDir::new().unwrap();
    let storage = open(backend, &dir);

    storage.write("bookmarks", "[1]").unwrap();
    assert_eq!(storage.read("bookmarks").unwrap().as_deref(), Some("[1]"));

    storage.write("bookmarks", "[]").unwrap();
    assert_eq!(storage.read("bookmarks").unwrap().as_deref(), Some("[]"));
    assert_eq!(storage.read("other").unwrap(), None);
}

#[test]
fn test_sqlite_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("shelf.db");
    {
        let storage = SqliteStorage::open(&path).unwrap();
        storage.write("bookmarks", r#"[{"id":"a"}]"#).unwrap();
    }
    let storage = SqliteStorage::open(&path).unwrap();
    assert_eq!(
        storage.read("bookmarks").unwrap().as_deref(),
        Some(r#"[{"id":"a"}]"#)
    );
}

#[test]
fn test_json_file_layout() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path());
    storage.write("bookmarks", "[]").unwrap();
    assert!(dir.path().join("bookmarks.json").exists());
}

#[test]
fn test_memory_with_value() {
    let storage = MemoryStorage::with_value("bookmarks", "seed");
    assert_eq!(storage.read("bookmarks").unwrap().as_deref(), Some("seed"));
}

#[test]
fn test_json_write_replaces_file_and_leaves_no_staging_file() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path());
    storage.write("bookmarks", r#"[{"id":"a"}]"#).unwrap();
    storage.write("bookmarks", r#"[{"id":"b"}]"#).unwrap();

    let path = storage.path_for("bookmarks");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), r#"[{"id":"b"}]"#);
    assert!(!staging_path(&path).exists());
}

#[test]
fn test_json_leftover_staging_file_never_replaces_value() {
    let dir = TempDir::new().unwrap();
    let storage = JsonFileStorage::new(dir.path());
    storage.write("bookmarks", r#"[{"id":"kept"}]"#).unwrap();

    // An interrupted write leaves a truncated staging file behind.
    let path = storage.path_for("bookmarks");
    std::fs::write(staging_path(&path), r#"[{"id":"tr"#).unwrap();

    assert_eq!(
        storage.read("bookmarks").unwrap().as_deref(),
        Some(r#"[{"id":"kept"}]"#)
    );

    storage.write("bookmarks", "[]").unwrap();
    assert_eq!(storage.read("bookmarks").unwrap().as_deref(), Some("[]"));
    assert!(!staging_path(&path).exists());
}
