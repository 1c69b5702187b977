//! Progress persistence integration tests
//!
//! Round-trips the completion set through the on-disk backends.

use study_journey::config::{BackendKind, StorageConfig};
use study_journey::progress::{
    open_backend, JsonFileBackend, SqliteBackend, DEFAULT_PROGRESS_KEY,
};
use study_journey::{CompletionSet, ProgressBackend, ProgressStore};
use tempfile::TempDir;

fn storage(dir: &TempDir, backend: BackendKind) -> StorageConfig {
    StorageConfig {
        backend,
        data_dir: dir.path().join("data"),
        key: DEFAULT_PROGRESS_KEY.to_string(),
    }
}

fn round_trip(backend: BackendKind) {
    let dir = TempDir::new().unwrap();
    let config = storage(&dir, backend);

    let mut store = ProgressStore::open(open_backend(&config).unwrap(), &config.key);
    store.mark_complete(0);
    store.mark_complete(2);
    let before = store.completed().clone();
    drop(store);

    let reopened = ProgressStore::open(open_backend(&config).unwrap(), &config.key);
    assert_eq!(reopened.completed(), &before);
    assert!(reopened.is_complete(2));
    assert!(!reopened.is_complete(1));
}

#[test]
fn test_json_backend_round_trip() {
    round_trip(BackendKind::Json);
}

#[test]
fn test_sqlite_backend_round_trip() {
    round_trip(BackendKind::Sqlite);
}

#[test]
fn test_memory_backend_forgets() {
    let dir = TempDir::new().unwrap();
    let config = storage(&dir, BackendKind::Memory);

    let mut store = ProgressStore::open(open_backend(&config).unwrap(), &config.key);
    store.mark_complete(0);
    drop(store);

    let reopened = ProgressStore::open(open_backend(&config).unwrap(), &config.key);
    assert!(reopened.completed().is_empty());
}

#[test]
fn test_json_file_layout() {
    let dir = TempDir::new().unwrap();
    let backend = JsonFileBackend::open(dir.path()).unwrap();
    let mut store = ProgressStore::open(Box::new(backend.clone()), DEFAULT_PROGRESS_KEY);
    store.mark_complete(1);
    store.mark_complete(0);

    let raw = std::fs::read_to_string(dir.path().join("progress.json")).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(parsed[DEFAULT_PROGRESS_KEY], "[0,1]");
}

#[test]
fn test_sqlite_keys_are_independent() {
    let dir = TempDir::new().unwrap();

    let mut ruth = ProgressStore::open(Box::new(SqliteBackend::open(dir.path()).unwrap()), "ruth");
    ruth.mark_complete(0);
    drop(ruth);

    let naomi = ProgressStore::open(Box::new(SqliteBackend::open(dir.path()).unwrap()), "naomi");
    assert!(naomi.completed().is_empty());

    let ruth = ProgressStore::open(Box::new(SqliteBackend::open(dir.path()).unwrap()), "ruth");
    assert!(ruth.is_complete(0));
}

#[test]
fn test_corrupt_stored_value_starts_empty() {
    let dir = TempDir::new().unwrap();
    let backend = SqliteBackend::open(dir.path()).unwrap();
    backend.write(DEFAULT_PROGRESS_KEY, "not a list").unwrap();

    let mut store = ProgressStore::open(Box::new(backend), DEFAULT_PROGRESS_KEY);
    assert!(store.completed().is_empty());

    store.mark_complete(3);
    let backend = SqliteBackend::open(dir.path()).unwrap();
    assert_eq!(backend.read(DEFAULT_PROGRESS_KEY).unwrap().as_deref(), Some("[3]"));
}

#[test]
fn test_serialized_set_round_trip() {
    let original: CompletionSet = [5, 0, 2].into_iter().collect();
    let json = original.to_json().unwrap();
    assert_eq!(json, "[0,2,5]");
    assert_eq!(CompletionSet::from_json(&json).unwrap(), original);
}
