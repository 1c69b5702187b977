//! Lesson progress store
//!
//! Tracks which catalog indices are complete and persists them under a
//! single key as a JSON array, e.g. `[0,1]`. The key is global to the
//! backend; progress is not scoped per user.

pub mod backend;
pub mod sqlite;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{BackendKind, StorageConfig};
use crate::error::Result;

pub use backend::{JsonFileBackend, MemoryBackend, ProgressBackend};
pub use sqlite::SqliteBackend;

/// Storage key used when none is configured
pub const DEFAULT_PROGRESS_KEY: &str = "bible_study_progress";

/// Set of completed module indices
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionSet(BTreeSet<usize>);

impl CompletionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.contains(&index)
    }

    /// Returns true if `index` was not already present
    pub fn insert(&mut self, index: usize) -> bool {
        self.0.insert(index)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Ascending
    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.0.iter().copied()
    }

    /// Drop every index `>= len`, returning how many were removed
    pub fn truncate(&mut self, len: usize) -> usize {
        let before = self.0.len();
        self.0.retain(|&i| i < len);
        before - self.0.len()
    }

    /// Move every index `>= len` into a new set
    pub fn split_off(&mut self, len: usize) -> CompletionSet {
        Self(self.0.split_off(&len))
    }

    /// Union with `other`
    pub fn merge(&mut self, other: CompletionSet) {
        self.0.extend(other.0);
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(value: &str) -> Result<Self> {
        Ok(serde_json::from_str(value)?)
    }
}

impl FromIterator<usize> for CompletionSet {
    fn from_iter<T: IntoIterator<Item = usize>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Completion set mirrored to a durable backend.
///
/// Every mutation is written through before the call returns. Write
/// failures are logged and otherwise ignored: losing persisted progress is
/// degraded but safe.
///
/// Indices set aside by [`ProgressStore::shelve_beyond`] are invisible to
/// readers but are still written back on every persist.
pub struct ProgressStore {
    backend: Box<dyn ProgressBackend>,
    key: String,
    completed: CompletionSet,
    shelved: CompletionSet,
}

impl ProgressStore {
    pub fn open(backend: Box<dyn ProgressBackend>, key: impl Into<String>) -> Self {
        let key = key.into();
        let completed = read_set(backend.as_ref(), &key);
        info!(key = %key, completed = completed.len(), "Progress loaded");
        Self {
            backend,
            key,
            completed,
            shelved: CompletionSet::new(),
        }
    }

    /// In-memory store, nothing persisted beyond the process
    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryBackend::new()), DEFAULT_PROGRESS_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn completed(&self) -> &CompletionSet {
        &self.completed
    }

    pub fn completed_count(&self) -> usize {
        self.completed.len()
    }

    pub fn is_complete(&self, index: usize) -> bool {
        self.completed.contains(index)
    }

    /// Add `index` and persist. Idempotent; returns true if it was newly
    /// added.
    pub fn mark_complete(&mut self, index: usize) -> bool {
        if !self.completed.insert(index) {
            debug!(index, "Module already complete");
            return false;
        }
        info!(index, completed = self.completed.len(), "Module marked complete");
        self.persist();
        true
    }

    /// Remove indices that no longer exist in a catalog of `len` modules,
    /// including any shelved ones, and persist the result
    pub fn prune_to_catalog_size(&mut self, len: usize) -> usize {
        let shelved = std::mem::take(&mut self.shelved);
        let had_shelved = !shelved.is_empty();
        self.completed.merge(shelved);

        let removed = self.completed.truncate(len);
        if removed > 0 {
            info!(removed, catalog_len = len, "Pruned stale progress");
        }
        if removed > 0 || had_shelved {
            self.persist();
        }
        removed
    }

    /// Hide indices `>= len` without dropping them from the backend.
    ///
    /// Used with the built-in catalog, which says nothing about whether
    /// those modules still exist upstream.
    pub fn shelve_beyond(&mut self, len: usize) -> usize {
        let mut all = std::mem::take(&mut self.completed);
        all.merge(std::mem::take(&mut self.shelved));
        self.shelved = all.split_off(len);
        self.completed = all;

        let shelved = self.shelved.len();
        if shelved > 0 {
            info!(shelved, catalog_len = len, "Shelved progress beyond built-in catalog");
        }
        shelved
    }

    /// Discard in-memory state and read it back from the backend
    pub fn reload(&mut self) {
        self.completed = read_set(self.backend.as_ref(), &self.key);
        self.shelved = CompletionSet::new();
    }

    fn persist(&self) {
        let mut stored = self.completed.clone();
        stored.merge(self.shelved.clone());
        let result = stored
            .to_json()
            .and_then(|value| self.backend.write(&self.key, &value));

        if let Err(e) = result {
            warn!(key = %self.key, error = %e, "Failed to persist progress");
        }
    }
}

fn read_set(backend: &dyn ProgressBackend, key: &str) -> CompletionSet {
    match backend.read(key) {
        Ok(Some(value)) => match CompletionSet::from_json(&value) {
            Ok(set) => set,
            Err(e) => {
                warn!(key, error = %e, "Stored progress is malformed, starting fresh");
                CompletionSet::new()
            }
        },
        Ok(None) => CompletionSet::new(),
        Err(e) => {
            warn!(key, error = %e, "Could not read stored progress, starting fresh");
            CompletionSet::new()
        }
    }
}

/// Build the backend selected by configuration
pub fn open_backend(config: &StorageConfig) -> Result<Box<dyn ProgressBackend>> {
    let backend: Box<dyn ProgressBackend> = match config.backend {
        BackendKind::Memory => Box::new(MemoryBackend::new()),
        BackendKind::Json => Box::new(JsonFileBackend::open(&config.data_dir)?),
        BackendKind::Sqlite => Box::new(SqliteBackend::open(&config.data_dir)?),
    };
    Ok(backend)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::JourneyError;

    struct ReadOnlyBackend;

    impl ProgressBackend for ReadOnlyBackend {
        fn read(&self, _key: &str) -> Result<Option<String>> {
            Ok(Some("[0]".to_string()))
        }

        fn write(&self, _key: &str, _value: &str) -> Result<()> {
            Err(JourneyError::Storage("quota exceeded".into()))
        }
    }

    fn store_over(backend: &MemoryBackend) -> ProgressStore {
        ProgressStore::open(Box::new(backend.clone()), DEFAULT_PROGRESS_KEY)
    }

    #[test]
    fn test_serialized_form() {
        let set: CompletionSet = [1, 0].into_iter().collect();
        assert_eq!(set.to_json().unwrap(), "[0,1]");
        assert_eq!(CompletionSet::from_json("[1,0,1]").unwrap(), set);
    }

    #[test]
    fn test_mark_complete_is_idempotent() {
        let backend = MemoryBackend::new();
        let mut store = store_over(&backend);

        assert!(store.mark_complete(2));
        let once = store.completed().clone();
        assert!(!store.mark_complete(2));

        assert_eq!(store.completed(), &once);
        assert_eq!(backend.read(DEFAULT_PROGRESS_KEY).unwrap().as_deref(), Some("[2]"));
    }

    #[test]
    fn test_write_is_visible_immediately() {
        let backend = MemoryBackend::new();
        let mut store = store_over(&backend);
        store.mark_complete(0);

        assert!(store.is_complete(0));
        let reopened = store_over(&backend);
        assert!(reopened.is_complete(0));
    }

    #[test]
    fn test_prune_keeps_lower_indices() {
        let backend = MemoryBackend::new();
        backend.write(DEFAULT_PROGRESS_KEY, "[0,1,3,7]").unwrap();
        let mut store = store_over(&backend);

        assert_eq!(store.prune_to_catalog_size(3), 2);
        assert!(store.is_complete(0));
        assert!(store.is_complete(1));
        assert!(!store.is_complete(3));
        assert_eq!(backend.read(DEFAULT_PROGRESS_KEY).unwrap().as_deref(), Some("[0,1]"));

        assert_eq!(store.prune_to_catalog_size(3), 0);
    }

    #[test]
    fn test_shelve_keeps_backend_intact() {
        let backend = MemoryBackend::new();
        backend.write(DEFAULT_PROGRESS_KEY, "[0,1,3,7]").unwrap();
        let mut store = store_over(&backend);

        assert_eq!(store.shelve_beyond(3), 2);
        assert_eq!(store.completed_count(), 2);
        assert!(!store.is_complete(3));
        assert_eq!(backend.read(DEFAULT_PROGRESS_KEY).unwrap().as_deref(), Some("[0,1,3,7]"));

        // Later writes carry the shelved indices along
        store.mark_complete(2);
        assert_eq!(backend.read(DEFAULT_PROGRESS_KEY).unwrap().as_deref(), Some("[0,1,2,3,7]"));

        // A larger catalog brings them back
        assert_eq!(store.prune_to_catalog_size(5), 1);
        assert!(store.is_complete(3));
        assert_eq!(backend.read(DEFAULT_PROGRESS_KEY).unwrap().as_deref(), Some("[0,1,2,3]"));
    }

    #[test]
    fn test_malformed_value_starts_empty() {
        let backend = MemoryBackend::new();
        backend.write(DEFAULT_PROGRESS_KEY, "{\"oops\": true}").unwrap();
        assert!(store_over(&backend).completed().is_empty());

        backend.write(DEFAULT_PROGRESS_KEY, "[-1]").unwrap();
        assert!(store_over(&backend).completed().is_empty());
    }

    #[test]
    fn test_write_failure_is_swallowed() {
        let mut store = ProgressStore::open(Box::new(ReadOnlyBackend), "k");
        assert!(store.is_complete(0));

        assert!(store.mark_complete(1));
        assert!(store.is_complete(1));
        assert_eq!(store.completed_count(), 2);
    }

    #[test]
    fn test_reload_discards_unpersisted_state() {
        let mut store = ProgressStore::open(Box::new(ReadOnlyBackend), "k");
        store.mark_complete(4);
        store.reload();
        assert!(!store.is_complete(4));
        assert!(store.is_complete(0));
    }
}
