//! The storage collaborator.
//!
//! Persistence is external to the sync subsystem; the subsystem consumes
//! it through exactly two operations: load the current state and replace
//! it wholesale. Both are atomic with respect to the calling thread.

use crate::error::StoreResult;
use crate::sync_data::SyncData;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};

/// Storage collaborator consumed by both sync roles.
///
/// Implementations hand out snapshots, never live references, so merge
/// logic cannot observe a store mutated mid-merge. Callers that need a
/// read-merge-write sequence to be exclusive hold their own lock around
/// the pair of calls.
pub trait SyncStore: Send + Sync {
    /// Loads a snapshot of the current local state.
    ///
    /// A fresh or reset store loads as an empty [`SyncData`].
    fn load_state(&self) -> StoreResult<SyncData>;

    /// Replaces the local state wholesale.
    fn replace_state(&self, data: SyncData) -> StoreResult<()>;
}

/// In-memory store, primarily for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<SyncData>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded with the given state.
    pub fn with_data(data: SyncData) -> Self {
        Self {
            data: Mutex::new(data),
        }
    }
}

impl SyncStore for MemoryStore {
    fn load_state(&self) -> StoreResult<SyncData> {
        Ok(self.data.lock().clone())
    }

    fn replace_state(&self, data: SyncData) -> StoreResult<()> {
        *self.data.lock() = data;
        Ok(())
    }
}

/// JSON-file-backed store.
///
/// Replacement writes to a sibling temp file and renames over the
/// target, so a crash mid-write leaves the previous state intact.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the given path. The file need not
    /// exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SyncStore for JsonFileStore {
    fn load_state(&self) -> StoreResult<SyncData> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(SyncData::default()),
            Err(e) => Err(e.into()),
        }
    }

    fn replace_state(&self, data: SyncData) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(&data)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), subjects = data.subjects.len(), "store replaced");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::subject::Subject;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.load_state().unwrap().is_empty());

        let data = SyncData::new(vec![Subject::new("s1", "A")], vec![]);
        store.replace_state(data.clone()).unwrap();
        assert_eq!(store.load_state().unwrap(), data);
    }

    #[test]
    fn memory_store_hands_out_snapshots() {
        let store = MemoryStore::with_data(SyncData::new(vec![Subject::new("s1", "A")], vec![]));
        let mut snapshot = store.load_state().unwrap();
        snapshot.subjects[0].name = "mutated".into();
        // The store must be unaffected by mutations of the snapshot.
        assert_eq!(store.load_state().unwrap().subjects[0].name, "A");
    }

    #[test]
    fn file_store_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));
        assert!(store.load_state().unwrap().is_empty());
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path().join("state.json"));

        let data = SyncData::new(vec![Subject::new("s1", "A")], vec![]);
        store.replace_state(data.clone()).unwrap();
        assert_eq!(store.load_state().unwrap(), data);

        // Replace again; no stale temp file should linger.
        store.replace_state(SyncData::default()).unwrap();
        assert!(store.load_state().unwrap().is_empty());
        assert!(!dir.path().join("state.tmp").exists());
    }

    #[test]
    fn file_store_corrupt_contents_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonFileStore::new(&path);
        assert!(store.load_state().is_err());
    }
}
