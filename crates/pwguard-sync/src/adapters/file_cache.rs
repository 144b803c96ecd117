//! JSON-file snapshot cache.
//!
//! Stores the last fetched snapshot so a later session can bootstrap while
//! the corpus service is unreachable. The file holds the exact wire triple,
//! so a cached snapshot is byte-compatible with a fetched one.

use std::fs;
use std::io;
use std::path::PathBuf;

use pwguard_filter::FilterSnapshot;

use crate::error::SyncError;
use crate::ports::SnapshotCache;

/// Snapshot cache backed by a single JSON file.
pub struct FileSnapshotCache {
    path: PathBuf,
}

impl FileSnapshotCache {
    /// Cache stored at `path`. The file is created on first `store`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Where the cache file lives.
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

impl SnapshotCache for FileSnapshotCache {
    fn load(&self) -> Result<Option<FilterSnapshot>, SyncError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(SyncError::Cache(format!(
                    "read {}: {e}",
                    self.path.display()
                )))
            }
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|e| SyncError::Cache(format!("decode {}: {e}", self.path.display())))
    }

    fn store(&self, snapshot: &FilterSnapshot) -> Result<(), SyncError> {
        let json = serde_json::to_vec(snapshot)
            .map_err(|e| SyncError::Cache(format!("encode snapshot: {e}")))?;
        fs::write(&self.path, json)
            .map_err(|e| SyncError::Cache(format!("write {}: {e}", self.path.display())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pwguard_filter::{BloomFilter, HashFamily};

    fn snapshot_with(keys: &[&str]) -> FilterSnapshot {
        let mut filter = BloomFilter::new(256, 3, HashFamily::Fnv1Rolling).unwrap();
        for key in keys {
            filter.insert(key);
        }
        filter.to_snapshot()
    }

    #[test]
    fn test_load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSnapshotCache::new(dir.path().join("snapshot.json"));

        assert!(cache.load().unwrap().is_none());
    }

    #[test]
    fn test_store_then_load_is_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSnapshotCache::new(dir.path().join("snapshot.json"));

        let snapshot = snapshot_with(&["password123", "hunter2"]);
        cache.store(&snapshot).unwrap();

        assert_eq!(cache.load().unwrap(), Some(snapshot));
    }

    #[test]
    fn test_store_replaces_previous_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let cache = FileSnapshotCache::new(dir.path().join("snapshot.json"));

        cache.store(&snapshot_with(&["first"])).unwrap();
        let second = snapshot_with(&["second"]);
        cache.store(&second).unwrap();

        assert_eq!(cache.load().unwrap(), Some(second));
    }

    #[test]
    fn test_corrupt_file_is_a_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        fs::write(&path, b"not json").unwrap();

        let cache = FileSnapshotCache::new(path);
        assert!(matches!(cache.load(), Err(SyncError::Cache(_))));
    }
}
