//! # Outbound Ports
//!
//! Traits for the replica's external dependencies: the authoritative corpus
//! service and the local snapshot cache.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use pwguard_filter::{BloomFilter, FilterSnapshot, HashFamily};

use crate::error::SyncError;

/// Authoritative corpus service - outbound port.
#[async_trait]
pub trait AuthoritativeSource: Send + Sync {
    /// Fetch the current corpus snapshot.
    async fn fetch_snapshot(&self) -> Result<FilterSnapshot, SyncError>;

    /// Submit a newly registered password to the corpus.
    async fn submit_password(&self, password: &str) -> Result<(), SyncError>;

    /// Get source identifier (for logging/debugging).
    fn source_id(&self) -> &str;
}

/// Local snapshot cache - outbound port.
///
/// The contract is verbatim storage: `load` after `store` returns the exact
/// triple that was stored. The cache is read at bootstrap and written after
/// a successful fetch, never mutated from two directions at once.
pub trait SnapshotCache: Send + Sync {
    /// Load the most recent cached snapshot, or `None` if none exists.
    fn load(&self) -> Result<Option<FilterSnapshot>, SyncError>;

    /// Store a snapshot, replacing any previous one.
    fn store(&self, snapshot: &FilterSnapshot) -> Result<(), SyncError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Mock authoritative source for testing.
pub struct MockAuthoritativeSource {
    /// Source identifier.
    pub id: String,
    /// Snapshot returned by `fetch_snapshot`.
    pub snapshot: FilterSnapshot,
    /// Should fetches fail?
    pub fail_fetch: bool,
    /// Should submissions fail?
    pub fail_submit: bool,
    /// Delay applied before responding, to exercise timeouts.
    pub respond_after: Option<Duration>,
    /// Passwords successfully submitted.
    pub submissions: Mutex<Vec<String>>,
}

impl Default for MockAuthoritativeSource {
    fn default() -> Self {
        let empty = BloomFilter::new(1000, 2, HashFamily::Fnv1Rolling)
            .expect("valid mock parameters")
            .to_snapshot();
        Self {
            id: "mock-source-1".to_string(),
            snapshot: empty,
            fail_fetch: false,
            fail_submit: false,
            respond_after: None,
            submissions: Mutex::new(Vec::new()),
        }
    }
}

impl MockAuthoritativeSource {
    /// Mock that serves the given snapshot.
    pub fn with_snapshot(snapshot: FilterSnapshot) -> Self {
        Self {
            snapshot,
            ..Default::default()
        }
    }

    /// Mock whose fetches and submissions both fail.
    pub fn failing() -> Self {
        Self {
            fail_fetch: true,
            fail_submit: true,
            ..Default::default()
        }
    }

    /// Passwords recorded by successful submissions.
    pub fn submitted(&self) -> Vec<String> {
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl AuthoritativeSource for MockAuthoritativeSource {
    async fn fetch_snapshot(&self) -> Result<FilterSnapshot, SyncError> {
        if let Some(delay) = self.respond_after {
            tokio::time::sleep(delay).await;
        }
        if self.fail_fetch {
            return Err(SyncError::FetchFailure("mock failure".to_string()));
        }
        Ok(self.snapshot.clone())
    }

    async fn submit_password(&self, password: &str) -> Result<(), SyncError> {
        if let Some(delay) = self.respond_after {
            tokio::time::sleep(delay).await;
        }
        if self.fail_submit {
            return Err(SyncError::SubmissionFailure("mock failure".to_string()));
        }
        self.submissions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(password.to_string());
        Ok(())
    }

    fn source_id(&self) -> &str {
        &self.id
    }
}

/// In-memory snapshot cache for testing.
#[derive(Default)]
pub struct MemorySnapshotCache {
    slot: Mutex<Option<FilterSnapshot>>,
}

impl MemorySnapshotCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache pre-seeded with a snapshot.
    pub fn seeded(snapshot: FilterSnapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
        }
    }
}

impl SnapshotCache for MemorySnapshotCache {
    fn load(&self) -> Result<Option<FilterSnapshot>, SyncError> {
        Ok(self
            .slot
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone())
    }

    fn store(&self, snapshot: &FilterSnapshot) -> Result<(), SyncError> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(snapshot.clone());
        Ok(())
    }
}
