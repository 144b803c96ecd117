//! # Replica Service
//!
//! Application service owning the client-side filter. Keeps a usable filter
//! available despite network unreliability, and keeps the authoritative
//! corpus informed of new entries without gating local feedback on that
//! confirmation.
//!
//! The consistency model is eventually consistent with a documented
//! divergence window: a locally inserted key is visible to this session at
//! once, reaches the corpus best-effort in the background, and may be
//! transiently absent again after a re-fetch until the corpus itself
//! reflects it.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use pwguard_filter::{BloomFilter, HashFamily, Metrics};
use tokio::task::JoinSet;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::config::ReplicaConfig;
use crate::error::SyncError;
use crate::ports::{AuthoritativeSource, BootstrapOutcome, PasswordScreenApi, SnapshotCache};

/// Replica service - owns the filter and orchestrates sync.
pub struct ReplicaService<S: AuthoritativeSource, C: SnapshotCache> {
    /// Configuration.
    config: ReplicaConfig,
    /// Authoritative corpus connection (driven port).
    source: Arc<S>,
    /// Local snapshot cache (driven port).
    cache: Arc<C>,
    /// Index-derivation strategy, fixed for the service's lifetime. Must
    /// match what the authoritative corpus uses or every replicated
    /// snapshot is meaningless.
    family: HashFamily,
    /// The installed filter. `None` until a bootstrap succeeds.
    filter: Option<BloomFilter>,
    /// Operation metrics.
    metrics: Arc<Metrics>,
    /// Keys inserted locally whose submission is still in flight.
    pending: Arc<Mutex<Vec<String>>>,
    /// In-flight submission tasks.
    submissions: JoinSet<()>,
}

impl<S, C> ReplicaService<S, C>
where
    S: AuthoritativeSource + 'static,
    C: SnapshotCache + 'static,
{
    /// Create a service over the given ports, using the canonical hash
    /// family.
    pub fn new(config: ReplicaConfig, source: Arc<S>, cache: Arc<C>) -> Self {
        Self {
            config,
            source,
            cache,
            family: HashFamily::default(),
            filter: None,
            metrics: Arc::new(Metrics::new()),
            pending: Arc::new(Mutex::new(Vec::new())),
            submissions: JoinSet::new(),
        }
    }

    /// Override the hash family. Only meaningful before the first
    /// bootstrap; changing it afterwards would invalidate the installed
    /// snapshot.
    pub fn with_hash_family(mut self, family: HashFamily) -> Self {
        self.family = family;
        self
    }

    /// Operation metrics for this service.
    pub fn metrics(&self) -> Arc<Metrics> {
        Arc::clone(&self.metrics)
    }

    /// The installed filter, if a bootstrap has succeeded.
    pub fn filter(&self) -> Option<&BloomFilter> {
        self.filter.as_ref()
    }

    /// Keys inserted locally whose authoritative submission has not yet
    /// completed. Best-effort bookkeeping: entries disappear on completion
    /// whether the submission succeeded or was dropped.
    pub fn pending_propagations(&self) -> Vec<String> {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Wait for all in-flight submissions to complete.
    pub async fn drain_propagations(&mut self) {
        while let Some(result) = self.submissions.join_next().await {
            if let Err(e) = result {
                warn!(error = %e, "submission task aborted");
            }
        }
    }

    fn install(&mut self, filter: BloomFilter) {
        self.metrics
            .record_filter_built(filter.size_bits(), filter.hash_count());
        self.filter = Some(filter);
    }

    async fn fetch_validated(&self) -> Result<BloomFilter, SyncError> {
        let snapshot = match timeout(self.config.fetch_timeout, self.source.fetch_snapshot()).await
        {
            Ok(result) => result?,
            Err(_) => {
                return Err(SyncError::FetchFailure(format!(
                    "timed out after {:?}",
                    self.config.fetch_timeout
                )))
            }
        };

        // A snapshot that decodes but fails validation is still a bad fetch:
        // fall back to the cache rather than aborting bootstrap.
        let filter = BloomFilter::from_snapshot(snapshot.clone(), self.family)
            .map_err(|e| SyncError::FetchFailure(format!("rejected snapshot: {e}")))?;

        if let Err(e) = self.cache.store(&snapshot) {
            warn!(error = %e, "failed to cache fetched snapshot");
        }

        Ok(filter)
    }
}

#[async_trait]
impl<S, C> PasswordScreenApi for ReplicaService<S, C>
where
    S: AuthoritativeSource + 'static,
    C: SnapshotCache + 'static,
{
    async fn bootstrap(&mut self) -> Result<BootstrapOutcome, SyncError> {
        match self.fetch_validated().await {
            Ok(filter) => {
                info!(
                    source = self.source.source_id(),
                    bits = filter.size_bits(),
                    hashes = filter.hash_count(),
                    "installed fresh snapshot from authoritative source"
                );
                self.install(filter);
                Ok(BootstrapOutcome::Fetched)
            }
            Err(fetch_error) => {
                warn!(
                    source = self.source.source_id(),
                    error = %fetch_error,
                    "snapshot fetch failed, trying cached snapshot"
                );

                match self.cache.load()? {
                    Some(snapshot) => {
                        let filter = BloomFilter::from_snapshot(snapshot, self.family)?;
                        info!(
                            bits = filter.size_bits(),
                            hashes = filter.hash_count(),
                            "serving cached snapshot after fetch failure"
                        );
                        self.install(filter);
                        Ok(BootstrapOutcome::CachedFallback {
                            fetch_error: fetch_error.to_string(),
                        })
                    }
                    None => Err(fetch_error),
                }
            }
        }
    }

    fn check_password(&self, password: &str) -> Result<bool, SyncError> {
        let filter = self.filter.as_ref().ok_or(SyncError::FilterUnavailable)?;

        let start = Instant::now();
        let found = filter.query(password);
        self.metrics.record_lookup(start.elapsed(), found);

        Ok(found)
    }

    fn add_known_password(&mut self, password: &str) -> Result<(), SyncError> {
        let filter = self.filter.as_mut().ok_or(SyncError::FilterUnavailable)?;

        // Optimistic local insert: this session sees the key at once.
        let start = Instant::now();
        filter.insert(password);
        self.metrics.record_insert(start.elapsed());

        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(password.to_string());

        let source = Arc::clone(&self.source);
        let pending = Arc::clone(&self.pending);
        let submit_timeout = self.config.submit_timeout;
        let key = password.to_string();

        self.submissions.spawn(async move {
            let result = match timeout(submit_timeout, source.submit_password(&key)).await {
                Ok(result) => result,
                Err(_) => Err(SyncError::SubmissionFailure(format!(
                    "timed out after {submit_timeout:?}"
                ))),
            };

            match result {
                Ok(()) => {
                    debug!(
                        source = source.source_id(),
                        "password propagated to authoritative corpus"
                    );
                }
                Err(e) => {
                    // The local replica already reflects the insert; the
                    // corpus-wide effect is lost until re-submitted.
                    warn!(source = source.source_id(), error = %e, "dropping unpropagated password");
                }
            }

            let mut pending = pending.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(position) = pending.iter().position(|entry| entry == &key) {
                pending.remove(position);
            }
        });

        Ok(())
    }

    fn is_available(&self) -> bool {
        self.filter.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::{MemorySnapshotCache, MockAuthoritativeSource};
    use pwguard_filter::FilterSnapshot;
    use std::time::Duration;

    fn snapshot_with(keys: &[&str]) -> FilterSnapshot {
        let mut filter = BloomFilter::new(1000, 2, HashFamily::Fnv1Rolling).unwrap();
        for key in keys {
            filter.insert(key);
        }
        filter.to_snapshot()
    }

    fn service(
        source: MockAuthoritativeSource,
        cache: MemorySnapshotCache,
    ) -> (
        ReplicaService<MockAuthoritativeSource, MemorySnapshotCache>,
        Arc<MockAuthoritativeSource>,
    ) {
        let source = Arc::new(source);
        let service = ReplicaService::new(
            ReplicaConfig::for_testing(),
            Arc::clone(&source),
            Arc::new(cache),
        );
        (service, source)
    }

    #[tokio::test]
    async fn test_bootstrap_installs_fetched_snapshot() {
        let (mut service, _) = service(
            MockAuthoritativeSource::with_snapshot(snapshot_with(&["password123"])),
            MemorySnapshotCache::new(),
        );

        let outcome = service.bootstrap().await.unwrap();

        assert_eq!(outcome, BootstrapOutcome::Fetched);
        assert!(service.is_available());
        assert!(service.check_password("password123").unwrap());
        assert!(!service.check_password("zebra-stapler").unwrap());
    }

    #[tokio::test]
    async fn test_bootstrap_persists_snapshot_to_cache() {
        let snapshot = snapshot_with(&["password123"]);
        let cache = Arc::new(MemorySnapshotCache::new());
        let source = Arc::new(MockAuthoritativeSource::with_snapshot(snapshot.clone()));
        let mut service =
            ReplicaService::new(ReplicaConfig::for_testing(), source, Arc::clone(&cache));

        service.bootstrap().await.unwrap();

        assert_eq!(cache.load().unwrap(), Some(snapshot));
    }

    #[tokio::test]
    async fn test_check_before_bootstrap_is_unavailable() {
        let (service, _) = service(MockAuthoritativeSource::default(), MemorySnapshotCache::new());

        assert!(!service.is_available());
        assert!(matches!(
            service.check_password("anything"),
            Err(SyncError::FilterUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_add_before_bootstrap_is_unavailable() {
        let (mut service, _) =
            service(MockAuthoritativeSource::default(), MemorySnapshotCache::new());

        assert!(matches!(
            service.add_known_password("anything"),
            Err(SyncError::FilterUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_bootstrap_falls_back_to_cached_snapshot() {
        let (mut service, _) = service(
            MockAuthoritativeSource::failing(),
            MemorySnapshotCache::seeded(snapshot_with(&["cached-password"])),
        );

        let outcome = service.bootstrap().await.unwrap();

        match outcome {
            BootstrapOutcome::CachedFallback { fetch_error } => {
                assert!(fetch_error.contains("mock failure"), "got: {fetch_error}");
            }
            other => panic!("expected cached fallback, got {other:?}"),
        }
        assert!(service.check_password("cached-password").unwrap());
        assert!(!service.check_password("never-seen").unwrap());
    }

    #[tokio::test]
    async fn test_bootstrap_without_cache_reports_fetch_failure() {
        let (mut service, _) = service(
            MockAuthoritativeSource::failing(),
            MemorySnapshotCache::new(),
        );

        let result = service.bootstrap().await;

        assert!(matches!(result, Err(SyncError::FetchFailure(_))));
        assert!(!service.is_available());
        assert!(matches!(
            service.check_password("anything"),
            Err(SyncError::FilterUnavailable)
        ));
    }

    #[tokio::test]
    async fn test_fetch_timeout_falls_back_to_cache() {
        let slow = MockAuthoritativeSource {
            respond_after: Some(Duration::from_millis(500)),
            ..MockAuthoritativeSource::default()
        };
        let (mut service, _) = service(
            slow,
            MemorySnapshotCache::seeded(snapshot_with(&["cached-password"])),
        );

        let outcome = service.bootstrap().await.unwrap();

        match outcome {
            BootstrapOutcome::CachedFallback { fetch_error } => {
                assert!(fetch_error.contains("timed out"), "got: {fetch_error}");
            }
            other => panic!("expected cached fallback, got {other:?}"),
        }
        assert!(service.check_password("cached-password").unwrap());
    }

    #[tokio::test]
    async fn test_rejected_snapshot_falls_back_to_cache() {
        let lying = FilterSnapshot {
            bit_array: pwguard_filter::BitArray::zeroed(10),
            bit_array_size: 999,
            hash_function_count: 2,
        };
        let (mut service, _) = service(
            MockAuthoritativeSource::with_snapshot(lying),
            MemorySnapshotCache::seeded(snapshot_with(&["cached-password"])),
        );

        let outcome = service.bootstrap().await.unwrap();

        match outcome {
            BootstrapOutcome::CachedFallback { fetch_error } => {
                assert!(fetch_error.contains("rejected snapshot"), "got: {fetch_error}");
            }
            other => panic!("expected cached fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_local_insert_is_visible_before_propagation() {
        let (mut service, source) = service(
            MockAuthoritativeSource::default(),
            MemorySnapshotCache::new(),
        );
        service.bootstrap().await.unwrap();

        service.add_known_password("hunter2").unwrap();

        // Visible at once, before the submission task has run.
        assert!(service.check_password("hunter2").unwrap());

        service.drain_propagations().await;
        assert_eq!(source.submitted(), vec!["hunter2".to_string()]);
        assert!(service.pending_propagations().is_empty());
    }

    #[tokio::test]
    async fn test_failed_submission_keeps_local_insert() {
        let failing_submit = MockAuthoritativeSource {
            fail_submit: true,
            ..MockAuthoritativeSource::default()
        };
        let (mut service, source) = service(failing_submit, MemorySnapshotCache::new());
        service.bootstrap().await.unwrap();

        service.add_known_password("hunter2").unwrap();
        service.drain_propagations().await;

        assert!(
            service.check_password("hunter2").unwrap(),
            "local state never rolls back on submission failure"
        );
        assert!(source.submitted().is_empty());
        assert!(service.pending_propagations().is_empty(), "dropped, not retried");
    }

    #[tokio::test]
    async fn test_refetch_replaces_snapshot_wholesale() {
        let (mut service, _) = service(
            MockAuthoritativeSource::with_snapshot(snapshot_with(&["corpus-entry"])),
            MemorySnapshotCache::new(),
        );
        service.bootstrap().await.unwrap();

        service.add_known_password("only-local").unwrap();
        service.drain_propagations().await;
        assert!(service.check_password("only-local").unwrap());

        // The mock corpus never learned the key, so a re-fetch forgets it.
        service.bootstrap().await.unwrap();

        assert!(!service.check_password("only-local").unwrap());
        assert!(service.check_password("corpus-entry").unwrap());
    }

    #[tokio::test]
    async fn test_metrics_account_for_operations() {
        let (mut service, _) = service(
            MockAuthoritativeSource::default(),
            MemorySnapshotCache::new(),
        );
        service.bootstrap().await.unwrap();

        service.add_known_password("hunter2").unwrap();
        service.check_password("hunter2").unwrap();
        service.check_password("absent").unwrap();
        service.drain_propagations().await;

        let snapshot = service.metrics().snapshot();
        assert_eq!(snapshot.filters_built, 1);
        assert_eq!(snapshot.elements_inserted, 1);
        assert_eq!(snapshot.lookups_performed, 2);
        assert_eq!(snapshot.lookups_positive, 1);
    }
}
