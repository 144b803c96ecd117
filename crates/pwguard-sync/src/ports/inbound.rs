//! # Inbound Ports
//!
//! The API that UI-level callers use to interact with the replica.

use async_trait::async_trait;

use crate::error::SyncError;

/// How the replica obtained its usable filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// A fresh snapshot was fetched from the authoritative source and
    /// persisted to the local cache.
    Fetched,
    /// The fetch failed; the replica is serving the most recent cached
    /// snapshot. The fetch error is carried so callers can surface it.
    CachedFallback {
        /// Why the fresh fetch failed.
        fetch_error: String,
    },
}

/// Primary password-screening API (driving port).
#[async_trait]
pub trait PasswordScreenApi: Send + Sync {
    /// Fetch a snapshot from the authoritative source and install it,
    /// falling back to the cached snapshot when the fetch fails.
    ///
    /// A later successful call replaces the installed snapshot wholesale;
    /// keys inserted locally since the previous bootstrap are not merged
    /// back in.
    async fn bootstrap(&mut self) -> Result<BootstrapOutcome, SyncError>;

    /// Test whether a password is possibly in the common-password corpus.
    ///
    /// `true` means "possibly common" (may be a false positive); `false`
    /// means "definitely not in the replicated corpus". Fails with
    /// `FilterUnavailable` before a successful bootstrap.
    fn check_password(&self, password: &str) -> Result<bool, SyncError>;

    /// Register a password as common.
    ///
    /// The local filter reflects the insert immediately; propagation to the
    /// authoritative corpus happens in the background and its failure is
    /// surfaced as a warning, not an error.
    fn add_known_password(&mut self, password: &str) -> Result<(), SyncError>;

    /// True once a usable filter is installed.
    fn is_available(&self) -> bool;
}
