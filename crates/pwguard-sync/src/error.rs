//! # Sync Errors
//!
//! Error types for the replica sync layer.
//!
//! Network-layer failures never corrupt the in-memory filter; they only
//! decide whether a fresher snapshot replaces it.

use pwguard_filter::FilterError;
use thiserror::Error;

/// Replica sync error types.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Snapshot fetch failed: network error, non-success status, timeout,
    /// or a malformed/rejected snapshot body.
    #[error("snapshot fetch failed: {0}")]
    FetchFailure(String),

    /// Submission to the authoritative corpus failed. Non-fatal: the local
    /// replica already reflects the insert; the corpus-wide effect is lost
    /// until re-submitted out-of-band.
    #[error("submission to authoritative corpus failed: {0}")]
    SubmissionFailure(String),

    /// No usable filter: bootstrap has not succeeded and no cached snapshot
    /// exists. Membership queries must fail rather than report "not a
    /// member".
    #[error("filter unavailable: no fetched or cached snapshot")]
    FilterUnavailable,

    /// Local snapshot cache could not be read or written.
    #[error("snapshot cache error: {0}")]
    Cache(String),

    /// Filter-domain failure (construction or key validation).
    #[error(transparent)]
    Filter(#[from] FilterError),
}
