//! # pwguard-sync
//!
//! Client replica of the authoritative common-password corpus.
//!
//! The replica bootstraps by fetching a complete Bloom-filter snapshot from
//! the corpus service, caches it locally for offline fallback, answers
//! membership checks against the in-memory filter, and propagates newly
//! registered passwords back to the corpus best-effort in the background.
//!
//! ## Consistency model
//!
//! Eventually consistent by design, trading strong consistency for
//! immediate local feedback:
//!
//! - a locally registered password is queryable in the same session at once;
//! - its submission to the corpus is fire-and-forget, with failures logged
//!   and dropped rather than retried;
//! - a later re-fetch replaces the local snapshot wholesale, so a key this
//!   session registered may transiently read as absent again until the
//!   corpus itself reflects it.
//!
//! ## Module Structure
//!
//! ```text
//! pwguard-sync/
//! ├── ports/           # PasswordScreenApi (inbound) + source/cache traits (outbound)
//! ├── adapters/        # HTTP corpus client, JSON-file snapshot cache
//! ├── application/     # ReplicaService orchestrating everything
//! ├── config.rs        # ReplicaConfig
//! └── error.rs         # SyncError
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod error;
pub mod ports;

// Re-exports
pub use adapters::{FileSnapshotCache, HttpAuthoritativeSource};
pub use application::ReplicaService;
pub use config::ReplicaConfig;
pub use error::SyncError;
pub use ports::{
    AuthoritativeSource, BootstrapOutcome, MemorySnapshotCache, MockAuthoritativeSource,
    PasswordScreenApi, SnapshotCache,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
