//! Adapters layer: concrete connections to external systems

pub mod file_cache;
pub mod http_source;

pub use file_cache::FileSnapshotCache;
pub use http_source::HttpAuthoritativeSource;
