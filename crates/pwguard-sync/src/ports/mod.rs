//! Ports layer: API traits (inbound) and dependency traits (outbound)

pub mod inbound;
pub mod outbound;

pub use inbound::{BootstrapOutcome, PasswordScreenApi};
pub use outbound::{
    AuthoritativeSource, MemorySnapshotCache, MockAuthoritativeSource, SnapshotCache,
};
