//! # pwguard-filter
//!
//! Bloom-filter domain for common-password screening.
//!
//! A replica of the authoritative password corpus is represented as a Bloom
//! filter: a fixed-size bit array plus a family of `k` seeded index
//! derivations. Queries answer "possibly common" or "definitely not common"
//! in O(k) time with no false negatives; the tunable cost is a bounded
//! false-positive rate.
//!
//! ## Layout
//!
//! - **Domain Layer** (`domain/`): Pure logic, no I/O
//!   - `BloomFilter`: Core probabilistic data structure
//!   - `BitArray`: Fixed-size bit store with wire-faithful serde
//!   - `HashFamily`: Seeded index-derivation strategies
//!   - `FilterSnapshot`: The `(bitArray, bitArraySize, hashFunctionCount)`
//!     replication triple
//!   - `parameters`: Optimal `(m, k)` sizing and the FPR formula
//! - **Metrics** (`metrics.rs`): Operation counters and recorder trait
//! - **Errors** (`error.rs`): Construction and key validation failures
//!
//! ## Invariants
//!
//! - No false negatives: an inserted key always queries true against an
//!   array that still holds its bits.
//! - False positives only: a query may report a never-inserted key as a
//!   possible member; the rate follows `(1 - e^(-kn/m))^k`.
//! - A filter's identity is `(m, k, hash family)`; snapshots replicate only
//!   between filters whose identity matches exactly.
//!
//! ## Usage Example
//!
//! ```
//! use pwguard_filter::{BloomFilter, HashFamily};
//!
//! let mut filter = BloomFilter::new(1000, 2, HashFamily::Fnv1Rolling)?;
//! filter.insert("password123");
//!
//! assert!(filter.query("password123"));
//! assert!(!filter.query("xkcd-936-style-passphrase"));
//! # Ok::<(), pwguard_filter::FilterError>(())
//! ```

pub mod domain;
pub mod error;
pub mod metrics;

// Re-exports for convenience
pub use domain::{
    calculate_fpr, calculate_optimal_parameters, BitArray, BloomFilter, BloomFilterParams,
    FilterSnapshot, HashFamily, FNV1_PRIME_64,
};
pub use error::FilterError;
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
