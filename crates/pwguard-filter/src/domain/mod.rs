//! Domain layer: pure filter logic, no I/O

pub mod bit_array;
pub mod bloom_filter;
pub mod hash_family;
pub mod parameters;
pub mod snapshot;

pub use bit_array::BitArray;
pub use bloom_filter::BloomFilter;
pub use hash_family::{HashFamily, FNV1_PRIME_64};
pub use parameters::{calculate_fpr, calculate_optimal_parameters, BloomFilterParams};
pub use snapshot::FilterSnapshot;
