//! Core Bloom filter implementation
//!
//! INVARIANTS:
//! - No false negatives: once a key is inserted, `query` returns true for it
//!   against any array that has not lost those bits.
//! - False positives only: `query` may return true for a key never inserted
//!   (bit collisions), never the reverse.
//! - Insert is idempotent: re-inserting a key leaves the bit array unchanged.

use super::bit_array::BitArray;
use super::hash_family::HashFamily;
use super::parameters::calculate_optimal_parameters;
use super::snapshot::FilterSnapshot;
use crate::error::FilterError;

/// Bloom filter for probabilistic membership testing.
///
/// A filter is defined entirely by `(m, k, family)`. Two filters are only
/// compatible for replication if all three match; the snapshot wire format
/// carries `m` and `k` but not the family, which deployments fix
/// out-of-band at construction.
///
/// A filter instance has a single owner; mutation goes through `&mut self`.
/// Callers that share one instance across concurrent tasks must serialize
/// `insert` calls themselves.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitArray,
    /// Size in bits (m)
    m: usize,
    /// Number of hash functions (k)
    k: usize,
    /// Index-derivation strategy, fixed for the filter's lifetime
    family: HashFamily,
}

impl BloomFilter {
    /// Create an all-zero filter with the given parameters.
    ///
    /// # Arguments
    /// * `m` - Size in bits
    /// * `k` - Number of hash functions
    /// * `family` - Index-derivation strategy
    pub fn new(m: usize, k: usize, family: HashFamily) -> Result<Self, FilterError> {
        Self::validate_params(m, k)?;
        Ok(Self {
            bits: BitArray::zeroed(m),
            m,
            k,
            family,
        })
    }

    /// Create an all-zero filter sized for `expected_elements` insertions at
    /// `target_fpr` false-positive probability.
    pub fn with_optimal_params(
        expected_elements: usize,
        target_fpr: f64,
        family: HashFamily,
    ) -> Result<Self, FilterError> {
        let params = calculate_optimal_parameters(expected_elements, target_fpr);
        Self::new(params.size_bits, params.hash_count, family)
    }

    /// Reconstruct a filter from a replicated snapshot.
    ///
    /// Rejects snapshots whose bit array length does not match the declared
    /// size; accepting such a snapshot would make later reads silently
    /// disagree with the authoritative corpus.
    pub fn from_snapshot(snapshot: FilterSnapshot, family: HashFamily) -> Result<Self, FilterError> {
        let m = snapshot.bit_array_size as usize;
        let k = snapshot.hash_function_count as usize;
        Self::validate_params(m, k)?;

        if snapshot.bit_array.len() != m {
            return Err(FilterError::InvalidConfiguration(format!(
                "bit array length {} does not match declared size {}",
                snapshot.bit_array.len(),
                m
            )));
        }

        Ok(Self {
            bits: snapshot.bit_array,
            m,
            k,
            family,
        })
    }

    fn validate_params(m: usize, k: usize) -> Result<(), FilterError> {
        if m == 0 {
            return Err(FilterError::InvalidConfiguration(
                "bit array size must be greater than 0".to_string(),
            ));
        }
        if k == 0 {
            return Err(FilterError::InvalidConfiguration(
                "hash function count must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Insert a key into the filter.
    ///
    /// Sets the `k` derived bits. After insertion, `query(key)` is
    /// guaranteed to return true. Idempotent.
    pub fn insert(&mut self, key: &str) {
        for seed in 0..self.k as u64 {
            let index = self.family.index(key, seed, self.m);
            self.bits.set(index);
        }
    }

    /// Test whether a key might be in the filter.
    ///
    /// Returns:
    /// - `true` if the key might be a member (could be a false positive)
    /// - `false` if the key is definitely NOT a member (never a false
    ///   negative)
    ///
    /// Returns false on the first unset derived bit without deriving the
    /// remaining indices.
    pub fn query(&self, key: &str) -> bool {
        for seed in 0..self.k as u64 {
            if !self.bits.get(self.family.index(key, seed, self.m)) {
                return false;
            }
        }
        true
    }

    /// Insert a key supplied as raw bytes, validating that it is textual.
    ///
    /// Boundary entry point for callers holding wire bytes; the `&str` API
    /// makes non-textual keys unrepresentable.
    pub fn insert_raw(&mut self, key: &[u8]) -> Result<(), FilterError> {
        let key = std::str::from_utf8(key).map_err(|e| FilterError::TypeMismatch(e.to_string()))?;
        self.insert(key);
        Ok(())
    }

    /// Query a key supplied as raw bytes, validating that it is textual.
    pub fn query_raw(&self, key: &[u8]) -> Result<bool, FilterError> {
        let key = std::str::from_utf8(key).map_err(|e| FilterError::TypeMismatch(e.to_string()))?;
        Ok(self.query(key))
    }

    /// Export the complete filter state for replication or caching.
    pub fn to_snapshot(&self) -> FilterSnapshot {
        FilterSnapshot {
            bit_array: self.bits.clone(),
            bit_array_size: self.m as u64,
            hash_function_count: self.k as u64,
        }
    }

    /// Get the filter size in bits.
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Get the number of hash functions.
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Get the index-derivation strategy.
    pub fn family(&self) -> HashFamily {
        self.family
    }

    /// Get the number of bits currently set.
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }
}
