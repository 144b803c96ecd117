//! Point-in-time filter snapshot
//!
//! The snapshot is the unit of replication between the authoritative corpus
//! and client replicas: the complete `(bitArray, bitArraySize,
//! hashFunctionCount)` triple, replaced wholesale on every successful
//! re-fetch. Field names follow the corpus wire format exactly, and a stored
//! snapshot round-trips verbatim.

use serde::{Deserialize, Serialize};

use super::bit_array::BitArray;

/// One complete filter state as exchanged with the authoritative corpus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSnapshot {
    /// The bit array as a sequence of 0/1 integers.
    pub bit_array: BitArray,
    /// Declared length of the bit array (`m`).
    pub bit_array_size: u64,
    /// Number of hash functions (`k`).
    pub hash_function_count: u64,
}

impl FilterSnapshot {
    /// Build a snapshot from an array and a hash-function count, taking the
    /// declared size from the array itself.
    pub fn new(bit_array: BitArray, hash_function_count: u64) -> Self {
        let bit_array_size = bit_array.len() as u64;
        Self {
            bit_array,
            bit_array_size,
            hash_function_count,
        }
    }
}
