//! Seeded hash families for index derivation
//!
//! A family derives `index_i(key) = H(key, i) mod m` for seeds `i` in
//! `[0, k)`. Each variant is deterministic and total over all string keys
//! and all seeds, so insert/query agreement holds across sessions for a
//! given snapshot.
//!
//! The two variants are NOT bit-compatible with each other. The variant in
//! force is part of the filter's identity: it is fixed at construction and
//! changing it invalidates every existing snapshot.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

/// FNV-1 64-bit prime, the multiplier of the rolling variant.
pub const FNV1_PRIME_64: u64 = 0x100000001B3;

/// Index-derivation strategy for a Bloom filter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashFamily {
    /// 64-bit rolling hash seeded through the accumulator: start at the seed
    /// value, then for each key byte XOR the byte in and wrapping-multiply
    /// by [`FNV1_PRIME_64`]. This is the canonical variant.
    #[default]
    Fnv1Rolling,
    /// Murmur3 32-bit over the key with the decimal seed text appended,
    /// widened to 64 bits.
    Murmur3Appended,
}

impl HashFamily {
    /// Hash `key` under `seed` to an unsigned 64-bit value.
    pub fn hash(&self, key: &str, seed: u64) -> u64 {
        match self {
            HashFamily::Fnv1Rolling => {
                let mut acc = seed;
                for byte in key.bytes() {
                    acc ^= u64::from(byte);
                    acc = acc.wrapping_mul(FNV1_PRIME_64);
                }
                acc
            }
            HashFamily::Murmur3Appended => {
                let appended = format!("{key}{seed}");
                let mut cursor = Cursor::new(appended.as_bytes());
                u64::from(murmur3::murmur3_32(&mut cursor, 0).unwrap_or(0))
            }
        }
    }

    /// Derive the array index for `key` under `seed`, reduced into `[0, m)`.
    pub fn index(&self, key: &str, seed: u64, m: usize) -> usize {
        (self.hash(key, seed) % m as u64) as usize
    }
}
