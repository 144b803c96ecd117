//! Fixed-size bit array backing a Bloom filter
//!
//! The array is created once at filter construction and never resized.
//! Callers are responsible for reducing indices into `[0, len)` before
//! access; the hash family does this by construction.

use bitvec::prelude::*;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-size sequence of single-bit flags.
///
/// Serializes as a sequence of `0`/`1` integers so a serialized array is
/// interchangeable with the authoritative corpus wire format. On the way in,
/// a value of exactly `1` sets the bit; anything else leaves it clear.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BitArray {
    bits: BitVec<u8, Lsb0>,
}

impl BitArray {
    /// Create an all-zero array of `len` bits.
    pub fn zeroed(len: usize) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; len],
        }
    }

    /// Number of bits in the array.
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// True if the array holds no bits.
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Read the bit at `index`. Index must already be in `[0, len)`.
    pub fn get(&self, index: usize) -> bool {
        self.bits[index]
    }

    /// Set the bit at `index` to 1. Idempotent; an order-insensitive
    /// single-bit write, so replayed inserts cannot corrupt the array.
    pub fn set(&mut self, index: usize) {
        self.bits.set(index, true);
    }

    /// Number of bits currently set.
    pub fn count_ones(&self) -> usize {
        self.bits.count_ones()
    }
}

impl Serialize for BitArray {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.bits.len()))?;
        for bit in self.bits.iter().by_vals() {
            seq.serialize_element(&(bit as u8))?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for BitArray {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Vec<u8> = Vec::deserialize(deserializer)?;
        let mut bits = BitVec::with_capacity(raw.len());
        for value in raw {
            bits.push(value == 1);
        }
        Ok(Self { bits })
    }
}
