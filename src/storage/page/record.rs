//! Record - the fixed-width tuple stored in relation pages.

use std::fmt;

use crate::common::config::RECORD_SIZE;

/// Multiplier for the partition hash: 2^32 / golden ratio.
const PARTITION_MULTIPLIER: u32 = 0x9E37_79B1;

/// Seed mixed into the probe hash so it does not track the partition hash.
const PROBE_SEED: u32 = 0x5BD1_E995;

/// A relation tuple: a join key and an opaque payload.
///
/// Records are immutable once read from storage. Two records join when
/// their keys are equal; the payload rides along into the result.
///
/// # Encoding
/// 8 bytes, little-endian: `key` then `value`.
///
/// # Example
/// ```
/// use gracejoin::Record;
///
/// let a = Record::new(7, 100);
/// let b = Record::new(7, 200);
/// assert!(a.equals_on_key(&b));
/// assert_eq!(a.partition_hash(), b.partition_hash());
/// assert_eq!(a.probe_hash(), b.probe_hash());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Record {
    /// Join key.
    pub key: u32,
    /// Payload carried into the join result.
    pub value: u32,
}

impl Record {
    /// Encoded size in bytes.
    pub const SIZE: usize = RECORD_SIZE;

    #[inline]
    pub fn new(key: u32, value: u32) -> Self {
        Self { key, value }
    }

    /// Hash used to pick a partition.
    ///
    /// Fibonacci multiplicative hashing: the high bits of `key * 2^32/phi`,
    /// folded down so that small moduli see them.
    #[inline]
    pub fn partition_hash(&self) -> u32 {
        let h = self.key.wrapping_mul(PARTITION_MULTIPLIER);
        h ^ (h >> 16)
    }

    /// Hash used to pick a slot in the probe stage's in-memory table.
    ///
    /// Seeded murmur3 finalizer. It must not correlate with
    /// [`partition_hash`](Self::partition_hash): every record in a partition
    /// already shares `partition_hash mod (B-1)`.
    #[inline]
    pub fn probe_hash(&self) -> u32 {
        let mut h = self.key ^ PROBE_SEED;
        h ^= h >> 16;
        h = h.wrapping_mul(0x85EB_CA6B);
        h ^= h >> 13;
        h = h.wrapping_mul(0xC2B2_AE35);
        h ^= h >> 16;
        h
    }

    /// Join predicate: keys are equal.
    #[inline]
    pub fn equals_on_key(&self, other: &Record) -> bool {
        self.key == other.key
    }

    /// Encode into the first [`Record::SIZE`] bytes of `buf`.
    #[inline]
    pub fn write_to(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.key.to_le_bytes());
        buf[4..8].copy_from_slice(&self.value.to_le_bytes());
    }

    /// Decode from the first [`Record::SIZE`] bytes of `buf`.
    #[inline]
    pub fn from_bytes(buf: &[u8]) -> Self {
        Self {
            key: u32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]),
            value: u32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]),
        }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.key, self.value)
    }
}
