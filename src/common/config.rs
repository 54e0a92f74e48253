//! Configuration constants and the join's memory budget.

use crate::common::{Error, Result};

/// Size of a page in bytes (4KB).
///
/// Every page written to the block store occupies exactly this many bytes,
/// regardless of how many record slots it is configured to use.
pub const PAGE_SIZE: usize = 4096;

/// Encoded size of one [`Record`](crate::storage::page::Record) in bytes.
pub const RECORD_SIZE: usize = 8;

/// Byte offset where record slots begin.
///
/// The page header occupies the first bytes; the rest of this region is
/// reserved so slots stay 8-byte aligned.
pub const PAGE_DATA_OFFSET: usize = 16;

/// Maximum number of record slots a page can hold.
pub const MAX_RECORDS_PER_PAGE: usize = (PAGE_SIZE - PAGE_DATA_OFFSET) / RECORD_SIZE;

/// Minimum number of record slots a page may be configured with.
///
/// A joined output pair occupies two slots, so anything smaller could not
/// hold a single result.
pub const MIN_RECORDS_PER_PAGE: usize = 2;

/// Smallest usable frame pool: one input frame, one secondary-hash frame and
/// one output frame during the probe stage.
pub const MIN_POOL_FRAMES: usize = 3;

/// Default number of frames in the pool.
pub const DEFAULT_POOL_FRAMES: usize = 64;

/// Memory budget for a join.
///
/// `pool_frames` is the `B` of the algorithm: the partition stage produces
/// `B-1` buckets and the probe stage builds its hash table in `B-2` frames.
///
/// # Example
/// ```
/// use gracejoin::JoinConfig;
///
/// let config = JoinConfig::new(8, 32);
/// assert!(config.validate().is_ok());
/// assert_eq!(config.partition_count(), 7);
/// assert_eq!(config.probe_slots(), 6);
/// assert_eq!(config.max_build_records(), 6 * 32);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinConfig {
    /// Number of frames in the pool (`B`).
    pub pool_frames: usize,
    /// Record slots per page for every page the join writes.
    pub records_per_page: usize,
}

impl JoinConfig {
    /// Create a config with the given frame count and page capacity.
    pub fn new(pool_frames: usize, records_per_page: usize) -> Self {
        Self {
            pool_frames,
            records_per_page,
        }
    }

    /// Check that the budget can run a join at all.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` if the pool has fewer than
    /// [`MIN_POOL_FRAMES`] frames or the page capacity is outside
    /// `MIN_RECORDS_PER_PAGE..=MAX_RECORDS_PER_PAGE`.
    pub fn validate(&self) -> Result<()> {
        if self.pool_frames < MIN_POOL_FRAMES {
            return Err(Error::InvalidConfig(format!(
                "pool_frames must be at least {}, got {}",
                MIN_POOL_FRAMES, self.pool_frames
            )));
        }
        if !(MIN_RECORDS_PER_PAGE..=MAX_RECORDS_PER_PAGE).contains(&self.records_per_page) {
            return Err(Error::InvalidConfig(format!(
                "records_per_page must be in {}..={}, got {}",
                MIN_RECORDS_PER_PAGE, MAX_RECORDS_PER_PAGE, self.records_per_page
            )));
        }
        Ok(())
    }

    /// Number of partitions produced by the partition stage (`B-1`).
    #[inline]
    pub fn partition_count(&self) -> usize {
        self.pool_frames - 1
    }

    /// Number of secondary-hash frames used by the probe stage (`B-2`).
    #[inline]
    pub fn probe_slots(&self) -> usize {
        self.pool_frames - 2
    }

    /// Largest build side (in records) the probe stage can hold.
    #[inline]
    pub fn max_build_records(&self) -> usize {
        self.probe_slots() * self.records_per_page
    }
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self::new(DEFAULT_POOL_FRAMES, MAX_RECORDS_PER_PAGE)
    }
}
