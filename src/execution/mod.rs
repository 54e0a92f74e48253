//! Query execution: the partitioned (Grace) hash join.
//!
//! The join runs in two stages over a fixed [`FramePool`]:
//! 1. [`partition`] hash-splits both relations into `B-1` stored buckets
//! 2. [`probe`] joins each bucket with an in-memory table over `B-2` frames
//!
//! [`hash_join`] runs both stages back to back.

mod bucket;
mod partition;
mod probe;

pub use bucket::{Bucket, Side};
pub use partition::partition;
pub use probe::probe;

use log::debug;

use crate::buffer::FramePool;
use crate::common::{PageId, PageRange, Result};
use crate::storage::DiskManager;

/// Equi-join the relations stored on `left` and `right`.
///
/// Returns the page ids of the join result, each page holding
/// `(left record, right record)` pairs.
///
/// # Errors
/// Any error from [`partition`] or [`probe`].
pub fn hash_join(
    store: &mut DiskManager,
    pool: &mut FramePool,
    left: PageRange,
    right: PageRange,
) -> Result<Vec<PageId>> {
    let buckets = partition(store, pool, left, right)?;
    let output = probe(store, pool, &buckets)?;
    debug!("hash join finished: {}", pool.stats().snapshot());
    Ok(output)
}
