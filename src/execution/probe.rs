//! Probe stage: join matching partitions with an in-memory hash table.

use log::{debug, trace};

use crate::buffer::{FramePool, JoinStats, ProbeFrames};
use crate::common::{Error, PageId, Result};
use crate::execution::{Bucket, Side};
use crate::storage::DiskManager;

/// Join every bucket whose two sides are both non-empty.
///
/// For each bucket in index order the smaller side (left on ties) is loaded
/// into `B-2` hash table frames on `probe_hash`, then the other side is
/// streamed through the input frame and matched against the slot its
/// `probe_hash` selects. Pairs are written to the output frame in
/// `(left, right)` order whichever side was built, and the output frame is
/// flushed whenever it fills and once at the end.
///
/// Returns the output page ids in the order they were written.
///
/// # Errors
/// - `Error::CapacityExceeded` if a build side exceeds the hash table's
///   frames, either in total or in a single slot
/// - Store read/write failures
pub fn probe(store: &mut DiskManager, pool: &mut FramePool, buckets: &[Bucket]) -> Result<Vec<PageId>> {
    let frames = pool.probe_frames();
    let mut output_pages = Vec::new();

    pool.reset(&frames.output);

    for (index, bucket) in buckets.iter().enumerate() {
        if bucket.has_empty_side() {
            JoinStats::add(&pool.stats().buckets_skipped, 1);
            trace!("bucket {} has an empty side, skipping", index);
            continue;
        }

        let build_side = bucket.build_side();
        let available = frames.table.len() * pool.records_per_page();
        let required = bucket.record_count(build_side);
        if required > available {
            return Err(Error::CapacityExceeded {
                bucket: index,
                required,
                available,
            });
        }

        debug!(
            "bucket {}: building {:?} ({} records), probing {:?} ({} records)",
            index,
            build_side,
            required,
            build_side.other(),
            bucket.record_count(build_side.other())
        );

        pool.reset(&frames.input);
        for slot in &frames.table {
            pool.reset(slot);
        }

        build(store, pool, &frames, bucket, index, build_side)?;
        probe_bucket(store, pool, &frames, bucket, build_side, &mut output_pages)?;

        JoinStats::add(&pool.stats().buckets_probed, 1);
    }

    if !pool.page(&frames.output).is_empty() {
        output_pages.push(pool.flush(store, &frames.output)?);
    }

    debug!("probe wrote {} output pages", output_pages.len());
    Ok(output_pages)
}

/// Load the build side into the hash table frames.
fn build(
    store: &mut DiskManager,
    pool: &mut FramePool,
    frames: &ProbeFrames,
    bucket: &Bucket,
    index: usize,
    build_side: Side,
) -> Result<()> {
    let slots = frames.table.len();

    for &page_id in bucket.pages(build_side) {
        pool.load(store, page_id, &frames.input)?;

        for i in 0..pool.page(&frames.input).size() {
            let record = pool.page(&frames.input).record_at(i);
            let slot = &frames.table[record.probe_hash() as usize % slots];

            // Skewed keys can overflow one slot even when the total fits.
            if pool.page(slot).is_full() {
                return Err(Error::CapacityExceeded {
                    bucket: index,
                    required: bucket.record_count(build_side),
                    available: pool.page(slot).capacity(),
                });
            }
            pool.page_mut(slot).append(record);
        }
    }

    Ok(())
}

/// Stream the probe side against the hash table and emit matches.
fn probe_bucket(
    store: &mut DiskManager,
    pool: &mut FramePool,
    frames: &ProbeFrames,
    bucket: &Bucket,
    build_side: Side,
    output_pages: &mut Vec<PageId>,
) -> Result<()> {
    let slots = frames.table.len();
    let mut pairs = 0u64;

    for &page_id in bucket.pages(build_side.other()) {
        pool.load(store, page_id, &frames.input)?;

        for i in 0..pool.page(&frames.input).size() {
            let probe_record = pool.page(&frames.input).record_at(i);
            let slot = &frames.table[probe_record.probe_hash() as usize % slots];

            for j in 0..pool.page(slot).size() {
                let build_record = pool.page(slot).record_at(j);
                if !build_record.equals_on_key(&probe_record) {
                    continue;
                }

                if pool.page(&frames.output).is_full() {
                    output_pages.push(pool.flush(store, &frames.output)?);
                }
                let (left, right) = build_side.ordered(build_record, probe_record);
                pool.page_mut(&frames.output).append_pair(left, right);
                pairs += 1;
            }
        }
    }

    JoinStats::add(&pool.stats().pairs_emitted, pairs);
    Ok(())
}
