//! Partition stage: hash-bucket both relations into stored partitions.

use log::{debug, trace};

use crate::buffer::{BucketFrame, FramePool, JoinStats, PartitionFrames};
use crate::common::{Error, PageRange, Result};
use crate::execution::{Bucket, Side};
use crate::storage::page::PageType;
use crate::storage::DiskManager;

/// Split both relations into `B-1` buckets on `partition_hash`.
///
/// Each relation is streamed page by page through the input frame. Every
/// record goes to bucket frame `partition_hash mod (B-1)`; a full bucket
/// frame is flushed before the record is added. After a relation is
/// exhausted every non-empty bucket frame is flushed, so left and right
/// records never share a stored page.
///
/// Both ranges are checked against the store before any page is read. An
/// empty range contributes nothing and is accepted wherever it starts.
///
/// # Errors
/// - `Error::RangeOutOfBounds` if a range is reversed or past the store end
/// - `Error::UnexpectedPageType` if a range holds a non-data page
/// - Store read/write failures
pub fn partition(
    store: &mut DiskManager,
    pool: &mut FramePool,
    left: PageRange,
    right: PageRange,
) -> Result<Vec<Bucket>> {
    store.check_range(left)?;
    store.check_range(right)?;

    let frames = pool.partition_frames();
    for bucket_frame in &frames.buckets {
        pool.reset(bucket_frame);
    }

    let mut buckets = vec![Bucket::new(); frames.buckets.len()];
    debug!(
        "partitioning left {} and right {} into {} buckets",
        left,
        right,
        buckets.len()
    );

    partition_relation(store, pool, &frames, &mut buckets, Side::Left, left)?;
    partition_relation(store, pool, &frames, &mut buckets, Side::Right, right)?;

    Ok(buckets)
}

fn partition_relation(
    store: &mut DiskManager,
    pool: &mut FramePool,
    frames: &PartitionFrames,
    buckets: &mut [Bucket],
    side: Side,
    range: PageRange,
) -> Result<()> {
    let partitions = frames.buckets.len();
    let mut records = 0u64;

    for page_id in range.iter() {
        pool.load(store, page_id, &frames.input)?;

        let page_type = pool.page(&frames.input).page_type();
        if page_type != PageType::Data {
            return Err(Error::UnexpectedPageType {
                page_id: page_id.0,
                found: page_type,
            });
        }

        for i in 0..pool.page(&frames.input).size() {
            let record = pool.page(&frames.input).record_at(i);
            let slot = record.partition_hash() as usize % partitions;
            let bucket_frame = &frames.buckets[slot];

            if pool.page(bucket_frame).is_full() {
                spill(store, pool, bucket_frame, &mut buckets[slot], side)?;
            }
            pool.page_mut(bucket_frame).append(record);
            records += 1;
        }
    }

    // Final partial flush
    for (bucket_frame, bucket) in frames.buckets.iter().zip(buckets.iter_mut()) {
        if !pool.page(bucket_frame).is_empty() {
            spill(store, pool, bucket_frame, bucket, side)?;
        }
    }

    JoinStats::add(&pool.stats().records_partitioned, records);
    debug!("partitioned {} {:?} records from {} pages", records, side, range.len());
    Ok(())
}

/// Flush a bucket frame and register the new page on its bucket.
fn spill(
    store: &mut DiskManager,
    pool: &mut FramePool,
    bucket_frame: &BucketFrame,
    bucket: &mut Bucket,
    side: Side,
) -> Result<()> {
    let records = pool.page(bucket_frame).size();
    let page_id = pool.flush(store, bucket_frame)?;
    bucket.add_page(side, page_id, records);
    trace!(
        "bucket {} spilled {} {:?} records to {}",
        bucket_frame.slot(),
        records,
        side,
        page_id
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{ErrorKind, JoinConfig, PageId};
    use crate::storage::page::{Page, PageHeader, Record};
    use crate::storage::relation::{read_records, write_relation};
    use tempfile::{tempdir, TempDir};

    fn setup(frames: usize, records_per_page: usize) -> (DiskManager, FramePool, TempDir) {
        let dir = tempdir().unwrap();
        let store = DiskManager::create(dir.path().join("partition.db")).unwrap();
        let pool = FramePool::new(&JoinConfig::new(frames, records_per_page)).unwrap();
        (store, pool, dir)
    }

    fn records(keys: impl IntoIterator<Item = u32>) -> Vec<Record> {
        keys.into_iter().map(|k| Record::new(k, k * 10)).collect()
    }

    #[test]
    fn test_partition_produces_b_minus_one_buckets() {
        let (mut store, mut pool, _dir) = setup(6, 4);
        let buckets = partition(&mut store, &mut pool, PageRange::empty(), PageRange::empty()).unwrap();
        assert_eq!(buckets.len(), 5);
        assert!(buckets.iter().all(|b| *b == Bucket::new()));
        assert_eq!(pool.stats().snapshot().page_io(), 0);
    }

    #[test]
    fn test_partition_is_complete_and_consistent() {
        let (mut store, mut pool, _dir) = setup(4, 4);
        let left = records(0..40);
        let right = records(20..30);
        let left_range = write_relation(&mut store, &left, 4).unwrap();
        let right_range = write_relation(&mut store, &right, 4).unwrap();

        let buckets = partition(&mut store, &mut pool, left_range, right_range).unwrap();
        assert_eq!(buckets.len(), 3);

        let mut seen_left = Vec::new();
        let mut seen_right = Vec::new();
        for (index, bucket) in buckets.iter().enumerate() {
            let l = read_records(&mut store, bucket.left_pages()).unwrap();
            let r = read_records(&mut store, bucket.right_pages()).unwrap();
            assert_eq!(l.len(), bucket.left_record_count());
            assert_eq!(r.len(), bucket.right_record_count());

            for record in l.iter().chain(r.iter()) {
                assert_eq!(record.partition_hash() as usize % 3, index);
            }
            seen_left.extend(l);
            seen_right.extend(r);
        }

        seen_left.sort();
        seen_right.sort();
        assert_eq!(seen_left, left);
        assert_eq!(seen_right, right);
        assert_eq!(pool.stats().snapshot().records_partitioned, 50);
    }

    #[test]
    fn test_full_bucket_spills_before_insert() {
        // One key means one bucket; 10 records at 4 per page gives 4+4+2.
        let (mut store, mut pool, _dir) = setup(3, 4);
        let left = vec![Record::new(8, 0); 10];
        let left_range = write_relation(&mut store, &left, 8).unwrap();

        let buckets = partition(&mut store, &mut pool, left_range, PageRange::empty()).unwrap();
        let slot = Record::new(8, 0).partition_hash() as usize % 2;
        let bucket = &buckets[slot];

        let sizes: Vec<usize> = bucket
            .left_pages()
            .iter()
            .map(|&pid| store.read_page(pid).unwrap().size())
            .collect();
        assert_eq!(sizes, vec![4, 4, 2]);
        assert_eq!(bucket.left_record_count(), 10);
        assert!(bucket.right_pages().is_empty());
        assert!(buckets[1 - slot].left_pages().is_empty());
    }

    #[test]
    fn test_partition_leaves_bucket_frames_empty() {
        let (mut store, mut pool, _dir) = setup(5, 4);
        let left_range = write_relation(&mut store, &records(0..13), 4).unwrap();

        partition(&mut store, &mut pool, left_range, PageRange::empty()).unwrap();

        let frames = pool.partition_frames();
        assert!(frames.buckets.iter().all(|f| pool.page(f).is_empty()));
    }

    #[test]
    fn test_partition_rejects_out_of_range() {
        let (mut store, mut pool, _dir) = setup(4, 4);
        let left_range = write_relation(&mut store, &records(0..4), 4).unwrap();
        let bad = PageRange::new(PageId::new(0), PageId::new(5));

        let result = partition(&mut store, &mut pool, left_range, bad);
        assert!(matches!(result, Err(Error::RangeOutOfBounds { last: 5, .. })));
        assert_eq!(pool.stats().snapshot().pages_read, 0);
    }

    #[test]
    fn test_partition_rejects_result_pages() {
        let (mut store, mut pool, _dir) = setup(4, 4);
        let mut page = Page::with_capacity(4);
        page.append_pair(Record::new(1, 1), Record::new(1, 2));
        store.append_page(&mut page).unwrap();

        let range = PageRange::new(PageId::new(0), PageId::new(1));
        let result = partition(&mut store, &mut pool, range, PageRange::empty());
        assert!(matches!(
            result,
            Err(Error::UnexpectedPageType {
                page_id: 0,
                found: PageType::JoinResult
            })
        ));
    }

    #[test]
    fn test_partition_reports_page_with_oversized_header() {
        let (mut store, mut pool, _dir) = setup(4, 4);
        let mut page = Page::with_capacity(4);
        page.append(Record::new(1, 1));
        let bytes = page.as_mut_slice();
        bytes[PageHeader::OFFSET_ENTRY_COUNT..PageHeader::OFFSET_ENTRY_COUNT + 2]
            .copy_from_slice(&600u16.to_le_bytes());
        bytes[PageHeader::OFFSET_CAPACITY..PageHeader::OFFSET_CAPACITY + 2]
            .copy_from_slice(&600u16.to_le_bytes());
        store.append_page(&mut page).unwrap();

        let range = PageRange::new(PageId::new(0), PageId::new(1));
        let err = partition(&mut store, &mut pool, range, PageRange::empty()).unwrap_err();
        assert!(matches!(err, Error::CorruptPage(0)));
        assert_eq!(err.kind(), ErrorKind::StoreIo);
    }

    #[test]
    fn test_empty_range_past_store_end_reads_nothing() {
        let (mut store, mut pool, _dir) = setup(4, 4);
        let left_range = write_relation(&mut store, &records(0..8), 4).unwrap();
        let empty = PageRange::new(PageId::new(10), PageId::new(10));

        let buckets = partition(&mut store, &mut pool, left_range, empty).unwrap();

        assert!(buckets.iter().all(|b| b.right_pages().is_empty()));
        assert_eq!(pool.stats().snapshot().pages_read, 2);
    }
}
