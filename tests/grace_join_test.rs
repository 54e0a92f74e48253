//! Integration tests for the partitioned hash join.
//!
//! These tests drive the join through the public API against a real store
//! file and check the properties the join promises end to end.

use std::fs::OpenOptions;
use std::io::{Seek, SeekFrom, Write};

use gracejoin::storage::relation::{read_pairs, read_records, write_relation};
use gracejoin::{
    hash_join, partition, probe, DiskManager, Error, ErrorKind, FramePool, JoinConfig, PageId,
    PageRange, Record, PAGE_SIZE,
};
use tempfile::{tempdir, TempDir};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn create_join(frames: usize, records_per_page: usize) -> (DiskManager, FramePool, TempDir) {
    init_logging();
    let dir = tempdir().unwrap();
    let store = DiskManager::create(dir.path().join("join.db")).unwrap();
    let pool = FramePool::new(&JoinConfig::new(frames, records_per_page)).unwrap();
    (store, pool, dir)
}

fn keyed(keys: &[u32], value_base: u32) -> Vec<Record> {
    keys.iter()
        .enumerate()
        .map(|(i, &k)| Record::new(k, value_base + i as u32))
        .collect()
}

/// Reference result: every (l, r) with equal keys, left-major order.
fn nested_loop_join(left: &[Record], right: &[Record]) -> Vec<(Record, Record)> {
    let mut out = Vec::new();
    for l in left {
        for r in right {
            if l.equals_on_key(r) {
                out.push((*l, *r));
            }
        }
    }
    out.sort();
    out
}

fn sorted(mut pairs: Vec<(Record, Record)>) -> Vec<(Record, Record)> {
    pairs.sort();
    pairs
}

// ============================================================================
// Join semantics
// ============================================================================

/// Left {1,2,3,4} joined with right {2,4,5,6} on key.
#[test]
fn test_small_example() {
    let (mut store, mut pool, _dir) = create_join(3, 4);
    let left = keyed(&[1, 2, 3, 4], 0);
    let right = keyed(&[2, 4, 5, 6], 100);
    let left_range = write_relation(&mut store, &left, 4).unwrap();
    let right_range = write_relation(&mut store, &right, 4).unwrap();

    let output = hash_join(&mut store, &mut pool, left_range, right_range).unwrap();
    let pairs = read_pairs(&mut store, &output).unwrap();

    // With B = 3 there are two buckets: key 2 lands in bucket 0 and key 4
    // in bucket 1, so bucket 0's pair is emitted first.
    assert_eq!(Record::new(2, 0).partition_hash() % 2, 0);
    assert_eq!(Record::new(4, 0).partition_hash() % 2, 1);
    assert_eq!(
        pairs,
        vec![
            (Record::new(2, 1), Record::new(2, 100)),
            (Record::new(4, 3), Record::new(4, 101)),
        ]
    );
}

#[test]
fn test_join_matches_nested_loop_with_spills() {
    let (mut store, mut pool, _dir) = create_join(12, 64);
    let left_keys: Vec<u32> = (0..1000).map(|i| i % 300).collect();
    let right_keys: Vec<u32> = (0..800).map(|i| (i * 7) % 300).collect();
    let left = keyed(&left_keys, 0);
    let right = keyed(&right_keys, 1_000_000);

    let left_range = write_relation(&mut store, &left, 64).unwrap();
    let right_range = write_relation(&mut store, &right, 64).unwrap();

    let buckets = partition(&mut store, &mut pool, left_range, right_range).unwrap();
    assert_eq!(buckets.len(), 11);
    assert!(buckets.iter().any(|b| b.left_pages().len() > 1));

    let output = probe(&mut store, &mut pool, &buckets).unwrap();
    let pairs = read_pairs(&mut store, &output).unwrap();

    assert_eq!(sorted(pairs), nested_loop_join(&left, &right));
}

#[test]
fn test_duplicate_keys_produce_cross_product() {
    let (mut store, mut pool, _dir) = create_join(5, 8);
    let left = keyed(&[7, 7, 7, 1], 0);
    let right = keyed(&[7, 7, 2], 100);
    let left_range = write_relation(&mut store, &left, 8).unwrap();
    let right_range = write_relation(&mut store, &right, 8).unwrap();

    let output = hash_join(&mut store, &mut pool, left_range, right_range).unwrap();
    let pairs = read_pairs(&mut store, &output).unwrap();

    assert_eq!(pairs.len(), 6);
    assert_eq!(sorted(pairs), nested_loop_join(&left, &right));
}

/// Pairs stay (left, right) when the right side is the build side.
#[test]
fn test_field_order_independent_of_build_side() {
    let (mut store, mut pool, _dir) = create_join(4, 16);
    let left = keyed(&[3; 10], 0);
    let right = keyed(&[3], 500);
    let left_range = write_relation(&mut store, &left, 16).unwrap();
    let right_range = write_relation(&mut store, &right, 16).unwrap();

    let buckets = partition(&mut store, &mut pool, left_range, right_range).unwrap();
    let bucket = buckets.iter().find(|b| !b.has_empty_side()).unwrap();
    assert_eq!(bucket.build_side(), gracejoin::Side::Right);

    let output = probe(&mut store, &mut pool, &buckets).unwrap();
    let pairs = read_pairs(&mut store, &output).unwrap();

    assert_eq!(pairs.len(), 10);
    for (l, r) in pairs {
        assert!(l.value < 500);
        assert_eq!(r, Record::new(3, 500));
    }
}

#[test]
fn test_disjoint_relations_produce_no_output() {
    let (mut store, mut pool, _dir) = create_join(6, 8);
    let left = keyed(&(0..50).collect::<Vec<_>>(), 0);
    let right = keyed(&(50..100).collect::<Vec<_>>(), 0);
    let left_range = write_relation(&mut store, &left, 8).unwrap();
    let right_range = write_relation(&mut store, &right, 8).unwrap();

    let output = hash_join(&mut store, &mut pool, left_range, right_range).unwrap();
    assert!(output.is_empty());
    assert_eq!(pool.stats().snapshot().pairs_emitted, 0);
}

// ============================================================================
// Partition properties
// ============================================================================

#[test]
fn test_partition_counts_sum_to_relation_sizes() {
    let (mut store, mut pool, _dir) = create_join(6, 8);
    let left = keyed(&(0..77).map(|k| k * 3).collect::<Vec<_>>(), 0);
    let right = keyed(&(0..41).collect::<Vec<_>>(), 0);
    let left_range = write_relation(&mut store, &left, 8).unwrap();
    let right_range = write_relation(&mut store, &right, 8).unwrap();

    let buckets = partition(&mut store, &mut pool, left_range, right_range).unwrap();

    let left_total: usize = buckets.iter().map(|b| b.left_record_count()).sum();
    let right_total: usize = buckets.iter().map(|b| b.right_record_count()).sum();
    assert_eq!(left_total, 77);
    assert_eq!(right_total, 41);

    for bucket in &buckets {
        let stored = read_records(&mut store, bucket.left_pages()).unwrap();
        assert_eq!(stored.len(), bucket.left_record_count());
    }
}

#[test]
fn test_equal_keys_share_a_bucket() {
    let (mut store, mut pool, _dir) = create_join(9, 8);
    let keys: Vec<u32> = (0..60).collect();
    let left = keyed(&keys, 0);
    let right = keyed(&keys, 1000);
    let left_range = write_relation(&mut store, &left, 8).unwrap();
    let right_range = write_relation(&mut store, &right, 8).unwrap();

    let buckets = partition(&mut store, &mut pool, left_range, right_range).unwrap();

    for bucket in &buckets {
        let mut l: Vec<u32> = read_records(&mut store, bucket.left_pages())
            .unwrap()
            .iter()
            .map(|r| r.key)
            .collect();
        let mut r: Vec<u32> = read_records(&mut store, bucket.right_pages())
            .unwrap()
            .iter()
            .map(|r| r.key)
            .collect();
        l.sort();
        r.sort();
        assert_eq!(l, r);
    }
}

// ============================================================================
// Resource behavior
// ============================================================================

#[test]
fn test_empty_side_triggers_no_probe_io() {
    let (mut store, mut pool, _dir) = create_join(5, 8);
    let left = keyed(&(0..30).collect::<Vec<_>>(), 0);
    let left_range = write_relation(&mut store, &left, 8).unwrap();
    let empty = PageRange::new(PageId::new(store.page_count()), PageId::new(store.page_count()));

    let buckets = partition(&mut store, &mut pool, left_range, empty).unwrap();
    let before = pool.stats().snapshot();
    let pages_before = store.page_count();

    let output = probe(&mut store, &mut pool, &buckets).unwrap();

    let after = pool.stats().snapshot();
    assert!(output.is_empty());
    assert_eq!(after.page_io(), before.page_io());
    assert_eq!(after.buckets_skipped - before.buckets_skipped, 4);
    assert_eq!(store.page_count(), pages_before);
}

#[test]
fn test_rerun_is_idempotent() {
    let (mut store, mut pool, _dir) = create_join(6, 64);
    let left = keyed(&(0..200).map(|i| i % 37).collect::<Vec<_>>(), 0);
    let right = keyed(&(0..150).map(|i| i % 23).collect::<Vec<_>>(), 5000);
    let left_range = write_relation(&mut store, &left, 64).unwrap();
    let right_range = write_relation(&mut store, &right, 64).unwrap();

    let first = hash_join(&mut store, &mut pool, left_range, right_range).unwrap();
    let second = hash_join(&mut store, &mut pool, left_range, right_range).unwrap();

    assert_ne!(first, second, "each run writes fresh pages");
    assert_eq!(
        read_pairs(&mut store, &first).unwrap(),
        read_pairs(&mut store, &second).unwrap()
    );
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_build_side_overflow_is_reported() {
    let (mut store, mut pool, _dir) = create_join(3, 4);
    let left = keyed(&[1; 10], 0);
    let right = keyed(&[1; 10], 100);
    let left_range = write_relation(&mut store, &left, 4).unwrap();
    let right_range = write_relation(&mut store, &right, 4).unwrap();

    let err = hash_join(&mut store, &mut pool, left_range, right_range).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
    assert!(matches!(
        err,
        Error::CapacityExceeded {
            required: 10,
            available: 4,
            ..
        }
    ));
}

#[test]
fn test_range_past_store_end_is_reported() {
    let (mut store, mut pool, _dir) = create_join(4, 4);
    let left_range = write_relation(&mut store, &keyed(&[1, 2], 0), 4).unwrap();
    let bad = PageRange::new(PageId::new(0), PageId::new(10));

    let err = hash_join(&mut store, &mut pool, left_range, bad).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::OutOfRange);
}

#[test]
fn test_corrupt_relation_page_is_reported() {
    init_logging();
    let dir = tempdir().unwrap();
    let path = dir.path().join("join.db");
    let mut store = DiskManager::create(&path).unwrap();
    let mut pool = FramePool::new(&JoinConfig::new(4, 4)).unwrap();

    let left_range = write_relation(&mut store, &keyed(&[1, 2, 3, 4, 5], 0), 4).unwrap();
    let right_range = write_relation(&mut store, &keyed(&[1, 2], 0), 4).unwrap();

    // Damage the first record of page 1.
    {
        let mut file = OpenOptions::new().write(true).open(&path).unwrap();
        file.seek(SeekFrom::Start(PAGE_SIZE as u64 + 16)).unwrap();
        file.write_all(&[0xAA, 0xBB]).unwrap();
    }

    let err = hash_join(&mut store, &mut pool, left_range, right_range).unwrap_err();
    assert!(matches!(err, Error::CorruptPage(1)));
    assert_eq!(err.kind(), ErrorKind::StoreIo);
}
