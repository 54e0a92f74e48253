//! Join I/O and progress statistics.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counters maintained by the frame pool and the join stages.
///
/// Fields are atomic so they can be bumped through a shared reference to
/// the pool. We use `Ordering::Relaxed` throughout: counters are
/// independent and only read for reporting.
///
/// # Example
/// ```
/// use gracejoin::JoinStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = JoinStats::new();
/// stats.pages_read.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.snapshot().pages_read, 1);
/// ```
#[derive(Debug)]
pub struct JoinStats {
    /// Pages loaded from the store into a frame.
    pub pages_read: AtomicU64,

    /// Pages flushed from a frame to the store.
    pub pages_written: AtomicU64,

    /// Records routed to a bucket by the partition stage.
    pub records_partitioned: AtomicU64,

    /// Buckets joined by the probe stage.
    pub buckets_probed: AtomicU64,

    /// Buckets skipped because one side was empty.
    pub buckets_skipped: AtomicU64,

    /// Joined pairs written to the output frame.
    pub pairs_emitted: AtomicU64,
}

impl JoinStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            pages_read: AtomicU64::new(0),
            pages_written: AtomicU64::new(0),
            records_partitioned: AtomicU64::new(0),
            buckets_probed: AtomicU64::new(0),
            buckets_skipped: AtomicU64::new(0),
            pairs_emitted: AtomicU64::new(0),
        }
    }

    /// Add `n` to a counter.
    #[inline]
    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        counter.fetch_add(n, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            pages_read: self.pages_read.load(Ordering::Relaxed),
            pages_written: self.pages_written.load(Ordering::Relaxed),
            records_partitioned: self.records_partitioned.load(Ordering::Relaxed),
            buckets_probed: self.buckets_probed.load(Ordering::Relaxed),
            buckets_skipped: self.buckets_skipped.load(Ordering::Relaxed),
            pairs_emitted: self.pairs_emitted.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.pages_read.store(0, Ordering::Relaxed);
        self.pages_written.store(0, Ordering::Relaxed);
        self.records_partitioned.store(0, Ordering::Relaxed);
        self.buckets_probed.store(0, Ordering::Relaxed);
        self.buckets_skipped.store(0, Ordering::Relaxed);
        self.pairs_emitted.store(0, Ordering::Relaxed);
    }
}

impl Default for JoinStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time copy of [`JoinStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatsSnapshot {
    pub pages_read: u64,
    pub pages_written: u64,
    pub records_partitioned: u64,
    pub buckets_probed: u64,
    pub buckets_skipped: u64,
    pub pairs_emitted: u64,
}

impl StatsSnapshot {
    /// Total pages moved between frames and the store.
    pub fn page_io(&self) -> u64 {
        self.pages_read + self.pages_written
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ read: {}, written: {}, partitioned: {}, probed: {}, skipped: {}, pairs: {} }}",
            self.pages_read,
            self.pages_written,
            self.records_partitioned,
            self.buckets_probed,
            self.buckets_skipped,
            self.pairs_emitted
        )
    }
}
