//! Bucket descriptors produced by the partition stage.

use crate::common::PageId;
use crate::storage::page::Record;

/// One of the two join inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// The opposite input.
    #[inline]
    pub fn other(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Put a matched pair into `(left, right)` order, given that `ours`
    /// came from this side and `theirs` from the other.
    #[inline]
    pub fn ordered(self, ours: Record, theirs: Record) -> (Record, Record) {
        match self {
            Side::Left => (ours, theirs),
            Side::Right => (theirs, ours),
        }
    }
}

/// Pages and record counts for one partition, per input.
///
/// Page lists are append-only and keep flush order. Each page is registered
/// together with the number of records it holds, so the counts always equal
/// the sum over the listed pages.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bucket {
    left_pages: Vec<PageId>,
    right_pages: Vec<PageId>,
    left_record_count: usize,
    right_record_count: usize,
}

impl Bucket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flushed page holding `records` records from `side`.
    pub fn add_page(&mut self, side: Side, page_id: PageId, records: usize) {
        match side {
            Side::Left => {
                self.left_pages.push(page_id);
                self.left_record_count += records;
            }
            Side::Right => {
                self.right_pages.push(page_id);
                self.right_record_count += records;
            }
        }
    }

    #[inline]
    pub fn add_left_page(&mut self, page_id: PageId, records: usize) {
        self.add_page(Side::Left, page_id, records);
    }

    #[inline]
    pub fn add_right_page(&mut self, page_id: PageId, records: usize) {
        self.add_page(Side::Right, page_id, records);
    }

    /// Pages holding this bucket's records from `side`, in flush order.
    pub fn pages(&self, side: Side) -> &[PageId] {
        match side {
            Side::Left => &self.left_pages,
            Side::Right => &self.right_pages,
        }
    }

    /// Records from `side` in this bucket.
    pub fn record_count(&self, side: Side) -> usize {
        match side {
            Side::Left => self.left_record_count,
            Side::Right => self.right_record_count,
        }
    }

    #[inline]
    pub fn left_pages(&self) -> &[PageId] {
        &self.left_pages
    }

    #[inline]
    pub fn right_pages(&self) -> &[PageId] {
        &self.right_pages
    }

    #[inline]
    pub fn left_record_count(&self) -> usize {
        self.left_record_count
    }

    #[inline]
    pub fn right_record_count(&self) -> usize {
        self.right_record_count
    }

    /// Check if either input has no pages here, so nothing can join.
    #[inline]
    pub fn has_empty_side(&self) -> bool {
        self.left_pages.is_empty() || self.right_pages.is_empty()
    }

    /// Side to build the hash table from: the smaller one, left on ties.
    pub fn build_side(&self) -> Side {
        if self.left_record_count <= self.right_record_count {
            Side::Left
        } else {
            Side::Right
        }
    }
}
