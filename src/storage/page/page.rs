//! Page - the fundamental 4KB unit of storage.
//!
//! A [`Page`] is a 4KB byte array that serves as the unit of I/O between the
//! block store and the frame pool. It starts with a [`PageHeader`] followed
//! by fixed-width record slots.

use crate::common::config::{
    MAX_RECORDS_PER_PAGE, MIN_RECORDS_PER_PAGE, PAGE_DATA_OFFSET, PAGE_SIZE,
};

use super::page_header::{PageHeader, PageType};
use super::record::Record;

/// A page of records (4KB, 4KB-aligned).
///
/// A page is configured with a capacity in record slots. A data page stores
/// one [`Record`] per slot; a join result page stores one `(left, right)`
/// pair per two slots. The first append to an empty page decides which kind
/// it is.
///
/// # Memory Layout
/// ```text
/// ┌──────────────┬──────────┬─────────┬─────────┬─────┐
/// │ PageHeader   │ reserved │ slot 0  │ slot 1  │ ... │
/// │ (9 bytes)    │          │ 8 bytes │ 8 bytes │     │
/// └──────────────┴──────────┴─────────┴─────────┴─────┘
/// 0              9          16        24
/// ```
///
/// # Clone Implementation
/// `Page` does NOT implement `Clone` in production code; copying 4KB should
/// be explicit. A `#[cfg(test)]` Clone is provided for tests.
///
/// # Example
/// ```
/// use gracejoin::{Page, Record};
///
/// let mut page = Page::with_capacity(4);
/// page.append(Record::new(1, 10));
/// page.append(Record::new(2, 20));
/// assert_eq!(page.size(), 2);
/// assert_eq!(page.record_at(1), Record::new(2, 20));
/// assert!(!page.is_full());
/// ```
#[cfg_attr(test, derive(Debug))]
#[repr(align(4096))]
pub struct Page {
    data: [u8; PAGE_SIZE],
}

impl Page {
    /// Create an empty data page using every available slot.
    #[inline]
    pub fn new() -> Self {
        Self::with_capacity(MAX_RECORDS_PER_PAGE)
    }

    /// Create an empty data page with `capacity` record slots.
    ///
    /// # Panics
    /// Panics if `capacity` is outside
    /// `MIN_RECORDS_PER_PAGE..=MAX_RECORDS_PER_PAGE`.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut page = Self {
            data: [0u8; PAGE_SIZE],
        };
        page.format(capacity);
        page
    }

    /// Get immutable slice of page data.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable slice of page data.
    #[inline]
    pub(crate) fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read the page header.
    pub fn header(&self) -> PageHeader {
        PageHeader::from_bytes(&self.data)
    }

    fn set_header(&mut self, header: &PageHeader) {
        header.write_to(&mut self.data);
    }

    /// What this page stores.
    #[inline]
    pub fn page_type(&self) -> PageType {
        PageType::from_u8(self.data[PageHeader::OFFSET_PAGE_TYPE])
    }

    /// Number of entries (records or pairs) on the page.
    #[inline]
    pub fn size(&self) -> usize {
        self.header().entry_count as usize
    }

    /// Configured number of record slots.
    #[inline]
    pub fn slot_capacity(&self) -> usize {
        self.header().capacity as usize
    }

    /// How many entries of the page's current type fit.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slot_capacity() / self.page_type().slots_per_entry()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Check if no further entry of the page's current type fits.
    ///
    /// An empty page is never full.
    #[inline]
    pub fn is_full(&self) -> bool {
        !self.is_empty() && self.size() >= self.capacity()
    }

    /// Record at position `i` of a data page.
    ///
    /// # Panics
    /// Panics if this is not a data page or `i >= size()`.
    pub fn record_at(&self, i: usize) -> Record {
        assert_eq!(self.page_type(), PageType::Data, "not a data page");
        assert!(i < self.size(), "record index {} out of bounds", i);
        Record::from_bytes(&self.data[Self::slot_offset(i)..])
    }

    /// Iterate the records of a data page in storage order.
    pub fn records(&self) -> impl Iterator<Item = Record> + '_ {
        (0..self.size()).map(move |i| self.record_at(i))
    }

    /// Append a record.
    ///
    /// # Panics
    /// Panics if the page is full or already holds join result pairs.
    pub fn append(&mut self, record: Record) {
        let mut header = self.header();
        assert_ne!(header.page_type, PageType::JoinResult, "page holds join pairs");
        let slot = header.entry_count as usize;
        assert!(slot < header.capacity as usize, "page is full");

        record.write_to(&mut self.data[Self::slot_offset(slot)..]);
        header.page_type = PageType::Data;
        header.entry_count += 1;
        self.set_header(&header);
    }

    /// Joined pair at position `i` of a join result page.
    ///
    /// # Panics
    /// Panics if this is not a join result page or `i >= size()`.
    pub fn pair_at(&self, i: usize) -> (Record, Record) {
        assert_eq!(self.page_type(), PageType::JoinResult, "not a join result page");
        assert!(i < self.size(), "pair index {} out of bounds", i);
        let offset = Self::slot_offset(2 * i);
        (
            Record::from_bytes(&self.data[offset..]),
            Record::from_bytes(&self.data[offset + Record::SIZE..]),
        )
    }

    /// Iterate the pairs of a join result page in storage order.
    pub fn pairs(&self) -> impl Iterator<Item = (Record, Record)> + '_ {
        (0..self.size()).map(move |i| self.pair_at(i))
    }

    /// Append a joined output pair, left relation first.
    ///
    /// # Panics
    /// Panics if the page is full or already holds plain records.
    pub fn append_pair(&mut self, left: Record, right: Record) {
        let mut header = self.header();
        if header.entry_count > 0 {
            assert_eq!(header.page_type, PageType::JoinResult, "page holds records");
        }
        let pair = header.entry_count as usize;
        assert!(
            2 * (pair + 1) <= header.capacity as usize,
            "page is full"
        );

        let offset = Self::slot_offset(2 * pair);
        left.write_to(&mut self.data[offset..]);
        right.write_to(&mut self.data[offset + Record::SIZE..]);
        header.page_type = PageType::JoinResult;
        header.entry_count += 1;
        self.set_header(&header);
    }

    /// Clear all entries, keeping the configured capacity.
    pub fn reset(&mut self) {
        let capacity = self.slot_capacity();
        self.format(capacity);
    }

    /// Clear all entries and set a new capacity in record slots.
    ///
    /// # Panics
    /// Panics if `capacity` is outside
    /// `MIN_RECORDS_PER_PAGE..=MAX_RECORDS_PER_PAGE`.
    pub fn format(&mut self, capacity: usize) {
        assert!(
            (MIN_RECORDS_PER_PAGE..=MAX_RECORDS_PER_PAGE).contains(&capacity),
            "invalid page capacity {}",
            capacity
        );
        self.data.fill(0);
        self.set_header(&PageHeader::new(PageType::Data, capacity as u16));
    }

    /// Overwrite this page with the contents of `other`.
    pub fn copy_from(&mut self, other: &Page) {
        self.data.copy_from_slice(&other.data);
    }

    /// Compute and store checksum in the header.
    ///
    /// Call this after all modifications to the page are complete.
    pub fn update_checksum(&mut self) {
        let checksum = PageHeader::compute_checksum(&self.data);
        self.data[PageHeader::OFFSET_CHECKSUM..PageHeader::OFFSET_CHECKSUM + 4]
            .copy_from_slice(&checksum.to_le_bytes());
    }

    /// Verify the page checksum is valid.
    pub fn verify_checksum(&self) -> bool {
        self.header().verify_checksum(&self.data)
    }

    /// Check that the header describes a layout that fits in the page.
    ///
    /// The capacity must be a valid slot count and the stored entries must
    /// fit in it. A page that fails this cannot be read safely.
    pub fn has_valid_layout(&self) -> bool {
        let header = self.header();
        let capacity = header.capacity as usize;
        let used = header.entry_count as usize * header.page_type.slots_per_entry();
        (MIN_RECORDS_PER_PAGE..=MAX_RECORDS_PER_PAGE).contains(&capacity) && used <= capacity
    }

    #[inline]
    fn slot_offset(slot: usize) -> usize {
        PAGE_DATA_OFFSET + slot * Record::SIZE
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new()
    }
}

// Clone only available in tests - forces explicit copying in production
#[cfg(test)]
impl Clone for Page {
    fn clone(&self) -> Self {
        let mut new_page = Page::new();
        new_page.copy_from(self);
        new_page
    }
}

// ============================================================================
// TESTS
// ============================================================================
