//! Loading relations into the store and reading results back.
//!
//! These helpers talk to the [`DiskManager`] directly and do not use the
//! frame pool; they sit outside the join's memory budget.

use crate::common::{PageId, PageRange, Result};
use crate::storage::page::{Page, Record};
use crate::storage::DiskManager;

/// Write `records` as a contiguous run of data pages.
///
/// Every page except possibly the last holds exactly `records_per_page`
/// records. An empty slice writes nothing and returns an empty range at the
/// end of the store.
///
/// # Panics
/// Panics if `records_per_page` is not a valid page capacity.
///
/// # Errors
/// Propagates store write failures.
pub fn write_relation(
    store: &mut DiskManager,
    records: &[Record],
    records_per_page: usize,
) -> Result<PageRange> {
    let first = PageId::new(store.page_count());
    let mut page = Page::with_capacity(records_per_page);

    for chunk in records.chunks(records_per_page) {
        page.reset();
        for &record in chunk {
            page.append(record);
        }
        store.append_page(&mut page)?;
    }

    Ok(PageRange::new(first, PageId::new(store.page_count())))
}

/// Read every record stored on `page_ids`, in list order.
pub fn read_records(store: &mut DiskManager, page_ids: &[PageId]) -> Result<Vec<Record>> {
    let mut records = Vec::new();
    for &page_id in page_ids {
        records.extend(store.read_page(page_id)?.records());
    }
    Ok(records)
}

/// Read every joined pair stored on `page_ids`, in list order.
pub fn read_pairs(store: &mut DiskManager, page_ids: &[PageId]) -> Result<Vec<(Record, Record)>> {
    let mut pairs = Vec::new();
    for &page_id in page_ids {
        pairs.extend(store.read_page(page_id)?.pairs());
    }
    Ok(pairs)
}
