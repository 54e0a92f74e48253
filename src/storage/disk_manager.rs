//! Disk Manager - the append-oriented block store.
//!
//! The [`DiskManager`] handles all direct file operations:
//! - Appending pages (each append yields a fresh [`PageId`])
//! - Reading pages back, with checksum verification
//! - Validating relation page ranges

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;

use log::trace;

use crate::common::config::PAGE_SIZE;
use crate::common::{Error, PageId, PageRange, Result};
use crate::storage::page::Page;

/// Append-oriented page store backed by a single file.
///
/// # File Layout
/// Pages are laid out sequentially:
/// ```text
/// ┌─────────┬─────────┬─────────┬─────────┬─────────┐
/// │ Page 0  │ Page 1  │ Page 2  │  ...    │ Page N  │
/// │ (4KB)   │ (4KB)   │ (4KB)   │         │ (4KB)   │
/// └─────────┴─────────┴─────────┴─────────┴─────────┘
/// Offset:  0      4096     8192    ...    N×4096
/// ```
///
/// Page N is located at file offset `N × PAGE_SIZE`. Pages are never
/// rewritten: relations, partition spills and join results are all appended.
///
/// # Durability
/// Appends are not synced individually; spill pages are scratch data for a
/// single join. Call [`sync`](Self::sync) when the contents must survive a
/// crash.
pub struct DiskManager {
    file: File,
    /// Number of pages in the file.
    page_count: u32,
}

impl DiskManager {
    /// Create a new store file.
    ///
    /// # Errors
    /// Returns an error if the file already exists or cannot be created.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(path)?;

        Ok(Self {
            file,
            page_count: 0,
        })
    }

    /// Open an existing store file.
    ///
    /// # Errors
    /// Returns an error if the file doesn't exist or cannot be opened.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = OpenOptions::new().read(true).write(true).open(&path)?;

        // A torn trailing page is ignored
        let file_size = file.metadata()?.len();
        let page_count = (file_size / PAGE_SIZE as u64) as u32;

        Ok(Self { file, page_count })
    }

    /// Open an existing store file, or create if it doesn't exist.
    pub fn open_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::open(path)
        } else {
            Self::create(path)
        }
    }

    /// Read a page from the store.
    ///
    /// # Errors
    /// - `Error::PageOutOfRange` if the page doesn't exist
    /// - `Error::CorruptPage` if the stored checksum doesn't match or the
    ///   header describes more slots than the page holds
    pub fn read_page(&mut self, page_id: PageId) -> Result<Page> {
        if page_id.0 >= self.page_count {
            return Err(Error::PageOutOfRange {
                page_id: page_id.0,
                page_count: self.page_count,
            });
        }

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;

        let mut page = Page::new();
        self.file.read_exact(page.as_mut_slice())?;

        if !page.verify_checksum() || !page.has_valid_layout() {
            return Err(Error::CorruptPage(page_id.0));
        }

        Ok(page)
    }

    /// Append a page at the end of the store.
    ///
    /// Stamps the page checksum before writing and returns the id of the
    /// newly written page.
    ///
    /// # Errors
    /// - `Error::StoreFull` if no page id is left to hand out
    /// - I/O errors from the write
    pub fn append_page(&mut self, page: &mut Page) -> Result<PageId> {
        let page_id = PageId::new(self.page_count);
        if !page_id.is_valid() {
            return Err(Error::StoreFull);
        }

        page.update_checksum();

        let offset = (page_id.0 as u64) * (PAGE_SIZE as u64);
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(page.as_slice())?;

        self.page_count += 1;
        trace!("appended {} ({} entries)", page_id, page.size());
        Ok(page_id)
    }

    /// Check that every page of `range` exists.
    ///
    /// An empty range (`first == last`) names no pages and always passes,
    /// wherever it starts.
    ///
    /// # Errors
    /// Returns `Error::RangeOutOfBounds` if the range is reversed or runs
    /// past the last page.
    pub fn check_range(&self, range: PageRange) -> Result<()> {
        if range.first == range.last {
            return Ok(());
        }
        if range.first > range.last || range.last.0 > self.page_count {
            return Err(Error::RangeOutOfBounds {
                first: range.first.0,
                last: range.last.0,
                page_count: self.page_count,
            });
        }
        Ok(())
    }

    /// Flush all appended pages to durable storage.
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }

    /// Get the number of pages in the store.
    #[inline]
    pub fn page_count(&self) -> u32 {
        self.page_count
    }

    /// Get the total size of the store file in bytes.
    #[inline]
    pub fn file_size(&self) -> u64 {
        (self.page_count as u64) * (PAGE_SIZE as u64)
    }
}
