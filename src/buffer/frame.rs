//! Frame - a slot in the frame pool.
//!
//! A [`Frame`] holds a [`Page`] plus the id of the stored page it was last
//! loaded from, if any. Frames accumulating new records (bucket and output
//! frames) have no source page.

use crate::common::PageId;
use crate::storage::page::Page;

/// A frame in the frame pool.
///
/// The pool has a fixed number of frames allocated at startup. A frame has
/// no role of its own: the handle used to reach it decides whether it is
/// streaming input, accumulating a bucket, or collecting output.
pub struct Frame {
    /// The page data.
    page: Page,

    /// Stored page currently loaded, or None if the frame holds new data.
    source: Option<PageId>,
}

impl Frame {
    /// Create a new empty frame whose page has `capacity` record slots.
    pub fn new(capacity: usize) -> Self {
        Self {
            page: Page::with_capacity(capacity),
            source: None,
        }
    }

    #[inline]
    pub fn page(&self) -> &Page {
        &self.page
    }

    #[inline]
    pub(crate) fn page_mut(&mut self) -> &mut Page {
        &mut self.page
    }

    /// Stored page currently loaded into this frame.
    #[inline]
    pub fn source(&self) -> Option<PageId> {
        self.source
    }

    /// Replace the frame's contents with a page read from the store.
    pub(crate) fn load(&mut self, page_id: PageId, page: &Page) {
        self.page.copy_from(page);
        self.source = Some(page_id);
    }

    /// Clear the frame and size its page to `capacity` record slots.
    pub(crate) fn reset(&mut self, capacity: usize) {
        self.page.format(capacity);
        self.source = None;
    }
}
