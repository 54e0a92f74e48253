//! Page identifier and page range types.

use std::fmt;

/// Identifies a page in the block store.
///
/// Using `u32` allows for 4 billion pages. Page ids are handed out by the
/// store in append order, so a relation written in one go occupies a
/// contiguous [`PageRange`].
///
/// # Example
/// ```
/// use gracejoin::PageId;
///
/// let page_id = PageId::new(42);
/// assert!(page_id.is_valid());
/// assert_eq!(page_id.0, 42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Invalid/sentinel page ID.
    ///
    /// The store never hands this id out.
    pub const INVALID: PageId = PageId(u32::MAX);

    /// Create a new PageId.
    #[inline]
    pub fn new(id: u32) -> Self {
        PageId(id)
    }

    /// Check if this page ID is valid (not the sentinel value).
    #[inline]
    pub fn is_valid(&self) -> bool {
        *self != Self::INVALID
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if *self == Self::INVALID {
            write!(f, "Page(INVALID)")
        } else {
            write!(f, "Page({})", self.0)
        }
    }
}

/// A half-open range `[first, last)` of page ids holding one relation.
///
/// # Example
/// ```
/// use gracejoin::{PageId, PageRange};
///
/// let range = PageRange::new(PageId::new(3), PageId::new(6));
/// assert_eq!(range.len(), 3);
/// let ids: Vec<PageId> = range.iter().collect();
/// assert_eq!(ids, vec![PageId::new(3), PageId::new(4), PageId::new(5)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    /// First page of the relation.
    pub first: PageId,
    /// One past the last page of the relation.
    pub last: PageId,
}

impl PageRange {
    /// Create a range from `first` (inclusive) to `last` (exclusive).
    #[inline]
    pub fn new(first: PageId, last: PageId) -> Self {
        Self { first, last }
    }

    /// An empty range.
    #[inline]
    pub fn empty() -> Self {
        Self::new(PageId::new(0), PageId::new(0))
    }

    /// Number of pages in the range. Reversed ranges are empty.
    #[inline]
    pub fn len(&self) -> usize {
        self.last.0.saturating_sub(self.first.0) as usize
    }

    /// Check if the range covers no pages.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the page ids in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = PageId> {
        (self.first.0..self.last.0).map(PageId::new)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.first.0, self.last.0)
    }
}
