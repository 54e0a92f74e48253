//! Error types for the join.

use thiserror::Error;

use crate::storage::page::PageType;

/// Convenient Result type alias.
///
/// Instead of writing `Result<T, Error>` everywhere, we can write `Result<T>`.
pub type Result<T> = std::result::Result<T, Error>;

/// All possible errors raised by the store, the frame pool and the join.
///
/// None of these are retried. A join that hits any of them is aborted and
/// the error is handed to the caller unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error from the block store file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored page failed checksum verification on read.
    #[error("Page {0} failed checksum verification")]
    CorruptPage(u32),

    /// The store cannot address any more pages.
    #[error("Block store is full")]
    StoreFull,

    /// Requested page does not exist in the store.
    #[error("Page {page_id} out of range (store holds {page_count} pages)")]
    PageOutOfRange { page_id: u32, page_count: u32 },

    /// A relation range is reversed or extends past the end of the store.
    #[error("Page range [{first}, {last}) out of bounds (store holds {page_count} pages)")]
    RangeOutOfBounds {
        first: u32,
        last: u32,
        page_count: u32,
    },

    /// A page in a relation range does not hold records.
    #[error("Page {page_id} has type {found:?}, expected a data page")]
    UnexpectedPageType { page_id: u32, found: PageType },

    /// A build side does not fit in the probe stage's hash table frames.
    ///
    /// `required` and `available` are in records. The join assumes one
    /// partitioning pass is enough; when it is not, this is reported instead
    /// of overwriting hash table frames.
    #[error(
        "Bucket {bucket} needs room for {required} build records but only {available} fit"
    )]
    CapacityExceeded {
        bucket: usize,
        required: usize,
        available: usize,
    },

    /// The join was configured with an unusable memory budget.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The build side of some bucket overflowed its frames.
    CapacityExceeded,
    /// A page id or page range lies outside the store.
    OutOfRange,
    /// The store failed a read or a write.
    StoreIo,
    /// The caller supplied something the join cannot use.
    InvalidInput,
}

impl Error {
    /// Which class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::CapacityExceeded { .. } => ErrorKind::CapacityExceeded,
            Error::PageOutOfRange { .. } | Error::RangeOutOfBounds { .. } => ErrorKind::OutOfRange,
            Error::Io(_) | Error::CorruptPage(_) | Error::StoreFull => ErrorKind::StoreIo,
            Error::UnexpectedPageType { .. } | Error::InvalidConfig(_) => ErrorKind::InvalidInput,
        }
    }
}
