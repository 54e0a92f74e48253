//! Page header and type definitions.
//!
//! Every page starts with a [`PageHeader`] containing metadata:
//! - [`PageType`] discriminator
//! - CRC32 checksum for integrity
//! - number of entries stored and the page's capacity in record slots

/// Type of page stored on disk.
///
/// Uses `#[repr(u8)]` to guarantee a 1-byte representation for serialization.
#[repr(u8)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PageType {
    /// Uninitialized or corrupted page.
    #[default]
    Invalid = 0,
    /// Page of relation records (input relations and partition spills).
    Data = 1,
    /// Page of joined `(left, right)` record pairs.
    JoinResult = 2,
}

impl PageType {
    /// Convert from u8, returning Invalid for unknown values.
    pub fn from_u8(value: u8) -> Self {
        match value {
            1 => PageType::Data,
            2 => PageType::JoinResult,
            _ => PageType::Invalid,
        }
    }

    /// Number of record slots one entry of this page type occupies.
    #[inline]
    pub fn slots_per_entry(self) -> usize {
        match self {
            PageType::JoinResult => 2,
            _ => 1,
        }
    }
}

/// Metadata stored at the beginning of every page.
///
/// # Layout (9 bytes)
/// ```text
/// Offset  Size  Field
/// ------  ----  -----
/// 0       1     page_type (PageType as u8)
/// 1       4     checksum (CRC32, little-endian)
/// 5       2     entry_count (little-endian)
/// 7       2     capacity in record slots (little-endian)
/// ```
///
/// # Checksum
/// The checksum is computed over the entire page with the checksum field
/// itself set to zero. This allows verification without special handling.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PageHeader {
    /// Type of this page.
    pub page_type: PageType,
    /// CRC32 checksum of the page contents.
    pub checksum: u32,
    /// Records (data pages) or pairs (result pages) stored.
    pub entry_count: u16,
    /// Usable record slots.
    pub capacity: u16,
}

impl PageHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 9;

    /// Offset of each field within the header.
    pub const OFFSET_PAGE_TYPE: usize = 0;
    pub const OFFSET_CHECKSUM: usize = 1;
    pub const OFFSET_ENTRY_COUNT: usize = 5;
    pub const OFFSET_CAPACITY: usize = 7;

    /// Create a header for an empty page of the given type and capacity.
    pub fn new(page_type: PageType, capacity: u16) -> Self {
        Self {
            page_type,
            checksum: 0,
            entry_count: 0,
            capacity,
        }
    }

    /// Read a header from the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < PageHeader::SIZE`.
    pub fn from_bytes(data: &[u8]) -> Self {
        assert!(data.len() >= Self::SIZE, "buffer too small for PageHeader");

        let page_type = PageType::from_u8(data[Self::OFFSET_PAGE_TYPE]);

        let checksum = u32::from_le_bytes([
            data[Self::OFFSET_CHECKSUM],
            data[Self::OFFSET_CHECKSUM + 1],
            data[Self::OFFSET_CHECKSUM + 2],
            data[Self::OFFSET_CHECKSUM + 3],
        ]);

        let entry_count = u16::from_le_bytes([
            data[Self::OFFSET_ENTRY_COUNT],
            data[Self::OFFSET_ENTRY_COUNT + 1],
        ]);

        let capacity =
            u16::from_le_bytes([data[Self::OFFSET_CAPACITY], data[Self::OFFSET_CAPACITY + 1]]);

        Self {
            page_type,
            checksum,
            entry_count,
            capacity,
        }
    }

    /// Write this header to the beginning of a byte slice.
    ///
    /// # Panics
    /// Panics if `data.len() < PageHeader::SIZE`.
    pub fn write_to(&self, data: &mut [u8]) {
        assert!(data.len() >= Self::SIZE, "buffer too small for PageHeader");

        data[Self::OFFSET_PAGE_TYPE] = self.page_type as u8;
        data[Self::OFFSET_CHECKSUM..Self::OFFSET_CHECKSUM + 4]
            .copy_from_slice(&self.checksum.to_le_bytes());
        data[Self::OFFSET_ENTRY_COUNT..Self::OFFSET_ENTRY_COUNT + 2]
            .copy_from_slice(&self.entry_count.to_le_bytes());
        data[Self::OFFSET_CAPACITY..Self::OFFSET_CAPACITY + 2]
            .copy_from_slice(&self.capacity.to_le_bytes());
    }

    /// Compute CRC32 checksum of a page.
    ///
    /// The checksum field (bytes 1-4) is fed as zeros, so the checksum
    /// doesn't include itself.
    pub fn compute_checksum(page_data: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&page_data[..Self::OFFSET_CHECKSUM]);
        hasher.update(&[0u8; 4]);
        hasher.update(&page_data[Self::OFFSET_CHECKSUM + 4..]);
        hasher.finalize()
    }

    /// Verify that the stored checksum matches the computed checksum.
    pub fn verify_checksum(&self, page_data: &[u8]) -> bool {
        self.checksum == Self::compute_checksum(page_data)
    }
}

// ============================================================================
// TESTS
// ============================================================================
