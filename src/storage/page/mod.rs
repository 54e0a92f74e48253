//! Page types and layout.
//!
//! This module contains:
//! - [`Page`] - The 4KB container of records or joined pairs
//! - [`PageHeader`] - Metadata at the start of every page
//! - [`PageType`] - Discriminator for different page formats
//! - [`Record`] - The fixed-width tuple stored in pages

#[allow(clippy::module_inception)]
mod page;
mod page_header;
mod record;

pub use page::Page;
pub use page_header::{PageHeader, PageType};
pub use record::Record;
