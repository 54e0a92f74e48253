//! Storage layer - block store and page formats.
//!
//! This module handles persistent storage:
//! - [`DiskManager`] - Append-oriented page file
//! - [`page`] - Page, header and record layouts
//! - [`relation`] - Writing relations and reading results

mod disk_manager;
pub mod page;
pub mod relation;

pub use disk_manager::DiskManager;
