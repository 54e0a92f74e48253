//! Common types and utilities shared across the crate.
//!
//! This module contains fundamental primitives used throughout the codebase:
//! - Configuration constants and [`JoinConfig`]
//! - Error types
//! - Identifiers (PageId, PageRange, FrameId)

pub mod config;
pub mod error;
mod frame_id;
mod page_id;

pub use config::JoinConfig;
pub use error::{Error, ErrorKind, Result};
pub use frame_id::FrameId;
pub use page_id::{PageId, PageRange};
