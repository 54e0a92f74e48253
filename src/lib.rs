//! gracejoin - a bounded-memory partitioned (Grace) hash join.
//!
//! Two relations stored as pages on a block store are equi-joined using a
//! fixed number `B` of in-memory frames.
//!
//! # Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                           gracejoin                             │
//! ├─────────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │              Execution Layer (execution/)                │   │
//! │  │      partition → Vec<Bucket> → probe → result pages      │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Frame Pool (buffer/)  [B frames]               │   │
//! │  │   FramePool + Frame + Input/Bucket/Output handles        │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! │                              ↓                                  │
//! │  ┌─────────────────────────────────────────────────────────┐   │
//! │  │           Storage Layer (storage/)                       │   │
//! │  │     DiskManager + Page + PageHeader + Record             │   │
//! │  └─────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//! - [`common`] - Shared primitives (PageId, FrameId, Error, config)
//! - [`buffer`] - The frame pool and statistics
//! - [`storage`] - Block store, page formats and relation helpers
//! - [`execution`] - Partition and probe stages
//!
//! # Quick Start
//! ```no_run
//! use gracejoin::storage::relation::{read_pairs, write_relation};
//! use gracejoin::{hash_join, DiskManager, FramePool, JoinConfig, Record};
//!
//! let config = JoinConfig::new(8, 64);
//! let mut store = DiskManager::create("join.db").unwrap();
//! let mut pool = FramePool::new(&config).unwrap();
//!
//! let left: Vec<Record> = (0..100).map(|k| Record::new(k, k)).collect();
//! let right: Vec<Record> = (50..150).map(|k| Record::new(k, k * 2)).collect();
//! let left_range = write_relation(&mut store, &left, config.records_per_page).unwrap();
//! let right_range = write_relation(&mut store, &right, config.records_per_page).unwrap();
//!
//! let output = hash_join(&mut store, &mut pool, left_range, right_range).unwrap();
//! let pairs = read_pairs(&mut store, &output).unwrap();
//! assert_eq!(pairs.len(), 50);
//! ```

pub mod buffer;
pub mod common;
pub mod execution;
pub mod storage;

// Re-export commonly used items at crate root for convenience
pub use common::config::PAGE_SIZE;
pub use common::{Error, ErrorKind, FrameId, JoinConfig, PageId, PageRange, Result};

pub use buffer::{FramePool, JoinStats, StatsSnapshot};
pub use execution::{hash_join, partition, probe, Bucket, Side};
pub use storage::page::{Page, PageHeader, PageType, Record};
pub use storage::DiskManager;
