//! Frame pool management.
//!
//! The frame pool is the join's entire working memory: a fixed arena of
//! frames, each holding one page.
//!
//! # Components
//! - [`FramePool`] - The arena and its load/flush/reset operations
//! - [`Frame`] - A slot in the pool holding a page
//! - [`InputFrame`] / [`BucketFrame`] / [`OutputFrame`] - Role-typed handles
//! - [`JoinStats`] - I/O and progress statistics

mod frame;
mod frame_handle;
mod frame_pool;
mod stats;

pub use frame::Frame;
pub use frame_handle::{
    BucketFrame, FrameHandle, InputFrame, OutputFrame, PartitionFrames, ProbeFrames,
    WritableFrame,
};
pub use frame_pool::FramePool;
pub use stats::{JoinStats, StatsSnapshot};
