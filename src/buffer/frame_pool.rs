//! Frame Pool - the join's fixed memory budget.
//!
//! The [`FramePool`] provides:
//! - A fixed arena of `B` frames, allocated once
//! - Stage layouts that hand out role-typed frame handles
//! - Load, flush and reset of individual frames

use log::trace;

use crate::buffer::frame_handle::{
    FrameHandle, InputFrame, PartitionFrames, ProbeFrames, WritableFrame,
};
use crate::buffer::{Frame, JoinStats};
use crate::common::{FrameId, JoinConfig, PageId, Result};
use crate::storage::page::Page;
use crate::storage::DiskManager;

/// A fixed-size arena of frames, each holding one page.
///
/// # Architecture
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │                        FramePool                         │
/// │  frames: Vec<Frame>   [F0] [F1] [F2] ... [F(B-1)]        │
/// │                                                          │
/// │  partition: [bucket 0 .. bucket B-2]        [input]      │
/// │  probe:     [input] [slot 0 .. slot B-3]    [output]     │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// Frames are reached through handles from [`partition_frames`] or
/// [`probe_frames`]; [`frame_at`] gives positional read access for
/// inspection.
///
/// # Thread Safety
/// The pool is single-threaded. Every operation that changes a frame takes
/// `&mut self`.
///
/// [`partition_frames`]: FramePool::partition_frames
/// [`probe_frames`]: FramePool::probe_frames
/// [`frame_at`]: FramePool::frame_at
pub struct FramePool {
    /// Fixed pool of frames.
    frames: Vec<Frame>,

    /// Record slots given to every frame on reset.
    records_per_page: usize,

    /// I/O and progress statistics.
    stats: JoinStats,
}

impl FramePool {
    /// Create a pool with `config.pool_frames` empty frames.
    ///
    /// # Errors
    /// Returns `Error::InvalidConfig` if the config fails validation.
    pub fn new(config: &JoinConfig) -> Result<Self> {
        config.validate()?;

        let frames = (0..config.pool_frames)
            .map(|_| Frame::new(config.records_per_page))
            .collect();

        Ok(Self {
            frames,
            records_per_page: config.records_per_page,
            stats: JoinStats::new(),
        })
    }

    // ========================================================================
    // Layouts
    // ========================================================================

    /// Frame roles for the partition stage.
    pub fn partition_frames(&self) -> PartitionFrames {
        PartitionFrames::new(self.frames.len())
    }

    /// Frame roles for the probe stage.
    pub fn probe_frames(&self) -> ProbeFrames {
        ProbeFrames::new(self.frames.len())
    }

    // ========================================================================
    // Frame I/O
    // ========================================================================

    /// Replace the input frame's contents with a stored page.
    ///
    /// # Errors
    /// Propagates store read failures; the frame is left untouched.
    pub fn load(&mut self, store: &mut DiskManager, page_id: PageId, input: &InputFrame) -> Result<()> {
        let page = store.read_page(page_id)?;
        self.frames[input.frame_id().0].load(page_id, &page);

        JoinStats::add(&self.stats.pages_read, 1);
        Ok(())
    }

    /// Persist a frame's page as a new stored page, then clear the frame.
    ///
    /// Returns the id of the new page.
    ///
    /// # Errors
    /// Propagates store write failures; the frame keeps its contents.
    pub fn flush<H: WritableFrame>(&mut self, store: &mut DiskManager, handle: &H) -> Result<PageId> {
        let frame_id = handle.frame_id();
        let page_id = store.append_page(self.frames[frame_id.0].page_mut())?;
        self.frames[frame_id.0].reset(self.records_per_page);

        JoinStats::add(&self.stats.pages_written, 1);
        trace!("flushed {} to {}", frame_id, page_id);
        Ok(page_id)
    }

    /// Clear a frame without persisting it.
    pub fn reset<H: FrameHandle>(&mut self, handle: &H) {
        self.frames[handle.frame_id().0].reset(self.records_per_page);
    }

    // ========================================================================
    // Page access
    // ========================================================================

    /// Page held by a frame.
    #[inline]
    pub fn page<H: FrameHandle>(&self, handle: &H) -> &Page {
        self.frames[handle.frame_id().0].page()
    }

    /// Mutable page held by a writable frame.
    #[inline]
    pub fn page_mut<H: WritableFrame>(&mut self, handle: &H) -> &mut Page {
        self.frames[handle.frame_id().0].page_mut()
    }

    /// Positional read access to any frame.
    pub fn frame_at(&self, frame_id: FrameId) -> Option<&Frame> {
        self.frames.get(frame_id.0)
    }

    // ========================================================================
    // Info
    // ========================================================================

    /// Number of frames (`B`).
    #[inline]
    pub fn pool_size(&self) -> usize {
        self.frames.len()
    }

    /// Record slots per page for pages this pool writes.
    #[inline]
    pub fn records_per_page(&self) -> usize {
        self.records_per_page
    }

    /// Get pool statistics.
    pub fn stats(&self) -> &JoinStats {
        &self.stats
    }
}
