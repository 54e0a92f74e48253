//! Capability handles for frames.
//!
//! A handle names one frame of a [`FramePool`](super::FramePool) in one role:
//! - [`InputFrame`] - receives pages streamed from the store; read-only
//! - [`BucketFrame`] - accumulates records for one bucket or hash slot
//! - [`OutputFrame`] - accumulates joined pairs
//!
//! Handles can only be minted by the pool, through a stage layout
//! ([`PartitionFrames`] or [`ProbeFrames`]). They are neither `Clone` nor
//! `Copy`, and only [`WritableFrame`] handles give out mutable pages, so
//! the role of every frame access is checked at compile time.

use crate::common::FrameId;

/// A handle that names a frame.
pub trait FrameHandle {
    /// Frame this handle refers to.
    fn frame_id(&self) -> FrameId;
}

/// A handle through which the frame's page may be mutated in place.
pub trait WritableFrame: FrameHandle {}

/// The frame pages are streamed into from the store.
#[derive(Debug)]
pub struct InputFrame(FrameId);

/// The frame joined pairs are collected in.
#[derive(Debug)]
pub struct OutputFrame(FrameId);

/// A frame owned by one bucket (partition stage) or one hash slot (probe
/// stage).
#[derive(Debug)]
pub struct BucketFrame {
    frame_id: FrameId,
    slot: usize,
}

impl InputFrame {
    pub(crate) fn new(frame_id: FrameId) -> Self {
        Self(frame_id)
    }
}

impl OutputFrame {
    pub(crate) fn new(frame_id: FrameId) -> Self {
        Self(frame_id)
    }
}

impl BucketFrame {
    pub(crate) fn new(frame_id: FrameId, slot: usize) -> Self {
        Self { frame_id, slot }
    }

    /// Bucket or slot index this frame serves.
    #[inline]
    pub fn slot(&self) -> usize {
        self.slot
    }
}

impl FrameHandle for InputFrame {
    #[inline]
    fn frame_id(&self) -> FrameId {
        self.0
    }
}

impl FrameHandle for OutputFrame {
    #[inline]
    fn frame_id(&self) -> FrameId {
        self.0
    }
}

impl FrameHandle for BucketFrame {
    #[inline]
    fn frame_id(&self) -> FrameId {
        self.frame_id
    }
}

impl WritableFrame for OutputFrame {}
impl WritableFrame for BucketFrame {}

/// Frame roles while partitioning: one input frame and `B-1` bucket frames.
#[derive(Debug)]
pub struct PartitionFrames {
    pub input: InputFrame,
    pub buckets: Vec<BucketFrame>,
}

/// Frame roles while probing: one input frame, `B-2` hash table frames and
/// one output frame.
#[derive(Debug)]
pub struct ProbeFrames {
    pub input: InputFrame,
    pub table: Vec<BucketFrame>,
    pub output: OutputFrame,
}

impl PartitionFrames {
    /// Lay out a pool of `pool_size` frames: buckets in `0..B-1`, input last.
    pub(crate) fn new(pool_size: usize) -> Self {
        let last = pool_size - 1;
        Self {
            input: InputFrame::new(FrameId::new(last)),
            buckets: (0..last)
                .map(|slot| BucketFrame::new(FrameId::new(slot), slot))
                .collect(),
        }
    }
}

impl ProbeFrames {
    /// Lay out a pool of `pool_size` frames: input first, table in
    /// `1..B-1`, output last.
    pub(crate) fn new(pool_size: usize) -> Self {
        let last = pool_size - 1;
        Self {
            input: InputFrame::new(FrameId::new(0)),
            table: (1..last)
                .map(|frame| BucketFrame::new(FrameId::new(frame), frame - 1))
                .collect(),
            output: OutputFrame::new(FrameId::new(last)),
        }
    }
}
