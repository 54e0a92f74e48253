//! Frame identifier type.

use std::fmt;

/// Index of a frame in the pool: `frames[frame_id.0]`.
///
/// Join code never builds one directly; it receives them inside the role
/// handles handed out by the frame pool layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameId(pub usize);

impl FrameId {
    #[inline]
    pub fn new(index: usize) -> Self {
        FrameId(index)
    }
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "frame #{}", self.0)
    }
}
