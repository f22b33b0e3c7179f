//! Point stream types passed from the decoder to the output encoders

/// One scaled sample position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Points produced by one decode step, separated by channel
///
/// Ownership moves to the consumer; the decoder keeps no reference to it.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBatch {
    /// Retained points per channel, in channel order
    pub channels: Vec<Vec<Point>>,

    /// Frame index at which this block started
    pub start_frame: u64,

    /// Frame index after this block
    pub end_frame: u64,

    /// Total frames declared by the container
    pub total_frames: u64,
}

impl PointBatch {
    /// Whether this block starts the stream
    pub fn is_first(&self) -> bool {
        self.start_frame == 0
    }

    /// Whether this block reaches the end of the declared frames
    pub fn is_last(&self) -> bool {
        self.end_frame >= self.total_frames
    }

    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Total retained points across all channels
    pub fn point_count(&self) -> usize {
        self.channels.iter().map(Vec::len).sum()
    }
}
