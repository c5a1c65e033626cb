//! Seam to the single-object visual tracker primitive (correlation, KCF, CSRT, ...).

use crate::frame::Frame;
use crate::tracker::rect::Rect;

/// Result of advancing a single-object tracker by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackerUpdate {
    /// Region the tracker now reports for its object.
    pub region: Rect,
    /// Confidence that the region still matches the object.
    pub quality: f32,
}

/// A single-object tracker instance bound to one object.
///
/// Each instance is owned by exactly one track and dropped with it.
pub trait ObjectTracker {
    /// Error type for update failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Advance the tracker onto `frame`.
    fn update(&mut self, frame: &Frame) -> Result<TrackerUpdate, Self::Error>;

    /// Region last reported by the tracker.
    fn position(&self) -> Rect;
}

/// Creates tracker instances seeded on a region of a frame.
pub trait TrackerFactory {
    type Tracker: ObjectTracker;

    /// Error type for start failures.
    type Error: std::error::Error + Send + Sync + 'static;

    fn start(&mut self, frame: &Frame, region: Rect) -> Result<Self::Tracker, Self::Error>;
}
