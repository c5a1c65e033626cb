//! Matching utilities for associating detections with live tracks.

use crate::tracker::rect::Rect;

/// Detection input for the tracker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    /// Bounding box in TLWH format (x, y, w, h)
    pub bbox: Rect,
}

impl Detection {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            bbox: Rect::new(x, y, w, h),
        }
    }

    pub fn from_rect(bbox: Rect) -> Self {
        Self { bbox }
    }

    #[inline]
    pub fn center(&self) -> (f32, f32) {
        self.bbox.center()
    }
}

/// Return the id of the first candidate whose box mutually contains the
/// detection, scanning candidates in the order given.
///
/// This is a greedy first-match rule, not an optimal assignment: when two
/// tracks both qualify, the earlier one absorbs the detection.
pub fn first_match<I>(candidates: I, detection: &Detection) -> Option<u64>
where
    I: IntoIterator<Item = (u64, Rect)>,
{
    candidates
        .into_iter()
        .find(|(_, tracked)| tracked.mutually_contains(&detection.bbox))
        .map(|(id, _)| id)
}
