//! Trait for object detection backends.

use crate::frame::Frame;
use crate::integration::DetectionBuilder;
use crate::tracker::{Detection, Rect};

/// Trait for object detection backends (cascade classifiers, YOLO, ...).
///
/// Implement this trait to connect any vehicle detector to the frame processor.
///
/// # Example
///
/// ```ignore
/// use speedtrack_rs::{DetectionSource, Frame};
///
/// struct CascadeDetector {
///     // Your classifier here
/// }
///
/// impl DetectionSource for CascadeDetector {
///     type Output = Vec<[f32; 4]>;
///     type Error = std::io::Error;
///
///     fn detect(&mut self, frame: &Frame) -> Result<Self::Output, Self::Error> {
///         // Run the classifier and return (x, y, w, h) boxes
///         Ok(vec![])
///     }
/// }
/// ```
pub trait DetectionSource {
    /// Raw detector output, converted with [`IntoDetections`].
    type Output: IntoDetections;

    /// Error type for detection failures.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Propose candidate boxes on `frame`. No ordering is assumed.
    fn detect(&mut self, frame: &Frame) -> Result<Self::Output, Self::Error>;
}

/// Helper trait for converting detector-specific outputs to `Detection`.
pub trait IntoDetections {
    /// Convert the output into a vector of detections.
    fn into_detections(self) -> Vec<Detection>;
}

impl IntoDetections for Vec<Detection> {
    fn into_detections(self) -> Vec<Detection> {
        self
    }
}

impl IntoDetections for Vec<Rect> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter().map(Detection::from_rect).collect()
    }
}

/// Boxes in TLWH order, as cascade classifiers report them.
impl IntoDetections for Vec<[f32; 4]> {
    fn into_detections(self) -> Vec<Detection> {
        self.into_iter()
            .map(|[x, y, w, h]| DetectionBuilder::new().tlwh(x, y, w, h).build())
            .collect()
    }
}
