//! Builder for creating Detection objects from detector boxes.

use crate::tracker::{Detection, Rect};

/// Builder for creating `Detection` objects from TLWH detector boxes.
#[derive(Debug, Clone, Default)]
pub struct DetectionBuilder {
    bbox: Rect,
}

impl DetectionBuilder {
    /// Create a new detection builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set bounding box in TLWH format (left, top, width, height).
    pub fn tlwh(mut self, x: f32, y: f32, w: f32, h: f32) -> Self {
        self.bbox = Rect::new(x, y, w, h);
        self
    }

    /// Build the final `Detection`.
    pub fn build(self) -> Detection {
        Detection::from_rect(self.bbox)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detection_builder() {
        let det = DetectionBuilder::new().tlwh(10.0, 20.0, 40.0, 60.0).build();
        assert_eq!(det.bbox, Rect::new(10.0, 20.0, 40.0, 60.0));
        assert_eq!(det.center(), (30.0, 50.0));
    }

    #[test]
    fn test_default_is_empty_box() {
        let det = DetectionBuilder::new().build();
        assert!(det.bbox.is_degenerate());
    }
}
