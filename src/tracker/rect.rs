use serde::{Deserialize, Serialize};

/// Axis-aligned pixel rectangle in TLWH format
/// (Top-Left X, Top-Left Y, Width, Height).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    /// Width of the bounding box
    pub width: f32,
    /// Height of the bounding box
    pub height: f32,
}

impl Rect {
    /// Create a new Rect from top-left coordinates and dimensions (TLWH format).
    #[inline]
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a Rect from TLBR format (top-left x, top-left y, bottom-right x, bottom-right y).
    #[inline]
    pub fn from_tlbr(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x: x1,
            y: y1,
            width: x2 - x1,
            height: y2 - y1,
        }
    }

    /// Convert to TLBR format: (x1, y1, x2, y2).
    #[inline]
    pub fn to_tlbr(&self) -> [f32; 4] {
        [self.x, self.y, self.x + self.width, self.y + self.height]
    }

    /// Convert to TLWH format: (x, y, width, height).
    #[inline]
    pub fn to_tlwh(&self) -> [f32; 4] {
        [self.x, self.y, self.width, self.height]
    }

    /// Get the center point of the bounding box.
    #[inline]
    pub fn center(&self) -> (f32, f32) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether the point lies inside the rectangle, edges included.
    #[inline]
    pub fn contains(&self, (px, py): (f32, f32)) -> bool {
        let [x1, y1, x2, y2] = self.to_tlbr();
        x1 <= px && px <= x2 && y1 <= py && py <= y2
    }

    /// Mutual containment: each box holds the other's center.
    ///
    /// Looser than an IoU gate, it tolerates scale differences between a
    /// detector box and a tracker box around the same object.
    #[inline]
    pub fn mutually_contains(&self, other: &Rect) -> bool {
        self.contains(other.center()) && other.contains(self.center())
    }

    /// A rectangle no tracker can be seeded with: non-finite, or zero or
    /// negative extent.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.to_tlwh().iter().all(|v| v.is_finite()) || self.width <= 0.0 || self.height <= 0.0
    }

    /// The same rectangle moved horizontally to `x`.
    #[inline]
    pub fn with_x(&self, x: f32) -> Self {
        Self { x, ..*self }
    }
}
