//! Decoded video frame.

use ndarray::{Array3, ArrayView3, Axis, s};

use crate::tracker::Rect;

/// Outline colour for tracked boxes (BGR).
pub const TRACK_BOX_COLOR: [u8; 3] = [0, 255, 255];
pub const TRACK_BOX_THICKNESS: usize = 4;

/// A decoded frame in height x width x channels layout.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    image: Array3<u8>,
}

impl Frame {
    pub fn new(image: Array3<u8>) -> Self {
        Self { image }
    }

    /// All-black three channel frame.
    pub fn blank(width: usize, height: usize) -> Self {
        Self::new(Array3::zeros((height, width, 3)))
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.image.dim().1
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.image.dim().0
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.image.dim().2
    }

    #[inline]
    pub fn image(&self) -> &Array3<u8> {
        &self.image
    }

    pub fn into_image(self) -> Array3<u8> {
        self.image
    }

    /// Pixel bounds of `rect` clipped to the frame, as (rows, cols).
    fn clip(&self, rect: &Rect) -> ((usize, usize), (usize, usize)) {
        let [x1, y1, x2, y2] = rect.to_tlbr();
        // float-to-int casts saturate and map NaN to 0
        let col = |v: f32| (v.max(0.0) as usize).min(self.width());
        let row = |v: f32| (v.max(0.0) as usize).min(self.height());
        let (c0, r0) = (col(x1), row(y1));
        ((r0, row(y2).max(r0)), (c0, col(x2).max(c0)))
    }

    /// View of the pixels under `rect`, clipped to the frame. May be empty.
    pub fn crop(&self, rect: &Rect) -> ArrayView3<'_, u8> {
        let ((r0, r1), (c0, c1)) = self.clip(rect);
        self.image.slice(s![r0..r1, c0..c1, ..])
    }

    /// Draw the outline of `rect`, `thickness` pixels wide, inside its bounds.
    pub fn draw_rect(&mut self, rect: &Rect, color: &[u8], thickness: usize) {
        let ((r0, r1), (c0, c1)) = self.clip(rect);
        if r0 == r1 || c0 == c1 {
            return;
        }
        let t = thickness.max(1);
        let top = r0..(r0 + t).min(r1);
        let bottom = r1.saturating_sub(t).max(r0)..r1;
        let left = c0..(c0 + t).min(c1);
        let right = c1.saturating_sub(t).max(c0)..c1;

        self.fill(top, c0..c1, color);
        self.fill(bottom, c0..c1, color);
        self.fill(r0..r1, left, color);
        self.fill(r0..r1, right, color);
    }

    fn fill(&mut self, rows: std::ops::Range<usize>, cols: std::ops::Range<usize>, color: &[u8]) {
        let mut region = self.image.slice_mut(s![rows, cols, ..]);
        for mut px in region.lanes_mut(Axis(2)) {
            for (v, c) in px.iter_mut().zip(color) {
                *v = *c;
            }
        }
    }
}

impl From<Array3<u8>> for Frame {
    fn from(image: Array3<u8>) -> Self {
        Self::new(image)
    }
}
