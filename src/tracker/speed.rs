//! Pixel-displacement speed estimation and the reference-line trigger rules.

use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::tracker::rect::Rect;

/// km/h per m/s.
const MPS_TO_KMH: f32 = 3.6;

/// Calibration and trigger thresholds for speed measurement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SpeedConfig {
    /// Pixels per meter on the reference line.
    pub pixels_per_meter: f32,
    /// Frame rate the displacement is assumed to be sampled at. Never measured.
    pub assumed_fps: f32,
    /// Inclusive pixel-row interval where the previous box top must lie for a
    /// measurement to be taken.
    pub calibration_band: (f32, f32),
    /// Minimum previous-box top row before a set speed is reported.
    pub annotation_min_y: f32,
    /// Speeds strictly above this request a plate capture.
    pub capture_speed_kmh: f32,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        Self {
            pixels_per_meter: 8.8,
            assumed_fps: 18.0,
            calibration_band: (275.0, 285.0),
            annotation_min_y: 180.0,
            capture_speed_kmh: 60.0,
        }
    }
}

impl SpeedConfig {
    #[inline]
    pub fn in_calibration_band(&self, y: f32) -> bool {
        let (lo, hi) = self.calibration_band;
        lo <= y && y <= hi
    }

    #[inline]
    pub fn estimator(&self) -> SpeedEstimator {
        SpeedEstimator::new(self.pixels_per_meter, self.assumed_fps)
    }
}

/// Converts the displacement between two observations one frame apart into km/h.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedEstimator {
    pixels_per_meter: f32,
    fps: f32,
}

impl Default for SpeedEstimator {
    fn default() -> Self {
        SpeedConfig::default().estimator()
    }
}

impl SpeedEstimator {
    pub fn new(pixels_per_meter: f32, fps: f32) -> Self {
        Self {
            pixels_per_meter,
            fps,
        }
    }

    /// Speed in km/h from the Euclidean distance between the top-left anchors.
    ///
    /// No plausibility clamping is applied.
    pub fn estimate(&self, a: &Rect, b: &Rect) -> f32 {
        let pixels = na::distance(&na::Point2::new(a.x, a.y), &na::Point2::new(b.x, b.y));
        let meters = pixels / self.pixels_per_meter;
        meters * self.fps * MPS_TO_KMH
    }
}
