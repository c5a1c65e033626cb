//! Integration module for connecting external collaborators to the tracking core.
//!
//! This module provides the detector seam, plate recognition and storage
//! seams, and the `FrameProcessor` that drives a video stream through the
//! track registry.

mod builder;
mod detector;
mod pipeline;
mod plate;

pub use builder::DetectionBuilder;
pub use detector::{DetectionSource, IntoDetections};
pub use pipeline::{FrameOutput, FrameProcessor, RunSummary};
pub use plate::{CaptureOutcome, PlateMemo, PlateReader, PlateRecord, PlateRecorder, PlateStore};
