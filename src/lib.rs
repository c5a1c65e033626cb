//! Vehicle tracking and reference-line speed estimation for fixed traffic
//! cameras.
//!
//! Frames flow through a [`FrameProcessor`]: every live [`Track`] is advanced
//! by its own single-object tracker, a [`DetectionSource`] is sampled every
//! few frames to pick up new vehicles, and vehicles crossing the calibration
//! line get a one-shot speed reading. Fast ones produce a
//! [`PlateCaptureRequest`] that a [`PlateRecorder`] turns into a stored record.

pub mod config;
pub mod error;
pub mod frame;
pub mod integration;
pub mod tracker;

pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use frame::Frame;
pub use integration::*;
pub use tracker::*;
