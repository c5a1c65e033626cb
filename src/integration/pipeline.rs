//! FrameProcessor: per-frame orchestration of tracking, periodic detection,
//! speed measurement and plate-capture requests.

use std::ops::ControlFlow;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::Error;
use crate::frame::{Frame, TRACK_BOX_COLOR, TRACK_BOX_THICKNESS};
use crate::integration::plate::{CaptureOutcome, PlateReader, PlateRecorder, PlateStore};
use crate::tracker::{
    Association, PlateCaptureRequest, Rect, SpeedAnnotation, SpeedConfig, TrackRegistry,
    TrackerFactory,
};

use super::{DetectionSource, IntoDetections};

/// Everything one frame produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameOutput {
    /// 1-based index of the frame in the stream.
    pub frame_index: u64,
    /// Tracks evicted by this frame's tracker updates.
    pub evicted: Vec<u64>,
    /// Set on sampled frames whose detector call succeeded.
    pub association: Option<Association>,
    /// Live track boxes after the frame, in id order.
    pub boxes: Vec<(u64, Rect)>,
    pub annotations: Vec<SpeedAnnotation>,
    pub captures: Vec<PlateCaptureRequest>,
}

impl FrameOutput {
    /// Copy of `frame` with every live track box outlined.
    pub fn annotate(&self, frame: &Frame) -> Frame {
        let mut out = frame.clone();
        for (_, rect) in &self.boxes {
            out.draw_rect(rect, &TRACK_BOX_COLOR, TRACK_BOX_THICKNESS);
        }
        out
    }
}

/// Totals for a completed run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub frames: u64,
    pub tracks_created: u64,
    pub plates_recorded: u64,
    /// Processing rate actually achieved. Reported only; speed estimation
    /// always uses the configured assumed frame rate.
    pub measured_fps: f64,
}

/// Combines a vehicle detector, a track registry and the speed rules.
pub struct FrameProcessor<D: DetectionSource, F: TrackerFactory> {
    detector: D,
    registry: TrackRegistry<F>,
    speed: SpeedConfig,
    frame_index: u64,
}

impl<D: DetectionSource, F: TrackerFactory> FrameProcessor<D, F> {
    pub fn new(detector: D, factory: F, config: PipelineConfig) -> Self {
        Self {
            detector,
            registry: TrackRegistry::new(factory, config.tracker),
            speed: config.speed,
            frame_index: 0,
        }
    }

    pub fn with_default_config(detector: D, factory: F) -> Self {
        Self::new(detector, factory, PipelineConfig::default())
    }

    /// Process a single frame.
    ///
    /// Trackers are updated and evicted first; detection and association run
    /// only when the frame index is a multiple of the detection interval; the
    /// speed, annotation and capture triggers then run for every live track.
    pub fn process_frame(&mut self, frame: &Frame) -> FrameOutput {
        self.frame_index += 1;
        let mut output = FrameOutput {
            frame_index: self.frame_index,
            ..Default::default()
        };

        output.evicted = self.registry.update_all(frame);

        let interval = self.registry.config().detection_interval.max(1);
        if self.frame_index % interval == 0 {
            match self.detector.detect(frame) {
                Ok(raw) => {
                    let detections = raw.into_detections();
                    let association = self.registry.associate(&detections, frame);
                    debug!(
                        frame = self.frame_index,
                        detections = detections.len(),
                        matched = association.matched.len(),
                        created = association.created.len(),
                        "association pass"
                    );
                    output.association = Some(association);
                }
                Err(err) => {
                    let err = Error::Detection(Box::new(err));
                    warn!(frame = self.frame_index, error = %err, "skipping association");
                }
            }
        }

        for track in self.registry.tracks_mut() {
            let step = track.step(&self.speed);
            output.boxes.push((track.track_id, track.current_box()));
            output.annotations.extend(step.annotation);
            output.captures.extend(step.capture);
        }

        output
    }

    /// Process frames until the source is exhausted or `sink` breaks.
    ///
    /// Capture requests are handed to `recorder`; its failures are logged and
    /// never interrupt the run. All tracks are released on return.
    pub fn run<I, R, S, K>(
        &mut self,
        frames: I,
        recorder: &mut PlateRecorder<R, S>,
        mut sink: K,
    ) -> RunSummary
    where
        I: IntoIterator<Item = Frame>,
        R: PlateReader,
        S: PlateStore,
        K: FnMut(&Frame, &FrameOutput) -> ControlFlow<()>,
    {
        let started = Instant::now();
        let mut summary = RunSummary::default();

        for frame in frames {
            let output = self.process_frame(&frame);
            summary.frames += 1;
            if let Some(association) = &output.association {
                summary.tracks_created += association.created.len() as u64;
            }

            for request in &output.captures {
                match recorder.handle_now(&frame, request) {
                    Ok(CaptureOutcome::Recorded(_)) => summary.plates_recorded += 1,
                    Ok(_) => {}
                    Err(err) => {
                        warn!(track_id = request.track_id, error = %err, "plate capture failed")
                    }
                }
            }

            if sink(&frame, &output).is_break() {
                info!(frame = output.frame_index, "run stopped");
                break;
            }
        }

        self.registry.clear();

        let elapsed = started.elapsed().as_secs_f64();
        if elapsed > 0.0 {
            summary.measured_fps = summary.frames as f64 / elapsed;
        }
        info!(
            frames = summary.frames,
            tracks = summary.tracks_created,
            plates = summary.plates_recorded,
            measured_fps = summary.measured_fps,
            "run finished"
        );

        summary
    }

    /// Number of frames processed so far.
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn speed_config(&self) -> &SpeedConfig {
        &self.speed
    }

    /// Get a reference to the underlying detector.
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// Get a mutable reference to the underlying detector.
    pub fn detector_mut(&mut self) -> &mut D {
        &mut self.detector
    }

    /// Get a reference to the underlying registry.
    pub fn registry(&self) -> &TrackRegistry<F> {
        &self.registry
    }

    /// Get a mutable reference to the underlying registry.
    pub fn registry_mut(&mut self) -> &mut TrackRegistry<F> {
        &mut self.registry
    }
}
