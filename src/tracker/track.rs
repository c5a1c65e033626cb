//! Single tracked vehicle.

use tracing::info;

use crate::frame::Frame;
use crate::tracker::object_tracker::{ObjectTracker, TrackerUpdate};
use crate::tracker::rect::Rect;
use crate::tracker::speed::SpeedConfig;
use crate::tracker::track_state::{SpeedState, TrackState};

/// Speed label to render next to a track.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeedAnnotation {
    pub track_id: u64,
    pub speed_kmh: f32,
    /// Text anchor (x, y) in pixels.
    pub anchor: (f32, f32),
}

/// Request to read the plate of a vehicle measured above the capture speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlateCaptureRequest {
    pub track_id: u64,
    pub speed_kmh: f32,
    /// Frame region to crop for recognition.
    pub region: Rect,
}

/// Events produced by one track on one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrackStep {
    pub annotation: Option<SpeedAnnotation>,
    pub capture: Option<PlateCaptureRequest>,
}

/// Single tracked object and the tracker instance bound to it.
#[derive(Debug)]
pub struct Track<T> {
    /// Unique track identifier
    pub track_id: u64,
    /// Current lifecycle state
    pub state: TrackState,
    speed: SpeedState,
    previous: Rect,
    current: Rect,
    capture_requested: bool,
    tracker: T,
}

impl<T: ObjectTracker> Track<T> {
    /// Bind a freshly started tracker to a new track.
    ///
    /// The detection box becomes the previous observation and the tracker's
    /// own region the current one.
    pub fn new(track_id: u64, tracker: T, detection: Rect) -> Self {
        Self {
            track_id,
            state: TrackState::New,
            speed: SpeedState::Unset,
            previous: detection,
            current: tracker.position(),
            capture_requested: false,
            tracker,
        }
    }

    /// Advance the tracker onto `frame` and record its region as current.
    pub fn update(&mut self, frame: &Frame) -> Result<TrackerUpdate, T::Error> {
        let update = self.tracker.update(frame)?;
        self.current = update.region;
        self.state = TrackState::Tracked;
        Ok(update)
    }

    /// Run the speed, annotation and capture triggers, then shift history.
    pub fn step(&mut self, config: &SpeedConfig) -> TrackStep {
        let prev = self.previous;
        let cur = self.current;
        let mut out = TrackStep::default();

        if cur != prev {
            if !self.speed.is_set() && config.in_calibration_band(prev.y) {
                let kmh = config.estimator().estimate(&prev, &cur.with_x(prev.x));
                // a zero or non-finite reading leaves the speed open for the next frame
                if kmh.is_finite() && kmh != 0.0 {
                    self.speed = SpeedState::Set(kmh);
                    info!(track_id = self.track_id, speed_kmh = kmh, "speed measured");
                }
            }

            if let Some(kmh) = self.speed.kmh() {
                if prev.y >= config.annotation_min_y {
                    out.annotation = Some(SpeedAnnotation {
                        track_id: self.track_id,
                        speed_kmh: kmh,
                        anchor: (prev.x + prev.width / 2.0, prev.y - 5.0),
                    });

                    if kmh > config.capture_speed_kmh && !self.capture_requested {
                        self.capture_requested = true;
                        info!(track_id = self.track_id, speed_kmh = kmh, "plate capture requested");
                        out.capture = Some(PlateCaptureRequest {
                            track_id: self.track_id,
                            speed_kmh: kmh,
                            region: cur,
                        });
                    }
                }
            }
        }

        self.previous = cur;
        out
    }

    #[inline]
    pub fn speed(&self) -> SpeedState {
        self.speed
    }

    #[inline]
    pub fn previous_box(&self) -> Rect {
        self.previous
    }

    #[inline]
    pub fn current_box(&self) -> Rect {
        self.current
    }

    #[inline]
    pub fn capture_requested(&self) -> bool {
        self.capture_requested
    }

    pub fn tracker(&self) -> &T {
        &self.tracker
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    /// Moves to the next scripted region on every update.
    struct ScriptTracker {
        regions: Vec<Rect>,
        at: usize,
    }

    impl ScriptTracker {
        fn new(regions: Vec<Rect>) -> Self {
            Self { regions, at: 0 }
        }
    }

    impl ObjectTracker for ScriptTracker {
        type Error = Infallible;

        fn update(&mut self, _frame: &Frame) -> Result<TrackerUpdate, Infallible> {
            self.at = (self.at + 1).min(self.regions.len() - 1);
            Ok(TrackerUpdate {
                region: self.position(),
                quality: 10.0,
            })
        }

        fn position(&self) -> Rect {
            self.regions[self.at]
        }
    }

    fn boxes(ys: &[f32]) -> Vec<Rect> {
        ys.iter().map(|&y| Rect::new(100.0, y, 40.0, 20.0)).collect()
    }

    #[test]
    fn test_new_track_takes_tracker_position() {
        let det = Rect::new(98.0, 270.0, 44.0, 24.0);
        let track = Track::new(0, ScriptTracker::new(boxes(&[275.0])), det);
        assert_eq!(track.state, TrackState::New);
        assert_eq!(track.previous_box(), det);
        assert_eq!(track.current_box(), Rect::new(100.0, 275.0, 40.0, 20.0));
    }

    #[test]
    fn test_reference_crossing_sets_speed_and_captures() {
        let frame = Frame::blank(4, 4);
        let cfg = SpeedConfig::default();
        let regions = boxes(&[275.0, 300.0]);
        let mut track = Track::new(7, ScriptTracker::new(regions.clone()), regions[0]);

        // no movement on the creation frame
        assert_eq!(track.step(&cfg), TrackStep::default());

        track.update(&frame).unwrap();
        let step = track.step(&cfg);
        let kmh = track.speed().kmh().unwrap();
        assert!((kmh - 184.09).abs() < 0.01);

        let annotation = step.annotation.unwrap();
        assert_eq!(annotation.track_id, 7);
        assert_eq!(annotation.anchor, (120.0, 270.0));

        let capture = step.capture.unwrap();
        assert_eq!(capture.region, regions[1]);
        assert_eq!(track.previous_box(), regions[1]);
    }

    #[test]
    fn test_speed_is_sticky() {
        let frame = Frame::blank(4, 4);
        let cfg = SpeedConfig::default();
        let regions = boxes(&[280.0, 285.0, 280.0, 330.0, 400.0]);
        let mut track = Track::new(0, ScriptTracker::new(regions.clone()), regions[0]);
        track.step(&cfg);

        track.update(&frame).unwrap();
        track.step(&cfg);
        let first = track.speed();
        assert!(first.is_set());

        for _ in 0..4 {
            track.update(&frame).unwrap();
            track.step(&cfg);
            assert_eq!(track.speed(), first);
        }
    }

    #[test]
    fn test_capture_is_one_shot() {
        let frame = Frame::blank(4, 4);
        let cfg = SpeedConfig::default();
        let regions = boxes(&[280.0, 300.0, 320.0, 340.0]);
        let mut track = Track::new(0, ScriptTracker::new(regions.clone()), regions[0]);
        track.step(&cfg);

        let mut captures = 0;
        let mut annotations = 0;
        for _ in 0..3 {
            track.update(&frame).unwrap();
            let step = track.step(&cfg);
            captures += step.capture.is_some() as usize;
            annotations += step.annotation.is_some() as usize;
        }
        assert_eq!(captures, 1);
        assert_eq!(annotations, 3);
        assert!(track.capture_requested());
    }

    #[test]
    fn test_outside_band_never_measures() {
        let frame = Frame::blank(4, 4);
        let cfg = SpeedConfig::default();
        let regions = boxes(&[200.0, 230.0, 260.0, 274.0]);
        let mut track = Track::new(0, ScriptTracker::new(regions.clone()), regions[0]);
        track.step(&cfg);

        for _ in 0..3 {
            track.update(&frame).unwrap();
            assert_eq!(track.step(&cfg), TrackStep::default());
        }
        assert_eq!(track.speed(), SpeedState::Unset);
    }

    #[test]
    fn test_slow_vehicle_annotated_without_capture() {
        let frame = Frame::blank(4, 4);
        let cfg = SpeedConfig::default();
        // 2px per frame -> ~14.7 km/h
        let regions = boxes(&[280.0, 282.0]);
        let mut track = Track::new(0, ScriptTracker::new(regions.clone()), regions[0]);
        track.step(&cfg);

        track.update(&frame).unwrap();
        let step = track.step(&cfg);
        assert!(step.annotation.is_some());
        assert!(step.capture.is_none());
        assert!(track.speed().kmh().unwrap() < cfg.capture_speed_kmh);
    }

    #[test]
    fn test_non_finite_region_leaves_speed_unset() {
        let frame = Frame::blank(4, 4);
        let cfg = SpeedConfig::default();
        let regions = vec![
            Rect::new(100.0, 280.0, 40.0, 20.0),
            Rect::new(100.0, f32::NAN, 40.0, 20.0),
            Rect::new(100.0, 280.0, 40.0, 20.0),
            Rect::new(100.0, 300.0, 40.0, 20.0),
        ];
        let mut track = Track::new(0, ScriptTracker::new(regions.clone()), regions[0]);
        track.step(&cfg);

        track.update(&frame).unwrap();
        assert_eq!(track.step(&cfg), TrackStep::default());
        assert_eq!(track.speed(), SpeedState::Unset);

        // a sane reading afterwards is still taken
        track.update(&frame).unwrap();
        track.step(&cfg);
        track.update(&frame).unwrap();
        track.step(&cfg);
        assert!(track.speed().kmh().unwrap().is_finite());
    }

    #[test]
    fn test_horizontal_move_in_band_leaves_speed_unset() {
        let frame = Frame::blank(4, 4);
        let cfg = SpeedConfig::default();
        let regions = vec![Rect::new(100.0, 280.0, 40.0, 20.0), Rect::new(130.0, 280.0, 40.0, 20.0)];
        let mut track = Track::new(0, ScriptTracker::new(regions.clone()), regions[0]);
        track.step(&cfg);

        track.update(&frame).unwrap();
        track.step(&cfg);
        assert_eq!(track.speed(), SpeedState::Unset);
    }
}
