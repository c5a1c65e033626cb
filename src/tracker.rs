mod matching;
mod object_tracker;
mod rect;
mod registry;
mod speed;
mod track;
mod track_state;

pub use matching::{Detection, first_match};
pub use object_tracker::{ObjectTracker, TrackerFactory, TrackerUpdate};
pub use rect::Rect;
pub use registry::{Association, TrackRegistry, TrackerConfig};
pub use speed::{SpeedConfig, SpeedEstimator};
pub use track::{PlateCaptureRequest, SpeedAnnotation, Track, TrackStep};
pub use track_state::{SpeedState, TrackState};
