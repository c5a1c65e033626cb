//! Error taxonomy for the tracking core and its collaborators.

use thiserror::Error;

use crate::tracker::Rect;

/// Boxed error raised by an external collaborator.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("detector failed: {0}")]
    Detection(#[source] BoxError),

    #[error("region {0:?} is too small to track")]
    DegenerateRegion(Rect),

    #[error("tracker failed to start on region {region:?}: {source}")]
    TrackerInit {
        region: Rect,
        #[source]
        source: BoxError,
    },

    #[error("tracker update failed for track {track_id}: {source}")]
    TrackerUpdate {
        track_id: u64,
        #[source]
        source: BoxError,
    },

    #[error("plate recognition failed for track {track_id}: {reason}")]
    Recognition { track_id: u64, reason: String },

    #[error("failed to store plate record: {0}")]
    Persistence(#[source] BoxError),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
