//! Track registry: per-frame tracker updates, quality eviction and
//! detection-to-track association.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::frame::Frame;
use crate::tracker::matching::{self, Detection};
use crate::tracker::object_tracker::TrackerFactory;
use crate::tracker::track::Track;

/// Configuration for the TrackRegistry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TrackerConfig {
    /// Tracks whose update quality falls below this are evicted.
    pub eviction_quality: f32,
    /// Detection and association run on every Nth frame.
    pub detection_interval: u64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            eviction_quality: 7.0,
            detection_interval: 10,
        }
    }
}

/// Outcome of one association pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Association {
    /// (detection index, track id) pairs absorbed by existing tracks.
    pub matched: Vec<(usize, u64)>,
    /// Ids of tracks created from unmatched detections.
    pub created: Vec<u64>,
    /// Unmatched detections no tracker could be started on.
    pub dropped: usize,
}

pub struct TrackRegistry<F: TrackerFactory> {
    tracks: BTreeMap<u64, Track<F::Tracker>>,
    next_id: u64,
    factory: F,
    config: TrackerConfig,
}

impl<F: TrackerFactory> TrackRegistry<F> {
    pub fn new(factory: F, config: TrackerConfig) -> Self {
        Self {
            tracks: BTreeMap::new(),
            next_id: 0,
            factory,
            config,
        }
    }

    pub fn with_default_config(factory: F) -> Self {
        Self::new(factory, TrackerConfig::default())
    }

    /// Advance every tracker onto `frame` and evict the ones that lost their
    /// object. Returns the evicted ids.
    ///
    /// Evictions are collected during the scan and applied afterwards, so no
    /// decision depends on visitation order.
    pub fn update_all(&mut self, frame: &Frame) -> Vec<u64> {
        let threshold = self.config.eviction_quality;
        let mut evicted = Vec::new();

        for (&id, track) in self.tracks.iter_mut() {
            match track.update(frame) {
                Ok(update) if update.quality >= threshold => {}
                Ok(update) => {
                    debug!(track_id = id, quality = update.quality, "tracking quality below threshold");
                    evicted.push(id);
                }
                Err(err) => {
                    let err = Error::TrackerUpdate {
                        track_id: id,
                        source: Box::new(err),
                    };
                    debug!(error = %err, "evicting failed tracker");
                    evicted.push(id);
                }
            }
        }

        for id in &evicted {
            self.tracks.remove(id);
        }

        evicted
    }

    /// Associate detections with live tracks, creating a track for every
    /// detection no existing track claims.
    ///
    /// Each detection goes to the first track, in ascending id order, whose
    /// box mutually contains it. Tracks created earlier in the same pass are
    /// candidates for later detections.
    pub fn associate(&mut self, detections: &[Detection], frame: &Frame) -> Association {
        let mut result = Association::default();

        for (idx, det) in detections.iter().enumerate() {
            let candidates = self.tracks.iter().map(|(&id, t)| (id, t.current_box()));
            if let Some(id) = matching::first_match(candidates, det) {
                result.matched.push((idx, id));
                continue;
            }

            match self.spawn(det, frame) {
                Ok(id) => result.created.push(id),
                Err(err) => {
                    warn!(error = %err, "dropping detection");
                    result.dropped += 1;
                }
            }
        }

        result
    }

    /// Start a tracker on the detection and register it under a fresh id.
    /// Nothing is inserted when the tracker cannot be started.
    fn spawn(&mut self, det: &Detection, frame: &Frame) -> Result<u64> {
        if det.bbox.is_degenerate() {
            return Err(Error::DegenerateRegion(det.bbox));
        }

        let tracker = self
            .factory
            .start(frame, det.bbox)
            .map_err(|err| Error::TrackerInit {
                region: det.bbox,
                source: Box::new(err),
            })?;

        let id = self.next_id;
        self.next_id += 1;
        self.tracks.insert(id, Track::new(id, tracker, det.bbox));
        debug!(track_id = id, region = ?det.bbox, "track created");

        Ok(id)
    }

    /// Drop every track, releasing its tracker.
    pub fn clear(&mut self) {
        self.tracks.clear();
    }

    /// Tracks in ascending id order.
    pub fn tracks(&self) -> impl Iterator<Item = &Track<F::Tracker>> {
        self.tracks.values()
    }

    pub fn tracks_mut(&mut self) -> impl Iterator<Item = &mut Track<F::Tracker>> {
        self.tracks.values_mut()
    }

    pub fn get(&self, id: u64) -> Option<&Track<F::Tracker>> {
        self.tracks.get(&id)
    }

    pub fn contains(&self, id: u64) -> bool {
        self.tracks.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Id the next created track will receive.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn factory_mut(&mut self) -> &mut F {
        &mut self.factory
    }
}
