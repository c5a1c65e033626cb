/// Track state enumeration for object tracking lifecycle.
///
/// Eviction has no state of its own: an evicted track is dropped from the
/// registry together with its tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackState {
    /// Newly created track, tracker not yet updated on a later frame
    #[default]
    New,
    /// Actively tracked object
    Tracked,
}

/// One-shot speed measurement of a track.
///
/// Moves from `Unset` to `Set` at most once; a set speed is never
/// recomputed for the rest of the track's life.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SpeedState {
    #[default]
    Unset,
    /// Speed in km/h
    Set(f32),
}

impl SpeedState {
    #[inline]
    pub fn is_set(&self) -> bool {
        matches!(self, SpeedState::Set(_))
    }

    #[inline]
    pub fn kmh(&self) -> Option<f32> {
        match *self {
            SpeedState::Set(kmh) => Some(kmh),
            SpeedState::Unset => None,
        }
    }
}
