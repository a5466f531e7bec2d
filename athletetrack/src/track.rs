//! Track identity and lifecycle state

use crate::bbox::Bbox;
use crate::detection::Detection;
use crate::kalman::KalmanBoxFilter;

/// Track identifier. Real tracks are positive; negative ids are reserved for
/// synthetic tracks built downstream.
pub type TrackId = i32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrackState {
    /// New track, not confirmed
    #[default]
    Tentative,
    /// Stable track
    Confirmed,
    /// Track lost, kept in buffer
    Lost,
}

/// Public view of a tracked subject
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub id: TrackId,
    /// Current bounding box estimate
    pub bbox: Bbox,
    /// Confidence of the last matched detection
    pub confidence: f32,
    /// Frames since creation
    pub age: u32,
    /// Successful matches
    pub hits: u32,
    /// Consecutive frames without a match
    pub misses: u32,
    pub state: TrackState,
}

impl Track {
    pub fn is_confirmed(&self) -> bool {
        self.state == TrackState::Confirmed
    }

    /// Confirmed and matched in the latest update
    pub fn is_visible(&self) -> bool {
        self.is_confirmed() && self.misses == 0
    }
}

/// A track together with the filter it exclusively owns
#[derive(Debug, Clone)]
pub(crate) struct Tracklet {
    pub track: Track,
    kf: KalmanBoxFilter,
}

impl Tracklet {
    pub fn spawn(id: TrackId, detection: &Detection) -> Self {
        Self {
            track: Track {
                id,
                bbox: detection.bbox,
                confidence: detection.confidence,
                age: 1,
                hits: 1,
                misses: 0,
                state: TrackState::Tentative,
            },
            kf: KalmanBoxFilter::new(&detection.bbox),
        }
    }

    pub fn predict(&mut self) -> Bbox {
        self.track.bbox = self.kf.predict();
        self.track.age += 1;
        self.track.bbox
    }

    /// Feed a matched detection into the filter and promote on the second hit
    pub fn apply_match(&mut self, detection: &Detection) {
        self.kf.update(&detection.bbox);
        self.track.bbox = self.kf.current_rect();
        self.track.confidence = detection.confidence;
        self.track.hits += 1;
        self.track.misses = 0;
        self.track.state = if self.track.hits >= 2 {
            TrackState::Confirmed
        } else {
            TrackState::Tentative
        };
    }

    pub fn filter(&self) -> &KalmanBoxFilter {
        &self.kf
    }
}
