//! Subject selection strategies
//!
//! Strategies share the `AthleteSelector` interface so the service can swap
//! them at runtime. An empty candidate list always yields `None`, which the
//! caller treats as "subject lost, hold the current zoom".

use crate::config::SelectionStrategy;
use athletetrack::{Bbox, Track, TrackId, TrackState};

/// Id carried by the synthetic track that frames a whole group
pub const GROUP_TRACK_ID: TrackId = -100;

/// Frame center in normalized coordinates
const FRAME_CENTER: (f32, f32) = (0.5, 0.5);

/// Common interface for subject selection strategies
pub trait AthleteSelector: Send {
    /// Pick the subject to frame from the active tracks
    fn select_target(&mut self, tracks: &[Track]) -> Option<Track>;

    /// Forget any lock
    fn reset(&mut self);

    /// Pin a subject by id. Strategies without a lock ignore this.
    fn set_locked_id(&mut self, id: Option<TrackId>);

    fn locked_id(&self) -> Option<TrackId>;

    fn strategy(&self) -> SelectionStrategy;
}

impl SelectionStrategy {
    /// Create a selector instance of this strategy
    pub fn create(&self) -> Box<dyn AthleteSelector> {
        match self {
            SelectionStrategy::SingleSubject => Box::new(SingleSubjectSelector::new()),
            SelectionStrategy::Group => Box::new(GroupSelector),
        }
    }
}

/// Sticky lock on one athlete, falling back to whoever is nearest the center
#[derive(Debug, Clone, Default)]
pub struct SingleSubjectSelector {
    locked_track_id: Option<TrackId>,
}

impl SingleSubjectSelector {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AthleteSelector for SingleSubjectSelector {
    fn select_target(&mut self, tracks: &[Track]) -> Option<Track> {
        if let Some(locked) = self
            .locked_track_id
            .and_then(|id| tracks.iter().find(|t| t.id == id))
        {
            return Some(locked.clone());
        }

        let (cx, cy) = FRAME_CENTER;
        // First candidate wins ties
        let best = tracks.iter().fold(None::<&Track>, |best, t| match best {
            Some(b) if b.bbox.center_distance_sq(cx, cy) <= t.bbox.center_distance_sq(cx, cy) => {
                Some(b)
            }
            _ => Some(t),
        })?;

        if self.locked_track_id != Some(best.id) {
            log::debug!("Selector - Locked onto track {}", best.id);
        }
        self.locked_track_id = Some(best.id);
        Some(best.clone())
    }

    fn reset(&mut self) {
        self.locked_track_id = None;
    }

    fn set_locked_id(&mut self, id: Option<TrackId>) {
        self.locked_track_id = id;
    }

    fn locked_id(&self) -> Option<TrackId> {
        self.locked_track_id
    }

    fn strategy(&self) -> SelectionStrategy {
        SelectionStrategy::SingleSubject
    }
}

/// Frames every active athlete at once
#[derive(Debug, Clone, Copy, Default)]
pub struct GroupSelector;

impl AthleteSelector for GroupSelector {
    fn select_target(&mut self, tracks: &[Track]) -> Option<Track> {
        match tracks {
            [] => None,
            [only] => Some(only.clone()),
            [first, rest @ ..] => {
                let envelope = rest
                    .iter()
                    .fold(first.bbox, |acc: Bbox, t| acc.union(&t.bbox));
                let confidence =
                    tracks.iter().map(|t| t.confidence).sum::<f32>() / tracks.len() as f32;
                Some(Track {
                    id: GROUP_TRACK_ID,
                    bbox: envelope,
                    confidence,
                    age: 0,
                    hits: 0,
                    misses: 0,
                    state: TrackState::Confirmed,
                })
            }
        }
    }

    fn reset(&mut self) {}

    fn set_locked_id(&mut self, _id: Option<TrackId>) {}

    fn locked_id(&self) -> Option<TrackId> {
        None
    }

    fn strategy(&self) -> SelectionStrategy {
        SelectionStrategy::Group
    }
}
