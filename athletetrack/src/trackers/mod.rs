//! Multi-object tracking implementations
//!
//! Trackers share the `MultiObjectTracker` interface so callers can hold
//! them behind a trait object.

use crate::detection::Detection;
use crate::track::{Track, TrackId};

mod bytetrack;

pub use bytetrack::{ByteMultiTracker, NOISE_FLOOR, RECOVERY_IOU_THRESHOLD};

/// Common interface for multi-object trackers
pub trait MultiObjectTracker: Send {
    /// Update tracker with new detections
    ///
    /// # Returns
    /// Confirmed tracks that were matched in this update. Tentative and lost
    /// tracks stay internal.
    fn update(&mut self, detections: &[Detection]) -> Vec<Track>;

    /// Clear all trackers
    fn clear_trackers(&mut self);

    /// Remove specific tracker by ID
    fn remove_tracker(&mut self, track_id: TrackId);

    /// Get number of tracklets held, in any state
    fn num_tracklets(&self) -> usize;

    /// Get current step count
    fn get_step_count(&self) -> u32;
}

impl MultiObjectTracker for ByteMultiTracker {
    fn update(&mut self, detections: &[Detection]) -> Vec<Track> {
        self.update(detections)
    }

    fn clear_trackers(&mut self) {
        self.clear_trackers()
    }

    fn remove_tracker(&mut self, track_id: TrackId) {
        self.remove_tracker(track_id)
    }

    fn num_tracklets(&self) -> usize {
        self.num_tracklets()
    }

    fn get_step_count(&self) -> u32 {
        self.get_step_count()
    }
}
