//! ByteMultiTracker: two-stage association over a pool of Kalman tracklets
//!
//! Stage 1 matches high-confidence detections against every predicted track.
//! Stage 2 gives tracks that were visible last frame a chance to recover
//! through a low-confidence detection. Only high-confidence detections can
//! start a new track.

use crate::association::associate_greedy;
use crate::bbox::Bbox;
use crate::detection::Detection;
use crate::kalman::KalmanBoxFilter;
use crate::track::{Track, TrackId, TrackState, Tracklet};
use std::collections::{BTreeMap, HashSet};

/// Detections at or below this confidence are ignored entirely
pub const NOISE_FLOOR: f32 = 0.1;
/// IoU threshold for the low-confidence recovery stage
pub const RECOVERY_IOU_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone)]
pub struct ByteMultiTracker {
    /// Detections at or above this score are "high"
    pub track_thresh: f32,
    /// Consecutive misses a confirmed track survives before removal
    pub track_buffer: u32,
    /// IoU threshold for the high-confidence stage
    pub match_thresh: f32,
    next_track_id: TrackId,
    tracklets: BTreeMap<TrackId, Tracklet>,
    n_steps: u32,
}

impl Default for ByteMultiTracker {
    fn default() -> Self {
        Self::new(0.5, 30, 0.2)
    }
}

impl ByteMultiTracker {
    pub fn new(track_thresh: f32, track_buffer: u32, match_thresh: f32) -> Self {
        Self {
            track_thresh,
            track_buffer,
            match_thresh,
            next_track_id: 1,
            tracklets: BTreeMap::new(),
            n_steps: 0,
        }
    }

    fn split_detections<'a>(&self, detections: &'a [Detection]) -> (Vec<&'a Detection>, Vec<&'a Detection>) {
        let mut high = Vec::new();
        let mut low = Vec::new();
        for det in detections {
            if det.confidence >= self.track_thresh {
                high.push(det);
            } else if det.confidence > NOISE_FLOOR {
                low.push(det);
            }
        }
        (high, low)
    }

    pub fn update(&mut self, detections: &[Detection]) -> Vec<Track> {
        self.n_steps += 1;

        // Pass 1: Predict positions for all tracklets
        let pool: Vec<(TrackId, Bbox)> = self
            .tracklets
            .iter_mut()
            .map(|(id, tracklet)| (*id, tracklet.predict()))
            .collect();

        let (high_dets, low_dets) = self.split_detections(detections);
        if !detections.is_empty() || !pool.is_empty() {
            log::debug!(
                "ByteTrack - Detections: High={}, Low={}, Pool={}",
                high_dets.len(),
                low_dets.len(),
                pool.len()
            );
        }

        // Pass 2: Associate high confidence detections with the whole pool
        let pool_boxes: Vec<Bbox> = pool.iter().map(|(_, b)| *b).collect();
        let high_boxes: Vec<Bbox> = high_dets.iter().map(|d| d.bbox).collect();
        let first = associate_greedy(&pool_boxes, &high_boxes, self.match_thresh);

        // Pass 3: Associate low confidence detections with tracks that were
        // not already lost before this frame
        let recovery_pool: Vec<usize> = first
            .unmatched_tracks
            .iter()
            .copied()
            .filter(|&t| {
                self.tracklets
                    .get(&pool[t].0)
                    .is_some_and(|tl| tl.track.state != TrackState::Lost)
            })
            .collect();
        let recovery_boxes: Vec<Bbox> = recovery_pool.iter().map(|&t| pool_boxes[t]).collect();
        let low_boxes: Vec<Bbox> = low_dets.iter().map(|d| d.bbox).collect();
        let second = associate_greedy(&recovery_boxes, &low_boxes, RECOVERY_IOU_THRESHOLD);

        // Pass 4: Apply matches from both stages
        let mut matched: HashSet<TrackId> = HashSet::new();
        let stage_one = first
            .matches
            .iter()
            .map(|&(t, d, iou)| (pool[t].0, high_dets[d], iou));
        let stage_two = second
            .matches
            .iter()
            .map(|&(r, d, iou)| (pool[recovery_pool[r]].0, low_dets[d], iou));

        for (track_id, det, iou) in stage_one.chain(stage_two) {
            if let Some(tracklet) = self.tracklets.get_mut(&track_id) {
                log::debug!(
                    "ByteTrack - Match: Track ID={} with Detection [cx={:.3}, cy={:.3}, conf={:.2}] (IoU={:.3})",
                    track_id,
                    det.bbox.center_x(),
                    det.bbox.center_y(),
                    det.confidence,
                    iou
                );
                tracklet.apply_match(det);
                matched.insert(track_id);
            }
        }

        // Pass 5: Age unmatched tracks; tentative ones are dropped outright
        let track_buffer = self.track_buffer;
        self.tracklets.retain(|id, tracklet| {
            if matched.contains(id) {
                return true;
            }
            if tracklet.track.state == TrackState::Tentative {
                return false;
            }
            tracklet.track.misses += 1;
            tracklet.track.state = TrackState::Lost;
            if tracklet.track.misses > track_buffer {
                log::debug!(
                    "ByteTrack - Track {} removed after {} missed frames",
                    id,
                    tracklet.track.misses
                );
                return false;
            }
            true
        });

        // Pass 6: Create new tracklets only from unmatched high confidence detections
        for &d in &first.unmatched_detections {
            let id = self.next_track_id;
            self.next_track_id += 1;
            self.tracklets.insert(id, Tracklet::spawn(id, high_dets[d]));
        }

        self.visible_tracks()
    }

    /// Confirmed tracks matched in the latest update
    pub fn visible_tracks(&self) -> Vec<Track> {
        self.tracklets
            .values()
            .filter(|tl| tl.track.is_visible())
            .map(|tl| tl.track.clone())
            .collect()
    }

    /// Every track held internally, including tentative and lost ones
    pub fn tracks(&self) -> impl Iterator<Item = &Track> {
        self.tracklets.values().map(|tl| &tl.track)
    }

    pub fn track_ids(&self) -> Vec<TrackId> {
        self.tracklets.keys().copied().collect()
    }

    /// Motion filter behind a track, for overlays and debugging
    pub fn filter(&self, track_id: TrackId) -> Option<&KalmanBoxFilter> {
        self.tracklets.get(&track_id).map(|tl| tl.filter())
    }

    pub fn update_config(&mut self, track_buffer: u32, track_thresh: f32) {
        self.track_buffer = track_buffer;
        self.track_thresh = track_thresh;
    }

    pub fn set_match_threshold(&mut self, match_thresh: f32) {
        self.match_thresh = match_thresh;
    }

    pub fn clear_trackers(&mut self) {
        self.tracklets.clear();
        self.next_track_id = 1;
        self.n_steps = 0;
    }

    pub fn remove_tracker(&mut self, track_id: TrackId) {
        self.tracklets.remove(&track_id);
    }

    pub fn num_tracklets(&self) -> usize {
        self.tracklets.len()
    }

    pub fn get_step_count(&self) -> u32 {
        self.n_steps
    }
}
