//! Greedy IoU association between track boxes and detection boxes
//!
//! Candidate pairs at or above the threshold are taken in descending IoU
//! order, and neither side is reused. Equal IoUs keep encounter order
//! (track-major, then detection). This is deliberately not a globally
//! optimal assignment.

use crate::bbox::{ious, Bbox};
use std::cmp::Ordering;

/// Result of one association pass, in terms of input indices
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Association {
    /// (track index, detection index, IoU)
    pub matches: Vec<(usize, usize, f32)>,
    pub unmatched_tracks: Vec<usize>,
    pub unmatched_detections: Vec<usize>,
}

pub fn associate_greedy(tracks: &[Bbox], detections: &[Bbox], iou_threshold: f32) -> Association {
    if tracks.is_empty() || detections.is_empty() {
        return Association {
            matches: Vec::new(),
            unmatched_tracks: (0..tracks.len()).collect(),
            unmatched_detections: (0..detections.len()).collect(),
        };
    }

    let iou_matrix = ious(tracks, detections);

    let mut candidates: Vec<(usize, usize, f32)> = iou_matrix
        .indexed_iter()
        .filter(|(_, iou)| **iou >= iou_threshold)
        .map(|((t, d), &iou)| (t, d, iou))
        .collect();

    // Stable sort keeps encounter order among ties
    candidates.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal));

    let mut track_taken = vec![false; tracks.len()];
    let mut det_taken = vec![false; detections.len()];
    let mut matches = Vec::new();

    for (t, d, iou) in candidates {
        if track_taken[t] || det_taken[d] {
            continue;
        }
        track_taken[t] = true;
        det_taken[d] = true;
        matches.push((t, d, iou));
    }

    Association {
        matches,
        unmatched_tracks: (0..tracks.len()).filter(|&t| !track_taken[t]).collect(),
        unmatched_detections: (0..detections.len()).filter(|&d| !det_taken[d]).collect(),
    }
}
