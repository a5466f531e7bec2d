//! Per-track activity classification from bounding-box shape variation
//!
//! A player who is running, jumping or turning changes silhouette; a
//! spectator, a referee standing still, or a false positive on a poster does
//! not. Each track keeps a short ring buffer of box features and is called
//! active when aspect ratio and area fluctuate enough.

use athletetrack::{Bbox, Track, TrackId};
use std::collections::{HashMap, HashSet, VecDeque};

/// Score reported while a track has too little history to judge
const BENEFIT_OF_DOUBT_SCORE: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityConfig {
    /// Combined standard deviation above which a track is active
    pub shape_variance_threshold: f32,
    /// Samples kept per track (2 seconds at 30 fps)
    pub history_size: usize,
    /// Tracks with fewer samples are always active
    pub min_history_for_decision: usize,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            shape_variance_threshold: 0.002,
            history_size: 60,
            min_history_for_decision: 10,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BoxFeatures {
    width: f32,
    height: f32,
    aspect_ratio: f32,
}

impl BoxFeatures {
    fn area(&self) -> f32 {
        self.width * self.height
    }
}

impl From<&Bbox> for BoxFeatures {
    fn from(bbox: &Bbox) -> Self {
        Self {
            width: bbox.width(),
            height: bbox.height(),
            aspect_ratio: bbox.aspect_ratio(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ActivityClassifier {
    config: ActivityConfig,
    history: HashMap<TrackId, VecDeque<BoxFeatures>>,
}

impl ActivityClassifier {
    pub fn new(config: ActivityConfig) -> Self {
        Self {
            config,
            history: HashMap::new(),
        }
    }

    pub fn with_threshold(shape_variance_threshold: f32) -> Self {
        Self::new(ActivityConfig {
            shape_variance_threshold,
            ..Default::default()
        })
    }

    pub fn update_threshold(&mut self, shape_variance_threshold: f32) {
        self.config.shape_variance_threshold = shape_variance_threshold;
    }

    pub fn config(&self) -> &ActivityConfig {
        &self.config
    }

    /// Record the track's current box and decide whether it is moving
    pub fn is_active(&mut self, track: &Track) -> bool {
        let capacity = self.config.history_size.max(1);
        let samples = self
            .history
            .entry(track.id)
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        samples.push_back(BoxFeatures::from(&track.bbox));
        while samples.len() > capacity {
            samples.pop_front();
        }

        self.activity_score(track.id)
            .is_some_and(|score| score > self.config.shape_variance_threshold)
    }

    /// `(std(aspect_ratio) + std(area)) / 2` over the track's history
    pub fn activity_score(&self, track_id: TrackId) -> Option<f32> {
        let samples = self.history.get(&track_id)?;
        if samples.len() < self.config.min_history_for_decision {
            return Some(BENEFIT_OF_DOUBT_SCORE);
        }

        let aspect_std = std_dev(samples.iter().map(|f| f.aspect_ratio));
        let area_std = std_dev(samples.iter().map(BoxFeatures::area));
        Some((aspect_std + area_std) / 2.0)
    }

    pub fn history_len(&self, track_id: TrackId) -> usize {
        self.history.get(&track_id).map_or(0, VecDeque::len)
    }

    /// Drop history for every track id not in `track_ids`
    pub fn retain_tracks(&mut self, track_ids: &[TrackId]) {
        let keep: HashSet<TrackId> = track_ids.iter().copied().collect();
        self.history.retain(|id, _| keep.contains(id));
    }

    pub fn reset(&mut self) {
        self.history.clear();
    }
}

/// Population standard deviation
fn std_dev(values: impl Iterator<Item = f32> + Clone) -> f32 {
    let n = values.clone().count();
    if n == 0 {
        return 0.0;
    }
    let mean = values.clone().sum::<f32>() / n as f32;
    let variance = values.map(|v| (v - mean) * (v - mean)).sum::<f32>() / n as f32;
    variance.sqrt()
}
