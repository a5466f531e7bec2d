//! Simulated detector and actuator for closed-loop runs without a camera
//!
//! `ZoomingSceneDetector` and `SimulatedZoomActuator` share a `SharedZoom`,
//! so zoom applied by the service changes what the detector sees on the next
//! frame. `ReplayDetector` plays back fixed detection lists.

use crate::actuator::ZoomActuator;
use crate::detector_trait::ObjectDetector;
use crate::error::{AutoZoomError, Result};
use crate::types::ImageData;
use athletetrack::{Bbox, Detection};
use std::collections::HashSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Zoom ratio shared between a simulated camera and its actuator
#[derive(Debug, Clone)]
pub struct SharedZoom(Arc<AtomicU32>);

impl SharedZoom {
    pub fn new(zoom: f32) -> Self {
        Self(Arc::new(AtomicU32::new(zoom.to_bits())))
    }

    pub fn get(&self) -> f32 {
        f32::from_bits(self.0.load(Ordering::Relaxed))
    }

    pub fn set(&self, zoom: f32) {
        self.0.store(zoom.to_bits(), Ordering::Relaxed);
    }
}

impl Default for SharedZoom {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Plays back scripted per-frame detections, then reports nothing
#[derive(Debug, Clone)]
pub struct ReplayDetector {
    frames: Vec<Vec<Detection>>,
    failing_calls: HashSet<usize>,
    calls: usize,
    confidence_threshold: f32,
    closed: bool,
}

impl ReplayDetector {
    pub fn new(frames: Vec<Vec<Detection>>) -> Self {
        Self {
            frames,
            failing_calls: HashSet::new(),
            calls: 0,
            confidence_threshold: 0.3,
            closed: false,
        }
    }

    /// Make the given zero-based `detect` calls fail
    pub fn with_failures(mut self, calls: impl IntoIterator<Item = usize>) -> Self {
        self.failing_calls.extend(calls);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl ObjectDetector for ReplayDetector {
    /// Scripted detections are returned as-is, ignoring the threshold
    fn detect(&mut self, _image: &ImageData) -> Result<Vec<Detection>> {
        let call = self.calls;
        self.calls += 1;
        if self.closed {
            return Err(AutoZoomError::detection("detector already closed"));
        }
        if self.failing_calls.contains(&call) {
            return Err(AutoZoomError::detection(format!(
                "scripted failure on call {}",
                call
            )));
        }
        Ok(self.frames.get(call).cloned().unwrap_or_default())
    }

    fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    fn set_confidence_threshold(&mut self, threshold: f32) {
        self.confidence_threshold = threshold;
    }

    fn close(&mut self) {
        self.closed = true;
    }

    fn name(&self) -> &str {
        "Replay"
    }
}

/// Renders subjects placed at zoom 1.0 into the current zoomed view
///
/// A zoom of `z` crops the central `1/z` of the wide frame, so every box is
/// scaled by `z` about the frame center. The last scripted frame repeats.
#[derive(Debug, Clone)]
pub struct ZoomingSceneDetector {
    zoom: SharedZoom,
    frames: Vec<Vec<Detection>>,
    calls: usize,
    confidence_threshold: f32,
}

impl ZoomingSceneDetector {
    pub fn new(zoom: SharedZoom, frames: Vec<Vec<Detection>>) -> Self {
        Self {
            zoom,
            frames,
            calls: 0,
            confidence_threshold: 0.3,
        }
    }

    /// Subjects that never move in the wide view
    pub fn still(zoom: SharedZoom, subjects: Vec<Detection>) -> Self {
        Self::new(zoom, vec![subjects])
    }

    fn project(bbox: &Bbox, zoom: f32) -> Bbox {
        let scale = |v: f32| 0.5 + (v - 0.5) * zoom;
        Bbox::new(
            scale(bbox.xmin),
            scale(bbox.ymin),
            scale(bbox.xmax),
            scale(bbox.ymax),
        )
    }
}

impl ObjectDetector for ZoomingSceneDetector {
    fn detect(&mut self, _image: &ImageData) -> Result<Vec<Detection>> {
        let index = self.calls.min(self.frames.len().saturating_sub(1));
        self.calls += 1;
        let zoom = self.zoom.get();

        let Some(frame) = self.frames.get(index) else {
            return Ok(Vec::new());
        };
        Ok(frame
            .iter()
            .filter(|d| d.confidence >= self.confidence_threshold)
            .map(|d| Detection::new(Self::project(&d.bbox, zoom), d.confidence, d.class_id))
            .collect())
    }

    fn confidence_threshold(&self) -> f32 {
        self.confidence_threshold
    }

    fn set_confidence_threshold(&mut self, threshold: f32) {
        self.confidence_threshold = threshold;
    }

    fn close(&mut self) {}

    fn name(&self) -> &str {
        "ZoomingScene"
    }
}

#[derive(Debug, Default)]
struct ActuationRecord {
    applied: Vec<f32>,
    ramp_rate: Option<f32>,
}

/// Read side of a `SimulatedZoomActuator`, usable after the actuator has
/// been handed to the service
#[derive(Debug, Clone, Default)]
pub struct ActuationLog(Arc<Mutex<ActuationRecord>>);

impl ActuationLog {
    fn lock(&self) -> MutexGuard<'_, ActuationRecord> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every zoom value applied, in order
    pub fn applied(&self) -> Vec<f32> {
        self.lock().applied.clone()
    }

    pub fn count(&self) -> usize {
        self.lock().applied.len()
    }

    pub fn last_ramp_rate(&self) -> Option<f32> {
        self.lock().ramp_rate
    }
}

#[derive(Debug, Clone)]
pub struct SimulatedZoomActuator {
    zoom: SharedZoom,
    log: ActuationLog,
}

impl SimulatedZoomActuator {
    pub fn new(zoom: SharedZoom) -> Self {
        Self {
            zoom,
            log: ActuationLog::default(),
        }
    }

    pub fn log(&self) -> ActuationLog {
        self.log.clone()
    }
}

impl ZoomActuator for SimulatedZoomActuator {
    fn apply_zoom(&mut self, zoom: f32) {
        self.zoom.set(zoom);
        self.log.lock().applied.push(zoom);
    }

    fn update_ramp_rate(&mut self, ramp_rate: f32) {
        self.log.lock().ramp_rate = Some(ramp_rate);
    }
}
