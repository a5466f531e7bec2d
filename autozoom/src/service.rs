//! AutoZoomService: drives the camera zoom from per-frame detections
//!
//! One call to `process_frame` runs the whole chain for a frame:
//! throttle, detect, track, filter by activity, select, compute the framing
//! error, gate, PD control, log scaling, then rate and range limits before
//! the actuator is called. Calls must not overlap.

use crate::activity::ActivityClassifier;
use crate::actuator::ZoomActuator;
use crate::config::{AutoZoomConfig, SelectionStrategy, SportMode};
use crate::detector_trait::ObjectDetector;
use crate::hysteresis::HysteresisGate;
use crate::pid::PidController;
use crate::selector::AthleteSelector;
use crate::target_zoom::TargetZoomCalculator;
use crate::throttler::FrameThrottler;
use crate::types::{AutoZoomResult, FrameSize, ImageData, ZoomMode, ZoomState};
use crate::zoom_constraint::ZoomConstraint;
use crate::zoom_scaling::LogScaler;
use athletetrack::{ByteMultiTracker, Track, TrackId};
use std::time::{SystemTime, UNIX_EPOCH};

/// Nominal camera frame rate the control loop integrates against
const NOMINAL_FPS: f32 = 30.0;
/// Zoom changes at or below this are not sent to the actuator
const MIN_ZOOM_STEP: f32 = 0.001;

pub struct AutoZoomService {
    throttler: FrameThrottler,
    detector: Box<dyn ObjectDetector>,
    tracker: ByteMultiTracker,
    activity: ActivityClassifier,
    selector: Box<dyn AthleteSelector>,
    target_calc: TargetZoomCalculator,
    gate: HysteresisGate,
    pid: PidController,
    scaler: LogScaler,
    constraint: ZoomConstraint,
    actuator: Box<dyn ZoomActuator>,
    config: AutoZoomConfig,
    sport_mode: SportMode,
    zoom_state: ZoomState,
}

impl AutoZoomService {
    /// Service tuned with the preset for `sport_mode`
    pub fn new(
        detector: Box<dyn ObjectDetector>,
        actuator: Box<dyn ZoomActuator>,
        sport_mode: SportMode,
    ) -> Self {
        Self::with_config(
            detector,
            actuator,
            sport_mode,
            AutoZoomConfig::default_for(sport_mode),
        )
    }

    pub fn with_config(
        detector: Box<dyn ObjectDetector>,
        actuator: Box<dyn ZoomActuator>,
        sport_mode: SportMode,
        config: AutoZoomConfig,
    ) -> Self {
        let mut service = Self {
            throttler: FrameThrottler::new(config.analysis_interval),
            detector,
            tracker: ByteMultiTracker::new(
                config.min_confidence,
                config.track_buffer,
                config.iou_threshold,
            ),
            activity: ActivityClassifier::with_threshold(config.shape_variance_threshold),
            selector: config.selection_strategy.create(),
            target_calc: TargetZoomCalculator::new(
                config.target_height_ratio,
                config.height_smoothing_alpha,
            ),
            gate: HysteresisGate::new(config.start_threshold, config.stop_threshold),
            pid: PidController::new(config.kp, config.kd),
            scaler: LogScaler::new(config.k_zoom),
            constraint: ZoomConstraint::new(config.min_zoom, config.max_zoom, config.ramp_rate),
            actuator,
            config: config.clone(),
            sport_mode,
            zoom_state: ZoomState::default(),
        };
        // Pushes the config into the detector and actuator as well
        service.apply_config(config);

        log::info!(
            "AutoZoomService initialized: mode={}, detector={}, strategy={:?}",
            service.sport_mode,
            service.detector.name(),
            service.config.selection_strategy
        );
        service
    }

    /// Run the pipeline on one frame, timing the controller by wall clock
    pub fn process_frame(
        &mut self,
        image: &ImageData,
        frame_number: u64,
        frame_size: FrameSize,
        sport_mode: SportMode,
        current_zoom: f32,
    ) -> AutoZoomResult {
        let now_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        self.process_frame_at(image, frame_number, frame_size, sport_mode, current_zoom, now_ms)
    }

    /// Run the pipeline on one frame observed at `timestamp_ms`
    pub fn process_frame_at(
        &mut self,
        image: &ImageData,
        frame_number: u64,
        frame_size: FrameSize,
        sport_mode: SportMode,
        current_zoom: f32,
        timestamp_ms: u64,
    ) -> AutoZoomResult {
        if sport_mode != self.sport_mode {
            self.set_sport_mode(sport_mode);
        }
        if !self.throttler.should_process() {
            return AutoZoomResult::default();
        }
        self.zoom_state.current_zoom = current_zoom;

        let detections = match self.detector.detect(image) {
            Ok(detections) => detections,
            Err(e) => {
                log::warn!(
                    "Frame {} ({}x{}) - {} detector failed, continuing with no detections: {}",
                    frame_number,
                    frame_size.width,
                    frame_size.height,
                    self.detector.name(),
                    e
                );
                Vec::new()
            }
        };

        let tracks = self.tracker.update(&detections);
        let active_tracks: Vec<Track> = tracks
            .iter()
            .filter(|t| t.misses == 0 && self.activity.is_active(t))
            .cloned()
            .collect();
        // History survives occlusion but not eviction
        self.activity.retain_tracks(&self.tracker.track_ids());

        let Some(target) = self.selector.select_target(&active_tracks) else {
            return AutoZoomResult {
                detections,
                tracks,
                active_tracks,
                target: None,
                applied_zoom: None,
                is_processed: true,
            };
        };

        let applied_zoom = self.control_step(&target, current_zoom, timestamp_ms);

        AutoZoomResult {
            detections,
            tracks,
            active_tracks,
            target: Some(target),
            applied_zoom,
            is_processed: true,
        }
    }

    /// Error, gate, PD, log scale and constraint for the selected subject.
    /// Returns the zoom sent to the actuator, if any.
    fn control_step(&mut self, target: &Track, current_zoom: f32, timestamp_ms: u64) -> Option<f32> {
        let dt = (1.0 / NOMINAL_FPS) * self.throttler.interval_multiplier();

        let error = self.target_calc.calculate_error(target);
        let relative_error = self.target_calc.relative_error(error);

        if !self.gate.should_update(relative_error) {
            self.pid.reset();
            return None;
        }

        let velocity = self.pid.calculate(error, timestamp_ms);
        let log_velocity = self.scaler.scale(velocity, current_zoom);
        let next_zoom = self
            .constraint
            .constrain(current_zoom + log_velocity * dt, current_zoom, dt);
        self.zoom_state.target_zoom = next_zoom;

        if self.zoom_state.mode != ZoomMode::Auto
            || (next_zoom - current_zoom).abs() <= MIN_ZOOM_STEP
        {
            return None;
        }

        log::debug!(
            "AutoZoom - Track {}: rel_error={:.3}, velocity={:.3}, zoom {:.3} -> {:.3}",
            target.id,
            relative_error,
            velocity,
            current_zoom,
            next_zoom
        );
        self.actuator.apply_zoom(next_zoom);
        self.zoom_state.current_zoom = next_zoom;
        Some(next_zoom)
    }

    /// Switch to the preset for `mode`
    pub fn set_sport_mode(&mut self, mode: SportMode) {
        log::info!("Switching sport mode: {} -> {}", self.sport_mode, mode);
        self.apply_config(AutoZoomConfig::default_for(mode));
        self.sport_mode = mode;
    }

    /// Push new tunables into every stage.
    ///
    /// Track identities survive a parameter change. Only a change of
    /// selection strategy triggers a full reset.
    pub fn apply_config(&mut self, config: AutoZoomConfig) {
        for problem in config.validate() {
            log::warn!("Config - {}", problem);
        }

        if config.selection_strategy != self.selector.strategy() {
            log::info!(
                "Selection strategy changed: {:?} -> {:?}, resetting pipeline",
                self.selector.strategy(),
                config.selection_strategy
            );
            self.selector = config.selection_strategy.create();
            self.reset();
        }

        self.throttler.set_interval(config.analysis_interval);
        self.detector.set_confidence_threshold(config.min_confidence);
        self.target_calc.set_target_height_ratio(config.target_height_ratio);
        self.target_calc.set_smoothing_alpha(config.height_smoothing_alpha);
        self.pid.update_gains(config.kp, config.kd);
        self.scaler.update_gain(config.k_zoom);
        self.constraint
            .update_limits(config.min_zoom, config.max_zoom, config.ramp_rate);
        self.actuator.update_ramp_rate(config.ramp_rate);
        self.activity.update_threshold(config.shape_variance_threshold);
        self.gate
            .update_thresholds(config.start_threshold, config.stop_threshold);
        self.tracker
            .update_config(config.track_buffer, config.min_confidence);
        self.tracker.set_match_threshold(config.iou_threshold);

        log::info!(
            "Applied config: target={:.2}, kp={}, kd={}, k_zoom={}, zoom=[{}, {}], ramp={}",
            config.target_height_ratio,
            config.kp,
            config.kd,
            config.k_zoom,
            config.min_zoom,
            config.max_zoom,
            config.ramp_rate
        );
        self.config = config;
    }

    /// Close the current detector and install `detector` in its place
    pub fn update_detector(&mut self, mut detector: Box<dyn ObjectDetector>) {
        log::info!(
            "Replacing detector {} with {}",
            self.detector.name(),
            detector.name()
        );
        self.detector.close();
        detector.set_confidence_threshold(self.config.min_confidence);
        self.detector = detector;
    }

    pub fn set_zoom_mode(&mut self, mode: ZoomMode) {
        if mode == self.zoom_state.mode {
            return;
        }
        log::info!("Zoom mode: {:?} -> {:?}", self.zoom_state.mode, mode);
        self.zoom_state.mode = mode;
        self.zoom_state.is_auto_zoom = mode == ZoomMode::Auto;
        self.pid.reset();
        self.gate.reset();
    }

    /// Pin the single-subject selector to a track
    pub fn lock_subject(&mut self, track_id: Option<TrackId>) {
        self.selector.set_locked_id(track_id);
    }

    /// Clear all tracking and control state. Tunables are kept.
    pub fn reset(&mut self) {
        log::info!("Resetting auto-zoom pipeline");
        self.pid.reset();
        self.gate.reset();
        self.tracker.clear_trackers();
        self.activity.reset();
        self.selector.reset();
        self.target_calc.reset();
    }

    /// Release the detector and clear state
    pub fn cleanup(&mut self) {
        self.detector.close();
        self.reset();
    }

    pub fn config(&self) -> &AutoZoomConfig {
        &self.config
    }

    pub fn sport_mode(&self) -> SportMode {
        self.sport_mode
    }

    pub fn zoom_state(&self) -> &ZoomState {
        &self.zoom_state
    }

    pub fn selection_strategy(&self) -> SelectionStrategy {
        self.selector.strategy()
    }

    pub fn locked_subject(&self) -> Option<TrackId> {
        self.selector.locked_id()
    }

    /// True while the hysteresis gate lets the controller run
    pub fn is_zoom_engaged(&self) -> bool {
        self.gate.is_engaged()
    }

    pub fn tracker(&self) -> &ByteMultiTracker {
        &self.tracker
    }

    pub fn target_calculator(&self) -> &TargetZoomCalculator {
        &self.target_calc
    }

    pub fn activity(&self) -> &ActivityClassifier {
        &self.activity
    }

    pub fn detector_name(&self) -> &str {
        self.detector.name()
    }
}
