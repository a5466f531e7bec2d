//! Integration tests for the auto-zoom pipeline.
//!
//! These drive `AutoZoomService` through its public API with simulated
//! detectors and a simulated zoom actuator.

use autozoom::simulated::{
    ActuationLog, ReplayDetector, SharedZoom, SimulatedZoomActuator, ZoomingSceneDetector,
};
use autozoom::{
    ActivityClassifier, AutoZoomConfig, AutoZoomResult, AutoZoomService, Bbox, Detection,
    FrameSize, HysteresisGate, ImageData, ImageFormat, ObjectDetector, SelectionStrategy,
    SportMode, Track, TrackId, TrackState, ZoomMode,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;

const FRAME_MS: u64 = 33;
const EPS: f32 = 1e-4;

struct Session {
    service: AutoZoomService,
    zoom: SharedZoom,
    log: ActuationLog,
    image: ImageData,
    frame: u64,
}

impl Session {
    fn new(detector: impl ObjectDetector + 'static, zoom: SharedZoom, config: AutoZoomConfig) -> Self {
        let actuator = SimulatedZoomActuator::new(zoom.clone());
        let log = actuator.log();
        let service = AutoZoomService::with_config(
            Box::new(detector),
            Box::new(actuator),
            SportMode::Basketball,
            config,
        );
        Self {
            service,
            zoom,
            log,
            image: ImageData::blank(16, 9, ImageFormat::RGB),
            frame: 0,
        }
    }

    /// Closed loop: the detector sees the zoom the actuator applied
    fn closed_loop(subjects: Vec<Detection>, config: AutoZoomConfig) -> Self {
        let zoom = SharedZoom::default();
        let detector = ZoomingSceneDetector::still(zoom.clone(), subjects);
        Self::new(detector, zoom, config)
    }

    fn replay(frames: Vec<Vec<Detection>>) -> Self {
        Self::new(
            ReplayDetector::new(frames),
            SharedZoom::default(),
            AutoZoomConfig::default(),
        )
    }

    fn step(&mut self) -> AutoZoomResult {
        self.frame += 1;
        let mode = self.service.sport_mode();
        self.service.process_frame_at(
            &self.image,
            self.frame,
            FrameSize::new(1920, 1080),
            mode,
            self.zoom.get(),
            self.frame * FRAME_MS,
        )
    }

    fn run(&mut self, frames: usize) -> Vec<AutoZoomResult> {
        (0..frames).map(|_| self.step()).collect()
    }
}

fn subject_at(cx: f32, cy: f32, height: f32, confidence: f32) -> Detection {
    Detection::subject(Bbox::from_center(cx, cy, height * 0.5, height), confidence)
}

fn visible_ids(results: &[AutoZoomResult]) -> HashSet<TrackId> {
    results
        .iter()
        .flat_map(|r| r.tracks.iter().map(|t| t.id))
        .collect()
}

fn assert_ramp_bound(start: f32, applied: &[f32], max_step: f32) {
    let mut previous = start;
    for (i, &zoom) in applied.iter().enumerate() {
        assert!(
            (zoom - previous).abs() <= max_step + EPS,
            "Actuation {}: step {:.4} -> {:.4} exceeds {:.4}",
            i,
            previous,
            zoom,
            max_step
        );
        previous = zoom;
    }
}

// =============================================================================
// Hold and bounds
// =============================================================================

#[test]
fn test_zero_detections_hold_zoom_exactly() {
    let zoom = SharedZoom::new(1.7);
    let mut session = Session::new(ReplayDetector::new(vec![]), zoom, AutoZoomConfig::default());

    let results = session.run(50);

    assert!(results.iter().all(|r| r.is_processed && r.active_tracks.is_empty()));
    assert_eq!(session.log.count(), 0);
    assert_eq!(session.zoom.get(), 1.7);
    assert_eq!(session.service.zoom_state().current_zoom, 1.7);
}

#[test]
fn test_lost_subject_holds_last_zoom() {
    let mut frames = vec![vec![subject_at(0.5, 0.5, 0.1, 0.9)]; 10];
    frames.extend(vec![vec![]; 40]);
    let mut session = Session::replay(frames);

    session.run(10);
    let held = session.zoom.get();
    assert!(held > 1.0);
    let applied_before = session.log.count();

    let results = session.run(40);
    assert!(results.iter().all(|r| r.target.is_none()));
    assert_eq!(session.log.count(), applied_before);
    assert_eq!(session.zoom.get(), held);
}

#[test]
fn test_ramp_and_range_bounds_at_max_zoom() {
    let config = AutoZoomConfig::default();
    let mut session = Session::closed_loop(vec![subject_at(0.5, 0.5, 0.02, 0.9)], config.clone());

    let results = session.run(200);
    let applied = session.log.applied();

    assert_ramp_bound(1.0, &applied, config.ramp_rate / 30.0);
    assert!(applied
        .iter()
        .all(|&z| (config.min_zoom..=config.max_zoom).contains(&z)));
    assert_eq!(session.zoom.get(), config.max_zoom);
    assert!(results.iter().all(|r| r.applied_zoom.map_or(true, |z| z <= config.max_zoom)));
}

#[test]
fn test_range_bound_at_min_zoom() {
    let mut session = Session::closed_loop(
        vec![subject_at(0.5, 0.5, 0.9, 0.9)],
        AutoZoomConfig::default(),
    );

    session.run(60);

    // Subject is already too large at the widest setting
    assert_eq!(session.log.count(), 0);
    assert_eq!(session.zoom.get(), 1.0);
}

#[test]
fn test_ramp_bound_scales_with_analysis_interval() {
    let config = AutoZoomConfig {
        analysis_interval: 3,
        ..AutoZoomConfig::default()
    };
    let mut session = Session::closed_loop(vec![subject_at(0.5, 0.5, 0.08, 0.9)], config.clone());

    let results = session.run(90);

    for (i, result) in results.iter().enumerate() {
        assert_eq!(result.is_processed, (i + 1) % 3 == 0, "Frame {}", i + 1);
    }
    let applied = session.log.applied();
    assert!(!applied.is_empty());
    assert_ramp_bound(1.0, &applied, config.ramp_rate * 3.0 / 30.0);
}

// =============================================================================
// Hysteresis
// =============================================================================

#[test]
fn test_hysteresis_sequence() {
    let mut gate = HysteresisGate::new(0.15, 0.05);
    let engaged: Vec<bool> = [0.10, 0.20, 0.07, 0.03]
        .iter()
        .map(|&e| gate.should_update(e))
        .collect();
    assert_eq!(engaged, vec![false, true, true, false]);
}

// =============================================================================
// Tracking continuity and eviction
// =============================================================================

#[test]
fn test_drifting_subject_keeps_one_id() {
    for drift in [0.002_f32, 0.005, 0.008] {
        let frames: Vec<Vec<Detection>> = (0..100)
            .map(|f| vec![subject_at(0.1 + drift * f as f32, 0.5, 0.3, 0.9)])
            .collect();
        let mut session = Session::replay(frames);
        session.service.set_zoom_mode(ZoomMode::Manual);

        let results = session.run(100);

        assert_eq!(visible_ids(&results), HashSet::from([1]), "drift {}", drift);
        assert!(results[2..].iter().all(|r| r.tracks.len() == 1), "drift {}", drift);
    }
}

#[test]
fn test_jittered_subject_keeps_one_id() {
    let mut rng = StdRng::seed_from_u64(7);
    let frames: Vec<Vec<Detection>> = (0..100)
        .map(|_| {
            let cx = 0.5 + rng.gen_range(-0.005..0.005);
            let cy = 0.5 + rng.gen_range(-0.005..0.005);
            let conf = rng.gen_range(0.5..0.95);
            vec![subject_at(cx, cy, 0.3, conf)]
        })
        .collect();
    let mut session = Session::replay(frames);

    let results = session.run(100);

    assert_eq!(visible_ids(&results), HashSet::from([1]));
    assert_eq!(session.service.tracker().num_tracklets(), 1);
}

#[test]
fn test_confirmed_track_evicted_after_buffer() {
    let buffer = AutoZoomConfig::default().track_buffer as usize;
    let mut frames = vec![vec![subject_at(0.5, 0.5, 0.3, 0.9)]; 3];
    frames.extend(vec![vec![]; buffer + 1]);
    let mut session = Session::replay(frames);

    let results = session.run(3);
    assert_eq!(results[2].tracks.len(), 1);
    assert!(session.service.activity().history_len(1) > 0);

    let results = session.run(buffer);
    assert!(results.iter().all(|r| r.tracks.is_empty()));
    let held: Vec<&Track> = session.service.tracker().tracks().collect();
    assert_eq!(held.len(), 1);
    assert_eq!(held[0].state, TrackState::Lost);
    assert!(session.service.activity().history_len(1) > 0);

    session.step();
    assert_eq!(session.service.tracker().num_tracklets(), 0);
    assert_eq!(session.service.activity().history_len(1), 0);
}

// =============================================================================
// Activity classification
// =============================================================================

#[test]
fn test_activity_constant_vs_oscillating() {
    let track = |bbox: Bbox| Track {
        id: 1,
        bbox,
        confidence: 0.9,
        age: 1,
        hits: 2,
        misses: 0,
        state: TrackState::Confirmed,
    };

    let mut constant = ActivityClassifier::default();
    let still = track(Bbox::from_center(0.5, 0.5, 0.1, 0.3));
    let decisions: Vec<bool> = (0..12).map(|_| constant.is_active(&still)).collect();
    assert!(decisions[..9].iter().all(|&a| a));
    assert!(!decisions[11]);

    let mut oscillating = ActivityClassifier::default();
    let mut last = false;
    for i in 0..30 {
        let width = if i % 2 == 0 { 0.11 } else { 0.09 };
        last = oscillating.is_active(&track(Bbox::from_center(0.5, 0.5, width, 0.3)));
    }
    assert!(last);
}

#[test]
fn test_static_subject_filtered_from_active_tracks() {
    let frames = vec![vec![subject_at(0.5, 0.5, 0.3, 0.9)]; 20];
    let mut session = Session::replay(frames);
    session.service.set_zoom_mode(ZoomMode::Manual);

    let results = session.run(20);

    assert_eq!(results[2].active_tracks.len(), 1);
    let last = &results[19];
    assert_eq!(last.tracks.len(), 1);
    assert!(last.active_tracks.is_empty());
    assert!(!last.has_target());
}

// =============================================================================
// End-to-end
// =============================================================================

/// Direction changes the closed loop may make on its way to the target.
/// The smoothed height lags the zoom, so the loop overshoots before it settles.
const MAX_REVERSALS: usize = 16;

fn direction_reversals(start: f32, applied: &[f32]) -> usize {
    let steps: Vec<f32> = std::iter::once(start)
        .chain(applied.iter().copied())
        .collect::<Vec<_>>()
        .windows(2)
        .map(|w| w[1] - w[0])
        .collect();
    steps
        .windows(2)
        .filter(|w| (w[0] > 0.0) != (w[1] > 0.0))
        .count()
}

#[test]
fn test_end_to_end_converges_with_bounded_hunting() {
    let config = AutoZoomConfig::default_for(SportMode::Basketball);
    let mut session = Session::closed_loop(vec![subject_at(0.5, 0.5, 0.10, 0.9)], config.clone());

    let mut results = Vec::new();
    let mut disengaged_at = Vec::new();
    let mut was_engaged = false;
    for frame in 0..400 {
        results.push(session.step());
        let engaged = session.service.is_zoom_engaged();
        if was_engaged && !engaged {
            let smoothed = session
                .service
                .target_calculator()
                .smoothed_height()
                .unwrap_or(0.0);
            let relative_error =
                (config.target_height_ratio - smoothed) / config.target_height_ratio;
            assert!(
                relative_error.abs() < config.stop_threshold,
                "Frame {}: released at relative error {:.4}",
                frame,
                relative_error
            );
            disengaged_at.push(frame);
        }
        was_engaged = engaged;
    }
    let applied = session.log.applied();

    // Zooms in from the start
    assert!(applied.len() >= 5);
    assert!(applied[0] > 1.0);
    assert!(applied[..5].windows(2).all(|w| w[1] > w[0]));

    assert_ramp_bound(1.0, &applied, config.ramp_rate / 30.0);
    assert!(applied
        .iter()
        .all(|&z| (config.min_zoom..=config.max_zoom).contains(&z)));

    let reversals = direction_reversals(1.0, &applied);
    assert!(
        reversals <= MAX_REVERSALS,
        "{} direction changes over {} actuations",
        reversals,
        applied.len()
    );

    // Settles and holds
    let settled = *disengaged_at.last().expect("gate never released");
    assert!(settled < 150, "settled at frame {}", settled);
    assert!(results[settled..].iter().all(|r| r.applied_zoom.is_none()));
    assert!(!session.service.is_zoom_engaged());

    let final_zoom = session.zoom.get();
    assert!(final_zoom > 2.5, "final zoom {}", final_zoom);
    let relative_error =
        (config.target_height_ratio - 0.10 * final_zoom) / config.target_height_ratio;
    assert!(relative_error.abs() < config.start_threshold);

    let target_ids: HashSet<TrackId> = results
        .iter()
        .filter_map(|r| r.target.as_ref().map(|t| t.id))
        .collect();
    assert_eq!(target_ids, HashSet::from([1]));
}

#[test]
fn test_group_strategy_frames_everyone() {
    let config = AutoZoomConfig {
        selection_strategy: SelectionStrategy::Group,
        ..AutoZoomConfig::default()
    };
    let mut session = Session::closed_loop(
        vec![
            subject_at(0.4, 0.5, 0.08, 0.9),
            subject_at(0.6, 0.55, 0.08, 0.7),
        ],
        config,
    );

    let results = session.run(5);

    let target = results[4].target.as_ref().expect("group target");
    assert_eq!(target.id, autozoom::GROUP_TRACK_ID);
    assert_eq!(results[4].active_tracks.len(), 2);
    assert!(target.bbox.height() > results[4].active_tracks[0].bbox.height());
}

// =============================================================================
// Reconfiguration
// =============================================================================

#[test]
fn test_parameter_tweak_keeps_tracks() {
    let frames = vec![vec![subject_at(0.5, 0.5, 0.3, 0.9)]; 10];
    let mut session = Session::replay(frames);
    session.run(5);
    assert_eq!(session.service.tracker().track_ids(), vec![1]);

    session.service.apply_config(AutoZoomConfig {
        kp: 4.0,
        ramp_rate: 3.0,
        ..AutoZoomConfig::default()
    });

    assert_eq!(session.service.tracker().track_ids(), vec![1]);
    assert_eq!(session.service.config().kp, 4.0);
    assert_eq!(session.log.last_ramp_rate(), Some(3.0));
    let result = session.step();
    assert_eq!(result.tracks[0].id, 1);
}

#[test]
fn test_strategy_change_resets_pipeline() {
    let frames = vec![vec![subject_at(0.5, 0.5, 0.1, 0.9)]; 10];
    let mut session = Session::replay(frames);
    session.run(5);
    assert!(session.service.is_zoom_engaged());
    assert_eq!(session.service.locked_subject(), Some(1));

    session.service.apply_config(AutoZoomConfig {
        selection_strategy: SelectionStrategy::Group,
        ..AutoZoomConfig::default()
    });

    assert_eq!(session.service.selection_strategy(), SelectionStrategy::Group);
    assert_eq!(session.service.tracker().num_tracklets(), 0);
    assert!(!session.service.is_zoom_engaged());
    assert_eq!(session.service.activity().history_len(1), 0);

    // Ids restart after the reset
    let results = session.run(2);
    assert_eq!(results[1].tracks[0].id, 1);
}

#[test]
fn test_sport_mode_switch_keeps_tracks_and_pushes_ramp() {
    let frames = vec![vec![subject_at(0.5, 0.5, 0.3, 0.9)]; 10];
    let mut session = Session::replay(frames);
    session.run(3);
    assert_eq!(session.log.last_ramp_rate(), Some(4.0));

    session.service.set_sport_mode(SportMode::Ski);

    assert_eq!(session.service.sport_mode(), SportMode::Ski);
    assert_eq!(session.service.config().track_buffer, 30);
    assert_eq!(session.log.last_ramp_rate(), Some(2.0));
    assert_eq!(session.service.tracker().track_ids(), vec![1]);
}

// =============================================================================
// Failures and lifecycle
// =============================================================================

#[test]
fn test_detector_failure_is_not_fatal() {
    let frames = vec![vec![subject_at(0.5, 0.5, 0.3, 0.9)]; 10];
    let detector = ReplayDetector::new(frames).with_failures([4]);
    let mut session = Session::new(detector, SharedZoom::default(), AutoZoomConfig::default());

    let results = session.run(10);

    let failed = &results[4];
    assert!(failed.is_processed);
    assert!(failed.detections.is_empty());
    assert!(failed.tracks.is_empty());

    let recovered = &results[5];
    assert_eq!(recovered.tracks.len(), 1);
    assert_eq!(recovered.tracks[0].id, 1);
    assert_eq!(visible_ids(&results), HashSet::from([1]));
}

#[test]
fn test_cleanup_clears_state() {
    let frames = vec![vec![subject_at(0.5, 0.5, 0.3, 0.9)]; 10];
    let mut session = Session::replay(frames);
    session.run(4);

    session.service.cleanup();

    assert_eq!(session.service.tracker().num_tracklets(), 0);
    assert_eq!(session.service.locked_subject(), None);
    // The closed replay detector fails; frames keep being processed
    let result = session.step();
    assert!(result.is_processed);
    assert!(result.detections.is_empty());
}
