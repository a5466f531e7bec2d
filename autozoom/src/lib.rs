//! Automatic camera zoom for sports video
//!
//! Turns per-frame athlete detections into a smooth, bounded zoom signal.
//! Detection and the camera itself stay outside the crate, behind the
//! [`ObjectDetector`] and [`ZoomActuator`] traits; everything in between
//! (tracking, activity filtering, subject selection and the control loop)
//! runs inside [`AutoZoomService`].
//!
//! ```rust,ignore
//! use autozoom::simulated::{SharedZoom, SimulatedZoomActuator, ZoomingSceneDetector};
//! use autozoom::{AutoZoomService, FrameSize, ImageData, ImageFormat, SportMode};
//!
//! let zoom = SharedZoom::default();
//! let mut service = AutoZoomService::new(
//!     Box::new(ZoomingSceneDetector::still(zoom.clone(), subjects)),
//!     Box::new(SimulatedZoomActuator::new(zoom.clone())),
//!     SportMode::Basketball,
//! );
//! let image = ImageData::blank(640, 360, ImageFormat::RGB);
//! let result = service.process_frame(&image, 0, image.size(), SportMode::Basketball, zoom.get());
//! ```

pub mod activity;
pub mod actuator;
pub mod config;
pub mod detector_trait;
pub mod error;
pub mod hysteresis;
pub mod pid;
pub mod selector;
pub mod service;
pub mod simulated;
pub mod smoothing;
pub mod target_zoom;
pub mod throttler;
pub mod types;
pub mod zoom_constraint;
pub mod zoom_scaling;

pub use activity::{ActivityClassifier, ActivityConfig};
pub use actuator::ZoomActuator;
pub use config::{AutoZoomConfig, SelectionStrategy, SportMode};
pub use detector_trait::ObjectDetector;
pub use error::{AutoZoomError, Result};
pub use hysteresis::HysteresisGate;
pub use pid::PidController;
pub use selector::{AthleteSelector, GroupSelector, SingleSubjectSelector, GROUP_TRACK_ID};
pub use service::AutoZoomService;
pub use smoothing::ExponentialSmoother;
pub use target_zoom::TargetZoomCalculator;
pub use throttler::FrameThrottler;
pub use types::{AutoZoomResult, FrameSize, ImageData, ImageFormat, ZoomMode, ZoomState};
pub use zoom_constraint::ZoomConstraint;
pub use zoom_scaling::LogScaler;

pub use athletetrack::{Bbox, Detection, Track, TrackId, TrackState};

/// Initialize the auto-zoom library
pub fn init() -> Result<()> {
    log::info!("Auto-zoom library initialized (v{})", version());
    Ok(())
}

/// Get library version information
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
