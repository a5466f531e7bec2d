//! Athlete tracking library
//!
//! ByteTrack-style multi-object tracking over normalized bounding boxes. Each
//! track owns a constant-velocity Kalman filter with a fixed update gain, and
//! association is greedy by descending IoU.
//!
//! ```rust,ignore
//! use athletetrack::{Bbox, ByteMultiTracker, Detection, MultiObjectTracker};
//!
//! let mut tracker = ByteMultiTracker::new(0.5, 30, 0.2);
//! let detections = vec![Detection::subject(Bbox::new(0.4, 0.3, 0.5, 0.7), 0.9)];
//! let tracks = tracker.update(&detections);
//! ```

pub mod association;
pub mod bbox;
pub mod detection;
pub mod kalman;
pub mod track;
pub mod trackers;

pub use bbox::{calculate_iou, Bbox, MIN_HEIGHT};
pub use detection::{Detection, SUBJECT_CLASS_ID};
pub use kalman::KalmanBoxFilter;
pub use track::{Track, TrackId, TrackState};
pub use trackers::{ByteMultiTracker, MultiObjectTracker};
