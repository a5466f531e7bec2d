//! Frame-scoped detector output

use crate::bbox::Bbox;
use serde::{Deserialize, Serialize};

/// Class id of the subject class (person / athlete)
pub const SUBJECT_CLASS_ID: u32 = 0;

/// Single detection result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// Bounding box coordinates (normalized)
    pub bbox: Bbox,
    /// Detection confidence score (0-1)
    pub confidence: f32,
    /// Object class id
    pub class_id: u32,
}

impl Detection {
    /// Create new detection
    pub fn new(bbox: Bbox, confidence: f32, class_id: u32) -> Self {
        Self {
            bbox,
            confidence,
            class_id,
        }
    }

    /// Detection of the subject class
    pub fn subject(bbox: Bbox, confidence: f32) -> Self {
        Self::new(bbox, confidence, SUBJECT_CLASS_ID)
    }
}
