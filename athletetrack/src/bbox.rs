//! Bounding box operations and IoU calculations
//!
//! Boxes are axis-aligned and normalized to [0, 1] in both axes with y
//! pointing down, so `ymin` is the top edge.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Floor applied to any height before it is used as a divisor.
pub const MIN_HEIGHT: f32 = 1e-4;

/// Simple bounding box representation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bbox {
    pub xmin: f32,
    pub ymin: f32,
    pub xmax: f32,
    pub ymax: f32,
}

impl Bbox {
    pub fn new(xmin: f32, ymin: f32, xmax: f32, ymax: f32) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Build a box from its center and size
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self::new(
            cx - width / 2.0,
            cy - height / 2.0,
            cx + width / 2.0,
            cy + height / 2.0,
        )
    }

    pub fn width(&self) -> f32 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f32 {
        self.ymax - self.ymin
    }

    /// Height floored to [`MIN_HEIGHT`]
    pub fn safe_height(&self) -> f32 {
        self.height().max(MIN_HEIGHT)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.width() / self.safe_height()
    }

    pub fn center_x(&self) -> f32 {
        (self.xmin + self.xmax) / 2.0
    }

    pub fn center_y(&self) -> f32 {
        (self.ymin + self.ymax) / 2.0
    }

    /// Convert to measurement format [center_x, center_y, aspect_ratio, height]
    /// Used for Kalman filter state representation
    pub fn to_xyah(&self) -> [f32; 4] {
        let h = self.safe_height();
        [self.center_x(), self.center_y(), self.width() / h, h]
    }

    /// Create from measurement format [center_x, center_y, aspect_ratio, height]
    pub fn from_xyah(z: &[f32; 4]) -> Self {
        let h = z[3];
        let w = z[2] * h;
        Self::from_center(z[0], z[1], w, h)
    }

    /// Smallest box containing both boxes
    pub fn union(&self, other: &Bbox) -> Bbox {
        Bbox::new(
            self.xmin.min(other.xmin),
            self.ymin.min(other.ymin),
            self.xmax.max(other.xmax),
            self.ymax.max(other.ymax),
        )
    }

    /// Squared Euclidean distance from the box center to a point
    pub fn center_distance_sq(&self, x: f32, y: f32) -> f32 {
        let dx = self.center_x() - x;
        let dy = self.center_y() - y;
        dx * dx + dy * dy
    }
}

impl fmt::Display for Bbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Bbox({:.3}, {:.3}, {:.3}, {:.3})",
            self.xmin, self.ymin, self.xmax, self.ymax
        )
    }
}

/// Calculate IoU between two bounding boxes
pub fn calculate_iou(bbox1: &Bbox, bbox2: &Bbox) -> f32 {
    let x1 = bbox1.xmin.max(bbox2.xmin);
    let y1 = bbox1.ymin.max(bbox2.ymin);
    let x2 = bbox1.xmax.min(bbox2.xmax);
    let y2 = bbox1.ymax.min(bbox2.ymax);

    if x2 <= x1 || y2 <= y1 {
        return 0.0;
    }

    let intersection = (x2 - x1) * (y2 - y1);
    let union = bbox1.area() + bbox2.area() - intersection;

    if union > 0.0 {
        intersection / union
    } else {
        0.0
    }
}

/// Compute IoU matrix between tracks and detections
/// Returns: (n_tracks, n_detections) IoU matrix
pub fn ious(tracks: &[Bbox], detections: &[Bbox]) -> Array2<f32> {
    Array2::from_shape_fn((tracks.len(), detections.len()), |(t, d)| {
        calculate_iou(&tracks[t], &detections[d])
    })
}
