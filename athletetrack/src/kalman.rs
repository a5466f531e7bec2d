//! Kalman filter implementation for tracking
//!
//! State is `[cx, cy, aspect_ratio, height, vcx, vcy, vaspect, vheight]` with a
//! diagonal covariance. The measurement update uses a fixed scalar gain on both
//! the position and the velocity half of the state instead of a recomputed
//! optimal gain; tracking smoothness is tuned around that constant.

use crate::bbox::{Bbox, MIN_HEIGHT};
use nalgebra::{SVector, Vector4};

pub type StateVector = SVector<f32, 8>;

const STD_WEIGHT_POSITION: f32 = 1.0 / 20.0;
const STD_WEIGHT_VELOCITY: f32 = 1.0 / 160.0;
const STD_ASPECT: f32 = 1e-2;
const STD_ASPECT_VELOCITY: f32 = 1e-5;

/// Gain applied to every innovation in `update`
pub const FIXED_GAIN: f32 = 0.4;

#[derive(Debug, Clone)]
pub struct KalmanBoxFilter {
    /// State vector
    x: StateVector,
    /// Diagonal of the state covariance matrix
    p: StateVector,
}

impl KalmanBoxFilter {
    /// Create a filter seeded from a detection box with zero velocity
    pub fn new(bbox: &Bbox) -> Self {
        let z = bbox.to_xyah();
        let h = z[3];
        let x = StateVector::from_column_slice(&[z[0], z[1], z[2], h, 0.0, 0.0, 0.0, 0.0]);

        let std = StateVector::from_column_slice(&[
            2.0 * STD_WEIGHT_POSITION * h,
            2.0 * STD_WEIGHT_POSITION * h,
            STD_ASPECT,
            2.0 * STD_WEIGHT_POSITION * h,
            10.0 * STD_WEIGHT_VELOCITY * h,
            10.0 * STD_WEIGHT_VELOCITY * h,
            STD_ASPECT_VELOCITY,
            10.0 * STD_WEIGHT_VELOCITY * h,
        ]);

        Self {
            x,
            p: std.component_mul(&std),
        }
    }

    /// Advance one step with the constant-velocity model
    pub fn predict(&mut self) -> Bbox {
        for i in 0..4 {
            self.x[i] += self.x[i + 4];
        }
        self.clamp_height();

        // Process noise scales with the current height
        let h = self.x[3];
        let q = StateVector::from_column_slice(&[
            STD_WEIGHT_POSITION * h,
            STD_WEIGHT_POSITION * h,
            STD_ASPECT,
            STD_WEIGHT_POSITION * h,
            STD_WEIGHT_VELOCITY * h,
            STD_WEIGHT_VELOCITY * h,
            STD_ASPECT_VELOCITY,
            STD_WEIGHT_VELOCITY * h,
        ]);
        self.p += q.component_mul(&q);

        self.current_rect()
    }

    /// Correct the state with a measured box
    pub fn update(&mut self, measurement: &Bbox) {
        let z = Vector4::from(measurement.to_xyah());

        for i in 0..4 {
            let innovation = z[i] - self.x[i];
            self.x[i] += FIXED_GAIN * innovation;
            self.x[i + 4] += FIXED_GAIN * innovation;
        }
        self.clamp_height();
    }

    /// Reconstruct the box from `(cx, cy, aspect_ratio, height)`
    pub fn current_rect(&self) -> Bbox {
        Bbox::from_xyah(&[self.x[0], self.x[1], self.x[2], self.x[3]])
    }

    /// Get current state
    pub fn state(&self) -> &StateVector {
        &self.x
    }

    /// Get the covariance diagonal
    pub fn covariance(&self) -> &StateVector {
        &self.p
    }

    /// Center velocity `(vcx, vcy)` per step
    pub fn velocity(&self) -> (f32, f32) {
        (self.x[4], self.x[5])
    }

    fn clamp_height(&mut self) {
        if self.x[3].is_nan() || self.x[3] < MIN_HEIGHT {
            self.x[3] = MIN_HEIGHT;
        }
    }
}
