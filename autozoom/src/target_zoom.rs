//! Framing error from the selected subject's size

use crate::smoothing::ExponentialSmoother;
use athletetrack::Track;

#[derive(Debug, Clone)]
pub struct TargetZoomCalculator {
    target_height_ratio: f32,
    smoother: ExponentialSmoother,
}

impl TargetZoomCalculator {
    pub fn new(target_height_ratio: f32, smoothing_alpha: f32) -> Self {
        Self {
            target_height_ratio,
            smoother: ExponentialSmoother::new(smoothing_alpha),
        }
    }

    /// `target - smoothed height`. Positive means the subject is too small
    /// and the camera should zoom in.
    pub fn calculate_error(&mut self, subject: &Track) -> f32 {
        let smoothed_height = self.smoother.filter(subject.bbox.height());
        let error = self.target_height_ratio - smoothed_height;
        log::debug!(
            "TargetZoom - H={:.4}, Target={:.3}, Error={:.4}",
            smoothed_height,
            self.target_height_ratio,
            error
        );
        error
    }

    /// Error as a fraction of the target, 0 when the target is not positive
    pub fn relative_error(&self, error: f32) -> f32 {
        if self.target_height_ratio > 0.0 {
            error / self.target_height_ratio
        } else {
            0.0
        }
    }

    pub fn set_target_height_ratio(&mut self, ratio: f32) {
        self.target_height_ratio = ratio;
    }

    pub fn target_height_ratio(&self) -> f32 {
        self.target_height_ratio
    }

    /// Smoothed subject height since the last reset
    pub fn smoothed_height(&self) -> Option<f32> {
        self.smoother.last()
    }

    pub fn set_smoothing_alpha(&mut self, alpha: f32) {
        self.smoother.set_alpha(alpha);
    }

    pub fn reset(&mut self) {
        self.smoother.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use athletetrack::{Bbox, TrackState};

    fn subject(height: f32) -> Track {
        Track {
            id: 1,
            bbox: Bbox::from_center(0.5, 0.5, 0.05, height),
            confidence: 0.9,
            age: 3,
            hits: 3,
            misses: 0,
            state: TrackState::Confirmed,
        }
    }

    #[test]
    fn test_error_sign() {
        let mut calc = TargetZoomCalculator::new(0.33, 0.2);
        let error = calc.calculate_error(&subject(0.10));
        assert_abs_diff_eq!(error, 0.23, epsilon = 1e-5);
        assert_abs_diff_eq!(calc.relative_error(error), 0.23 / 0.33, epsilon = 1e-5);

        calc.reset();
        assert!(calc.calculate_error(&subject(0.5)) < 0.0);
    }

    #[test]
    fn test_height_is_smoothed() {
        let mut calc = TargetZoomCalculator::new(0.33, 0.2);
        calc.calculate_error(&subject(0.10));
        // 0.2 * 0.30 + 0.8 * 0.10 = 0.14
        assert_abs_diff_eq!(calc.calculate_error(&subject(0.30)), 0.19, epsilon = 1e-5);
        assert_abs_diff_eq!(calc.smoothed_height().unwrap_or(0.0), 0.14, epsilon = 1e-5);

        calc.reset();
        assert_eq!(calc.smoothed_height(), None);
    }

    #[test]
    fn test_non_positive_target_has_no_relative_error() {
        let calc = TargetZoomCalculator::new(0.0, 0.2);
        assert_eq!(calc.relative_error(0.2), 0.0);
    }
}
