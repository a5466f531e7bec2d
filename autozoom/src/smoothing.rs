/// Single-pole exponential smoother
///
/// The first sample after construction or `reset` passes through unchanged.
#[derive(Debug, Clone)]
pub struct ExponentialSmoother {
    alpha: f32,
    last: Option<f32>,
}

impl ExponentialSmoother {
    pub fn new(alpha: f32) -> Self {
        Self { alpha, last: None }
    }

    pub fn filter(&mut self, value: f32) -> f32 {
        let previous = self.last.unwrap_or(value);
        let filtered = self.alpha * value + (1.0 - self.alpha) * previous;
        self.last = Some(filtered);
        filtered
    }

    pub fn set_alpha(&mut self, alpha: f32) {
        self.alpha = alpha;
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn last(&self) -> Option<f32> {
        self.last
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}
