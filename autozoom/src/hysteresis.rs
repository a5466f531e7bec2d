/// Dual-threshold gate that keeps the controller from hunting around the target
///
/// Idle until `|relative_error| > start_threshold`, then engaged until
/// `|relative_error| < stop_threshold`. Thresholds are used as given.
#[derive(Debug, Clone)]
pub struct HysteresisGate {
    start_threshold: f32,
    stop_threshold: f32,
    engaged: bool,
}

impl HysteresisGate {
    pub fn new(start_threshold: f32, stop_threshold: f32) -> Self {
        Self {
            start_threshold,
            stop_threshold,
            engaged: false,
        }
    }

    /// Feed one relative error sample; true while the controller should run
    pub fn should_update(&mut self, relative_error: f32) -> bool {
        let magnitude = relative_error.abs();
        self.engaged = if self.engaged {
            magnitude >= self.stop_threshold
        } else {
            magnitude > self.start_threshold
        };
        self.engaged
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }

    pub fn update_thresholds(&mut self, start_threshold: f32, stop_threshold: f32) {
        self.start_threshold = start_threshold;
        self.stop_threshold = stop_threshold;
    }

    pub fn reset(&mut self) {
        self.engaged = false;
    }
}
