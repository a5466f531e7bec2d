//! PD controller turning framing error into a zoom rate
//!
//! There is no integral term. The derivative needs two samples, so the first
//! call after construction or `reset` only records state and returns 0.

/// Gaps longer than this are treated as a pause, not a derivative step
const MAX_DT_SECONDS: f32 = 1.0;

#[derive(Debug, Clone)]
pub struct PidController {
    kp: f32,
    kd: f32,
    last_error: f32,
    last_time_ms: Option<u64>,
}

impl PidController {
    pub fn new(kp: f32, kd: f32) -> Self {
        Self {
            kp,
            kd,
            last_error: 0.0,
            last_time_ms: None,
        }
    }

    /// Velocity command for `error` observed at `timestamp_ms`
    pub fn calculate(&mut self, error: f32, timestamp_ms: u64) -> f32 {
        let Some(last_time_ms) = self.last_time_ms else {
            self.last_error = error;
            self.last_time_ms = Some(timestamp_ms);
            return 0.0;
        };

        let dt = (timestamp_ms as f64 - last_time_ms as f64) / 1000.0;
        if dt <= 0.0 || dt > f64::from(MAX_DT_SECONDS) {
            self.last_time_ms = Some(timestamp_ms);
            return 0.0;
        }

        let derivative = (error - self.last_error) / dt as f32;
        let velocity = self.kp * error + self.kd * derivative;

        self.last_error = error;
        self.last_time_ms = Some(timestamp_ms);
        velocity
    }

    pub fn update_gains(&mut self, kp: f32, kd: f32) {
        self.kp = kp;
        self.kd = kd;
    }

    pub fn gains(&self) -> (f32, f32) {
        (self.kp, self.kd)
    }

    pub fn is_primed(&self) -> bool {
        self.last_time_ms.is_some()
    }

    pub fn reset(&mut self) {
        self.last_error = 0.0;
        self.last_time_ms = None;
    }
}
