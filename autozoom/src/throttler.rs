//! Frame throttling: analyze only every n-th frame

#[derive(Debug, Clone)]
pub struct FrameThrottler {
    interval: u32,
    counter: u64,
}

impl Default for FrameThrottler {
    fn default() -> Self {
        Self::new(1)
    }
}

impl FrameThrottler {
    /// A zero interval falls back to analyzing every frame
    pub fn new(interval: u32) -> Self {
        Self {
            interval: interval.max(1),
            counter: 0,
        }
    }

    /// Counts every call; true when the count is a multiple of the interval
    pub fn should_process(&mut self) -> bool {
        self.counter += 1;
        self.counter % u64::from(self.interval) == 0
    }

    /// Change the interval and restart counting. Zero is ignored.
    pub fn set_interval(&mut self, interval: u32) {
        if interval == 0 {
            return;
        }
        self.interval = interval;
        self.counter = 0;
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    /// Frames represented by each analyzed frame, for elapsed-time estimates
    pub fn interval_multiplier(&self) -> f32 {
        self.interval as f32
    }

    pub fn reset(&mut self) {
        self.counter = 0;
    }
}
