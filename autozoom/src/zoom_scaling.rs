/// Rescales a zoom-rate command by the current zoom
///
/// The same rate feels slower at high zoom, so the command grows with the
/// zoom ratio to keep perceived speed roughly constant.
#[derive(Debug, Clone, Copy)]
pub struct LogScaler {
    k_zoom: f32,
}

impl Default for LogScaler {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl LogScaler {
    pub fn new(k_zoom: f32) -> Self {
        Self { k_zoom }
    }

    pub fn scale(&self, velocity: f32, current_zoom: f32) -> f32 {
        velocity * self.k_zoom * current_zoom
    }

    pub fn update_gain(&mut self, k_zoom: f32) {
        self.k_zoom = k_zoom;
    }

    pub fn gain(&self) -> f32 {
        self.k_zoom
    }
}
