//! Rate and range limits on the integrated zoom value

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomConstraint {
    min_zoom: f32,
    max_zoom: f32,
    /// Max zoom change per second
    max_velocity: f32,
}

impl Default for ZoomConstraint {
    fn default() -> Self {
        Self::new(1.0, 3.0, 2.0)
    }
}

impl ZoomConstraint {
    pub fn new(min_zoom: f32, max_zoom: f32, max_velocity: f32) -> Self {
        Self {
            min_zoom,
            max_zoom,
            max_velocity,
        }
    }

    /// Move from `current_zoom` toward `target_zoom` by at most
    /// `max_velocity * dt`, then clamp into `[min_zoom, max_zoom]`.
    /// Inverted limits saturate rather than panic.
    pub fn constrain(&self, target_zoom: f32, current_zoom: f32, dt: f32) -> f32 {
        let max_change = self.max_velocity * dt;
        let change = (target_zoom - current_zoom).max(-max_change).min(max_change);
        (current_zoom + change).max(self.min_zoom).min(self.max_zoom)
    }

    pub fn update_limits(&mut self, min_zoom: f32, max_zoom: f32, max_velocity: f32) {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self.max_velocity = max_velocity;
    }

    pub fn min_zoom(&self) -> f32 {
        self.min_zoom
    }

    pub fn max_zoom(&self) -> f32 {
        self.max_zoom
    }

    pub fn max_velocity(&self) -> f32 {
        self.max_velocity
    }
}
