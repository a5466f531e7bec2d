/// Camera zoom capability driven by the auto-zoom pipeline
pub trait ZoomActuator: Send {
    /// Set the camera zoom ratio
    fn apply_zoom(&mut self, zoom: f32);

    /// Informs the hardware layer of the configured max zoom change per second
    fn update_ramp_rate(&mut self, ramp_rate: f32);
}
