/// Detector capability consumed by the auto-zoom pipeline
///
/// Inference itself lives outside this crate. Anything that turns a frame
/// into subject detections can drive the pipeline by implementing this trait.
use crate::error::Result;
use crate::types::ImageData;
use athletetrack::Detection;

/// Common interface for object detectors
pub trait ObjectDetector: Send {
    /// Detect subjects in a single frame
    ///
    /// Boxes are normalized to [0, 1] in both axes, y pointing down.
    fn detect(&mut self, image: &ImageData) -> Result<Vec<Detection>>;

    /// Minimum confidence a detection must reach to be reported
    fn confidence_threshold(&self) -> f32;

    fn set_confidence_threshold(&mut self, threshold: f32);

    /// Release model resources. The detector is not used afterwards.
    fn close(&mut self);

    /// Get the detector name (for logging/debugging)
    fn name(&self) -> &str;
}
