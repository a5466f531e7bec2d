//! Type definitions shared across the auto-zoom pipeline

use athletetrack::{Detection, Track};
use serde::{Deserialize, Serialize};

/// Image format for input data
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageFormat {
    RGB,
    BGR,
    RGBA,
    BGRA,
    Grayscale,
}

/// Input image data handed to the detector
#[derive(Debug, Clone)]
pub struct ImageData {
    /// Raw pixel data
    pub data: Vec<u8>,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Pixel format
    pub format: ImageFormat,
}

impl ImageData {
    /// Create new image data
    pub fn new(data: Vec<u8>, width: u32, height: u32, format: ImageFormat) -> Self {
        Self {
            data,
            width,
            height,
            format,
        }
    }

    /// Zero-filled image of the given size
    pub fn blank(width: u32, height: u32, format: ImageFormat) -> Self {
        let mut image = Self::new(Vec::new(), width, height, format);
        image.data = vec![0; (width * height * image.channels()) as usize];
        image
    }

    /// Get number of channels
    pub fn channels(&self) -> u32 {
        match self.format {
            ImageFormat::RGB | ImageFormat::BGR => 3,
            ImageFormat::RGBA | ImageFormat::BGRA => 4,
            ImageFormat::Grayscale => 1,
        }
    }

    /// Validate image data consistency
    pub fn validate(&self) -> bool {
        let expected_size = (self.width * self.height * self.channels()) as usize;
        self.data.len() == expected_size
    }

    pub fn size(&self) -> FrameSize {
        FrameSize::new(self.width, self.height)
    }
}

/// Frame dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSize {
    pub width: u32,
    pub height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// How the zoom value is being driven
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ZoomMode {
    /// Auto-zoom tracking
    #[default]
    Auto,
    /// Manual control
    Manual,
    /// Zoom locked
    Locked,
}

/// Zoom state owned by the service and read by the UI layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoomState {
    /// Current zoom ratio
    pub current_zoom: f32,
    /// Last zoom proposed by the control path
    pub target_zoom: f32,
    pub is_auto_zoom: bool,
    pub mode: ZoomMode,
}

impl Default for ZoomState {
    fn default() -> Self {
        Self {
            current_zoom: 1.0,
            target_zoom: 1.0,
            is_auto_zoom: true,
            mode: ZoomMode::Auto,
        }
    }
}

/// Outcome of one `process_frame` call
#[derive(Debug, Clone, Default)]
pub struct AutoZoomResult {
    /// Raw detections for this frame
    pub detections: Vec<Detection>,
    /// Visible confirmed tracks
    pub tracks: Vec<Track>,
    /// Tracks that passed the activity filter
    pub active_tracks: Vec<Track>,
    /// Subject the zoom was computed for
    pub target: Option<Track>,
    /// Zoom sent to the actuator, if any
    pub applied_zoom: Option<f32>,
    /// False when the throttler skipped the frame
    pub is_processed: bool,
}

impl AutoZoomResult {
    pub fn has_target(&self) -> bool {
        self.target.is_some()
    }
}
