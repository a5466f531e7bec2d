//! Sport modes and the auto-zoom tunable bundle

use crate::error::{AutoZoomError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Named tuning profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SportMode {
    /// Long occlusions (players overlap)
    #[default]
    Basketball,
    /// Short occlusions (individual runs)
    Ski,
    /// Medium occlusions (fast movement)
    Hockey,
}

impl SportMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Basketball => "Basketball",
            Self::Ski => "Ski",
            Self::Hockey => "Hockey",
        }
    }

    pub fn all() -> Vec<Self> {
        vec![Self::Basketball, Self::Ski, Self::Hockey]
    }
}

impl FromStr for SportMode {
    type Err = AutoZoomError;

    /// Parse from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "basketball" => Ok(Self::Basketball),
            "ski" => Ok(Self::Ski),
            "hockey" => Ok(Self::Hockey),
            other => Err(AutoZoomError::config(format!("Unknown sport mode: {}", other))),
        }
    }
}

impl std::fmt::Display for SportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Which subject-selection strategy drives the zoom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SelectionStrategy {
    /// Lock onto one athlete
    #[default]
    SingleSubject,
    /// Frame every active athlete together
    Group,
}

/// Tunables for one sport mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoZoomConfig {
    /// Desired subject height as a fraction of frame height
    pub target_height_ratio: f32,
    /// Proportional gain
    pub kp: f32,
    /// Derivative gain
    pub kd: f32,
    /// Log-scaling gain
    pub k_zoom: f32,
    pub min_zoom: f32,
    pub max_zoom: f32,
    /// Max zoom change per second
    pub ramp_rate: f32,
    /// Activity threshold on combined bbox shape deviation
    pub shape_variance_threshold: f32,
    /// Relative error required to start zooming
    pub start_threshold: f32,
    /// Relative error below which zooming stops
    pub stop_threshold: f32,
    /// Frames to keep lost tracks
    pub track_buffer: u32,
    /// Minimum detection confidence, also the tracker's high-score threshold
    pub min_confidence: f32,
    /// Analyze every n-th frame
    pub analysis_interval: u32,
    /// IoU threshold for high-confidence association
    pub iou_threshold: f32,
    pub selection_strategy: SelectionStrategy,
    /// Exponential smoothing factor for subject height
    pub height_smoothing_alpha: f32,
}

impl AutoZoomConfig {
    pub fn default_for(mode: SportMode) -> Self {
        let base = Self {
            target_height_ratio: 0.33,
            kp: 6.0,
            kd: 3.0,
            k_zoom: 15.0,
            min_zoom: 1.0,
            max_zoom: 5.0,
            ramp_rate: 4.0,
            shape_variance_threshold: 0.002,
            start_threshold: 0.10,
            stop_threshold: 0.05,
            track_buffer: 150,
            min_confidence: 0.3,
            analysis_interval: 1,
            iou_threshold: 0.2,
            selection_strategy: SelectionStrategy::SingleSubject,
            height_smoothing_alpha: 0.2,
        };

        match mode {
            SportMode::Basketball => base,
            SportMode::Ski => Self {
                target_height_ratio: 0.15,
                kp: 5.0,
                kd: 2.5,
                k_zoom: 10.0,
                max_zoom: 20.0,
                ramp_rate: 2.0,
                start_threshold: 0.15,
                track_buffer: 30,
                ..base
            },
            SportMode::Hockey => Self {
                kp: 6.5,
                kd: 3.2,
                k_zoom: 12.0,
                ramp_rate: 3.5,
                track_buffer: 100,
                ..base
            },
        }
    }

    /// Load a config from JSON; missing fields take the basketball defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json_str(&contents)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json_string()?)?;
        Ok(())
    }

    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Describe settings that break the pipeline's assumptions.
    ///
    /// Nothing is corrected here; the service applies the config as given.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.start_threshold <= self.stop_threshold {
            problems.push(format!(
                "start_threshold ({}) must exceed stop_threshold ({}) for hysteresis",
                self.start_threshold, self.stop_threshold
            ));
        }
        if self.analysis_interval == 0 {
            problems.push("analysis_interval must be at least 1".to_string());
        }
        if self.min_zoom > self.max_zoom {
            problems.push(format!(
                "min_zoom ({}) exceeds max_zoom ({})",
                self.min_zoom, self.max_zoom
            ));
        }
        if self.target_height_ratio <= 0.0 {
            problems.push("target_height_ratio must be positive".to_string());
        }
        problems
    }
}

impl Default for AutoZoomConfig {
    fn default() -> Self {
        Self::default_for(SportMode::Basketball)
    }
}
