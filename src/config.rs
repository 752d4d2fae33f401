//! Pipeline configuration and threshold handling.
//!
//! `PipelineConfig` is an explicit value handed to `EdgePipeline::new`; the
//! pipeline never reads process-wide settings. All fields have defaults, so a
//! JSON file only needs to name what it overrides:
//!
//! ```json
//! { "gaussian_sigma": 2.0, "overlay_alpha": 0.5 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::filters::grayscale::LumaWeights;

// ============================================================================
// Thresholds
// ============================================================================

/// Hysteresis thresholds on the gradient magnitude scale.
///
/// Invariant `low < high`; use [`ThresholdPair::new`] or
/// [`ThresholdPair::validate`] before handing a pair to the edge extractor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThresholdPair {
    pub low: i32,
    pub high: i32,
}

impl ThresholdPair {
    pub fn new(low: i32, high: i32) -> Result<Self> {
        let pair = Self { low, high };
        pair.validate()?;
        Ok(pair)
    }

    /// Check the ordering invariant only. The 0-500 range is a UI-level
    /// limit enforced by [`PipelineConfig::check_thresholds`].
    pub fn validate(&self) -> Result<()> {
        if self.low >= self.high {
            return Err(Error::InvalidThreshold {
                low: self.low,
                high: self.high,
                reason: "low threshold must be below high threshold",
            });
        }
        Ok(())
    }
}

impl Default for ThresholdPair {
    fn default() -> Self {
        Self {
            low: 100,
            high: 200,
        }
    }
}

/// Named threshold pair offered to users as a starting point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ThresholdPreset {
    pub name: String,
    pub low: i32,
    pub high: i32,
    pub description: String,
}

impl ThresholdPreset {
    fn new(name: &str, low: i32, high: i32, description: &str) -> Self {
        Self {
            name: name.to_string(),
            low,
            high,
            description: description.to_string(),
        }
    }

    pub fn thresholds(&self) -> ThresholdPair {
        ThresholdPair {
            low: self.low,
            high: self.high,
        }
    }
}

fn default_presets() -> Vec<ThresholdPreset> {
    vec![
        ThresholdPreset::new("low_noise", 50, 150, "Very sensitive, detects many edges"),
        ThresholdPreset::new("normal", 100, 200, "Balanced"),
        ThresholdPreset::new("high_noise", 150, 300, "Less sensitive, keeps dominant edges"),
        ThresholdPreset::new("defined_objects", 80, 240, "Good balance for clear contours"),
    ]
}

// ============================================================================
// Grayscale weighting
// ============================================================================

/// Luma standard used by the grayscale stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LumaStandard {
    /// ITU-R BT.601: 0.299 R + 0.587 G + 0.114 B
    #[default]
    Bt601,
    /// ITU-R BT.709: 0.2126 R + 0.7152 G + 0.0722 B
    Bt709,
}

impl LumaStandard {
    pub fn weights(self) -> LumaWeights {
        match self {
            Self::Bt601 => LumaWeights::bt601(),
            Self::Bt709 => LumaWeights::bt709(),
        }
    }
}

// ============================================================================
// PipelineConfig
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Thresholds used when a caller does not supply any.
    pub default_thresholds: ThresholdPair,
    /// Smallest accepted threshold value.
    pub min_threshold: i32,
    /// Largest accepted threshold value.
    pub max_threshold: i32,
    /// Gaussian kernel size (odd).
    pub gaussian_kernel_size: usize,
    pub gaussian_sigma: f32,
    pub luma: LumaStandard,
    /// Weight of the edge layer in the overlay panel; the original gets
    /// `1 - overlay_alpha`.
    pub overlay_alpha: f32,
    /// Upload size limit in bytes.
    pub max_upload_bytes: usize,
    /// Lowercase file extensions accepted for uploads.
    pub allowed_extensions: Vec<String>,
    pub presets: Vec<ThresholdPreset>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            default_thresholds: ThresholdPair::default(),
            min_threshold: 0,
            max_threshold: 500,
            gaussian_kernel_size: 5,
            gaussian_sigma: 1.5,
            luma: LumaStandard::default(),
            overlay_alpha: 0.3,
            max_upload_bytes: 16 * 1024 * 1024,
            allowed_extensions: ["png", "jpg", "jpeg", "gif", "bmp"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            presets: default_presets(),
        }
    }
}

impl PipelineConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Self::from_json_str(&data)
            .map_err(|e| Error::Config(format!("{}: {e}", path.display())))
    }

    pub fn validate(&self) -> Result<()> {
        if self.gaussian_kernel_size == 0 || self.gaussian_kernel_size % 2 == 0 {
            return Err(Error::Config(format!(
                "gaussian_kernel_size must be odd, got {}",
                self.gaussian_kernel_size
            )));
        }
        if self.gaussian_sigma.is_nan() || self.gaussian_sigma <= 0.0 {
            return Err(Error::Config(format!(
                "gaussian_sigma must be positive, got {}",
                self.gaussian_sigma
            )));
        }
        if !(0.0..=1.0).contains(&self.overlay_alpha) {
            return Err(Error::Config(format!(
                "overlay_alpha must lie in [0, 1], got {}",
                self.overlay_alpha
            )));
        }
        if self.min_threshold >= self.max_threshold {
            return Err(Error::Config(format!(
                "min_threshold ({}) must be below max_threshold ({})",
                self.min_threshold, self.max_threshold
            )));
        }
        self.check_thresholds(self.default_thresholds)
            .map_err(|e| Error::Config(format!("default_thresholds: {e}")))?;
        Ok(())
    }

    /// Full caller-side threshold check: ordering plus configured range.
    pub fn check_thresholds(&self, thresholds: ThresholdPair) -> Result<()> {
        thresholds.validate()?;
        let range = self.min_threshold..=self.max_threshold;
        if !range.contains(&thresholds.low) || !range.contains(&thresholds.high) {
            return Err(Error::InvalidThreshold {
                low: thresholds.low,
                high: thresholds.high,
                reason: "thresholds outside the accepted range",
            });
        }
        Ok(())
    }

    /// Reject uploads by extension and size before any decoding.
    pub fn check_upload(&self, filename: &str, size: usize) -> Result<()> {
        let extension = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();
        if !self.allowed_extensions.iter().any(|allowed| *allowed == extension) {
            return Err(Error::UnsupportedExtension(filename.to_string()));
        }
        if size > self.max_upload_bytes {
            return Err(Error::PayloadTooLarge {
                size,
                limit: self.max_upload_bytes,
            });
        }
        Ok(())
    }

    pub fn preset(&self, name: &str) -> Option<ThresholdPair> {
        self.presets
            .iter()
            .find(|preset| preset.name == name)
            .map(ThresholdPreset::thresholds)
    }

    /// Static description of the algorithm for info endpoints.
    pub fn info(&self) -> PipelineInfo {
        PipelineInfo {
            algorithm: "Canny Edge Detection".to_string(),
            steps: vec![
                "Gaussian smoothing to reduce noise".to_string(),
                "Sobel gradient estimation".to_string(),
                "Non-maximum suppression to thin edges".to_string(),
                "Double threshold with hysteresis linking".to_string(),
            ],
            supported_formats: self.allowed_extensions.clone(),
            threshold_range: (self.min_threshold, self.max_threshold),
            default_thresholds: self.default_thresholds,
            presets: self.presets.clone(),
        }
    }
}

/// Serializable algorithm description.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PipelineInfo {
    pub algorithm: String,
    pub steps: Vec<String>,
    pub supported_formats: Vec<String>,
    pub threshold_range: (i32, i32),
    pub default_thresholds: ThresholdPair,
    pub presets: Vec<ThresholdPreset>,
}
