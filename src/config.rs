//! Configuration structures for the iris analysis pipeline.
//!
//! This module defines all tunable parameters, organized into one group per
//! pipeline stage. Every field defaults to the matching value in
//! [`crate::constants`].
//!
//! # Configuration Loading
//!
//! Configuration is plain serde data. The library performs no file I/O, so
//! callers read the file themselves and hand over the text:
//!
//! ```no_run
//! use iridoscan::PipelineConfig;
//!
//! let text = std::fs::read_to_string("iridoscan.json")?;
//! let config = PipelineConfig::from_json_str(&text)?;
//!
//! // Or use defaults
//! let config = PipelineConfig::default();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Configuration Sections
//!
//! - [`CaptureConfig`]: single-eye or both-eyes framing
//! - [`QualityConfig`]: quality gate normalizers and thresholds
//! - [`ExtractionConfig`]: crop padding, canonical size, enhancement
//! - [`ColorConfig`]: sampling limits for color statistics
//! - [`ZoneAnalysisConfig`]: texture and significance scoring
//! - [`InsightConfig`]: insight confidence thresholds

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::{AnalysisError, Result};

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub capture: CaptureConfig,
    pub quality: QualityConfig,
    pub extraction: ExtractionConfig,
    pub color: ColorConfig,
    pub zones: ZoneAnalysisConfig,
    pub insights: InsightConfig,
}

/// How many eyes the capture screen frames.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureMode {
    /// Close-up of the eye being analyzed
    #[default]
    SingleEye,
    /// Both eyes in frame; a missing eye is a partial detection
    BothEyes,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub mode: CaptureMode,
}

/// Quality gate parameters.
///
/// The overall score is a weighted sum of five sub-scores (see
/// [`crate::quality::QualityMetrics::overall`]); the weights here must sum
/// to 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityConfig {
    /// Laplacian variance mapped to sharpness 1.0
    pub sharpness_normalizer: f64,
    /// Luma standard deviation mapped to contrast 1.0
    pub contrast_normalizer: f64,
    pub glare_channel_threshold: u8,
    pub glare_fraction_limit: f64,
    pub motion_blur_sharpness: f64,
    pub min_brightness: f64,
    pub max_brightness: f64,
    pub min_contrast: f64,
    pub accept_threshold: f64,
    pub min_iris_diameter_ratio: f64,
    pub max_iris_diameter_ratio: f64,
    pub max_center_offset_ratio: f64,
    pub max_tilt_ratio: f64,
    /// Reject frames that are not well lit
    pub require_good_lighting: bool,
    pub weights: QualityWeights,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityWeights {
    pub sharpness: f64,
    pub exposure: f64,
    pub contrast: f64,
    pub iris_size: f64,
    pub center_alignment: f64,
}

/// Iris crop and normalization parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Padding around the iris, as a fraction of the radius
    pub padding_ratio: f64,
    /// Side of the square output image in pixels
    pub canonical_size: u32,
    pub contrast_gain: f32,
    pub unsharp_radius: f32,
    pub unsharp_amount: f32,
    /// Map atlas radius 1.0 to the iris rim instead of the image half-width
    pub map_to_iris_rim: bool,
}

/// Color statistics parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    pub secondary_sample_limit: usize,
    pub secondary_min_share: f64,
    pub max_secondary_colors: usize,
    pub hue_sample_limit: usize,
    pub distinct_zones_variation: f64,
}

/// Zone texture and significance parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneAnalysisConfig {
    pub edge_magnitude_threshold: f32,
    pub color_weight: f64,
    pub texture_weight: f64,
    pub min_zone_pixels: usize,
    /// Analyze zones on the rayon thread pool
    pub parallel: bool,
}

/// Insight selection parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    pub strong_significance: f64,
    pub moderate_significance: f64,
    pub min_significance: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        use constants::quality as q;
        Self {
            sharpness_normalizer: q::SHARPNESS_NORMALIZER,
            contrast_normalizer: q::CONTRAST_NORMALIZER,
            glare_channel_threshold: q::GLARE_CHANNEL_THRESHOLD,
            glare_fraction_limit: q::GLARE_FRACTION_LIMIT,
            motion_blur_sharpness: q::MOTION_BLUR_SHARPNESS,
            min_brightness: q::MIN_BRIGHTNESS,
            max_brightness: q::MAX_BRIGHTNESS,
            min_contrast: q::MIN_CONTRAST,
            accept_threshold: q::ACCEPT_THRESHOLD,
            min_iris_diameter_ratio: q::MIN_IRIS_DIAMETER_RATIO,
            max_iris_diameter_ratio: q::MAX_IRIS_DIAMETER_RATIO,
            max_center_offset_ratio: q::MAX_CENTER_OFFSET_RATIO,
            max_tilt_ratio: q::MAX_TILT_RATIO,
            require_good_lighting: true,
            weights: QualityWeights::default(),
        }
    }
}

impl Default for QualityWeights {
    fn default() -> Self {
        use constants::quality::weights as w;
        Self {
            sharpness: w::SHARPNESS,
            exposure: w::EXPOSURE,
            contrast: w::CONTRAST,
            iris_size: w::IRIS_SIZE,
            center_alignment: w::CENTER_ALIGNMENT,
        }
    }
}

impl QualityWeights {
    pub fn total(&self) -> f64 {
        self.sharpness + self.exposure + self.contrast + self.iris_size + self.center_alignment
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        use constants::extraction as e;
        Self {
            padding_ratio: e::PADDING_RATIO,
            canonical_size: e::CANONICAL_SIZE,
            contrast_gain: e::CONTRAST_GAIN,
            unsharp_radius: e::UNSHARP_RADIUS,
            unsharp_amount: e::UNSHARP_AMOUNT,
            map_to_iris_rim: false,
        }
    }
}

impl Default for ColorConfig {
    fn default() -> Self {
        use constants::color as c;
        Self {
            secondary_sample_limit: c::SECONDARY_SAMPLE_LIMIT,
            secondary_min_share: c::SECONDARY_MIN_SHARE,
            max_secondary_colors: c::MAX_SECONDARY_COLORS,
            hue_sample_limit: c::HUE_SAMPLE_LIMIT,
            distinct_zones_variation: c::DISTINCT_ZONES_VARIATION,
        }
    }
}

impl Default for ZoneAnalysisConfig {
    fn default() -> Self {
        use constants::zones as z;
        Self {
            edge_magnitude_threshold: z::EDGE_MAGNITUDE_THRESHOLD,
            color_weight: z::COLOR_WEIGHT,
            texture_weight: z::TEXTURE_WEIGHT,
            min_zone_pixels: z::MIN_ZONE_PIXELS,
            parallel: true,
        }
    }
}

impl Default for InsightConfig {
    fn default() -> Self {
        use constants::insights as i;
        Self {
            strong_significance: i::STRONG_SIGNIFICANCE,
            moderate_significance: i::MODERATE_SIGNIFICANCE,
            min_significance: i::MIN_SIGNIFICANCE,
        }
    }
}

impl PipelineConfig {
    /// Parse and validate a JSON configuration. Missing fields take defaults.
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| AnalysisError::invalid_parameter("config", e))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::processing(format!("config serialization failed: {e}")))
    }

    /// Every floating-point setting with its dotted name
    fn float_settings(&self) -> Vec<(&'static str, f64)> {
        let q = &self.quality;
        let w = &q.weights;
        let e = &self.extraction;
        let c = &self.color;
        let z = &self.zones;
        let i = &self.insights;
        vec![
            ("quality.sharpness_normalizer", q.sharpness_normalizer),
            ("quality.contrast_normalizer", q.contrast_normalizer),
            ("quality.glare_fraction_limit", q.glare_fraction_limit),
            ("quality.motion_blur_sharpness", q.motion_blur_sharpness),
            ("quality.min_brightness", q.min_brightness),
            ("quality.max_brightness", q.max_brightness),
            ("quality.min_contrast", q.min_contrast),
            ("quality.accept_threshold", q.accept_threshold),
            ("quality.min_iris_diameter_ratio", q.min_iris_diameter_ratio),
            ("quality.max_iris_diameter_ratio", q.max_iris_diameter_ratio),
            ("quality.max_center_offset_ratio", q.max_center_offset_ratio),
            ("quality.max_tilt_ratio", q.max_tilt_ratio),
            ("quality.weights.sharpness", w.sharpness),
            ("quality.weights.exposure", w.exposure),
            ("quality.weights.contrast", w.contrast),
            ("quality.weights.iris_size", w.iris_size),
            ("quality.weights.center_alignment", w.center_alignment),
            ("extraction.padding_ratio", e.padding_ratio),
            ("extraction.contrast_gain", e.contrast_gain as f64),
            ("extraction.unsharp_radius", e.unsharp_radius as f64),
            ("extraction.unsharp_amount", e.unsharp_amount as f64),
            ("color.secondary_min_share", c.secondary_min_share),
            ("color.distinct_zones_variation", c.distinct_zones_variation),
            ("zones.edge_magnitude_threshold", z.edge_magnitude_threshold as f64),
            ("zones.color_weight", z.color_weight),
            ("zones.texture_weight", z.texture_weight),
            ("insights.strong_significance", i.strong_significance),
            ("insights.moderate_significance", i.moderate_significance),
            ("insights.min_significance", i.min_significance),
        ]
    }

    /// Check value ranges that would otherwise produce meaningless scores
    pub fn validate(&self) -> Result<()> {
        // NaN slips through every range comparison below
        if let Some((name, value)) = self
            .float_settings()
            .into_iter()
            .find(|(_, value)| !value.is_finite())
        {
            return Err(AnalysisError::invalid_parameter(name, value));
        }

        let q = &self.quality;
        if q.sharpness_normalizer <= 0.0 {
            return Err(AnalysisError::invalid_parameter(
                "quality.sharpness_normalizer",
                q.sharpness_normalizer,
            ));
        }
        if q.contrast_normalizer <= 0.0 {
            return Err(AnalysisError::invalid_parameter(
                "quality.contrast_normalizer",
                q.contrast_normalizer,
            ));
        }
        if q.min_brightness > q.max_brightness {
            return Err(AnalysisError::invalid_parameter(
                "quality.min_brightness",
                q.min_brightness,
            ));
        }
        if q.min_iris_diameter_ratio >= q.max_iris_diameter_ratio {
            return Err(AnalysisError::invalid_parameter(
                "quality.min_iris_diameter_ratio",
                q.min_iris_diameter_ratio,
            ));
        }
        let w = &q.weights;
        for (name, weight) in [
            ("quality.weights.sharpness", w.sharpness),
            ("quality.weights.exposure", w.exposure),
            ("quality.weights.contrast", w.contrast),
            ("quality.weights.iris_size", w.iris_size),
            ("quality.weights.center_alignment", w.center_alignment),
        ] {
            if weight < 0.0 {
                return Err(AnalysisError::invalid_parameter(name, weight));
            }
        }
        if (q.weights.total() - 1.0).abs() > 1e-6 {
            return Err(AnalysisError::invalid_parameter(
                "quality.weights",
                format!("sum {:.3}", q.weights.total()),
            ));
        }

        let e = &self.extraction;
        if e.canonical_size < 16 {
            return Err(AnalysisError::invalid_parameter(
                "extraction.canonical_size",
                e.canonical_size,
            ));
        }
        if e.padding_ratio < 0.0 {
            return Err(AnalysisError::invalid_parameter(
                "extraction.padding_ratio",
                e.padding_ratio,
            ));
        }

        let c = &self.color;
        if c.secondary_sample_limit == 0 || c.hue_sample_limit == 0 {
            return Err(AnalysisError::invalid_parameter(
                "color.sample_limit",
                0,
            ));
        }

        let z = &self.zones;
        if z.color_weight < 0.0 || z.texture_weight < 0.0 {
            return Err(AnalysisError::invalid_parameter(
                "zones.weights",
                format!("{} / {}", z.color_weight, z.texture_weight),
            ));
        }

        let i = &self.insights;
        if i.moderate_significance > i.strong_significance {
            return Err(AnalysisError::invalid_parameter(
                "insights.moderate_significance",
                i.moderate_significance,
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(PipelineConfig::default().validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_preserves_values() {
        let mut config = PipelineConfig::default();
        config.capture.mode = CaptureMode::BothEyes;
        config.extraction.canonical_size = 256;

        let json = config.to_json_string().unwrap();
        let parsed = PipelineConfig::from_json_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed =
            PipelineConfig::from_json_str(r#"{ "capture": { "mode": "both_eyes" } }"#).unwrap();
        assert_eq!(parsed.capture.mode, CaptureMode::BothEyes);
        assert_eq!(parsed.extraction.canonical_size, 512);
        assert_eq!(parsed.quality.accept_threshold, 0.6);
    }

    #[test]
    fn test_rejects_unbalanced_weights() {
        let mut config = PipelineConfig::default();
        config.quality.weights.sharpness = 0.9;
        let err = config.validate().unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidParameter { .. }));
    }

    #[test]
    fn test_rejects_non_finite_values() {
        let mut config = PipelineConfig::default();
        config.quality.weights.sharpness = f64::NAN;
        match config.validate() {
            Err(AnalysisError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, "quality.weights.sharpness");
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }

        let mut config = PipelineConfig::default();
        config.extraction.unsharp_amount = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = PipelineConfig::default();
        config.quality.sharpness_normalizer = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_weight_even_when_balanced() {
        let mut config = PipelineConfig::default();
        config.quality.weights.sharpness = -0.1;
        config.quality.weights.exposure += 0.4;
        assert!((config.quality.weights.total() - 1.0).abs() < 1e-9);
        match config.validate() {
            Err(AnalysisError::InvalidParameter { parameter, .. }) => {
                assert_eq!(parameter, "quality.weights.sharpness");
            }
            other => panic!("expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(PipelineConfig::from_json_str("{ not json").is_err());
    }
}
