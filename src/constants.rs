//! Empirical constants and reference values for iris analysis
//!
//! These are the defaults behind every tunable in [`crate::config`]. Values
//! are calibrated against typical smartphone close-up captures.

/// Luma weights (ITU-R BT.601)
pub mod luma {
    pub const RED_WEIGHT: f64 = 0.299;
    pub const GREEN_WEIGHT: f64 = 0.587;
    pub const BLUE_WEIGHT: f64 = 0.114;
}

/// Capture quality gate
pub mod quality {
    /// Laplacian variance that maps to a sharpness score of 1.0
    pub const SHARPNESS_NORMALIZER: f64 = 500.0;

    /// Luma standard deviation that maps to a contrast score of 1.0
    pub const CONTRAST_NORMALIZER: f64 = 70.0;

    /// Channel value above which a pixel counts as specular glare
    pub const GLARE_CHANNEL_THRESHOLD: u8 = 240;

    /// Fraction of glare pixels that raises the glare flag
    pub const GLARE_FRACTION_LIMIT: f64 = 0.10;

    /// Sharpness below which the frame is flagged as motion-blurred
    pub const MOTION_BLUR_SHARPNESS: f64 = 0.30;

    /// Multiplier applied to (iris diameter / frame diagonal)
    pub const IRIS_SIZE_GAIN: f64 = 2.5;

    /// Multiplier applied to (center offset / frame diagonal)
    pub const CENTER_ALIGNMENT_GAIN: f64 = 4.0;

    /// Well-lit brightness window
    pub const MIN_BRIGHTNESS: f64 = 0.3;
    pub const MAX_BRIGHTNESS: f64 = 0.8;

    /// Minimum contrast for a well-lit frame
    pub const MIN_CONTRAST: f64 = 0.4;

    /// Overall score required to accept a frame
    pub const ACCEPT_THRESHOLD: f64 = 0.6;

    /// Iris diameter as a fraction of frame width
    pub const MIN_IRIS_DIAMETER_RATIO: f64 = 0.10;
    pub const MAX_IRIS_DIAMETER_RATIO: f64 = 0.40;

    /// Maximum offset from frame center, as a fraction of each frame dimension
    pub const MAX_CENTER_OFFSET_RATIO: f64 = 0.15;

    /// Maximum eye height difference, as a fraction of iris radius
    pub const MAX_TILT_RATIO: f64 = 0.30;

    /// Weights of the overall score; they sum to 1.0
    pub mod weights {
        pub const SHARPNESS: f64 = 0.30;
        pub const EXPOSURE: f64 = 0.15;
        pub const CONTRAST: f64 = 0.15;
        pub const IRIS_SIZE: f64 = 0.20;
        pub const CENTER_ALIGNMENT: f64 = 0.20;
    }
}

/// Iris crop and normalization
pub mod extraction {
    /// Padding added around the iris, as a fraction of its radius
    pub const PADDING_RATIO: f64 = 0.5;

    /// Side of the square normalized iris image in pixels
    pub const CANONICAL_SIZE: u32 = 512;

    /// Linear contrast gain applied around mid-gray
    pub const CONTRAST_GAIN: f32 = 1.2;

    /// Gaussian sigma of the unsharp mask
    pub const UNSHARP_RADIUS: f32 = 2.0;

    /// Strength of the unsharp mask
    pub const UNSHARP_AMOUNT: f32 = 0.5;
}

/// Color classification and statistics
pub mod color {
    /// Maximum pixels classified when looking for secondary colors
    pub const SECONDARY_SAMPLE_LIMIT: usize = 1000;

    /// Minimum share of samples for a secondary color
    pub const SECONDARY_MIN_SHARE: f64 = 0.10;

    /// At most this many secondary colors are reported
    pub const MAX_SECONDARY_COLORS: usize = 2;

    /// Maximum hues sampled for the variation estimate
    pub const HUE_SAMPLE_LIMIT: usize = 500;

    /// Variation above which the iris has visibly distinct color zones
    pub const DISTINCT_ZONES_VARIATION: f64 = 0.3;

    /// Channel spread (max - min, in 0..1) below which a color reads as gray
    pub const GRAY_MAX_SPREAD: f32 = 0.08;

    /// Green counts as dominant when within this fraction of the max channel
    pub const GREEN_DOMINANCE_RATIO: f32 = 0.9;

    /// Minimum red channel (0..1) for brown
    pub const BROWN_MIN_RED: f32 = 0.15;

    /// Minimum saturation for amber
    pub const AMBER_MIN_SATURATION: f32 = 0.6;
}

/// Per-zone texture and significance scoring
pub mod zones {
    /// Local variance that halves the uniformity score
    pub const UNIFORMITY_VARIANCE_SCALE: f64 = 100.0;

    /// Sobel magnitude above which a pixel counts as an edge
    pub const EDGE_MAGNITUDE_THRESHOLD: f32 = 60.0;

    /// Mean gradient magnitude that maps to a pattern strength of 1.0
    pub const PATTERN_STRENGTH_SCALE: f64 = 120.0;

    /// |cos| or |sin| of gradient vs radial direction counted as aligned
    pub const ORIENTATION_ALIGNMENT: f32 = 0.8;

    /// Share of aligned edge pixels for a radial or circular pattern
    pub const ORIENTATION_MIN_SHARE: f64 = 0.5;

    /// Luma offset from the zone mean that marks a crypt or a spot
    pub const OUTLIER_LUMA_OFFSET: f64 = 40.0;

    /// Share of outlier pixels that reports crypts or spots
    pub const OUTLIER_MIN_SHARE: f64 = 0.02;

    /// Edge density below which a smooth zone is uniform
    pub const UNIFORM_MAX_DENSITY: f64 = 0.05;
    pub const UNIFORM_MIN_UNIFORMITY: f64 = 0.7;

    /// Edge density above which unoriented edges read as furrows
    pub const FURROW_MIN_DENSITY: f64 = 0.35;

    /// RGB distance (0..sqrt 3) that maps to full color deviation
    pub const COLOR_DEVIATION_SCALE: f64 = 0.35;

    /// Uniformity difference that maps to full texture anomaly
    pub const TEXTURE_ANOMALY_SCALE: f64 = 0.5;

    pub const COLOR_WEIGHT: f64 = 0.6;
    pub const TEXTURE_WEIGHT: f64 = 0.4;

    /// Zones with fewer sampled pixels count as uncovered
    pub const MIN_ZONE_PIXELS: usize = 16;
}

/// Wellness insight thresholds
pub mod insights {
    pub const STRONG_SIGNIFICANCE: f64 = 0.8;
    pub const MODERATE_SIGNIFICANCE: f64 = 0.6;

    /// Zones below this significance produce no insight
    pub const MIN_SIGNIFICANCE: f64 = 0.3;
}

/// Aggregate confidence weighting
pub mod confidence {
    pub const QUALITY_WEIGHT: f64 = 0.6;
    pub const COVERAGE_WEIGHT: f64 = 0.4;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_weights_sum_to_one() {
        use quality::weights::*;
        let total = SHARPNESS + EXPOSURE + CONTRAST + IRIS_SIZE + CENTER_ALIGNMENT;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_luma_weights_sum_to_one() {
        let total = luma::RED_WEIGHT + luma::GREEN_WEIGHT + luma::BLUE_WEIGHT;
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_insight_thresholds_ordered() {
        assert!(insights::STRONG_SIGNIFICANCE > insights::MODERATE_SIGNIFICANCE);
        assert!(insights::MODERATE_SIGNIFICANCE > insights::MIN_SIGNIFICANCE);
        assert!((zones::COLOR_WEIGHT + zones::TEXTURE_WEIGHT - 1.0).abs() < 1e-12);
    }
}
