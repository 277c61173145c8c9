//! Zone texture features
//!
//! Uniformity is the mean inverse local variance, density the share of edge
//! pixels. Edge orientation is judged against the radial direction at each
//! pixel: gradients pointing along the radius come from rings (circular),
//! gradients across it come from spokes (radial).

use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::constants::zones::{
    FURROW_MIN_DENSITY, ORIENTATION_ALIGNMENT, ORIENTATION_MIN_SHARE, OUTLIER_LUMA_OFFSET,
    OUTLIER_MIN_SHARE, PATTERN_STRENGTH_SCALE, UNIFORMITY_VARIANCE_SCALE, UNIFORM_MAX_DENSITY,
    UNIFORM_MIN_UNIFORMITY,
};
use crate::pixels::{local_variance, mean_and_std, GradientField};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Radial,
    Circular,
    Crypts,
    Furrows,
    Spots,
    Uniform,
}

impl PatternType {
    pub fn observation(&self) -> &'static str {
        match self {
            PatternType::Radial => "Radial fiber markings",
            PatternType::Circular => "Concentric ring markings",
            PatternType::Crypts => "Darker pits in the fiber structure",
            PatternType::Furrows => "Dense, irregular fiber texture",
            PatternType::Spots => "Lighter flecks",
            PatternType::Uniform => "Smooth, even texture",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextureFeatures {
    /// 1.0 for a perfectly flat region
    pub uniformity: f64,
    /// Share of pixels on an edge
    pub density: f64,
    /// Mean gradient magnitude, normalized
    pub pattern_strength: f64,
    /// Detected patterns in taxonomy order
    pub patterns: Vec<PatternType>,
}

/// A normalized-image pixel with its polar position around the iris center.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolarPixel {
    pub x: u32,
    pub y: u32,
    pub angle: f64,
    pub radius: f64,
}

#[derive(Debug, Clone)]
pub struct TextureAnalyzer {
    edge_threshold: f32,
}

impl Default for TextureAnalyzer {
    fn default() -> Self {
        Self::new(crate::constants::zones::EDGE_MAGNITUDE_THRESHOLD)
    }
}

impl TextureAnalyzer {
    pub fn new(edge_threshold: f32) -> Self {
        Self { edge_threshold }
    }

    pub fn analyze(
        &self,
        gray: &GrayImage,
        gradients: &GradientField,
        pixels: &[PolarPixel],
    ) -> TextureFeatures {
        if pixels.is_empty() {
            return TextureFeatures::default();
        }

        // |cos| at or below this means the gradient is across the radius
        let across_limit = (1.0 - ORIENTATION_ALIGNMENT * ORIENTATION_ALIGNMENT).sqrt();

        let mut uniformity_sum = 0.0;
        let mut magnitude_sum = 0.0;
        let mut edges = 0usize;
        let mut along_radius = 0usize;
        let mut across_radius = 0usize;
        let mut lumas = Vec::with_capacity(pixels.len());

        for p in pixels {
            let variance = local_variance(gray, p.x, p.y);
            uniformity_sum += 1.0 / (1.0 + variance / UNIFORMITY_VARIANCE_SCALE);
            lumas.push(gray.get_pixel(p.x, p.y)[0] as f64);

            let (gx, gy) = gradients.at(p.x, p.y);
            let magnitude = gx.hypot(gy);
            magnitude_sum += magnitude as f64;
            if magnitude <= self.edge_threshold {
                continue;
            }
            edges += 1;

            // radial unit vector in image coordinates (y grows down)
            let (rx, ry) = (p.angle.cos() as f32, -(p.angle.sin() as f32));
            let cos = ((gx * rx + gy * ry) / magnitude).abs();
            if cos >= ORIENTATION_ALIGNMENT {
                along_radius += 1;
            } else if cos <= across_limit {
                across_radius += 1;
            }
        }

        let n = pixels.len() as f64;
        let uniformity = uniformity_sum / n;
        let density = edges as f64 / n;
        let pattern_strength = (magnitude_sum / n / PATTERN_STRENGTH_SCALE).clamp(0.0, 1.0);

        let (mean_luma, _) = mean_and_std(lumas.iter().copied());
        let dark = lumas
            .iter()
            .filter(|&&v| v < mean_luma - OUTLIER_LUMA_OFFSET)
            .count() as f64
            / n;
        let bright = lumas
            .iter()
            .filter(|&&v| v > mean_luma + OUTLIER_LUMA_OFFSET)
            .count() as f64
            / n;

        let oriented = |count: usize| {
            density >= UNIFORM_MAX_DENSITY
                && edges > 0
                && count as f64 / edges as f64 >= ORIENTATION_MIN_SHARE
        };
        let radial = oriented(across_radius);
        let circular = oriented(along_radius);
        let crypts = dark >= OUTLIER_MIN_SHARE;
        let spots = bright >= OUTLIER_MIN_SHARE;
        let furrows = density >= FURROW_MIN_DENSITY && !radial && !circular;
        let uniform = density < UNIFORM_MAX_DENSITY
            && uniformity >= UNIFORM_MIN_UNIFORMITY
            && !crypts
            && !spots;

        let patterns = [
            (radial, PatternType::Radial),
            (circular, PatternType::Circular),
            (crypts, PatternType::Crypts),
            (furrows, PatternType::Furrows),
            (spots, PatternType::Spots),
            (uniform, PatternType::Uniform),
        ]
        .into_iter()
        .filter_map(|(hit, pattern)| hit.then_some(pattern))
        .collect();

        TextureFeatures {
            uniformity,
            density,
            pattern_strength,
            patterns,
        }
    }
}
