//! Color profile of a pixel set
//!
//! Used both for the whole iris (the baseline every zone is compared with)
//! and for each zone. Sampling is deterministic: the same pixels always give
//! the same profile.

use image::Rgb;
use serde::{Deserialize, Serialize};

use super::classify::IrisColor;
use super::conversion::{rgb_to_hex, HsvColor};
use crate::config::ColorConfig;
use crate::pixels::{mean_and_std, mean_rgb, subsample};

/// Colorimetric summary of an iris or zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorProfile {
    /// Mean color, channels in 0..1
    pub rgb: [f32; 3],
    /// Hue of the mean color in degrees
    pub hue: f32,
    pub saturation: f32,
    pub brightness: f32,
    pub dominant: IrisColor,
    /// Most frequent other classes, at most two
    pub secondary: Vec<IrisColor>,
    pub hex: String,
    /// Hue spread of sampled pixels, 0..1
    pub variation: f64,
    pub has_distinct_zones: bool,
    pub pixel_count: usize,
}

impl ColorProfile {
    /// Euclidean distance between mean colors, in 0..sqrt(3)
    pub fn rgb_distance(&self, other: &ColorProfile) -> f64 {
        self.rgb
            .iter()
            .zip(other.rgb.iter())
            .map(|(a, b)| (*a as f64 - *b as f64).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ColorAnalyzer {
    config: ColorConfig,
}

impl ColorAnalyzer {
    pub fn new(config: ColorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ColorConfig {
        &self.config
    }

    /// Profile a pixel set. An empty set profiles as black with no samples.
    pub fn profile(&self, pixels: &[Rgb<u8>]) -> ColorProfile {
        let rgb = mean_rgb(pixels);
        let hsv = HsvColor::from_rgb(rgb);
        let dominant = IrisColor::classify(rgb);
        let secondary = self.secondary_colors(pixels, dominant);
        let variation = self.color_variation(pixels);

        ColorProfile {
            rgb,
            hue: hsv.hue,
            saturation: hsv.saturation,
            brightness: hsv.value,
            dominant,
            secondary,
            hex: rgb_to_hex(rgb),
            variation,
            has_distinct_zones: variation > self.config.distinct_zones_variation,
            pixel_count: pixels.len(),
        }
    }

    /// Classes other than `dominant` whose share of the sampled pixels
    /// exceeds the configured minimum, most frequent first.
    pub fn secondary_colors(&self, pixels: &[Rgb<u8>], dominant: IrisColor) -> Vec<IrisColor> {
        let mut counts = [0usize; IrisColor::COUNT];
        let mut sampled = 0usize;
        for px in subsample(pixels, self.config.secondary_sample_limit) {
            counts[IrisColor::classify_rgb8(px[0], px[1], px[2]).index()] += 1;
            sampled += 1;
        }
        if sampled == 0 {
            return Vec::new();
        }

        let mut candidates: Vec<(IrisColor, usize)> = IrisColor::ALL
            .iter()
            .copied()
            .filter(|c| *c != dominant)
            .map(|c| (c, counts[c.index()]))
            .filter(|&(_, n)| n as f64 / sampled as f64 > self.config.secondary_min_share)
            .collect();
        // stable: equal counts keep declaration order
        candidates.sort_by(|a, b| b.1.cmp(&a.1));
        candidates
            .into_iter()
            .take(self.config.max_secondary_colors)
            .map(|(c, _)| c)
            .collect()
    }

    /// Standard deviation of sampled hues over 360, clamped to [0, 1].
    ///
    /// Hue is treated as linear, not circular: reds on both sides of 0/360
    /// read as widely spread even though they look alike.
    pub fn color_variation(&self, pixels: &[Rgb<u8>]) -> f64 {
        let hues = subsample(pixels, self.config.hue_sample_limit)
            .map(|px| HsvColor::from_rgb8(px[0], px[1], px[2]).hue as f64);
        let (_, std) = mean_and_std(hues);
        (std / 360.0).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_uniform_blue_iris() {
        let pixels = vec![Rgb([50u8, 80, 200]); 4096];
        let profile = ColorAnalyzer::default().profile(&pixels);
        assert_eq!(profile.dominant, IrisColor::Blue);
        assert!(profile.secondary.is_empty());
        assert_abs_diff_eq!(profile.variation, 0.0, epsilon = 1e-9);
        assert!(!profile.has_distinct_zones);
        assert_eq!(profile.hex, "#3250C8");
        assert_eq!(profile.pixel_count, 4096);
    }

    #[test]
    fn test_secondary_share_threshold_and_cap() {
        // 60% blue, 20% brown, 15% green, 5% hazel
        let mut pixels = Vec::new();
        pixels.extend(std::iter::repeat(Rgb([50u8, 80, 200])).take(60));
        pixels.extend(std::iter::repeat(Rgb([120u8, 70, 40])).take(20));
        pixels.extend(std::iter::repeat(Rgb([60u8, 140, 90])).take(15));
        pixels.extend(std::iter::repeat(Rgb([110u8, 120, 60])).take(5));

        let analyzer = ColorAnalyzer::default();
        let secondary = analyzer.secondary_colors(&pixels, IrisColor::Blue);
        assert_eq!(secondary, vec![IrisColor::Brown, IrisColor::Green]);

        let capped = ColorAnalyzer::new(ColorConfig {
            max_secondary_colors: 1,
            ..ColorConfig::default()
        });
        assert_eq!(capped.secondary_colors(&pixels, IrisColor::Blue), vec![IrisColor::Brown]);
    }

    #[test]
    fn test_dominant_never_secondary() {
        let mut pixels = vec![Rgb([50u8, 80, 200]); 50];
        pixels.extend(vec![Rgb([120u8, 70, 40]); 50]);
        let secondary = ColorAnalyzer::default().secondary_colors(&pixels, IrisColor::Brown);
        assert_eq!(secondary, vec![IrisColor::Blue]);
    }

    #[test]
    fn test_split_iris_has_distinct_zones() {
        // half pure red (hue 0), half cyan (hue 180): std of hues = 90
        let mut pixels = vec![Rgb([255u8, 0, 0]); 250];
        pixels.extend(vec![Rgb([0u8, 255, 255]); 250]);
        let analyzer = ColorAnalyzer::default();
        assert_abs_diff_eq!(analyzer.color_variation(&pixels), 0.25, epsilon = 1e-3);

        // blue (hue 240) against orange-red (hue ~4.7): std ~117.6
        let mut wide = vec![Rgb([0u8, 0, 255]); 250];
        wide.extend(vec![Rgb([255u8, 20, 0]); 250]);
        let profile = analyzer.profile(&wide);
        assert!(profile.variation > 0.3);
        assert!(profile.has_distinct_zones);
    }

    #[test]
    fn test_empty_pixels() {
        let profile = ColorAnalyzer::default().profile(&[]);
        assert_eq!(profile.pixel_count, 0);
        assert_eq!(profile.dominant, IrisColor::Gray);
        assert!(profile.secondary.is_empty());
        assert_eq!(profile.variation, 0.0);
    }

    #[test]
    fn test_rgb_distance() {
        let analyzer = ColorAnalyzer::default();
        let a = analyzer.profile(&[Rgb([255, 0, 0])]);
        let b = analyzer.profile(&[Rgb([0, 0, 0])]);
        assert_abs_diff_eq!(a.rgb_distance(&b), 1.0, epsilon = 1e-6);
        assert_eq!(a.rgb_distance(&a), 0.0);
    }
}
