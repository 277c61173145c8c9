//! Zone analysis fan-out
//!
//! Every atlas zone is mapped onto the normalized iris through the polar
//! transform (image center, half-width = radius 1.0 unless rim mapping is
//! configured), then profiled for color and texture and scored against the
//! whole-iris baseline. Zones are independent and run on the rayon pool;
//! results keep atlas order.

use image::{GrayImage, Rgb};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::texture::{PolarPixel, TextureAnalyzer, TextureFeatures};
use crate::atlas::Zone;
use crate::color::{ColorAnalyzer, ColorProfile};
use crate::config::{ColorConfig, ZoneAnalysisConfig};
use crate::constants::zones::{COLOR_DEVIATION_SCALE, TEXTURE_ANOMALY_SCALE};
use crate::extraction::NormalizedIris;
use crate::pixels::{luma_image, GradientField};
use crate::session::CancellationToken;
use crate::Result;

/// Brightness difference from the baseline worth an observation
const BRIGHTNESS_SHIFT: f32 = 0.1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneAnalysis {
    pub zone: Zone,
    pub color_profile: ColorProfile,
    pub texture: TextureFeatures,
    pub observations: Vec<String>,
    /// Deviation from the whole-iris baseline, 0..1
    pub significance: f64,
}

impl ZoneAnalysis {
    pub fn pixel_count(&self) -> usize {
        self.color_profile.pixel_count
    }
}

/// Everything derived once from the normalized iris and shared by all zones.
#[derive(Debug)]
pub struct AnalysisContext<'a> {
    pub iris: &'a NormalizedIris,
    pub gray: GrayImage,
    pub gradients: GradientField,
    /// Pixels within atlas radius 1.0, row-major
    pub samples: Vec<PolarPixel>,
}

impl<'a> AnalysisContext<'a> {
    pub fn new(iris: &'a NormalizedIris) -> Self {
        let gray = luma_image(&iris.image);
        let gradients = GradientField::compute(&gray);
        let (width, height) = iris.image.dimensions();
        let mut samples = Vec::new();
        for y in 0..height {
            for x in 0..width {
                let (angle, radius) = iris.polar_of(x, y);
                if radius <= 1.0 {
                    samples.push(PolarPixel {
                        x,
                        y,
                        angle,
                        radius,
                    });
                }
            }
        }
        Self {
            iris,
            gray,
            gradients,
            samples,
        }
    }

    /// Polar pixels that fall inside `zone`
    pub fn zone_pixels(&self, zone: &Zone) -> Vec<PolarPixel> {
        self.samples
            .iter()
            .filter(|p| zone.contains(p.angle, p.radius))
            .copied()
            .collect()
    }

    pub fn colors(&self, pixels: &[PolarPixel]) -> Vec<Rgb<u8>> {
        pixels
            .iter()
            .map(|p| *self.iris.image.get_pixel(p.x, p.y))
            .collect()
    }
}

/// Whole-iris reference every zone is compared with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Baseline {
    pub color: ColorProfile,
    pub texture: TextureFeatures,
}

/// Zone analyses plus the baseline they were scored against.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneReport {
    pub baseline: Baseline,
    pub zones: Vec<ZoneAnalysis>,
}

#[derive(Debug, Clone, Default)]
pub struct ZoneAnalyzer {
    config: ZoneAnalysisConfig,
    color: ColorAnalyzer,
}

impl ZoneAnalyzer {
    pub fn new(config: ZoneAnalysisConfig, color: ColorConfig) -> Self {
        Self {
            config,
            color: ColorAnalyzer::new(color),
        }
    }

    pub fn config(&self) -> &ZoneAnalysisConfig {
        &self.config
    }

    fn texture(&self) -> TextureAnalyzer {
        TextureAnalyzer::new(self.config.edge_magnitude_threshold)
    }

    /// Profile the whole iris circle
    pub fn baseline(&self, context: &AnalysisContext<'_>) -> Baseline {
        Baseline {
            color: self.color.profile(&context.colors(&context.samples)),
            texture: self
                .texture()
                .analyze(&context.gray, &context.gradients, &context.samples),
        }
    }

    /// Analyze every zone. Output has one entry per zone, in the given order.
    ///
    /// # Errors
    ///
    /// `Cancelled` if `cancel` fires before all zones are done
    pub fn analyze(
        &self,
        iris: &NormalizedIris,
        zones: &[Zone],
        cancel: &CancellationToken,
    ) -> Result<ZoneReport> {
        let context = AnalysisContext::new(iris);
        cancel.check()?;
        let baseline = self.baseline(&context);

        let analyze_one = |zone: &Zone| -> Result<ZoneAnalysis> {
            cancel.check()?;
            Ok(self.analyze_zone(&context, zone, &baseline))
        };
        let analyses = if self.config.parallel {
            zones.par_iter().map(analyze_one).collect::<Result<Vec<_>>>()?
        } else {
            zones.iter().map(analyze_one).collect::<Result<Vec<_>>>()?
        };

        debug!(
            zones = analyses.len(),
            samples = context.samples.len(),
            parallel = self.config.parallel,
            "zone analysis complete"
        );
        Ok(ZoneReport {
            baseline,
            zones: analyses,
        })
    }

    pub fn analyze_zone(
        &self,
        context: &AnalysisContext<'_>,
        zone: &Zone,
        baseline: &Baseline,
    ) -> ZoneAnalysis {
        let pixels = context.zone_pixels(zone);
        let color_profile = self.color.profile(&context.colors(&pixels));
        let texture = self
            .texture()
            .analyze(&context.gray, &context.gradients, &pixels);

        let covered = pixels.len() >= self.config.min_zone_pixels;
        let significance = if covered {
            self.significance(
                color_profile.rgb_distance(&baseline.color),
                (texture.uniformity - baseline.texture.uniformity).abs(),
            )
        } else {
            0.0
        };
        let observations = observations(&color_profile, &texture, baseline, covered);

        ZoneAnalysis {
            zone: zone.clone(),
            color_profile,
            texture,
            observations,
            significance,
        }
    }

    /// Weighted mean of normalized color deviation and texture anomaly.
    /// Non-decreasing in both distances.
    pub fn significance(&self, color_distance: f64, uniformity_difference: f64) -> f64 {
        let color = (color_distance / COLOR_DEVIATION_SCALE).clamp(0.0, 1.0);
        let texture = (uniformity_difference / TEXTURE_ANOMALY_SCALE).clamp(0.0, 1.0);
        let total = self.config.color_weight + self.config.texture_weight;
        if total <= 0.0 {
            return 0.0;
        }
        ((self.config.color_weight * color + self.config.texture_weight * texture) / total)
            .clamp(0.0, 1.0)
    }
}

fn observations(
    color: &ColorProfile,
    texture: &TextureFeatures,
    baseline: &Baseline,
    covered: bool,
) -> Vec<String> {
    if !covered {
        return vec!["Too few pixels sampled for a reliable reading".to_string()];
    }

    let mut notes = Vec::new();
    if color.dominant != baseline.color.dominant {
        notes.push(format!(
            "Reads {} against a mostly {} iris",
            color.dominant, baseline.color.dominant
        ));
    }
    let shift = color.brightness - baseline.color.brightness;
    if shift > BRIGHTNESS_SHIFT {
        notes.push("Lighter than the surrounding iris".to_string());
    } else if shift < -BRIGHTNESS_SHIFT {
        notes.push("Darker than the surrounding iris".to_string());
    }
    notes.extend(texture.patterns.iter().map(|p| p.observation().to_string()));
    notes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::atlas::zones_for_eye;
    use crate::EyeSide;
    use image::RgbImage;

    fn iris_from(image: RgbImage, radius: f64) -> NormalizedIris {
        NormalizedIris {
            image,
            iris_radius: radius,
            atlas_radius: radius,
            scale: 1.0,
        }
    }

    fn uniform_iris() -> NormalizedIris {
        iris_from(RgbImage::from_pixel(96, 96, Rgb([50, 80, 200])), 40.0)
    }

    #[test]
    fn test_output_matches_atlas_order() {
        let zones = zones_for_eye(EyeSide::Right);
        let iris = uniform_iris();
        let token = CancellationToken::new();

        let parallel = ZoneAnalyzer::default().analyze(&iris, &zones, &token).unwrap();
        let sequential = ZoneAnalyzer::new(
            ZoneAnalysisConfig {
                parallel: false,
                ..ZoneAnalysisConfig::default()
            },
            ColorConfig::default(),
        )
        .analyze(&iris, &zones, &token)
        .unwrap();

        assert_eq!(parallel.zones.len(), zones.len());
        for (analysis, zone) in parallel.zones.iter().zip(zones.iter()) {
            assert_eq!(analysis.zone.id, zone.id);
        }
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_uniform_iris_has_no_significance() {
        let zones = zones_for_eye(EyeSide::Left);
        let report = ZoneAnalyzer::default()
            .analyze(&uniform_iris(), &zones, &CancellationToken::new())
            .unwrap();
        assert_eq!(report.baseline.color.dominant, crate::color::IrisColor::Blue);
        for zone in &report.zones {
            assert!(zone.pixel_count() > 0, "{}", zone.zone.id);
            assert_eq!(zone.significance, 0.0, "{}", zone.zone.id);
            assert_eq!(zone.color_profile.dominant, crate::color::IrisColor::Blue);
        }
    }

    #[test]
    fn test_zone_pixels_partition_the_disc() {
        let iris = uniform_iris();
        let context = AnalysisContext::new(&iris);
        let zones = zones_for_eye(EyeSide::Right);
        let total: usize = zones.iter().map(|z| context.zone_pixels(z).len()).sum();
        assert_eq!(total, context.samples.len());
    }

    #[test]
    fn test_extracted_iris_samples_half_width_disc() {
        use crate::detection::IrisLandmark;
        use crate::extraction::IrisExtractor;

        let frame = RgbImage::from_pixel(200, 200, Rgb([50, 80, 200]));
        let iris = IrisExtractor::default()
            .extract(&frame, &IrisLandmark::new(100.0, 100.0, 40.0))
            .unwrap();
        let context = AnalysisContext::new(&iris);

        let disc = std::f64::consts::PI * 256.0 * 256.0;
        let ratio = context.samples.len() as f64 / disc;
        assert!((ratio - 1.0).abs() < 0.01, "{} samples", context.samples.len());
        assert!(context.samples.iter().any(|p| p.x == 511 && p.y == 256));

        // the outermost ring reaches the half-width
        let zones = zones_for_eye(EyeSide::Right);
        let skin = zones.last().unwrap();
        assert!(context.zone_pixels(skin).iter().any(|p| p.x == 511 && p.y == 256));
    }

    #[test]
    fn test_deviating_zone_is_significant() {
        // brown wedge over the top of a blue iris: the brain sector (11-1 o'clock)
        let image = RgbImage::from_fn(96, 96, |x, y| {
            let dx = x as f64 + 0.5 - 48.0;
            let dy = 48.0 - (y as f64 + 0.5);
            let angle = dy.atan2(dx).to_degrees();
            if (60.0..120.0).contains(&angle) {
                Rgb([140, 80, 40])
            } else {
                Rgb([50, 80, 200])
            }
        });
        let zones = zones_for_eye(EyeSide::Right);
        let report = ZoneAnalyzer::default()
            .analyze(&iris_from(image, 40.0), &zones, &CancellationToken::new())
            .unwrap();

        let brain = report.zones.iter().find(|z| z.zone.id == "right.brain").unwrap();
        let lung = report.zones.iter().find(|z| z.zone.id == "right.lung").unwrap();
        assert_eq!(brain.color_profile.dominant, crate::color::IrisColor::Brown);
        assert!(brain.significance > lung.significance);
        assert!(brain.observations.iter().any(|o| o.starts_with("Reads brown")));
    }

    #[test]
    fn test_significance_is_monotonic() {
        let analyzer = ZoneAnalyzer::default();
        let mut previous = -1.0;
        for step in 0..20 {
            let d = step as f64 * 0.05;
            let s = analyzer.significance(d, 0.1);
            assert!(s >= previous);
            assert!((0.0..=1.0).contains(&s));
            previous = s;
        }
        assert!(analyzer.significance(0.2, 0.3) >= analyzer.significance(0.2, 0.1));
        assert_eq!(analyzer.significance(0.0, 0.0), 0.0);
        assert_eq!(analyzer.significance(10.0, 10.0), 1.0);
    }

    #[test]
    fn test_cancelled_before_start() {
        let token = CancellationToken::new();
        token.cancel();
        let err = ZoneAnalyzer::default()
            .analyze(&uniform_iris(), &zones_for_eye(EyeSide::Left), &token)
            .unwrap_err();
        assert!(matches!(err, crate::AnalysisError::Cancelled));
    }

    #[test]
    fn test_undersampled_zone() {
        let tiny = iris_from(RgbImage::from_pixel(8, 8, Rgb([50, 80, 200])), 3.0);
        let zones = zones_for_eye(EyeSide::Right);
        let report = ZoneAnalyzer::default()
            .analyze(&tiny, &zones, &CancellationToken::new())
            .unwrap();
        assert!(report.zones.iter().all(|z| z.significance == 0.0));
        assert!(report
            .zones
            .iter()
            .any(|z| z.observations[0].starts_with("Too few pixels")));
    }
}
