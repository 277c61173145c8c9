//! Iris crop, resize and enhancement
//!
//! Deterministic: identical frame and landmark always give a byte-identical
//! normalized image.

use image::{imageops, imageops::FilterType, Rgb, RgbImage};
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::detection::IrisLandmark;
use crate::{AnalysisError, Result};

/// Canonical square iris image ready for zone sampling.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedIris {
    pub image: RgbImage,
    /// Iris radius in normalized pixels
    pub iris_radius: f64,
    /// Distance in normalized pixels that atlas radius 1.0 maps to: the
    /// half-width, or the iris rim when rim mapping is configured
    pub atlas_radius: f64,
    /// Normalized pixels per frame pixel
    pub scale: f64,
}

impl NormalizedIris {
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    /// Pixel-grid center of the iris
    pub fn center(&self) -> [f64; 2] {
        [
            self.image.width() as f64 / 2.0,
            self.image.height() as f64 / 2.0,
        ]
    }

    /// (angle, normalized radius) of a pixel center. Angles follow the atlas
    /// convention: 0 on +x, counter-clockwise, with image y pointing down.
    pub fn polar_of(&self, x: u32, y: u32) -> (f64, f64) {
        let [cx, cy] = self.center();
        let dx = x as f64 + 0.5 - cx;
        let dy = cy - (y as f64 + 0.5);
        (dy.atan2(dx), dx.hypot(dy) / self.atlas_radius)
    }

    /// Copy with every pixel outside the iris circle set to black
    pub fn circular_masked(&self) -> RgbImage {
        let [cx, cy] = self.center();
        let mut masked = self.image.clone();
        for (x, y, px) in masked.enumerate_pixels_mut() {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx.hypot(dy) > self.iris_radius {
                *px = Rgb([0, 0, 0]);
            }
        }
        masked
    }
}

/// Crops the padded iris square, resizes it to the canonical size and
/// applies contrast and unsharp-mask enhancement.
#[derive(Debug, Clone, Default)]
pub struct IrisExtractor {
    config: ExtractionConfig,
}

impl IrisExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Padded crop rectangle as [x, y, side, side] in frame pixels.
    /// Coordinates saturate at the `i64` range for absurd landmarks.
    pub fn crop_rect(&self, iris: &IrisLandmark) -> [i64; 4] {
        let half = iris.radius * (1.0 + self.config.padding_ratio);
        let side = (2.0 * half).round() as i64;
        let x = (iris.center[0] - half).round() as i64;
        let y = (iris.center[1] - half).round() as i64;
        [x, y, side, side]
    }

    /// Extract the normalized iris.
    ///
    /// # Errors
    ///
    /// - `OutOfBoundsCrop` if the padded square leaves the frame; the crop is
    ///   never clamped because that would distort the iris aspect ratio
    /// - `InvalidParameter` if the landmark geometry is degenerate
    pub fn extract(&self, frame: &RgbImage, iris: &IrisLandmark) -> Result<NormalizedIris> {
        if !iris.is_valid() {
            return Err(AnalysisError::invalid_parameter(
                "iris",
                format!("center {:?} radius {}", iris.center, iris.radius),
            ));
        }

        let (width, height) = frame.dimensions();
        let crop = self.crop_rect(iris);
        let [x, y, side, _] = crop;
        let fits = |origin: i64, limit: u32| {
            origin >= 0 && origin.checked_add(side).is_some_and(|end| end <= limit as i64)
        };
        if side < 1 || !fits(x, width) || !fits(y, height) {
            return Err(AnalysisError::OutOfBoundsCrop {
                crop,
                frame: [width, height],
            });
        }

        let size = self.config.canonical_size;
        let cropped = imageops::crop_imm(frame, x as u32, y as u32, side as u32, side as u32).to_image();
        let resized = imageops::resize(&cropped, size, size, FilterType::CatmullRom);
        let enhanced = self.enhance(&resized);

        let scale = size as f64 / side as f64;
        let iris_radius = iris.radius * scale;
        let atlas_radius = if self.config.map_to_iris_rim {
            iris_radius
        } else {
            size as f64 / 2.0
        };
        debug!(
            crop_x = x,
            crop_y = y,
            crop_side = side,
            scale,
            "iris extracted"
        );

        Ok(NormalizedIris {
            image: enhanced,
            iris_radius,
            atlas_radius,
            scale,
        })
    }

    /// Contrast boost around mid-gray followed by an unsharp mask.
    pub fn enhance(&self, image: &RgbImage) -> RgbImage {
        let gain = self.config.contrast_gain;
        let mut boosted = image.clone();
        for px in boosted.pixels_mut() {
            for c in px.0.iter_mut() {
                *c = ((*c as f32 - 128.0) * gain + 128.0).round().clamp(0.0, 255.0) as u8;
            }
        }
        unsharp_mask(&boosted, self.config.unsharp_radius, self.config.unsharp_amount)
    }
}

/// `out = clamp(v + amount * (v - gaussian(v)))` per channel
pub fn unsharp_mask(image: &RgbImage, radius: f32, amount: f32) -> RgbImage {
    if radius <= 0.0 || amount == 0.0 {
        return image.clone();
    }
    let blurred = imageops::blur(image, radius);
    let mut out = image.clone();
    for (px, soft) in out.pixels_mut().zip(blurred.pixels()) {
        for (c, s) in px.0.iter_mut().zip(soft.0.iter()) {
            let v = *c as f32;
            *c = (v + amount * (v - *s as f32)).round().clamp(0.0, 255.0) as u8;
        }
    }
    out
}
