//! Capture quality metrics and the accept gate
//!
//! Pixel metrics (sharpness, brightness, contrast, glare) are measured on the
//! iris bounding square when an iris is known, otherwise on the whole frame.
//! Geometric metrics (iris size, center alignment) come from the landmarks.
//!
//! The overall score is
//!
//! ```text
//! overall = w_s * sharpness + w_e * exposure + w_c * contrast
//!         + w_i * iris_size + w_a * center_alignment
//! ```
//!
//! with default weights 0.30 / 0.15 / 0.15 / 0.20 / 0.20, where `exposure`
//! peaks at 1.0 in the middle of the well-lit brightness window and falls to
//! 0.5 at its edges. A frame is accepted when the score reaches the threshold,
//! no disqualifying flag (glare, motion blur, poor lighting) is set and the
//! framing guidance is "ready".

use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::guidance::{evaluate_guidance, CaptureGuidance};
use crate::config::{CaptureMode, QualityConfig};
use crate::constants::quality::{CENTER_ALIGNMENT_GAIN, IRIS_SIZE_GAIN};
use crate::detection::{IrisLandmark, Landmarks};
use crate::pixels::{glare_fraction, laplacian_variance, luma_image, LumaHistogram, Roi};
use crate::EyeSide;

/// Quality scores for one frame, each in 0..1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityMetrics {
    pub sharpness: f64,
    pub brightness: f64,
    pub contrast: f64,
    pub iris_size: f64,
    pub center_alignment: f64,
    /// Weighted combination of the scores above
    pub overall: f64,
    pub has_glare: bool,
    pub has_motion_blur: bool,
    pub is_well_lit: bool,
    /// Final gate decision, including framing guidance
    pub accepted: bool,
}

/// Metrics plus the single prioritized guidance for the capture screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub metrics: QualityMetrics,
    pub guidance: CaptureGuidance,
    pub message: String,
}

impl QualityReport {
    pub fn is_accepted(&self) -> bool {
        self.metrics.accepted
    }
}

/// Computes quality metrics and the accept/reject gate.
///
/// Never fails: a frame that cannot be assessed is simply rejected with a
/// guidance message. Recapture is left to the caller.
#[derive(Debug, Clone, Default)]
pub struct QualityAssessor {
    config: QualityConfig,
    mode: CaptureMode,
}

impl QualityAssessor {
    pub fn new(config: QualityConfig, mode: CaptureMode) -> Self {
        Self { config, mode }
    }

    pub fn config(&self) -> &QualityConfig {
        &self.config
    }

    pub fn mode(&self) -> CaptureMode {
        self.mode
    }

    /// Assess a frame for analysis of the eye on `side`.
    pub fn assess(
        &self,
        frame: &RgbImage,
        landmarks: Option<&Landmarks>,
        side: EyeSide,
    ) -> QualityReport {
        let landmarks = landmarks.filter(|l| !l.is_empty());
        let iris = landmarks.and_then(|l| l.eye(side));
        let framing = landmarks.and_then(|l| self.framing_center(l, side));

        let mut metrics = self.measure(frame, iris, framing);
        let guidance = evaluate_guidance(
            &self.config,
            self.mode,
            frame.dimensions(),
            landmarks,
            side,
            &metrics,
        );
        metrics.accepted = guidance == CaptureGuidance::Ready;

        debug!(
            sharpness = metrics.sharpness,
            brightness = metrics.brightness,
            contrast = metrics.contrast,
            overall = metrics.overall,
            accepted = metrics.accepted,
            ?guidance,
            "quality assessed"
        );

        QualityReport {
            message: guidance.message().to_string(),
            metrics,
            guidance,
        }
    }

    /// Point the framing is judged against: the eye being analyzed, or the
    /// midpoint between the eyes when both are framed.
    fn framing_center(&self, landmarks: &Landmarks, side: EyeSide) -> Option<[f64; 2]> {
        match (
            self.mode,
            landmarks.eye(EyeSide::Left),
            landmarks.eye(EyeSide::Right),
        ) {
            (CaptureMode::BothEyes, Some(l), Some(r)) => Some([
                (l.center[0] + r.center[0]) / 2.0,
                (l.center[1] + r.center[1]) / 2.0,
            ]),
            _ => landmarks.eye(side).map(|iris| iris.center),
        }
    }

    /// Compute metrics without the framing guidance; `accepted` reflects the
    /// score and flags only.
    pub fn measure(
        &self,
        frame: &RgbImage,
        iris: Option<&IrisLandmark>,
        framing_center: Option<[f64; 2]>,
    ) -> QualityMetrics {
        let cfg = &self.config;
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return QualityMetrics::default();
        }

        let roi = iris
            .and_then(|i| Roi::around_circle(i.center, i.radius, width, height))
            .unwrap_or(Roi::full(width, height));
        let gray = luma_image(frame);
        let histogram = LumaHistogram::from_gray(&gray, roi);

        let sharpness =
            (laplacian_variance(&gray, roi) / cfg.sharpness_normalizer).clamp(0.0, 1.0);
        let brightness = (histogram.mean() / 255.0).clamp(0.0, 1.0);
        let contrast = (histogram.std_dev() / cfg.contrast_normalizer).clamp(0.0, 1.0);
        let has_glare =
            glare_fraction(frame, roi, cfg.glare_channel_threshold) > cfg.glare_fraction_limit;
        let has_motion_blur = sharpness < cfg.motion_blur_sharpness;
        let is_well_lit = (cfg.min_brightness..=cfg.max_brightness).contains(&brightness)
            && contrast >= cfg.min_contrast;

        let diagonal = (width as f64).hypot(height as f64);
        let iris_size = iris
            .map(|i| (i.diameter() / diagonal * IRIS_SIZE_GAIN).clamp(0.0, 1.0))
            .unwrap_or(0.0);
        let center_alignment = framing_center
            .or(iris.map(|i| i.center))
            .map(|c| {
                let offset = (c[0] - width as f64 / 2.0).hypot(c[1] - height as f64 / 2.0);
                (1.0 - CENTER_ALIGNMENT_GAIN * offset / diagonal).clamp(0.0, 1.0)
            })
            .unwrap_or(0.0);

        let mut metrics = QualityMetrics {
            sharpness,
            brightness,
            contrast,
            iris_size,
            center_alignment,
            overall: 0.0,
            has_glare,
            has_motion_blur,
            is_well_lit,
            accepted: false,
        };
        metrics.overall = self.overall_score(&metrics);
        metrics.accepted = self.passes_gate(&metrics);
        metrics
    }

    /// 1.0 in the middle of the well-lit window, 0.5 at its edges
    pub fn exposure_score(&self, brightness: f64) -> f64 {
        let cfg = &self.config;
        let mid = (cfg.min_brightness + cfg.max_brightness) / 2.0;
        let window = (cfg.max_brightness - cfg.min_brightness).max(f64::EPSILON);
        (1.0 - (brightness - mid).abs() / window).clamp(0.0, 1.0)
    }

    pub fn overall_score(&self, m: &QualityMetrics) -> f64 {
        let w = &self.config.weights;
        (w.sharpness * m.sharpness
            + w.exposure * self.exposure_score(m.brightness)
            + w.contrast * m.contrast
            + w.iris_size * m.iris_size
            + w.center_alignment * m.center_alignment)
            .clamp(0.0, 1.0)
    }

    /// Score threshold and disqualifying flags, without framing guidance
    pub fn passes_gate(&self, m: &QualityMetrics) -> bool {
        m.overall >= self.config.accept_threshold
            && !m.has_glare
            && !m.has_motion_blur
            && (m.is_well_lit || !self.config.require_good_lighting)
    }
}
