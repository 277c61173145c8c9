//! End-to-end capture analysis
//!
//! One synchronous transform per capture:
//!
//! ```text
//! bytes -> decode -> detect -> quality gate -> extract -> zones -> insights
//! ```
//!
//! Stages run strictly in order; only the zone stage fans out. Cancellation is
//! checked between stages and per zone. Nothing is retried here: every
//! failure is returned to the capture screen, which decides whether to
//! recapture.

use image::RgbImage;
use tracing::{debug, info};

use crate::analysis::{InsightGenerator, ZoneAnalyzer};
use crate::atlas::zones_for_eye;
use crate::config::{CaptureMode, PipelineConfig};
use crate::detection::{FixedFractionDetector, IrisDetector, Landmarks};
use crate::extraction::{IrisExtractor, NormalizedIris};
use crate::image_loader::decode_frame;
use crate::quality::{QualityAssessor, QualityReport};
use crate::session::CancellationToken;
use crate::{AnalysisError, EyeSide, IridologyAnalysis, Result};

/// Everything one accepted capture produces.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub analysis: IridologyAnalysis,
    pub quality: QualityReport,
    /// Normalized iris for the caller to re-encode and store
    pub normalized: NormalizedIris,
}

pub struct IrisPipeline {
    config: PipelineConfig,
    detector: Box<dyn IrisDetector>,
    assessor: QualityAssessor,
    extractor: IrisExtractor,
    zones: ZoneAnalyzer,
    insights: InsightGenerator,
}

impl IrisPipeline {
    /// Build a pipeline around a detector.
    ///
    /// # Errors
    ///
    /// `InvalidParameter` if the configuration fails validation
    pub fn new(config: PipelineConfig, detector: impl IrisDetector + 'static) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            assessor: QualityAssessor::new(config.quality.clone(), config.capture.mode),
            extractor: IrisExtractor::new(config.extraction.clone()),
            zones: ZoneAnalyzer::new(config.zones.clone(), config.color.clone()),
            insights: InsightGenerator::new(config.insights.clone()),
            detector: Box::new(detector),
            config,
        })
    }

    /// Pipeline using the fixed-fraction stand-in detector that matches the
    /// configured capture mode.
    pub fn with_placeholder(config: PipelineConfig, side: EyeSide) -> Result<Self> {
        let detector = match config.capture.mode {
            CaptureMode::SingleEye => FixedFractionDetector::single_centered(side),
            CaptureMode::BothEyes => FixedFractionDetector::both_eyes(),
        };
        Self::new(config, detector)
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Decode and analyze an encoded frame
    pub fn analyze(&self, bytes: &[u8], side: EyeSide) -> Result<AnalysisOutput> {
        self.analyze_with_cancel(bytes, side, &CancellationToken::new())
    }

    pub fn analyze_with_cancel(
        &self,
        bytes: &[u8],
        side: EyeSide,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutput> {
        let frame = decode_frame(bytes)?;
        self.analyze_frame(&frame, side, cancel)
    }

    /// Quality report for a live preview frame. Never fails.
    pub fn preview(&self, frame: &RgbImage, side: EyeSide) -> QualityReport {
        let landmarks = self.detector.detect(frame);
        self.assessor.assess(frame, landmarks.as_ref(), side)
    }

    /// Analyze a decoded frame of the eye on `side`.
    ///
    /// # Errors
    ///
    /// - `NoDetection` / `PartialDetection` when the required eyes are missing
    /// - `LowQuality` when the frame fails the quality gate
    /// - `OutOfBoundsCrop` when the padded iris does not fit in the frame
    /// - `Cancelled` when `cancel` fires mid-analysis
    pub fn analyze_frame(
        &self,
        frame: &RgbImage,
        side: EyeSide,
        cancel: &CancellationToken,
    ) -> Result<AnalysisOutput> {
        cancel.check()?;
        let landmarks = self.detect(frame, side)?;
        let iris = landmarks.eye(side).copied().ok_or(AnalysisError::NoDetection)?;

        let quality = self.assessor.assess(frame, Some(&landmarks), side);
        if !quality.is_accepted() {
            info!(
                guidance = ?quality.guidance,
                overall = quality.metrics.overall,
                "frame rejected by quality gate"
            );
            return Err(AnalysisError::LowQuality {
                metrics: Box::new(quality.metrics.clone()),
                feedback: quality.message.clone(),
            });
        }

        cancel.check()?;
        let normalized = self.extractor.extract(frame, &iris)?;

        cancel.check()?;
        let atlas = zones_for_eye(side);
        let report = self.zones.analyze(&normalized, &atlas, cancel)?;
        let insights = self.insights.generate(&report.zones);

        let min_pixels = self.config.zones.min_zone_pixels;
        let covered = report
            .zones
            .iter()
            .filter(|z| z.pixel_count() >= min_pixels)
            .count();
        let analysis = IridologyAnalysis::new(
            side,
            report.zones,
            insights,
            report.baseline.color,
            quality.metrics.overall,
            covered,
        );

        info!(
            eye = %side,
            zones = analysis.zones.len(),
            insights = analysis.insights.len(),
            confidence = analysis.analysis_confidence,
            "analysis complete"
        );
        Ok(AnalysisOutput {
            analysis,
            quality,
            normalized,
        })
    }

    fn detect(&self, frame: &RgbImage, side: EyeSide) -> Result<Landmarks> {
        let landmarks = self
            .detector
            .detect(frame)
            .filter(|l| !l.is_empty())
            .ok_or(AnalysisError::NoDetection)?;
        debug!(detected = landmarks.detected_count(), "landmarks detected");

        match self.config.capture.mode {
            CaptureMode::BothEyes => {
                match (landmarks.eye(EyeSide::Left), landmarks.eye(EyeSide::Right)) {
                    (Some(_), Some(_)) => Ok(landmarks),
                    (Some(_), None) => Err(AnalysisError::PartialDetection {
                        detected: EyeSide::Left,
                    }),
                    (None, Some(_)) => Err(AnalysisError::PartialDetection {
                        detected: EyeSide::Right,
                    }),
                    (None, None) => Err(AnalysisError::NoDetection),
                }
            }
            CaptureMode::SingleEye if landmarks.eye(side).is_none() => {
                Err(AnalysisError::NoDetection)
            }
            CaptureMode::SingleEye => Ok(landmarks),
        }
    }
}
