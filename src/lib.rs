//! # Iridoscan
//!
//! A Rust crate for turning a captured eye photograph into a zone-by-zone
//! iridology reading.
//!
//! This library provides:
//! - A capture quality gate with a single prioritized guidance message
//! - Iris extraction and normalization to a canonical-size image
//! - A per-eye zone atlas in polar iris coordinates
//! - Color and texture profiles per zone, scored against the whole iris
//! - Templated, threshold-driven wellness insights
//!
//! It is not a medical diagnostic tool and performs no biometric iris
//! recognition. Eye detection is pluggable through [`IrisDetector`].
//!
//! ## Example
//!
//! ```rust,no_run
//! use iridoscan::{EyeSide, IrisPipeline, PipelineConfig};
//!
//! let bytes = std::fs::read("eye.jpg")?;
//! let pipeline = IrisPipeline::with_placeholder(PipelineConfig::default(), EyeSide::Left)?;
//! let output = pipeline.analyze(&bytes, EyeSide::Left)?;
//! for insight in &output.analysis.insights {
//!     println!("{}", insight.message);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod analysis;
pub mod atlas;
pub mod color;
pub mod config;
pub mod constants;
pub mod detection;
pub mod error;
pub mod extraction;
pub mod image_loader;
pub mod pipeline;
pub mod pixels;
pub mod quality;
pub mod session;

pub use analysis::{InsightConfidence, PatternType, TextureFeatures, WellnessInsight, ZoneAnalysis};
pub use atlas::{zones_for_eye, BodySystem, Zone};
pub use color::{ColorProfile, IrisColor};
pub use config::{CaptureMode, PipelineConfig};
pub use detection::{FixedFractionDetector, IrisDetector, IrisLandmark, Landmarks};
pub use error::{AnalysisError, Result};
pub use extraction::NormalizedIris;
pub use pipeline::{AnalysisOutput, IrisPipeline};
pub use quality::{CaptureGuidance, QualityMetrics, QualityReport};
pub use session::{CancellationToken, CaptureSession, CaptureTicket};

/// Which of the subject's eyes is analyzed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EyeSide {
    Left,
    Right,
}

impl EyeSide {
    /// Stable lowercase key used in zone ids
    pub fn key(&self) -> &'static str {
        match self {
            EyeSide::Left => "left",
            EyeSide::Right => "right",
        }
    }

    pub fn opposite(&self) -> EyeSide {
        match self {
            EyeSide::Left => EyeSide::Right,
            EyeSide::Right => EyeSide::Left,
        }
    }
}

impl fmt::Display for EyeSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Complete reading of one accepted capture.
///
/// Built once and never mutated; user notes and tags belong to whoever
/// stores it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IridologyAnalysis {
    pub eye_side: EyeSide,
    /// One entry per atlas zone, in atlas order
    pub zones: Vec<ZoneAnalysis>,
    /// Most significant first
    pub insights: Vec<WellnessInsight>,
    /// Profile of the whole iris
    pub overall_color: ColorProfile,
    /// Capture quality blended with zone coverage, 0..1
    pub analysis_confidence: f64,
}

impl IridologyAnalysis {
    /// Assemble the aggregate. `covered_zones` counts zones with enough
    /// sampled pixels to be meaningful.
    pub fn new(
        eye_side: EyeSide,
        zones: Vec<ZoneAnalysis>,
        insights: Vec<WellnessInsight>,
        overall_color: ColorProfile,
        quality_score: f64,
        covered_zones: usize,
    ) -> Self {
        let analysis_confidence = confidence(quality_score, covered_zones, zones.len());
        Self {
            eye_side,
            zones,
            insights,
            overall_color,
            analysis_confidence,
        }
    }

    pub fn zone(&self, id: &str) -> Option<&ZoneAnalysis> {
        self.zones.iter().find(|z| z.zone.id == id)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| AnalysisError::processing(format!("analysis serialization failed: {e}")))
    }
}

fn confidence(quality_score: f64, covered: usize, total: usize) -> f64 {
    use constants::confidence::{COVERAGE_WEIGHT, QUALITY_WEIGHT};
    let coverage = if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64
    };
    (QUALITY_WEIGHT * quality_score.clamp(0.0, 1.0) + COVERAGE_WEIGHT * coverage).clamp(0.0, 1.0)
}
