//! Zone analysis and wellness insights
//!
//! Maps the atlas onto a normalized iris, profiles each zone's color and
//! texture against the whole iris, and turns significant zones into
//! templated insights.

pub mod insight;
pub mod orchestrator;
pub mod texture;

pub use insight::{InsightConfidence, InsightGenerator, WellnessInsight};
pub use orchestrator::{AnalysisContext, Baseline, ZoneAnalysis, ZoneAnalyzer, ZoneReport};
pub use texture::{PatternType, PolarPixel, TextureAnalyzer, TextureFeatures};
