//! Capture quality assessment
//!
//! Scores a frame for sharpness, exposure, contrast, glare, blur, iris size
//! and centering, then gates it with a single prioritized guidance message.

pub mod assessor;
pub mod guidance;

pub use assessor::{QualityAssessor, QualityMetrics, QualityReport};
pub use guidance::{evaluate_guidance, CaptureGuidance};
