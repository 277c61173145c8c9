//! Prioritized capture guidance
//!
//! Exactly one message is shown at a time. Checks run in priority order:
//!
//! 1. no eye detected
//! 2. both eyes required
//! 3. too far / too close (iris diameter outside the allowed share of the
//!    frame width)
//! 4. off-center
//! 5. head tilt (both eyes present)
//! 6. glare, motion blur, lighting, overall score
//! 7. ready

use serde::{Deserialize, Serialize};

use super::assessor::QualityMetrics;
use crate::config::{CaptureMode, QualityConfig};
use crate::detection::Landmarks;
use crate::EyeSide;

/// Ratio comparisons tolerate rounding in caller-computed geometry
const RATIO_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaptureGuidance {
    NoEyeDetected,
    BothEyesRequired,
    MoveCloser,
    MoveFarther,
    CenterEye,
    LevelHead,
    ReduceGlare,
    HoldSteady,
    ImproveLighting,
    RetakePhoto,
    Ready,
}

impl CaptureGuidance {
    pub fn message(&self) -> &'static str {
        match self {
            CaptureGuidance::NoEyeDetected => "No eye detected. Open your eye and face the camera",
            CaptureGuidance::BothEyesRequired => "Both eyes must be visible",
            CaptureGuidance::MoveCloser => "Move closer to the camera",
            CaptureGuidance::MoveFarther => "Move farther from the camera",
            CaptureGuidance::CenterEye => "Center your eye in the frame",
            CaptureGuidance::LevelHead => "Keep your head level",
            CaptureGuidance::ReduceGlare => "Reduce glare: avoid direct light reflections",
            CaptureGuidance::HoldSteady => "Hold the camera steady",
            CaptureGuidance::ImproveLighting => "Find softer, even lighting",
            CaptureGuidance::RetakePhoto => "Image quality too low, please retake",
            CaptureGuidance::Ready => "Ready",
        }
    }

    pub fn is_ready(&self) -> bool {
        *self == CaptureGuidance::Ready
    }
}

/// Pick the single highest-priority guidance for a frame.
pub fn evaluate_guidance(
    config: &QualityConfig,
    mode: CaptureMode,
    frame_size: (u32, u32),
    landmarks: Option<&Landmarks>,
    side: EyeSide,
    metrics: &QualityMetrics,
) -> CaptureGuidance {
    let (width, height) = frame_size;
    let landmarks = match landmarks {
        Some(l) if !l.is_empty() && width > 0 && height > 0 => l,
        _ => return CaptureGuidance::NoEyeDetected,
    };

    let left = landmarks.eye(EyeSide::Left);
    let right = landmarks.eye(EyeSide::Right);
    if mode == CaptureMode::BothEyes && (left.is_none() || right.is_none()) {
        return CaptureGuidance::BothEyesRequired;
    }
    let Some(iris) = landmarks.eye(side) else {
        return CaptureGuidance::NoEyeDetected;
    };

    let (w, h) = (width as f64, height as f64);

    let diameter_ratio = iris.diameter() / w;
    if diameter_ratio <= config.min_iris_diameter_ratio + RATIO_EPSILON {
        return CaptureGuidance::MoveCloser;
    }
    if diameter_ratio >= config.max_iris_diameter_ratio - RATIO_EPSILON {
        return CaptureGuidance::MoveFarther;
    }

    let center = match (mode, left, right) {
        (CaptureMode::BothEyes, Some(l), Some(r)) => [
            (l.center[0] + r.center[0]) / 2.0,
            (l.center[1] + r.center[1]) / 2.0,
        ],
        _ => iris.center,
    };
    let offset_x = (center[0] - w / 2.0).abs() / w;
    let offset_y = (center[1] - h / 2.0).abs() / h;
    if offset_x > config.max_center_offset_ratio || offset_y > config.max_center_offset_ratio {
        return CaptureGuidance::CenterEye;
    }

    if let (Some(l), Some(r)) = (left, right) {
        let mean_radius = (l.radius + r.radius) / 2.0;
        if (l.center[1] - r.center[1]).abs() > config.max_tilt_ratio * mean_radius {
            return CaptureGuidance::LevelHead;
        }
    }

    if metrics.has_glare {
        return CaptureGuidance::ReduceGlare;
    }
    if metrics.has_motion_blur {
        return CaptureGuidance::HoldSteady;
    }
    if config.require_good_lighting && !metrics.is_well_lit {
        return CaptureGuidance::ImproveLighting;
    }
    if metrics.overall < config.accept_threshold {
        return CaptureGuidance::RetakePhoto;
    }
    CaptureGuidance::Ready
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detection::IrisLandmark;

    fn good_metrics() -> QualityMetrics {
        QualityMetrics {
            sharpness: 1.0,
            brightness: 0.5,
            contrast: 0.7,
            iris_size: 0.6,
            center_alignment: 1.0,
            overall: 0.9,
            has_glare: false,
            has_motion_blur: false,
            is_well_lit: true,
            accepted: true,
        }
    }

    fn guidance_for(mode: CaptureMode, landmarks: Option<&Landmarks>, metrics: &QualityMetrics) -> CaptureGuidance {
        evaluate_guidance(
            &QualityConfig::default(),
            mode,
            (1000, 1000),
            landmarks,
            EyeSide::Left,
            metrics,
        )
    }

    #[test]
    fn test_no_detection_first() {
        let mut bad = good_metrics();
        bad.has_glare = true;
        assert_eq!(
            guidance_for(CaptureMode::SingleEye, None, &bad),
            CaptureGuidance::NoEyeDetected
        );
        let empty = Landmarks::default();
        assert_eq!(
            guidance_for(CaptureMode::SingleEye, Some(&empty), &bad),
            CaptureGuidance::NoEyeDetected
        );
    }

    #[test]
    fn test_both_eyes_required() {
        let only_left = Landmarks::single(EyeSide::Left, IrisLandmark::new(500.0, 500.0, 100.0));
        assert_eq!(
            guidance_for(CaptureMode::BothEyes, Some(&only_left), &good_metrics()),
            CaptureGuidance::BothEyesRequired
        );
        assert_eq!(
            guidance_for(CaptureMode::SingleEye, Some(&only_left), &good_metrics()),
            CaptureGuidance::Ready
        );
    }

    #[test]
    fn test_wrong_eye_in_single_mode() {
        let only_right = Landmarks::single(EyeSide::Right, IrisLandmark::new(500.0, 500.0, 100.0));
        assert_eq!(
            guidance_for(CaptureMode::SingleEye, Some(&only_right), &good_metrics()),
            CaptureGuidance::NoEyeDetected
        );
    }

    #[test]
    fn test_distance_bounds() {
        let m = good_metrics();
        let at_min = Landmarks::single(EyeSide::Left, IrisLandmark::new(500.0, 500.0, 50.0));
        assert_eq!(guidance_for(CaptureMode::SingleEye, Some(&at_min), &m), CaptureGuidance::MoveCloser);
        let too_big = Landmarks::single(EyeSide::Left, IrisLandmark::new(500.0, 500.0, 220.0));
        assert_eq!(guidance_for(CaptureMode::SingleEye, Some(&too_big), &m), CaptureGuidance::MoveFarther);
        let fine = Landmarks::single(EyeSide::Left, IrisLandmark::new(500.0, 500.0, 150.0));
        assert_eq!(guidance_for(CaptureMode::SingleEye, Some(&fine), &m), CaptureGuidance::Ready);
    }

    #[test]
    fn test_distance_outranks_centering() {
        let far_and_off = Landmarks::single(EyeSide::Left, IrisLandmark::new(900.0, 900.0, 30.0));
        assert_eq!(
            guidance_for(CaptureMode::SingleEye, Some(&far_and_off), &good_metrics()),
            CaptureGuidance::MoveCloser
        );
    }

    #[test]
    fn test_off_center() {
        let off = Landmarks::single(EyeSide::Left, IrisLandmark::new(700.0, 500.0, 100.0));
        assert_eq!(
            guidance_for(CaptureMode::SingleEye, Some(&off), &good_metrics()),
            CaptureGuidance::CenterEye
        );
        let slight = Landmarks::single(EyeSide::Left, IrisLandmark::new(600.0, 540.0, 100.0));
        assert_eq!(
            guidance_for(CaptureMode::SingleEye, Some(&slight), &good_metrics()),
            CaptureGuidance::Ready
        );
    }

    #[test]
    fn test_head_tilt() {
        let tilted = Landmarks::both(
            IrisLandmark::new(650.0, 480.0, 60.0),
            IrisLandmark::new(350.0, 520.0, 60.0),
        );
        assert_eq!(
            guidance_for(CaptureMode::BothEyes, Some(&tilted), &good_metrics()),
            CaptureGuidance::LevelHead
        );
        let level = Landmarks::both(
            IrisLandmark::new(650.0, 495.0, 60.0),
            IrisLandmark::new(350.0, 505.0, 60.0),
        );
        assert_eq!(
            guidance_for(CaptureMode::BothEyes, Some(&level), &good_metrics()),
            CaptureGuidance::Ready
        );
    }

    #[test]
    fn test_quality_flags_in_priority_order() {
        let eye = Landmarks::single(EyeSide::Left, IrisLandmark::new(500.0, 500.0, 100.0));
        let mut m = good_metrics();
        m.is_well_lit = false;
        m.overall = 0.2;
        assert_eq!(guidance_for(CaptureMode::SingleEye, Some(&eye), &m), CaptureGuidance::ImproveLighting);
        m.has_motion_blur = true;
        assert_eq!(guidance_for(CaptureMode::SingleEye, Some(&eye), &m), CaptureGuidance::HoldSteady);
        m.has_glare = true;
        assert_eq!(guidance_for(CaptureMode::SingleEye, Some(&eye), &m), CaptureGuidance::ReduceGlare);

        let mut low = good_metrics();
        low.overall = 0.5;
        assert_eq!(guidance_for(CaptureMode::SingleEye, Some(&eye), &low), CaptureGuidance::RetakePhoto);
    }

    #[test]
    fn test_messages() {
        assert_eq!(CaptureGuidance::MoveCloser.message(), "Move closer to the camera");
        assert!(CaptureGuidance::Ready.is_ready());
        assert!(!CaptureGuidance::CenterEye.is_ready());
    }
}
