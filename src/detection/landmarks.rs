//! Detected eye landmarks and the detector seam

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::EyeSide;

/// Iris circle of one eye in frame pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrisLandmark {
    /// Center (x, y); x grows right, y grows down
    pub center: [f64; 2],
    /// Iris radius in pixels
    pub radius: f64,
}

impl IrisLandmark {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self {
            center: [x, y],
            radius,
        }
    }

    pub fn diameter(&self) -> f64 {
        2.0 * self.radius
    }

    /// Finite center and a strictly positive radius
    pub fn is_valid(&self) -> bool {
        self.center[0].is_finite()
            && self.center[1].is_finite()
            && self.radius.is_finite()
            && self.radius > 0.0
    }
}

/// Per-eye detection result for one frame. Either eye may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmarks {
    pub left: Option<IrisLandmark>,
    pub right: Option<IrisLandmark>,
}

impl Landmarks {
    pub fn single(side: EyeSide, iris: IrisLandmark) -> Self {
        let mut landmarks = Self::default();
        *landmarks.eye_mut(side) = Some(iris);
        landmarks
    }

    pub fn both(left: IrisLandmark, right: IrisLandmark) -> Self {
        Self {
            left: Some(left),
            right: Some(right),
        }
    }

    /// Landmark of one eye, ignoring invalid geometry
    pub fn eye(&self, side: EyeSide) -> Option<&IrisLandmark> {
        match side {
            EyeSide::Left => self.left.as_ref(),
            EyeSide::Right => self.right.as_ref(),
        }
        .filter(|iris| iris.is_valid())
    }

    fn eye_mut(&mut self, side: EyeSide) -> &mut Option<IrisLandmark> {
        match side {
            EyeSide::Left => &mut self.left,
            EyeSide::Right => &mut self.right,
        }
    }

    pub fn detected_count(&self) -> usize {
        [EyeSide::Left, EyeSide::Right]
            .into_iter()
            .filter(|side| self.eye(*side).is_some())
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.detected_count() == 0
    }
}

/// Eye/iris landmark detection.
///
/// Implementations may be a trained model or a deterministic stand-in; the
/// pipeline only relies on this contract. Returning `None` (or landmarks with
/// no eye) means nothing was detected.
pub trait IrisDetector: Send + Sync {
    fn detect(&self, frame: &RgbImage) -> Option<Landmarks>;
}

impl<F> IrisDetector for F
where
    F: Fn(&RgbImage) -> Option<Landmarks> + Send + Sync,
{
    fn detect(&self, frame: &RgbImage) -> Option<Landmarks> {
        self(frame)
    }
}
