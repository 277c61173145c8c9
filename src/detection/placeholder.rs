//! Deterministic stand-in detector
//!
//! Places irises at fixed fractions of the frame. Useful for guided capture
//! overlays where the user aligns their eye with an on-screen ring, and for
//! tests. Swap in a real detector through [`IrisDetector`].

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::landmarks::{IrisDetector, IrisLandmark, Landmarks};

/// Eye center as fractions of frame width/height
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FractionalEye {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedFractionDetector {
    pub left: Option<FractionalEye>,
    pub right: Option<FractionalEye>,
    /// Iris radius as a fraction of frame width
    pub radius_fraction: f64,
}

impl FixedFractionDetector {
    /// Both eyes in a face-framed capture. The subject's right eye appears on
    /// the left of the image.
    pub fn both_eyes() -> Self {
        Self {
            left: Some(FractionalEye { x: 0.68, y: 0.45 }),
            right: Some(FractionalEye { x: 0.32, y: 0.45 }),
            radius_fraction: 0.06,
        }
    }

    /// One eye centered in a close-up capture, reported on `side`
    pub fn single_centered(side: crate::EyeSide) -> Self {
        let eye = Some(FractionalEye { x: 0.5, y: 0.5 });
        let (left, right) = match side {
            crate::EyeSide::Left => (eye, None),
            crate::EyeSide::Right => (None, eye),
        };
        Self {
            left,
            right,
            radius_fraction: 0.15,
        }
    }

    fn place(&self, eye: Option<FractionalEye>, width: f64, height: f64) -> Option<IrisLandmark> {
        eye.map(|e| IrisLandmark::new(e.x * width, e.y * height, self.radius_fraction * width))
    }
}

impl IrisDetector for FixedFractionDetector {
    fn detect(&self, frame: &RgbImage) -> Option<Landmarks> {
        let (width, height) = frame.dimensions();
        if width == 0 || height == 0 {
            return None;
        }
        let (w, h) = (width as f64, height as f64);
        let landmarks = Landmarks {
            left: self.place(self.left, w, h),
            right: self.place(self.right, w, h),
        };
        (!landmarks.is_empty()).then_some(landmarks)
    }
}
