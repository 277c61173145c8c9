//! RGB/HSV conversion and hex rendering
//!
//! HSV follows the max/min decomposition: value is the largest channel,
//! saturation is `(max - min) / max` (0 for black) and hue is taken from the
//! dominant channel and wrapped into [0, 360).

use palette::{FromColor, Hsv, Srgb};
use serde::{Deserialize, Serialize};

/// HSV triple with hue in degrees [0, 360) and saturation/value in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvColor {
    pub hue: f32,
    pub saturation: f32,
    pub value: f32,
}

impl HsvColor {
    /// Convert normalized RGB (each channel in 0..1)
    pub fn from_rgb(rgb: [f32; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| c.clamp(0.0, 1.0));
        let hsv: Hsv = Hsv::from_color(Srgb::new(r, g, b));
        let hue = hsv.hue.into_positive_degrees();
        Self {
            // 360.0 can survive the positive wrap through float rounding
            hue: if hue >= 360.0 { 0.0 } else { hue },
            saturation: hsv.saturation,
            value: hsv.value,
        }
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::from_rgb([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
    }

    /// Back to normalized RGB
    pub fn to_rgb(&self) -> [f32; 3] {
        let rgb = Srgb::from_color(Hsv::new(self.hue, self.saturation, self.value));
        [rgb.red, rgb.green, rgb.blue]
    }
}

/// Render normalized RGB as `#RRGGBB`
pub fn rgb_to_hex(rgb: [f32; 3]) -> String {
    let [r, g, b] = rgb.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("#{:02X}{:02X}{:02X}", r, g, b)
}
