//! Iris color classification
//!
//! An ordered decision table over hue range and channel dominance. The first
//! matching rule wins:
//!
//! | # | class | rule                                              |
//! |---|-------|---------------------------------------------------|
//! | 1 | gray  | channel spread below `GRAY_MAX_SPREAD`            |
//! | 2 | blue  | hue in [180, 260) and blue is the largest channel |
//! | 3 | green | hue in [80, 180) and green within 90% of the max  |
//! | 4 | amber | hue in [30, 60), R > G > B, saturation >= 0.6     |
//! | 5 | brown | hue in [20, 40) and red >= `BROWN_MIN_RED`        |
//! | 6 | hazel | hue in [40, 80)                                   |
//! | 7 | mixed | anything else                                     |

use std::fmt;

use serde::{Deserialize, Serialize};

use super::conversion::HsvColor;
use crate::constants::color::{
    AMBER_MIN_SATURATION, BROWN_MIN_RED, GRAY_MAX_SPREAD, GREEN_DOMINANCE_RATIO,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrisColor {
    Blue,
    Green,
    Brown,
    Hazel,
    Gray,
    Amber,
    Mixed,
}

impl IrisColor {
    pub const COUNT: usize = 7;

    pub const ALL: [IrisColor; Self::COUNT] = [
        IrisColor::Blue,
        IrisColor::Green,
        IrisColor::Brown,
        IrisColor::Hazel,
        IrisColor::Gray,
        IrisColor::Amber,
        IrisColor::Mixed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            IrisColor::Blue => "blue",
            IrisColor::Green => "green",
            IrisColor::Brown => "brown",
            IrisColor::Hazel => "hazel",
            IrisColor::Gray => "gray",
            IrisColor::Amber => "amber",
            IrisColor::Mixed => "mixed",
        }
    }

    /// Position in [`IrisColor::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Classify a normalized RGB color
    pub fn classify(rgb: [f32; 3]) -> Self {
        let [r, g, b] = rgb.map(|c| c.clamp(0.0, 1.0));
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        if max - min < GRAY_MAX_SPREAD {
            return IrisColor::Gray;
        }

        let hsv = HsvColor::from_rgb([r, g, b]);
        let hue = hsv.hue;
        let in_range = |lo: f32, hi: f32| hue >= lo && hue < hi;

        if in_range(180.0, 260.0) && b >= r && b >= g {
            IrisColor::Blue
        } else if in_range(80.0, 180.0) && g >= GREEN_DOMINANCE_RATIO * max {
            IrisColor::Green
        } else if in_range(30.0, 60.0) && r > g && g > b && hsv.saturation >= AMBER_MIN_SATURATION {
            IrisColor::Amber
        } else if in_range(20.0, 40.0) && r >= BROWN_MIN_RED {
            IrisColor::Brown
        } else if in_range(40.0, 80.0) {
            IrisColor::Hazel
        } else {
            IrisColor::Mixed
        }
    }

    pub fn classify_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::classify([r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0])
    }
}

impl fmt::Display for IrisColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
