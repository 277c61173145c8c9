//! Color analysis and conversion module
//!
//! RGB/HSV conversion, iris color classification and statistical color
//! profiles of pixel sets.

pub mod analysis;
pub mod classify;
pub mod conversion;

pub use analysis::{ColorAnalyzer, ColorProfile};
pub use classify::IrisColor;
pub use conversion::{rgb_to_hex, HsvColor};
