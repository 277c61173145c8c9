//! Eye landmark detection
//!
//! The core treats detection as an external capability behind
//! [`IrisDetector`]; this module also ships a deterministic stand-in.

pub mod landmarks;
pub mod placeholder;

pub use landmarks::{IrisDetector, IrisLandmark, Landmarks};
pub use placeholder::{FixedFractionDetector, FractionalEye};
