//! Pixel statistics engine
//!
//! Shared scanning and filtering primitives reused by the quality gate, the
//! color analyzer and the zone texture pass.

pub mod filter;
pub mod scan;

pub use filter::{laplacian_variance, local_variance, GradientField};
pub use scan::{
    glare_fraction, luma, luma_image, mean_and_std, mean_rgb, subsample, LumaHistogram, Roi,
};
