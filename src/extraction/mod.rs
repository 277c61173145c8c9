//! Iris extraction and normalization
//!
//! Turns a frame plus an iris landmark into a canonical-size, enhanced iris
//! image whose pixel grid the zone atlas maps onto.

pub mod normalize;

pub use normalize::{unsharp_mask, IrisExtractor, NormalizedIris};
