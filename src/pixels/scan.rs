//! Scanning primitives: luma, histograms, regions of interest, sampling
//!
//! Everything here is a pure function over borrowed pixel buffers so the
//! quality gate and the color analyzer can share one implementation.

use image::{GrayImage, Luma, Rgb, RgbImage};

use crate::constants::luma::{BLUE_WEIGHT, GREEN_WEIGHT, RED_WEIGHT};

/// Axis-aligned pixel rectangle, always inside the image it was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Roi {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Roi {
    /// The whole image
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    /// Bounding square of a circle, clamped to the image.
    ///
    /// Returns `None` when the circle lies entirely outside the image.
    pub fn around_circle(center: [f64; 2], radius: f64, width: u32, height: u32) -> Option<Self> {
        if !(center[0].is_finite() && center[1].is_finite() && radius.is_finite()) {
            return None;
        }
        let x0 = (center[0] - radius).floor().max(0.0);
        let y0 = (center[1] - radius).floor().max(0.0);
        let x1 = (center[0] + radius).ceil().min(width as f64);
        let y1 = (center[1] + radius).ceil().min(height as f64);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Self {
            x: x0 as u32,
            y: y0 as u32,
            width: (x1 - x0) as u32,
            height: (y1 - y0) as u32,
        })
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Iterate pixel coordinates row by row
    pub fn coords(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        (self.y..self.y + self.height)
            .flat_map(move |y| (self.x..self.x + self.width).map(move |x| (x, y)))
    }
}

/// BT.601 luma of an 8-bit RGB pixel, in 0..255
pub fn luma(px: &Rgb<u8>) -> f64 {
    RED_WEIGHT * px[0] as f64 + GREEN_WEIGHT * px[1] as f64 + BLUE_WEIGHT * px[2] as f64
}

/// Grayscale copy of an RGB image using BT.601 weights
pub fn luma_image(image: &RgbImage) -> GrayImage {
    let (width, height) = image.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        Luma([luma(image.get_pixel(x, y)).round().clamp(0.0, 255.0) as u8])
    })
}

/// 256-bin luma histogram
#[derive(Debug, Clone)]
pub struct LumaHistogram {
    bins: [u64; 256],
    count: u64,
}

impl LumaHistogram {
    pub fn from_gray(gray: &GrayImage, roi: Roi) -> Self {
        let mut bins = [0u64; 256];
        for (x, y) in roi.coords() {
            bins[gray.get_pixel(x, y)[0] as usize] += 1;
        }
        Self {
            bins,
            count: roi.area(),
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn bins(&self) -> &[u64; 256] {
        &self.bins
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let sum: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(value, &n)| value as f64 * n as f64)
            .sum();
        sum / self.count as f64
    }

    /// Population standard deviation
    pub fn std_dev(&self) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        let mean = self.mean();
        let sum_sq: f64 = self
            .bins
            .iter()
            .enumerate()
            .map(|(value, &n)| {
                let d = value as f64 - mean;
                d * d * n as f64
            })
            .sum();
        (sum_sq / self.count as f64).sqrt()
    }
}

/// Fraction of ROI pixels whose three channels all exceed `threshold`
pub fn glare_fraction(image: &RgbImage, roi: Roi, threshold: u8) -> f64 {
    if roi.is_empty() {
        return 0.0;
    }
    let hits = roi
        .coords()
        .filter(|&(x, y)| {
            let px = image.get_pixel(x, y);
            px[0] > threshold && px[1] > threshold && px[2] > threshold
        })
        .count();
    hits as f64 / roi.area() as f64
}

/// Step that spreads at most `limit` samples evenly over `len` items
pub fn sample_stride(len: usize, limit: usize) -> usize {
    if limit == 0 || len <= limit {
        1
    } else {
        len.div_ceil(limit)
    }
}

/// Deterministic evenly spaced subsample of at most `limit` items
pub fn subsample<T>(items: &[T], limit: usize) -> impl Iterator<Item = &T> {
    items
        .iter()
        .step_by(sample_stride(items.len(), limit))
        .take(limit)
}

/// Mean of a pixel set with channels normalized to 0..1
pub fn mean_rgb(pixels: &[Rgb<u8>]) -> [f32; 3] {
    if pixels.is_empty() {
        return [0.0; 3];
    }
    let mut sums = [0u64; 3];
    for px in pixels {
        for (sum, &c) in sums.iter_mut().zip(px.0.iter()) {
            *sum += c as u64;
        }
    }
    let n = pixels.len() as f64 * 255.0;
    [
        (sums[0] as f64 / n) as f32,
        (sums[1] as f64 / n) as f32,
        (sums[2] as f64 / n) as f32,
    ]
}

/// Population mean and standard deviation
pub fn mean_and_std<I>(values: I) -> (f64, f64)
where
    I: IntoIterator<Item = f64>,
{
    let values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        return (0.0, 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}
