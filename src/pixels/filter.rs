//! 3x3 filtering, Laplacian sharpness and Sobel gradients
//!
//! Kernels are applied with `imageproc::filter::filter3x3` (row-major
//! correlation, edge pixels replicated at the border). This module only
//! decides which responses count and reduces them.

use image::{imageops, GrayImage, ImageBuffer, Luma};
use imageproc::filter::filter3x3;

use super::scan::{mean_and_std, Roi};

/// Single-channel float image holding filter responses
pub type GrayF32 = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Discrete Laplacian (4-neighbour)
pub const LAPLACIAN: [f32; 9] = [0.0, 1.0, 0.0, 1.0, -4.0, 1.0, 0.0, 1.0, 0.0];

pub const SOBEL_X: [f32; 9] = [-1.0, 0.0, 1.0, -2.0, 0.0, 2.0, -1.0, 0.0, 1.0];
pub const SOBEL_Y: [f32; 9] = [-1.0, -2.0, -1.0, 0.0, 0.0, 0.0, 1.0, 2.0, 1.0];

/// Kernel responses at every ROI pixel whose full 3x3 neighbourhood lies
/// inside the image. Row-major order.
pub fn roi_responses(gray: &GrayImage, roi: Roi, kernel: &[f32; 9]) -> Vec<f64> {
    let (width, height) = gray.dimensions();
    if width < 3 || height < 3 || roi.is_empty() {
        return Vec::new();
    }
    let x0 = roi.x.max(1);
    let y0 = roi.y.max(1);
    let x1 = (roi.x + roi.width).min(width - 1);
    let y1 = (roi.y + roi.height).min(height - 1);
    if x1 <= x0 || y1 <= y0 {
        return Vec::new();
    }

    // one pixel of margin so no kept response sees a replicated border
    let patch = imageops::crop_imm(gray, x0 - 1, y0 - 1, x1 - x0 + 2, y1 - y0 + 2).to_image();
    let response: GrayF32 = filter3x3(&patch, kernel);
    (1..=y1 - y0)
        .flat_map(|y| (1..=x1 - x0).map(move |x| (x, y)))
        .map(|(x, y)| response.get_pixel(x, y)[0] as f64)
        .collect()
}

/// Variance of the Laplacian response over a region; 0 for regions too
/// small to filter.
pub fn laplacian_variance(gray: &GrayImage, roi: Roi) -> f64 {
    let (_, std) = mean_and_std(roi_responses(gray, roi, &LAPLACIAN));
    std * std
}

/// Sobel gradients for a whole image.
#[derive(Debug, Clone)]
pub struct GradientField {
    gx: GrayF32,
    gy: GrayF32,
}

impl GradientField {
    pub fn compute(gray: &GrayImage) -> Self {
        Self {
            gx: filter3x3(gray, &SOBEL_X),
            gy: filter3x3(gray, &SOBEL_Y),
        }
    }

    /// (gx, gy) at a pixel; x grows right, y grows down. Zero outside.
    pub fn at(&self, x: u32, y: u32) -> (f32, f32) {
        match (self.gx.get_pixel_checked(x, y), self.gy.get_pixel_checked(x, y)) {
            (Some(gx), Some(gy)) => (gx[0], gy[0]),
            _ => (0.0, 0.0),
        }
    }

    pub fn magnitude(&self, x: u32, y: u32) -> f32 {
        let (gx, gy) = self.at(x, y);
        gx.hypot(gy)
    }
}

/// Variance of the 3x3 neighbourhood around a pixel, clipped at the borders
pub fn local_variance(gray: &GrayImage, x: u32, y: u32) -> f64 {
    let (width, height) = gray.dimensions();
    let x0 = x.saturating_sub(1);
    let y0 = y.saturating_sub(1);
    let x1 = (x + 1).min(width.saturating_sub(1));
    let y1 = (y + 1).min(height.saturating_sub(1));

    let mut sum = 0.0;
    let mut sum_sq = 0.0;
    let mut n = 0.0;
    for yy in y0..=y1 {
        for xx in x0..=x1 {
            let v = gray.get_pixel(xx, yy)[0] as f64;
            sum += v;
            sum_sq += v * v;
            n += 1.0;
        }
    }
    if n == 0.0 {
        return 0.0;
    }
    let mean = sum / n;
    (sum_sq / n - mean * mean).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{imageops, Luma};

    fn checkerboard(size: u32, cell: u32) -> GrayImage {
        GrayImage::from_fn(size, size, |x, y| {
            if ((x / cell) + (y / cell)) % 2 == 0 {
                Luma([40])
            } else {
                Luma([210])
            }
        })
    }

    #[test]
    fn test_flat_image_has_zero_laplacian_variance() {
        let flat = GrayImage::from_pixel(32, 32, Luma([128]));
        assert_eq!(laplacian_variance(&flat, Roi::full(32, 32)), 0.0);
    }

    #[test]
    fn test_tiny_image_is_safe() {
        let tiny = GrayImage::from_pixel(2, 2, Luma([10]));
        assert!(roi_responses(&tiny, Roi::full(2, 2), &LAPLACIAN).is_empty());
        assert_eq!(laplacian_variance(&tiny, Roi::full(2, 2)), 0.0);
        let field = GradientField::compute(&tiny);
        assert_eq!(field.magnitude(1, 1), 0.0);
    }

    #[test]
    fn test_sharpness_grows_as_blur_is_removed() {
        let sharp = checkerboard(64, 4);
        let roi = Roi::full(64, 64);
        let mut previous = 0.0;
        for sigma in [4.0f32, 2.0, 1.0, 0.5] {
            let blurred = imageops::blur(&sharp, sigma);
            let v = laplacian_variance(&blurred, roi);
            assert!(v >= previous, "sigma {sigma}: {v} < {previous}");
            previous = v;
        }
        assert!(laplacian_variance(&sharp, roi) >= previous);
    }

    #[test]
    fn test_roi_responses_skip_frame_border() {
        // single bright pixel: Laplacian is -4 at the pixel, +1 at its neighbours
        let mut dot = GrayImage::from_pixel(7, 7, Luma([0]));
        dot.put_pixel(3, 3, Luma([10]));
        let responses = roi_responses(&dot, Roi::full(7, 7), &LAPLACIAN);
        assert_eq!(responses.len(), 25);
        assert_eq!(responses[12], -40.0);
        assert_eq!(responses[7], 10.0);
        assert_eq!(responses.iter().filter(|&&r| r != 0.0).count(), 5);

        // a ROI touching the corner only keeps interior pixels
        let corner = Roi { x: 0, y: 0, width: 3, height: 3 };
        assert_eq!(roi_responses(&dot, corner, &LAPLACIAN).len(), 4);
    }

    #[test]
    fn test_sobel_detects_vertical_edge() {
        let edge = GrayImage::from_fn(9, 9, |x, _| if x < 4 { Luma([0]) } else { Luma([200]) });
        let field = GradientField::compute(&edge);
        let (gx, gy) = field.at(4, 4);
        assert!(gx > 0.0);
        assert_eq!(gy, 0.0);
        assert_eq!(field.magnitude(1, 4), 0.0);
    }

    #[test]
    fn test_local_variance() {
        let flat = GrayImage::from_pixel(5, 5, Luma([90]));
        assert_eq!(local_variance(&flat, 2, 2), 0.0);
        assert_eq!(local_variance(&flat, 0, 0), 0.0);

        let board = checkerboard(6, 1);
        assert!(local_variance(&board, 3, 3) > 1000.0);
    }
}
