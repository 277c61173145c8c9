//! Frame decoding and normalized-image encoding
//!
//! The codec boundary of the library: callers hand in encoded bytes and get
//! back an 8-bit RGB pixel grid (alpha is dropped), and the normalized iris
//! can be re-encoded as PNG for the presentation layer. The core never
//! touches the filesystem; [`ImageFormat::from_extension`] exists for front
//! ends that do.
//!
//! ## Supported Formats
//!
//! JPEG, PNG, WebP, TIFF and BMP via the `image` crate.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, RgbImage};
use tracing::debug;

use crate::error::{AnalysisError, Result};

/// Supported image formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    WebP,
    Tiff,
    Bmp,
}

impl ImageFormat {
    /// Detect format from file extension
    pub fn from_extension(path: &Path) -> Option<ImageFormat> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        match ext.as_str() {
            "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "webp" => Some(ImageFormat::WebP),
            "tiff" | "tif" => Some(ImageFormat::Tiff),
            "bmp" => Some(ImageFormat::Bmp),
            _ => None,
        }
    }

    fn codec(&self) -> image::ImageFormat {
        match self {
            ImageFormat::Jpeg => image::ImageFormat::Jpeg,
            ImageFormat::Png => image::ImageFormat::Png,
            ImageFormat::WebP => image::ImageFormat::WebP,
            ImageFormat::Tiff => image::ImageFormat::Tiff,
            ImageFormat::Bmp => image::ImageFormat::Bmp,
        }
    }
}

/// Decode an encoded frame, guessing the format from its magic bytes.
///
/// # Errors
///
/// `DecodeFailure` for empty, truncated or unsupported data
pub fn decode_frame(bytes: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::decode("unrecognized or corrupt image data", e))?;
    into_frame(img)
}

/// Decode an encoded frame of a known format
pub fn decode_frame_with_format(bytes: &[u8], format: ImageFormat) -> Result<RgbImage> {
    let img = image::load_from_memory_with_format(bytes, format.codec())
        .map_err(|e| AnalysisError::decode(format!("failed to decode {:?} data", format), e))?;
    into_frame(img)
}

fn into_frame(img: DynamicImage) -> Result<RgbImage> {
    if img.width() == 0 || img.height() == 0 {
        return Err(AnalysisError::DecodeFailure {
            message: "image has no pixels".to_string(),
            source: None,
        });
    }
    debug!(width = img.width(), height = img.height(), color = ?img.color(), "frame decoded");
    Ok(img.to_rgb8())
}

/// Encode an RGB image as PNG bytes
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .map_err(|e| AnalysisError::processing(format!("PNG encoding failed: {e}")))?;
    Ok(buf)
}

/// Get list of all supported file extensions
pub fn supported_extensions() -> &'static [&'static str] {
    &["jpg", "jpeg", "png", "webp", "tiff", "tif", "bmp"]
}

/// Check if a file extension is supported
pub fn is_supported_extension(ext: &str) -> bool {
    let ext_lower = ext.to_lowercase();
    supported_extensions().contains(&ext_lower.as_str())
}
