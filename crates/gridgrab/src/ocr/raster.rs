//! Preparation of a captured region before it is handed to an OCR backend.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::{GridgrabError, Result};

/// Margin added on every side when a capture is too small to recognize.
pub const PAD_MARGIN: u32 = 8;

/// Smallest width/height handed to a backend without padding.
pub const MIN_RECOGNIZABLE_SIZE: u32 = 64;

/// A capture placed on a larger canvas; `offset` is where its top-left corner
/// ended up (0 when no padding was needed).
#[derive(Debug, Clone)]
pub struct PaddedImage {
    pub image: RgbaImage,
    pub offset: u32,
}

/// Pads captures smaller than `min_width` x `min_height`.
///
/// The canvas is `max(w, min_width) + 16` by `max(h, min_height) + 16`, filled
/// with the colour of the capture's top-left pixel, with the capture drawn at
/// (8, 8).
pub fn pad_image(image: &RgbaImage, min_width: u32, min_height: u32) -> PaddedImage {
    if image.width() >= min_width && image.height() >= min_height {
        return PaddedImage {
            image: image.clone(),
            offset: 0,
        };
    }

    let width = image.width().max(min_width) + 2 * PAD_MARGIN;
    let height = image.height().max(min_height) + 2 * PAD_MARGIN;
    let background = image.get_pixel_checked(0, 0).copied().unwrap_or(image::Rgba([255, 255, 255, 255]));

    let mut canvas = RgbaImage::from_pixel(width, height, background);
    imageops::replace(&mut canvas, image, PAD_MARGIN as i64, PAD_MARGIN as i64);

    tracing::debug!(
        "padded {}x{} capture onto {}x{} canvas",
        image.width(),
        image.height(),
        width,
        height
    );

    PaddedImage {
        image: canvas,
        offset: PAD_MARGIN,
    }
}

/// Resizes both axes by `scale`.
pub fn scale_uniform(image: &RgbaImage, scale: f64) -> Result<RgbaImage> {
    if !(scale.is_finite() && scale > 0.0) {
        return Err(GridgrabError::image_processing(format!(
            "Invalid scale factor {} for {}x{} image",
            scale,
            image.width(),
            image.height()
        )));
    }

    let width = ((image.width() as f64 * scale).round() as u32).max(1);
    let height = ((image.height() as f64 * scale).round() as u32).max(1);

    if width == image.width() && height == image.height() {
        return Ok(image.clone());
    }

    Ok(imageops::resize(image, width, height, FilterType::Triangle))
}
