//! OCR boundary: backend trait, raster preparation, scale advice and OCR dump input.
//!
//! # Features
//!
//! - **Scale advice**: pick the rescale factor that brings text to the height
//!   the engine reads best, bounded by its maximum raster size
//! - **Raster preparation**: pad tiny captures, scale uniformly (`raster` feature)
//! - **Backend trait**: plug any engine that reports words with bounding boxes
//! - **TSV/JSON input**: read Tesseract TSV or serialized [`OcrPage`] dumps
#[cfg(feature = "raster")]
pub mod backend;
#[cfg(feature = "raster")]
pub mod raster;
pub mod scale;
pub mod tsv_parser;

#[cfg(feature = "raster")]
pub use backend::OcrBackend;
#[cfg(feature = "raster")]
pub use raster::{PaddedImage, pad_image, scale_uniform};
pub use scale::{ScaleAdvisor, ideal_scale};
pub use tsv_parser::extract_page_from_tsv;

use std::path::Path;

use crate::types::OcrPage;
use crate::{GridgrabError, Result};

/// Reads an OCR dump from disk.
///
/// Files ending in `.json` are deserialized as an [`OcrPage`]; anything else
/// is parsed as Tesseract TSV, dropping words below `min_confidence`.
pub fn load_page_file(path: impl AsRef<Path>, min_confidence: f64) -> Result<OcrPage> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&content).map_err(|e| {
            GridgrabError::parsing_with_source(format!("Invalid OCR page JSON in {}", path.display()), e)
        })
    } else {
        extract_page_from_tsv(&content, min_confidence)
    }
}
