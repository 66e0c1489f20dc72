//! Error types for gridgrab.
//!
//! The post-processing components (word joining, scale advice, grid inference
//! and table assembly) never fail: they always return a best-effort result.
//! Errors only come from the edges of the engine:
//!
//! - `Io` - reading configuration or OCR dumps from disk (always bubbles up unchanged)
//! - `Parsing` - malformed TSV/JSON OCR input
//! - `Validation` - invalid configuration values
//! - `Ocr` - failures reported by an [`OcrBackend`](crate::ocr::OcrBackend)
//! - `ImageProcessing` - raster padding/scaling failures
//! - `Serialization` - JSON (de)serialization errors
//!
//! # Example
//!
//! ```rust
//! use gridgrab::{GridgrabError, Result};
//!
//! fn spacing(value: u32) -> Result<u32> {
//!     if value == 0 {
//!         return Err(GridgrabError::validation("grid spacing must be positive"));
//!     }
//!     Ok(value)
//! }
//! ```
use thiserror::Error;

/// Result type alias using `GridgrabError`.
pub type Result<T> = std::result::Result<T, GridgrabError>;

/// Main error type for all fallible gridgrab operations.
#[derive(Debug, Error)]
pub enum GridgrabError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("OCR error: {message}")]
    Ocr {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Image processing error: {message}")]
    ImageProcessing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Serialization error: {message}")]
    Serialization {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for GridgrabError {
    fn from(err: serde_json::Error) -> Self {
        GridgrabError::Serialization {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(feature = "raster")]
impl From<image::ImageError> for GridgrabError {
    fn from(err: image::ImageError) -> Self {
        GridgrabError::ImageProcessing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl GridgrabError {
    error_constructor!(parsing, Parsing);
    error_constructor!(ocr, Ocr);
    error_constructor!(validation, Validation);
    error_constructor!(image_processing, ImageProcessing);
}
