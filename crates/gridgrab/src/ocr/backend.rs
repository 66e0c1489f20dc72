//! OCR backend trait.
//!
//! gridgrab does not recognize text itself. A backend turns a raster into an
//! [`OcrPage`]: lines of words with pixel bounding boxes, an optional skew
//! angle, and the language tag that was used.

use async_trait::async_trait;
use image::RgbaImage;

use crate::Result;
use crate::types::OcrPage;

/// Trait for OCR engines feeding the post-processing pipeline.
///
/// # Thread Safety
///
/// Backends must be `Send + Sync`: a capture session may start a new
/// recognition while an older one is still running.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use gridgrab::ocr::OcrBackend;
/// use gridgrab::types::{Line, OcrPage, Rect, Word};
/// use gridgrab::Result;
/// use image::RgbaImage;
///
/// struct FixedBackend;
///
/// #[async_trait]
/// impl OcrBackend for FixedBackend {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     async fn recognize(&self, image: &RgbaImage, language: &str) -> Result<OcrPage> {
///         Ok(OcrPage {
///             lines: vec![Line::new(0, vec![Word::new("hello", Rect::from_xywh(4.0, 4.0, 40.0, 12.0), 0)])],
///             text_angle: None,
///             language: language.to_string(),
///             width: image.width(),
///             height: image.height(),
///         })
///     }
/// }
/// ```
#[async_trait]
pub trait OcrBackend: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Recognizes `image` using `language`.
    ///
    /// # Errors
    ///
    /// - `GridgrabError::Ocr` - the engine failed or is unavailable
    /// - `GridgrabError::Validation` - the language is not installed
    async fn recognize(&self, image: &RgbaImage, language: &str) -> Result<OcrPage>;

    /// Whether the backend can read `language`.
    fn supports_language(&self, _language: &str) -> bool {
        true
    }

    /// Largest raster side the engine accepts, if it has a limit.
    fn max_image_dimension(&self) -> Option<u32> {
        None
    }
}
